use core::fmt;
use std::collections::VecDeque;

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
use crate::info::{ListInfo, ReflectKind, TypeInfo, TypePath, Typed};
use crate::ops::{List, ReflectMut, ReflectRef, list_debug};

macro_rules! impl_list {
    ($ty:ident, $module:expr) => {
        impl<T: TypePath> TypePath for $ty<T> {
            fn type_path() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    concat(&[$module, "::", stringify!($ty), "<", T::type_path(), ">"])
                })
            }

            fn type_name() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| concat(&[stringify!($ty), "<", T::type_name(), ">"]))
            }

            #[inline]
            fn type_ident() -> &'static str {
                stringify!($ty)
            }
        }

        impl<T: Reflect + Typed> Typed for $ty<T> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::List(
                        ListInfo::new::<Self, T>()
                            .with_constructor(|| Some(Box::new(<$ty<T>>::new()))),
                    )
                })
            }
        }

        impl<T: Reflect + Typed> Reflect for $ty<T> {
            #[inline]
            fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
                *self = value.take::<Self>()?;
                Ok(())
            }

            #[inline]
            fn reflect_kind(&self) -> ReflectKind {
                ReflectKind::List
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::List(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::List(self)
            }

            fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                list_debug(self, f)
            }
        }
    };
}

impl_list!(Vec, "alloc::vec");
impl_list!(VecDeque, "alloc::collections");

impl<T: Reflect + Typed> List for Vec<T> {
    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        self.as_slice().get(index).map(|v| v as &dyn Reflect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        self.as_mut_slice()
            .get_mut(index)
            .map(|v| v as &mut dyn Reflect)
    }

    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        Vec::push(self, value.take::<T>()?);
        Ok(())
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn clear(&mut self) {
        Vec::clear(self);
    }
}

impl<T: Reflect + Typed> List for VecDeque<T> {
    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        VecDeque::get(self, index).map(|v| v as &dyn Reflect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        VecDeque::get_mut(self, index).map(|v| v as &mut dyn Reflect)
    }

    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        self.push_back(value.take::<T>()?);
        Ok(())
    }

    #[inline]
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    #[inline]
    fn clear(&mut self) {
        VecDeque::clear(self);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use crate::Reflect;
    use crate::info::{TypePath, Typed};
    use crate::ops::{List, ReflectMut, ReflectRef};

    #[test]
    fn list_paths() {
        assert_eq!(<Vec<String> as TypePath>::type_path(), "alloc::vec::Vec<alloc::string::String>");
        assert_eq!(
            <VecDeque<u8> as TypePath>::type_path(),
            "alloc::collections::VecDeque<u8>"
        );
    }

    #[test]
    fn list_iter_through_dyn() {
        let value = vec![1_i32, 2, 3];
        let ReflectRef::List(list) = value.reflect_ref() else {
            panic!("expected a list");
        };
        let items: Vec<i32> = list
            .iter()
            .filter_map(|v| v.downcast_ref::<i32>().copied())
            .collect();
        assert_eq!(items, [1, 2, 3]);
    }

    #[test]
    fn constructed_list_accepts_items() {
        let mut value = <VecDeque<u8> as Typed>::type_info().construct().unwrap();
        let ReflectMut::List(list) = value.reflect_mut() else {
            panic!("expected a list");
        };
        list.push(Box::new(4_u8)).unwrap();
        assert_eq!(list.len(), 1);
    }
}
