use core::fmt;
use core::hash::Hash;
use std::collections::{BTreeMap, HashMap};

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
use crate::info::{MapInfo, ReflectKind, TypeInfo, TypePath, Typed};
use crate::ops::{Map, MapIter, ReflectMut, ReflectRef, map_debug};

macro_rules! impl_map {
    ($ty:ident, $module:expr, $($key_bound:tt)+) => {
        impl<K: TypePath, V: TypePath> TypePath for $ty<K, V> {
            fn type_path() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    concat(&[
                        $module,
                        "::",
                        stringify!($ty),
                        "<",
                        K::type_path(),
                        ", ",
                        V::type_path(),
                        ">",
                    ])
                })
            }

            fn type_name() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    concat(&[stringify!($ty), "<", K::type_name(), ", ", V::type_name(), ">"])
                })
            }

            #[inline]
            fn type_ident() -> &'static str {
                stringify!($ty)
            }
        }

        impl<K, V> Typed for $ty<K, V>
        where
            K: Reflect + Typed + $($key_bound)+,
            V: Reflect + Typed,
        {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Map(
                        MapInfo::new::<Self, K, V>()
                            .with_constructor(|| Some(Box::new(<$ty<K, V>>::new()))),
                    )
                })
            }
        }

        impl<K, V> Reflect for $ty<K, V>
        where
            K: Reflect + Typed + $($key_bound)+,
            V: Reflect + Typed,
        {
            #[inline]
            fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
                *self = value.take::<Self>()?;
                Ok(())
            }

            #[inline]
            fn reflect_kind(&self) -> ReflectKind {
                ReflectKind::Map
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Map(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Map(self)
            }

            fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                map_debug(self, f)
            }
        }

        impl<K, V> Map for $ty<K, V>
        where
            K: Reflect + Typed + $($key_bound)+,
            V: Reflect + Typed,
        {
            #[inline]
            fn len(&self) -> usize {
                <$ty<K, V>>::len(self)
            }

            fn iter(&self) -> MapIter<'_> {
                Box::new(
                    <$ty<K, V>>::iter(self).map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)),
                )
            }

            fn insert_boxed(
                &mut self,
                key: Box<dyn Reflect>,
                value: Box<dyn Reflect>,
            ) -> Result<(), (Box<dyn Reflect>, Box<dyn Reflect>)> {
                let key = match key.take::<K>() {
                    Ok(key) => key,
                    Err(key) => return Err((key, value)),
                };
                let value = match value.take::<V>() {
                    Ok(value) => value,
                    Err(value) => return Err((Box::new(key) as Box<dyn Reflect>, value)),
                };
                <$ty<K, V>>::insert(self, key, value);
                Ok(())
            }

            #[inline]
            fn clear(&mut self) {
                <$ty<K, V>>::clear(self);
            }
        }
    };
}

impl_map!(HashMap, "std::collections", Eq + Hash);
impl_map!(BTreeMap, "alloc::collections", Ord);

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use crate::Reflect;
    use crate::info::{TypePath, Typed};
    use crate::ops::ReflectRef;

    #[test]
    fn map_paths() {
        assert_eq!(
            <HashMap<String, u8> as TypePath>::type_path(),
            "std::collections::HashMap<alloc::string::String, u8>"
        );
        assert_eq!(<BTreeMap<u8, u8> as TypePath>::type_name(), "BTreeMap<u8, u8>");
    }

    #[test]
    fn map_insert_rejects_wrong_types() {
        let mut value = <BTreeMap<String, u32> as Typed>::type_info()
            .construct()
            .unwrap();
        let map = value.reflect_mut().as_map().unwrap();

        assert!(map.insert_boxed(Box::new(1_u8), Box::new(2_u32)).is_err());
        assert!(map.insert_boxed(Box::new("k".to_string()), Box::new(2_u32)).is_ok());

        let ReflectRef::Map(map) = value.reflect_ref() else {
            panic!("expected a map");
        };
        let (key, val) = map.iter().next().unwrap();
        assert_eq!(key.downcast_ref::<String>().map(String::as_str), Some("k"));
        assert_eq!(val.downcast_ref::<u32>(), Some(&2));
    }
}
