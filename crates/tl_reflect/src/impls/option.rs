use core::fmt;

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
use crate::info::{OptionalInfo, ReflectKind, TypeInfo, TypePath, Typed};
use crate::ops::{Optional, ReflectMut, ReflectRef};

impl<T: TypePath> TypePath for Option<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["core::option::Option<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Option<", T::type_name(), ">"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Option"
    }
}

impl<T: Reflect + Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Optional(
                OptionalInfo::new::<Self, T>().with_constructor(|| Some(Box::new(None::<T>))),
            )
        })
    }
}

impl<T: Reflect + Typed> Reflect for Option<T> {
    #[inline]
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = value.take::<Self>()?;
        Ok(())
    }

    #[inline]
    fn reflect_kind(&self) -> ReflectKind {
        ReflectKind::Optional
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Optional(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Optional(self)
    }

    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Some(value) => f
                .debug_tuple("Some")
                .field(&(value as &dyn Reflect))
                .finish(),
            None => f.write_str("None"),
        }
    }
}

impl<T: Reflect + Typed> Optional for Option<T> {
    #[inline]
    fn value(&self) -> Option<&dyn Reflect> {
        self.as_ref().map(|v| v as &dyn Reflect)
    }

    #[inline]
    fn value_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().map(|v| v as &mut dyn Reflect)
    }

    fn set_some(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = Some(value.take::<T>()?);
        Ok(())
    }

    #[inline]
    fn set_none(&mut self) {
        *self = None;
    }
}

#[cfg(test)]
mod tests {
    use crate::info::{TypePath, Typed};

    #[test]
    fn option_type_path() {
        assert_eq!(<Option<u8> as TypePath>::type_path(), "core::option::Option<u8>");
        assert_eq!(<Option<u8> as TypePath>::type_name(), "Option<u8>");
    }

    #[test]
    fn option_info_points_at_inner() {
        let info = <Option<String> as Typed>::type_info().as_optional().unwrap();
        assert!(info.some_info().type_is::<String>());
    }
}
