use core::fmt;

use crate::Reflect;

/// Access to the named fields of a struct.
///
/// Names are the Rust field names. Renames and other mapping hints live
/// in [`StructInfo`](crate::info::StructInfo).
///
/// ```
/// use tl_reflect::{derive::Reflect, ops::Struct};
///
/// #[derive(Reflect)]
/// struct Foo { a: u32, b: String }
///
/// let mut foo = Foo { a: 1, b: "x".into() };
/// *foo.field_mut("a").unwrap().downcast_mut::<u32>().unwrap() = 7;
///
/// assert_eq!(foo.a, 7);
/// assert_eq!(foo.name_at(1), Some("b"));
/// assert_eq!((&foo as &dyn Struct).iter_fields().count(), 2);
/// ```
pub trait Struct: Reflect {
    /// Returns the field named `name`.
    fn field(&self, name: &str) -> Option<&dyn Reflect>;

    /// Returns the field named `name` mutably.
    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect>;

    /// Returns the field at `index`.
    fn field_at(&self, index: usize) -> Option<&dyn Reflect>;

    /// Returns the field at `index` mutably.
    fn field_at_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    /// Returns the name of the field at `index`.
    fn name_at(&self, index: usize) -> Option<&str>;

    /// Returns the number of fields.
    fn field_len(&self) -> usize;
}

impl dyn Struct {
    /// Iterates `(name, value)` pairs in declaration order.
    #[inline]
    pub fn iter_fields(&self) -> StructFieldIter<'_> {
        StructFieldIter {
            inner: self,
            index: 0,
        }
    }
}

/// Iterator over the fields of a [`Struct`].
pub struct StructFieldIter<'a> {
    inner: &'a dyn Struct,
    index: usize,
}

impl<'a> Iterator for StructFieldIter<'a> {
    type Item = (&'a str, &'a dyn Reflect);

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.inner.name_at(self.index)?;
        let value = self.inner.field_at(self.index)?;
        self.index += 1;
        Some((name, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.inner.field_len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for StructFieldIter<'_> {}

/// Debug helper for [`Struct`] implementations.
pub fn struct_debug(value: &dyn Struct, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut debug = f.debug_struct(value.reflect_type_ident());
    for (name, field) in value.iter_fields() {
        debug.field(name, &field as &dyn fmt::Debug);
    }
    debug.finish()
}

#[cfg(test)]
mod tests {
    use crate::Reflect;
    use crate::derive::Reflect;
    use crate::info::Typed;
    use crate::ops::{Enum, Struct};

    #[derive(Reflect, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
        label: String,
    }

    #[derive(Reflect, Debug, PartialEq)]
    enum Axis {
        X,
        Y,
        Z,
    }

    #[test]
    fn derived_fields_by_name_and_index() {
        let mut point = Point {
            x: 1,
            y: 2,
            label: "p".into(),
        };
        assert_eq!(point.field_len(), 3);
        assert_eq!(point.name_at(2), Some("label"));
        assert!(point.name_at(3).is_none());
        assert_eq!(point.field("y").and_then(|v| v.downcast_ref::<i32>()), Some(&2));
        assert!(point.field("z").is_none());

        *point.field_at_mut(0).unwrap().downcast_mut::<i32>().unwrap() = 5;
        assert!(point.field_mut("label").unwrap().set(Box::new("q".to_owned())).is_ok());
        assert_eq!(point.field_at(0).and_then(|v| v.downcast_ref::<i32>()), Some(&5));
        assert_eq!(point.label, "q");
    }

    #[test]
    fn derived_variants_by_index() {
        let info = Axis::type_info().as_enum().unwrap();
        let z = info.variant_value(2).unwrap().take::<Axis>().ok();
        assert_eq!(z, Some(Axis::Z));
        assert!(info.variant_value(3).is_none());
        assert_eq!(Axis::Y.variant_index(), 1);
    }
}
