use crate::info::{TypeInfo, TypePath};

// -----------------------------------------------------------------------------
// Typed

/// Static access to the [`TypeInfo`] of a type.
///
/// Implemented by [`#[derive(Reflect)]`](crate::derive::Reflect). Manual
/// implementations store the info in a cell from [`crate::impls`]:
///
/// ```
/// use tl_reflect::{
///     Reflect,
///     impls::NonGenericTypeInfoCell,
///     info::{NamedField, StructInfo, TypeInfo, TypePath, Typed, ReflectKind},
///     ops::{ReflectMut, ReflectRef, Struct},
/// };
///
/// struct Point { x: i32, y: i32 }
///
/// impl TypePath for Point {
///     fn type_path() -> &'static str { "demo::Point" }
///     fn type_name() -> &'static str { "Point" }
///     fn type_ident() -> &'static str { "Point" }
/// }
///
/// impl Typed for Point {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Struct(
///             StructInfo::new::<Self>(&[
///                 NamedField::new::<i32>("x"),
///                 NamedField::new::<i32>("y"),
///             ])
///             .with_constructor(|| Some(Box::new(Point { x: 0, y: 0 })))
///         ))
///     }
/// }
/// # impl Reflect for Point {
/// #     fn set(&mut self, v: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
/// #         *self = v.take::<Self>()?; Ok(())
/// #     }
/// #     fn reflect_kind(&self) -> ReflectKind { ReflectKind::Struct }
/// #     fn reflect_ref(&self) -> ReflectRef<'_> { ReflectRef::Struct(self) }
/// #     fn reflect_mut(&mut self) -> ReflectMut<'_> { ReflectMut::Struct(self) }
/// # }
/// # impl Struct for Point {
/// #     fn field(&self, name: &str) -> Option<&dyn Reflect> {
/// #         match name { "x" => Some(&self.x), "y" => Some(&self.y), _ => None }
/// #     }
/// #     fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect> {
/// #         match name { "x" => Some(&mut self.x), "y" => Some(&mut self.y), _ => None }
/// #     }
/// #     fn field_at(&self, i: usize) -> Option<&dyn Reflect> {
/// #         match i { 0 => Some(&self.x), 1 => Some(&self.y), _ => None }
/// #     }
/// #     fn field_at_mut(&mut self, i: usize) -> Option<&mut dyn Reflect> {
/// #         match i { 0 => Some(&mut self.x), 1 => Some(&mut self.y), _ => None }
/// #     }
/// #     fn name_at(&self, i: usize) -> Option<&str> {
/// #         ["x", "y"].get(i).copied()
/// #     }
/// #     fn field_len(&self) -> usize { 2 }
/// # }
///
/// let info = Point::type_info().as_struct().unwrap();
/// assert_eq!(info.field_len(), 2);
/// assert!(Point::type_info().construct().is_some());
/// ```
pub trait Typed: TypePath {
    /// Returns the memoized type information.
    fn type_info() -> &'static TypeInfo;
}

// -----------------------------------------------------------------------------
// DynamicTyped

/// Dynamic dispatch for [`Typed`].
///
/// Implemented for every type that implements [`Typed`].
pub trait DynamicTyped {
    /// See [`Typed::type_info`].
    fn reflect_type_info(&self) -> &'static TypeInfo;
}

impl<T: Typed> DynamicTyped for T {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        Self::type_info()
    }
}
