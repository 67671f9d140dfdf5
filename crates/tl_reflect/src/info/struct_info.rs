use crate::info::{Constructor, NamedField, Type, TypePath, impl_type_fn};
use crate::ops::Struct;

/// Static description of a struct with named fields.
///
/// ```
/// use tl_reflect::{derive::Reflect, info::Typed};
///
/// #[derive(Reflect)]
/// struct A {
///     val: f32,
///     #[reflect(rename = "Other")]
///     other: String,
/// }
///
/// let info = A::type_info().as_struct().unwrap();
///
/// assert_eq!(info.field_len(), 2);
/// assert_eq!(info.index_of("val"), Some(0));
/// assert_eq!(info.index_of_external("Other"), Some(1));
/// ```
#[derive(Clone, Debug)]
pub struct StructInfo {
    ty: Type,
    fields: Box<[NamedField]>,
    constructor: Option<Constructor>,
}

impl StructInfo {
    impl_type_fn!(ty);

    /// Creates a description from fields in declaration order.
    pub fn new<T: Struct + TypePath>(fields: &[NamedField]) -> Self {
        Self {
            ty: Type::of::<T>(),
            fields: fields.into(),
            constructor: None,
        }
    }

    /// Sets the function producing a fresh instance.
    #[inline]
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    #[inline]
    pub fn constructor(&self) -> Option<Constructor> {
        self.constructor
    }

    /// Returns the field with the Rust name `name`.
    pub fn field(&self, name: &str) -> Option<&NamedField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Returns the field at `index`.
    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&NamedField> {
        self.fields.get(index)
    }

    /// All fields in declaration order.
    #[inline]
    pub fn fields(&self) -> &[NamedField] {
        &self.fields
    }

    /// Iterates fields in declaration order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &NamedField> {
        self.fields.iter()
    }

    /// Position of the field with the Rust name `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }

    /// Position of the field whose external name is `name`.
    pub fn index_of_external(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.external_name() == name)
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }
}
