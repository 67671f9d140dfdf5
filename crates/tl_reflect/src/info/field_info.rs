use crate::info::{Type, TypeInfo, Typed, impl_type_fn};

bitflags::bitflags! {
    /// Mapping hints attached to a field.
    ///
    /// Declared through `#[reflect(...)]` on a field, see
    /// [`derive::Reflect`](crate::derive::Reflect).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FieldFlags: u8 {
        /// The field must be present when reading.
        const REQUIRED   = 1 << 0;
        /// The field may be absent even if its type is not nullable.
        const OPTIONAL   = 1 << 1;
        /// The field is written out but never read back.
        const READ_ONLY  = 1 << 2;
        /// The field is read but never written out.
        const WRITE_ONLY = 1 << 3;
        /// Formats with attributes should emit the field as one.
        const ATTRIBUTE  = 1 << 4;
    }
}

/// A named field of a struct.
///
/// ```
/// use tl_reflect::info::{FieldFlags, NamedField};
///
/// let field = NamedField::new::<String>("name")
///     .with_rename("FullName")
///     .with_flags(FieldFlags::REQUIRED);
///
/// assert_eq!(field.name(), "name");
/// assert_eq!(field.external_name(), "FullName");
/// assert!(field.flags().contains(FieldFlags::REQUIRED));
/// assert_eq!(field.type_info().type_path(), "alloc::string::String");
/// ```
#[derive(Clone, Debug)]
pub struct NamedField {
    name: &'static str,
    ty: Type,
    type_info: fn() -> &'static TypeInfo,
    rename: Option<&'static str>,
    item_name: Option<&'static str>,
    flags: FieldFlags,
}

impl NamedField {
    impl_type_fn!(ty);

    /// Creates a field named `name` of type `T`.
    #[inline]
    pub fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            ty: Type::of::<T>(),
            type_info: T::type_info,
            rename: None,
            item_name: None,
            flags: FieldFlags::empty(),
        }
    }

    /// Sets the name used outside of Rust code.
    #[inline]
    pub fn with_rename(mut self, rename: &'static str) -> Self {
        self.rename = Some(rename);
        self
    }

    /// Sets the name used for the items of a sequence field.
    #[inline]
    pub fn with_item_name(mut self, item_name: &'static str) -> Self {
        self.item_name = Some(item_name);
        self
    }

    /// Adds mapping flags.
    #[inline]
    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// The Rust name of the field.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The renamed name, or the Rust name.
    #[inline]
    pub fn external_name(&self) -> &'static str {
        self.rename.unwrap_or(self.name)
    }

    /// Returns `true` if a rename was declared.
    #[inline]
    pub fn is_renamed(&self) -> bool {
        self.rename.is_some()
    }

    #[inline]
    pub fn item_name(&self) -> Option<&'static str> {
        self.item_name
    }

    #[inline]
    pub fn flags(&self) -> FieldFlags {
        self.flags
    }

    /// The [`TypeInfo`] of the field type.
    ///
    /// Resolved on demand, so recursive types do not recurse here.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }
}
