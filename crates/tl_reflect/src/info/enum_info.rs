use crate::Reflect;
use crate::info::{Constructor, Type, TypePath, impl_type_fn};
use crate::ops::Enum;

/// A unit variant of a field-less enum.
#[derive(Clone, Debug)]
pub struct VariantInfo {
    name: &'static str,
    rename: Option<&'static str>,
    discriminant: i64,
}

impl VariantInfo {
    #[inline]
    pub const fn new(name: &'static str, discriminant: i64) -> Self {
        Self {
            name,
            rename: None,
            discriminant,
        }
    }

    #[inline]
    pub const fn with_rename(mut self, rename: &'static str) -> Self {
        self.rename = Some(rename);
        self
    }

    /// The Rust name of the variant.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The renamed name, or the Rust name.
    #[inline]
    pub fn external_name(&self) -> &'static str {
        self.rename.unwrap_or(self.name)
    }

    #[inline]
    pub fn discriminant(&self) -> i64 {
        self.discriminant
    }
}

/// Static description of a field-less enum.
///
/// ```
/// use tl_reflect::{derive::Reflect, info::Typed};
///
/// #[derive(Reflect, Debug, PartialEq)]
/// enum Color { Red, Green = 5, Blue }
///
/// let info = Color::type_info().as_enum().unwrap();
/// assert_eq!(info.index_of_discriminant(5), Some(1));
///
/// let blue = info.variant_value(2).unwrap().take::<Color>().ok();
/// assert_eq!(blue, Some(Color::Blue));
/// ```
#[derive(Clone, Debug)]
pub struct EnumInfo {
    ty: Type,
    variants: Box<[VariantInfo]>,
    from_index: fn(usize) -> Option<Box<dyn Reflect>>,
    constructor: Option<Constructor>,
}

impl EnumInfo {
    impl_type_fn!(ty);

    /// Creates a description from variants in declaration order.
    ///
    /// `from_index` produces the variant at a position of `variants`.
    pub fn new<T: Enum + TypePath>(
        variants: &[VariantInfo],
        from_index: fn(usize) -> Option<Box<dyn Reflect>>,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            variants: variants.into(),
            from_index,
            constructor: None,
        }
    }

    #[inline]
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Explicit constructor, if declared.
    pub fn constructor(&self) -> Option<Constructor> {
        self.constructor
    }

    #[inline]
    pub fn variant_at(&self, index: usize) -> Option<&VariantInfo> {
        self.variants.get(index)
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &VariantInfo> {
        self.variants.iter()
    }

    #[inline]
    pub fn variant_len(&self) -> usize {
        self.variants.len()
    }

    pub fn index_of_discriminant(&self, discriminant: i64) -> Option<usize> {
        self.variants
            .iter()
            .position(|v| v.discriminant == discriminant)
    }

    /// Builds the variant at `index` as a value of the enum type.
    #[inline]
    pub fn variant_value(&self, index: usize) -> Option<Box<dyn Reflect>> {
        (self.from_index)(index)
    }
}
