use crate::info::{Constructor, Type, TypeInfo, TypePath, Typed, impl_type_fn};
use crate::ops::Optional;

/// Static description of an optional wrapper such as `Option<T>`.
#[derive(Clone, Debug)]
pub struct OptionalInfo {
    ty: Type,
    some_ty: Type,
    some_info: fn() -> &'static TypeInfo,
    constructor: Option<Constructor>,
}

impl OptionalInfo {
    impl_type_fn!(ty);

    /// Describes `TOpt` wrapping `TSome`.
    pub fn new<TOpt: Optional + TypePath, TSome: Typed>() -> Self {
        Self {
            ty: Type::of::<TOpt>(),
            some_ty: Type::of::<TSome>(),
            some_info: TSome::type_info,
            constructor: None,
        }
    }

    #[inline]
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    #[inline]
    pub fn constructor(&self) -> Option<Constructor> {
        self.constructor
    }

    #[inline]
    pub fn some_ty(&self) -> &Type {
        &self.some_ty
    }

    /// The [`TypeInfo`] of the wrapped type.
    #[inline]
    pub fn some_info(&self) -> &'static TypeInfo {
        (self.some_info)()
    }
}
