use crate::info::{Constructor, Type, TypePath, impl_type_fn};

/// The scalar families understood by value coercion.
///
/// Each kind names exactly one Rust type, noted on the variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `String`
    String,
    /// `char`
    Char,
    /// `bool`
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    /// `core::time::Duration`
    Duration,
    /// `chrono::DateTime<chrono::Utc>`
    DateTime,
    /// `chrono::NaiveDate`
    NaiveDate,
    /// `chrono::NaiveDateTime`
    NaiveDateTime,
    /// `uuid::Uuid`
    Uuid,
    /// `url::Url`
    Url,
}

impl ScalarKind {
    /// Returns `true` for the integer and float kinds.
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::Isize
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
                | Self::Usize
                | Self::F32
                | Self::F64
        )
    }
}

/// Static description of a type with no reflected structure.
#[derive(Clone, Debug)]
pub struct OpaqueInfo {
    ty: Type,
    scalar: Option<ScalarKind>,
    constructor: Option<Constructor>,
}

impl OpaqueInfo {
    impl_type_fn!(ty);

    #[inline]
    pub fn new<T: TypePath + ?Sized>() -> Self {
        Self {
            ty: Type::of::<T>(),
            scalar: None,
            constructor: None,
        }
    }

    /// Marks the type as a member of a scalar family.
    #[inline]
    pub fn with_scalar(mut self, scalar: ScalarKind) -> Self {
        self.scalar = Some(scalar);
        self
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
    pub fn scalar(&self) -> Option<ScalarKind> {
        self.scalar
    }
}
