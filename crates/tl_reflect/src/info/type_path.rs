use core::any::{Any, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// TypePath

/// Names of a type that stay the same across compilers, for use in node
/// names and error messages. [`core::any::type_name`] gives no such promise.
///
/// ```
/// use tl_reflect::info::TypePath;
///
/// assert_eq!(<Vec<u8> as TypePath>::type_path(), "alloc::vec::Vec<u8>");
/// assert_eq!(<Vec<u8> as TypePath>::type_name(), "Vec<u8>");
/// assert_eq!(<Vec<u8> as TypePath>::type_ident(), "Vec");
/// ```
pub trait TypePath: 'static {
    /// Module-qualified name with generic arguments, e.g. `alloc::vec::Vec<u8>`.
    fn type_path() -> &'static str;

    /// Unqualified name with generic arguments, e.g. `Vec<u8>`.
    fn type_name() -> &'static str;

    /// Bare identifier, e.g. `Vec`. Used for element and item names.
    fn type_ident() -> &'static str;
}

// -----------------------------------------------------------------------------
// DynamicTypePath

/// Object-safe mirror of [`TypePath`], so names can be read from a
/// `&dyn Reflect`. Blanket-implemented.
pub trait DynamicTypePath {
    /// See [`TypePath::type_path`].
    fn reflect_type_path(&self) -> &'static str;

    /// See [`TypePath::type_name`].
    fn reflect_type_name(&self) -> &'static str;

    /// See [`TypePath::type_ident`].
    fn reflect_type_ident(&self) -> &'static str;
}

impl<T: TypePath> DynamicTypePath for T {
    #[inline]
    fn reflect_type_path(&self) -> &'static str {
        Self::type_path()
    }

    #[inline]
    fn reflect_type_name(&self) -> &'static str {
        Self::type_name()
    }

    #[inline]
    fn reflect_type_ident(&self) -> &'static str {
        Self::type_ident()
    }
}

// -----------------------------------------------------------------------------
// Type

/// Identity of a reflected type: its [`TypeId`] plus its [`TypePath`] names.
///
/// Two `Type`s compare equal when their ids do; the names are carried
/// along for messages.
///
/// ```
/// use tl_reflect::info::Type;
///
/// let ty = Type::of::<Option<i32>>();
/// assert!(ty.is::<Option<i32>>());
/// assert_eq!(ty.name(), "Option<i32>");
/// assert_eq!(ty.ident(), "Option");
/// ```
#[derive(Copy, Clone)]
pub struct Type {
    id: TypeId,
    names: [fn() -> &'static str; 3],
}

impl Type {
    #[inline]
    pub const fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            names: [T::type_path, T::type_name, T::type_ident],
        }
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// See [`TypePath::type_path`].
    pub fn path(&self) -> &'static str {
        (self.names[0])()
    }

    /// See [`TypePath::type_name`].
    pub fn name(&self) -> &'static str {
        (self.names[1])()
    }

    /// See [`TypePath::type_ident`].
    pub fn ident(&self) -> &'static str {
        (self.names[2])()
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({})", self.path())
    }
}

// -----------------------------------------------------------------------------
// impl_type_fn

/// Forwards the [`Type`] accessors of an info struct to one of its fields.
macro_rules! impl_type_fn {
    ($field:ident) => {
        pub const fn ty(&self) -> &$crate::info::Type {
            &self.$field
        }

        pub const fn ty_id(&self) -> ::core::any::TypeId {
            self.$field.id()
        }

        pub fn type_is<T: ::core::any::Any>(&self) -> bool {
            self.$field.is::<T>()
        }

        pub fn type_path(&self) -> &'static str {
            self.$field.path()
        }

        pub fn type_name(&self) -> &'static str {
            self.$field.name()
        }

        pub fn type_ident(&self) -> &'static str {
            self.$field.ident()
        }
    };
}

pub(crate) use impl_type_fn;
