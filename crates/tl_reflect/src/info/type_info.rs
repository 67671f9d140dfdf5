use core::fmt;

use crate::Reflect;
use crate::info::{EnumInfo, ListInfo, MapInfo, OpaqueInfo, OptionalInfo, StructInfo, Type};

/// Produces a fresh instance of a type.
pub type Constructor = fn() -> Option<Box<dyn Reflect>>;

// -----------------------------------------------------------------------------
// ReflectKind

/// The structural kind of a reflected type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    Struct,
    List,
    Map,
    Enum,
    Optional,
    Opaque,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Struct => "struct",
            Self::List => "list",
            Self::Map => "map",
            Self::Enum => "enum",
            Self::Optional => "optional",
            Self::Opaque => "opaque",
        })
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Compile-time information about a type, one variant per [`ReflectKind`].
///
/// Obtained through [`Typed::type_info`](crate::info::Typed::type_info)
/// and memoized for the life of the program.
#[derive(Clone, Debug)]
pub enum TypeInfo {
    Struct(StructInfo),
    List(ListInfo),
    Map(MapInfo),
    Enum(EnumInfo),
    Optional(OptionalInfo),
    Opaque(OpaqueInfo),
}

macro_rules! impl_as_info {
    ($name:ident, $variant:ident, $info:ty) => {
        #[inline]
        pub const fn $name(&self) -> Option<&$info> {
            match self {
                Self::$variant(info) => Some(info),
                _ => None,
            }
        }
    };
}

impl TypeInfo {
    impl_as_info!(as_struct, Struct, StructInfo);
    impl_as_info!(as_list, List, ListInfo);
    impl_as_info!(as_map, Map, MapInfo);
    impl_as_info!(as_enum, Enum, EnumInfo);
    impl_as_info!(as_optional, Optional, OptionalInfo);
    impl_as_info!(as_opaque, Opaque, OpaqueInfo);

    /// The described [`Type`].
    pub const fn ty(&self) -> &Type {
        match self {
            Self::Struct(info) => info.ty(),
            Self::List(info) => info.ty(),
            Self::Map(info) => info.ty(),
            Self::Enum(info) => info.ty(),
            Self::Optional(info) => info.ty(),
            Self::Opaque(info) => info.ty(),
        }
    }

    #[inline]
    pub const fn kind(&self) -> ReflectKind {
        match self {
            Self::Struct(_) => ReflectKind::Struct,
            Self::List(_) => ReflectKind::List,
            Self::Map(_) => ReflectKind::Map,
            Self::Enum(_) => ReflectKind::Enum,
            Self::Optional(_) => ReflectKind::Optional,
            Self::Opaque(_) => ReflectKind::Opaque,
        }
    }

    #[inline]
    pub const fn ty_id(&self) -> core::any::TypeId {
        self.ty().id()
    }

    #[inline]
    pub fn type_is<T: core::any::Any>(&self) -> bool {
        self.ty().is::<T>()
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.ty().path()
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ty().name()
    }

    #[inline]
    pub fn type_ident(&self) -> &'static str {
        self.ty().ident()
    }

    /// Creates a fresh instance of the described type.
    ///
    /// Returns `None` when the type has no way to be created without input.
    /// Field-less enums fall back to their first variant.
    ///
    /// ```
    /// use tl_reflect::info::Typed;
    ///
    /// let value = <Option<u8> as Typed>::type_info().construct().unwrap();
    /// assert_eq!(value.take::<Option<u8>>().ok(), Some(None));
    ///
    /// assert!(<url::Url as Typed>::type_info().construct().is_none());
    /// ```
    pub fn construct(&self) -> Option<Box<dyn Reflect>> {
        let constructor = match self {
            Self::Struct(info) => info.constructor(),
            Self::List(info) => info.constructor(),
            Self::Map(info) => info.constructor(),
            Self::Enum(info) => match info.constructor() {
                Some(c) => Some(c),
                None => return info.variant_value(0),
            },
            Self::Optional(info) => info.constructor(),
            Self::Opaque(info) => info.constructor(),
        };
        constructor.and_then(|construct| construct())
    }
}
