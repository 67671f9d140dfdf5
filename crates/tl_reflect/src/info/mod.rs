//! Static type descriptions.
//!
//! - [`TypePath`] / [`DynamicTypePath`]: stable type names.
//! - [`Typed`] / [`DynamicTyped`]: access to the [`TypeInfo`] of a type.
//! - [`TypeInfo`]: one variant per [`ReflectKind`].

// -----------------------------------------------------------------------------
// Modules

mod enum_info;
mod field_info;
mod list_info;
mod map_info;
mod opaque_info;
mod optional_info;
mod struct_info;
mod type_info;
mod type_path;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use enum_info::{EnumInfo, VariantInfo};
pub use field_info::{FieldFlags, NamedField};
pub use list_info::{ContainerOrigin, ListInfo};
pub use map_info::MapInfo;
pub use opaque_info::{OpaqueInfo, ScalarKind};
pub use optional_info::OptionalInfo;
pub use struct_info::StructInfo;
pub use type_info::{Constructor, ReflectKind, TypeInfo};
pub use type_path::{DynamicTypePath, Type, TypePath};
pub use typed::{DynamicTyped, Typed};

pub(crate) use type_path::impl_type_fn;
