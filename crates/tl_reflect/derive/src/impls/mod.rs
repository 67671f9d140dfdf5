// -----------------------------------------------------------------------------
// Modules

mod enum_kind;
mod struct_kind;
mod trait_reflect;
mod trait_type_path;
mod trait_typed;

// -----------------------------------------------------------------------------
// Internal API

use proc_macro2::TokenStream;

use crate::derive_data::ReflectDerive;

use trait_reflect::impl_trait_reflect;
use trait_type_path::impl_trait_type_path;
use trait_typed::impl_trait_typed;

pub(crate) fn impl_reflect(derive: &ReflectDerive) -> TokenStream {
    match derive {
        ReflectDerive::Struct(info) => struct_kind::impl_struct(info),
        ReflectDerive::Enum(info) => enum_kind::impl_enum(info),
    }
}
