//! Derive macro for `tl_reflect`.
//!
//! See [`Reflect`].

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Reflection Derivation
///
/// `#[derive(Reflect)]` implements `TypePath`, `Typed` and `Reflect`, plus
/// `Struct` for structs with named fields or `Enum` for field-less enums.
///
/// ## Type Attributes
///
/// ```rust, ignore
/// #[derive(Reflect, Default)]
/// #[reflect(default, type_path = "my_crate::model::Person")]
/// struct Person { /* ... */ }
/// ```
///
/// - `default`: build fresh instances with `Default::default()`. Without it,
///   structs are built field by field from each field type's own
///   constructor, and enums start at their first variant.
/// - `type_path = "..."`: override the type path (generics are appended).
///
/// ## Field Attributes
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// struct Person {
///     #[reflect(rename = "FullName", required)]
///     name: String,
///     #[reflect(attribute)]
///     id: u32,
///     #[reflect(item_name = "Phone")]
///     phones: Vec<String>,
///     #[reflect(skip)]
///     cache: Option<String>,
/// }
/// ```
///
/// - `skip`: hide the field. The field type must implement `Default`.
/// - `rename = "..."`: the name used in documents.
/// - `required` / `optional`: presence rules. Optional members without a
///   value are also left out when writing.
/// - `read_only` / `write_only`: direction restrictions.
/// - `attribute`: prefer an attribute in formats that have them.
/// - `item_name = "..."`: the name of each item of a sequence field.
///
/// ## Variant Attributes
///
/// - `rename = "..."`: the name used in documents.
///
/// Tuple structs, unit structs and enums with fields are not supported.
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::ReflectDerive::from_input(&ast) {
        Ok(derive) => impls::impl_reflect(&derive).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
