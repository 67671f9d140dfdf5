use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectMeta;

/// Generate implementation codes for `Typed`.
///
/// `info_tokens` is an expression of type `TypeInfo`.
pub(crate) fn impl_trait_typed(meta: &ReflectMeta, info_tokens: TokenStream) -> TokenStream {
    let root = meta.tl_reflect_path();
    let reflect_ = crate::path::reflect_(root);
    let info_ = crate::path::info_(root);
    let impls_ = crate::path::impls_(root);
    let ident = meta.ident();

    let body = if meta.is_generic() {
        quote! {
            static CELL: #impls_::GenericTypeInfoCell = #impls_::GenericTypeInfoCell::new();
            CELL.get_or_insert::<Self>(|| #info_tokens)
        }
    } else {
        quote! {
            static CELL: #impls_::NonGenericTypeInfoCell = #impls_::NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| #info_tokens)
        }
    };

    let (impl_generics, ty_generics, where_clause) =
        meta.split_generics_with(quote!(#reflect_ + #info_::Typed));

    quote! {
        impl #impl_generics #info_::Typed for #ident #ty_generics #where_clause {
            fn type_info() -> &'static #info_::TypeInfo {
                #body
            }
        }
    }
}
