use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectMeta;

/// Generate implementation codes for `TypePath`.
pub(crate) fn impl_trait_type_path(meta: &ReflectMeta) -> TokenStream {
    let root = meta.tl_reflect_path();
    let info_ = crate::path::info_(root);
    let impls_ = crate::path::impls_(root);

    let ident = meta.ident();
    let name = ident.to_string();
    let base_path = meta.base_path();

    let (type_path, type_name) = if meta.is_generic() {
        let path_pieces = meta.generic_pieces(base_path, quote!(type_path));
        let name_pieces = meta.generic_pieces(quote!(#name), quote!(type_name));
        (
            quote! {
                static CELL: #impls_::GenericTypePathCell = #impls_::GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| #impls_::concat(#path_pieces))
            },
            quote! {
                static CELL: #impls_::GenericTypePathCell = #impls_::GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| #impls_::concat(#name_pieces))
            },
        )
    } else {
        (base_path, quote!(#name))
    };

    let (impl_generics, ty_generics, where_clause) =
        meta.split_generics_with(quote!(#info_::TypePath));

    quote! {
        impl #impl_generics #info_::TypePath for #ident #ty_generics #where_clause {
            fn type_path() -> &'static str {
                #type_path
            }

            fn type_name() -> &'static str {
                #type_name
            }

            #[inline]
            fn type_ident() -> &'static str {
                #name
            }
        }
    }
}
