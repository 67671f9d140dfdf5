use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;

use crate::derive_data::ReflectMeta;
use crate::path::BoxFP;

/// Generate implementation codes for `Reflect`.
///
/// `kind` names both the `ReflectKind` variant and the view variant.
pub(crate) fn impl_trait_reflect(
    meta: &ReflectMeta,
    kind: Ident,
    debug_tokens: TokenStream,
    extra_tokens: TokenStream,
) -> TokenStream {
    let root = meta.tl_reflect_path();
    let reflect_ = crate::path::reflect_(root);
    let info_ = crate::path::info_(root);
    let ops_ = crate::path::ops_(root);
    let ident = meta.ident();

    let (impl_generics, ty_generics, where_clause) =
        meta.split_generics_with(quote!(#reflect_ + #info_::Typed));

    quote! {
        impl #impl_generics #reflect_ for #ident #ty_generics #where_clause {
            #[inline]
            fn set(
                &mut self,
                value: #BoxFP<dyn #reflect_>,
            ) -> ::core::result::Result<(), #BoxFP<dyn #reflect_>> {
                *self = <dyn #reflect_>::take::<Self>(value)?;
                ::core::result::Result::Ok(())
            }

            #[inline]
            fn reflect_kind(&self) -> #info_::ReflectKind {
                #info_::ReflectKind::#kind
            }

            #[inline]
            fn reflect_ref(&self) -> #ops_::ReflectRef<'_> {
                #ops_::ReflectRef::#kind(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> #ops_::ReflectMut<'_> {
                #ops_::ReflectMut::#kind(self)
            }

            fn reflect_debug(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                #debug_tokens
            }

            #extra_tokens
        }
    }
}
