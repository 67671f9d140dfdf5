//! Paths emitted into generated code.
//!
//! Kept in one place so that moving items inside `tl_reflect` only
//! touches this module.

use proc_macro2::TokenStream;
use quote::quote;

/// The path of `tl_reflect` as seen from the crate being expanded.
///
/// Resolved through [`tl_macro_utils::Manifest`]: `::tl_reflect` for direct
/// dependents, `::treeline::reflect` through the facade.
pub(crate) fn tl_reflect() -> syn::Path {
    tl_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("tl_reflect"))
}

#[inline(always)]
pub(crate) fn reflect_(root: &syn::Path) -> TokenStream {
    quote! { #root::Reflect }
}

#[inline(always)]
pub(crate) fn info_(root: &syn::Path) -> TokenStream {
    quote! { #root::info }
}

#[inline(always)]
pub(crate) fn ops_(root: &syn::Path) -> TokenStream {
    quote! { #root::ops }
}

#[inline(always)]
pub(crate) fn impls_(root: &syn::Path) -> TokenStream {
    quote! { #root::impls }
}

/// `::core::option::Option`, immune to local shadowing.
pub(crate) struct OptionFP;

impl quote::ToTokens for OptionFP {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.extend(quote! { ::core::option::Option });
    }
}

/// `::std::boxed::Box`, immune to local shadowing.
pub(crate) struct BoxFP;

impl quote::ToTokens for BoxFP {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.extend(quote! { ::std::boxed::Box });
    }
}
