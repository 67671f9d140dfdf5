use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, GenericParam, Generics, Ident, spanned::Spanned};

use super::TypeAttributes;

/// Data shared by every generated impl of one type.
pub(crate) struct ReflectMeta<'a> {
    ident: &'a Ident,
    generics: &'a Generics,
    attrs: TypeAttributes,
    tl_reflect_path: syn::Path,
}

impl<'a> ReflectMeta<'a> {
    pub fn new(input: &'a DeriveInput, attrs: TypeAttributes) -> syn::Result<Self> {
        for param in &input.generics.params {
            match param {
                GenericParam::Type(_) => {}
                GenericParam::Lifetime(p) => {
                    return Err(syn::Error::new(
                        p.span(),
                        "reflected types must be `'static`, lifetime parameters are not supported",
                    ));
                }
                GenericParam::Const(p) => {
                    return Err(syn::Error::new(
                        p.span(),
                        "const parameters are not supported by `Reflect`",
                    ));
                }
            }
        }

        Ok(Self {
            ident: &input.ident,
            generics: &input.generics,
            attrs,
            tl_reflect_path: crate::path::tl_reflect(),
        })
    }

    #[inline]
    pub fn tl_reflect_path(&self) -> &syn::Path {
        &self.tl_reflect_path
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn ident(&self) -> &'a Ident {
        self.ident
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.generics.params.is_empty()
    }

    fn type_params(&self) -> impl Iterator<Item = &'a Ident> {
        self.generics.type_params().map(|p| &p.ident)
    }

    /// Split generics with `bound` added to every type parameter.
    pub fn split_generics_with(
        &self,
        bound: TokenStream,
    ) -> (TokenStream, TokenStream, TokenStream) {
        let mut generics = self.generics.clone();
        let params: Vec<Ident> = self.type_params().cloned().collect();
        if !params.is_empty() {
            let where_clause = generics.make_where_clause();
            for param in params {
                where_clause
                    .predicates
                    .push(syn::parse_quote! { #param: #bound });
            }
        }
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
        (
            quote! { #impl_generics },
            quote! { #ty_generics },
            quote! { #where_clause },
        )
    }

    /// Expression of the type path without generics.
    pub fn base_path(&self) -> TokenStream {
        match &self.attrs.type_path {
            Some(lit) => quote! { #lit },
            None => {
                let name = self.ident.to_string();
                quote! { ::core::concat!(::core::module_path!(), "::", #name) }
            }
        }
    }

    /// Pieces for `impls::concat` building `base<T0, T1>` from `f(T)`.
    pub fn generic_pieces(&self, base: TokenStream, f: TokenStream) -> TokenStream {
        let info = crate::path::info_(&self.tl_reflect_path);
        let mut pieces = vec![base, quote! { "<" }];
        for (index, param) in self.type_params().enumerate() {
            if index > 0 {
                pieces.push(quote! { ", " });
            }
            pieces.push(quote! { <#param as #info::TypePath>::#f() });
        }
        pieces.push(quote! { ">" });
        quote! { &[#(#pieces),*] }
    }
}
