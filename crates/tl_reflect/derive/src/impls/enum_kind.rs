use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};

use super::{impl_trait_reflect, impl_trait_type_path, impl_trait_typed};
use crate::derive_data::ReflectEnum;
use crate::path::{BoxFP, OptionFP};

/// Implement full reflect for a field-less enum.
pub(crate) fn impl_enum(info: &ReflectEnum) -> TokenStream {
    let meta = &info.meta;
    let ops_ = crate::path::ops_(meta.tl_reflect_path());

    let type_path_tokens = impl_trait_type_path(meta);
    let typed_tokens = impl_trait_typed(meta, enum_info_tokens(info));
    let enum_tokens = impl_trait_enum(info);
    let reflect_tokens = impl_trait_reflect(
        meta,
        format_ident!("Enum"),
        quote! { f.write_str(#ops_::Enum::variant_name(self)) },
        TokenStream::new(),
    );

    quote! {
        #type_path_tokens

        #typed_tokens

        #enum_tokens

        #reflect_tokens
    }
}

fn enum_info_tokens(info: &ReflectEnum) -> TokenStream {
    let root = info.meta.tl_reflect_path();
    let reflect_ = crate::path::reflect_(root);
    let info_ = crate::path::info_(root);

    let variants = info.variants.iter().map(|variant| {
        let ident = &variant.data.ident;
        let name = ident.to_string();
        let mut tokens = quote! { #info_::VariantInfo::new(#name, Self::#ident as i64) };
        if let Some(rename) = &variant.attrs.rename {
            tokens.extend(quote! { .with_rename(#rename) });
        }
        tokens
    });

    let idents: Vec<_> = info.variants.iter().map(|v| &v.data.ident).collect();
    let indices: Vec<usize> = (0..idents.len()).collect();
    let option_ = OptionFP.to_token_stream();
    let box_ = BoxFP.to_token_stream();

    let constructor = if info.meta.attrs().default.is_some() {
        quote! {
            .with_constructor(|| #OptionFP::Some(
                #BoxFP::new(<Self as ::core::default::Default>::default())
            ))
        }
    } else {
        TokenStream::new()
    };

    quote! {
        #info_::TypeInfo::Enum(
            #info_::EnumInfo::new::<Self>(
                &[#(#variants),*],
                |index| match index {
                    #(#indices => #option_::Some(#box_::new(Self::#idents) as #box_<dyn #reflect_>),)*
                    _ => #OptionFP::None,
                },
            )
            #constructor
        )
    }
}

fn impl_trait_enum(info: &ReflectEnum) -> TokenStream {
    let meta = &info.meta;
    let ops_ = crate::path::ops_(meta.tl_reflect_path());
    let ident = meta.ident();

    let idents: Vec<_> = info.variants.iter().map(|v| &v.data.ident).collect();
    let names: Vec<String> = idents.iter().map(ToString::to_string).collect();
    let indices: Vec<usize> = (0..idents.len()).collect();

    quote! {
        impl #ops_::Enum for #ident {
            fn variant_name(&self) -> &str {
                match self {
                    #(Self::#idents => #names,)*
                }
            }

            fn variant_index(&self) -> usize {
                match self {
                    #(Self::#idents => #indices,)*
                }
            }

            fn discriminant(&self) -> i64 {
                match self {
                    #(Self::#idents => Self::#idents as i64,)*
                }
            }
        }
    }
}
