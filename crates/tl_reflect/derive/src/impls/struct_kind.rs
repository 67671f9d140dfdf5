use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};

use super::{impl_trait_reflect, impl_trait_type_path, impl_trait_typed};
use crate::derive_data::{ReflectStruct, StructField};
use crate::path::{BoxFP, OptionFP};

/// Implement full reflect for struct type.
pub(crate) fn impl_struct(info: &ReflectStruct) -> TokenStream {
    let meta = &info.meta;
    let ops_ = crate::path::ops_(meta.tl_reflect_path());

    let type_path_tokens = impl_trait_type_path(meta);
    let typed_tokens = impl_trait_typed(meta, struct_info_tokens(info));
    let struct_tokens = impl_trait_struct(info);
    let reflect_tokens = impl_trait_reflect(
        meta,
        format_ident!("Struct"),
        quote! { #ops_::struct_debug(self, f) },
        quote! {
            #[inline]
            fn as_struct(&self) -> #OptionFP<&dyn #ops_::Struct> {
                #OptionFP::Some(self)
            }

            #[inline]
            fn as_struct_mut(&mut self) -> #OptionFP<&mut dyn #ops_::Struct> {
                #OptionFP::Some(self)
            }
        },
    );

    quote! {
        #type_path_tokens

        #typed_tokens

        #struct_tokens

        #reflect_tokens
    }
}

/// `NamedField::new::<T>("name")` with its builder calls.
fn named_field_tokens(field: &StructField, info_: &TokenStream) -> TokenStream {
    let ty = &field.data.ty;
    let name = field.ident().to_string();
    let attrs = &field.attrs;

    let mut tokens = quote! { #info_::NamedField::new::<#ty>(#name) };
    if let Some(rename) = &attrs.rename {
        tokens.extend(quote! { .with_rename(#rename) });
    }
    if let Some(item_name) = &attrs.item_name {
        tokens.extend(quote! { .with_item_name(#item_name) });
    }
    let flags = [
        (attrs.required.is_some(), "REQUIRED"),
        (attrs.optional.is_some(), "OPTIONAL"),
        (attrs.read_only.is_some(), "READ_ONLY"),
        (attrs.write_only.is_some(), "WRITE_ONLY"),
        (attrs.attribute.is_some(), "ATTRIBUTE"),
    ];
    for (_, flag) in flags.iter().filter(|(set, _)| *set) {
        let flag = format_ident!("{}", flag);
        tokens.extend(quote! { .with_flags(#info_::FieldFlags::#flag) });
    }
    tokens
}

/// Constructor closure: `Default` when requested, otherwise field by field.
fn constructor_tokens(info: &ReflectStruct) -> TokenStream {
    let root = info.meta.tl_reflect_path();
    let reflect_ = crate::path::reflect_(root);
    let info_ = crate::path::info_(root);

    if info.meta.attrs().default.is_some() {
        return quote! {
            || #OptionFP::Some(#BoxFP::new(<Self as ::core::default::Default>::default()))
        };
    }

    let inits = info.fields.iter().map(|field| {
        let ident = field.ident();
        let ty = &field.data.ty;
        if field.is_active() {
            quote! {
                #ident: <dyn #reflect_>::take::<#ty>(
                    <#ty as #info_::Typed>::type_info().construct()?
                ).ok()?
            }
        } else {
            quote! { #ident: ::core::default::Default::default() }
        }
    });

    quote! {
        || #OptionFP::Some(#BoxFP::new(Self { #(#inits),* }))
    }
}

fn struct_info_tokens(info: &ReflectStruct) -> TokenStream {
    let info_ = crate::path::info_(info.meta.tl_reflect_path());
    let fields = info
        .active_fields()
        .map(|field| named_field_tokens(field, &info_));
    let constructor = constructor_tokens(info);

    quote! {
        #info_::TypeInfo::Struct(
            #info_::StructInfo::new::<Self>(&[#(#fields),*])
                .with_constructor(#constructor)
        )
    }
}

/// Generate `Struct` trait implementation tokens.
fn impl_trait_struct(info: &ReflectStruct) -> TokenStream {
    let meta = &info.meta;
    let root = meta.tl_reflect_path();
    let reflect_ = crate::path::reflect_(root);
    let info_ = crate::path::info_(root);
    let ops_ = crate::path::ops_(root);
    let ident = meta.ident();

    let idents: Vec<_> = info.active_fields().map(StructField::ident).collect();
    let names: Vec<String> = idents.iter().map(ToString::to_string).collect();
    let indices: Vec<usize> = (0..idents.len()).collect();
    let field_len = idents.len();
    // Unit structs cannot be interpolated inside repetitions.
    let option_ = OptionFP.to_token_stream();

    let (impl_generics, ty_generics, where_clause) =
        meta.split_generics_with(quote!(#reflect_ + #info_::Typed));

    quote! {
        impl #impl_generics #ops_::Struct for #ident #ty_generics #where_clause {
            fn field(&self, name: &str) -> #OptionFP<&dyn #reflect_> {
                match name {
                    #(#names => #option_::Some(&self.#idents as &dyn #reflect_),)*
                    _ => #OptionFP::None,
                }
            }

            fn field_mut(&mut self, name: &str) -> #OptionFP<&mut dyn #reflect_> {
                match name {
                    #(#names => #option_::Some(&mut self.#idents as &mut dyn #reflect_),)*
                    _ => #OptionFP::None,
                }
            }

            fn field_at(&self, index: usize) -> #OptionFP<&dyn #reflect_> {
                match index {
                    #(#indices => #option_::Some(&self.#idents as &dyn #reflect_),)*
                    _ => #OptionFP::None,
                }
            }

            fn field_at_mut(&mut self, index: usize) -> #OptionFP<&mut dyn #reflect_> {
                match index {
                    #(#indices => #option_::Some(&mut self.#idents as &mut dyn #reflect_),)*
                    _ => #OptionFP::None,
                }
            }

            fn name_at(&self, index: usize) -> #OptionFP<&str> {
                match index {
                    #(#indices => #option_::Some(#names),)*
                    _ => #OptionFP::None,
                }
            }

            #[inline]
            fn field_len(&self) -> usize {
                #field_len
            }
        }
    }
}
