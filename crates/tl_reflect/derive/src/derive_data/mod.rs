//! Parsed form of a `#[derive(Reflect)]` input.

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod meta;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{FieldAttributes, TypeAttributes, VariantAttributes};
pub(crate) use meta::ReflectMeta;

use syn::{Data, DeriveInput, Fields, spanned::Spanned};

/// A named, non-skipped or skipped field of a struct.
pub(crate) struct StructField<'a> {
    pub data: &'a syn::Field,
    pub attrs: FieldAttributes,
}

impl StructField<'_> {
    pub fn ident(&self) -> &syn::Ident {
        // Only named fields reach this type.
        self.data
            .ident
            .as_ref()
            .unwrap_or_else(|| unreachable!("named field without ident"))
    }

    pub fn is_active(&self) -> bool {
        self.attrs.skip.is_none()
    }
}

pub(crate) struct ReflectStruct<'a> {
    pub meta: ReflectMeta<'a>,
    pub fields: Vec<StructField<'a>>,
}

impl<'a> ReflectStruct<'a> {
    /// Fields visible to reflection, in declaration order.
    pub fn active_fields(&self) -> impl Iterator<Item = &StructField<'a>> {
        self.fields.iter().filter(|f| f.is_active())
    }
}

pub(crate) struct EnumVariant<'a> {
    pub data: &'a syn::Variant,
    pub attrs: VariantAttributes,
}

pub(crate) struct ReflectEnum<'a> {
    pub meta: ReflectMeta<'a>,
    pub variants: Vec<EnumVariant<'a>>,
}

pub(crate) enum ReflectDerive<'a> {
    Struct(ReflectStruct<'a>),
    Enum(ReflectEnum<'a>),
}

impl<'a> ReflectDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;
        let meta = ReflectMeta::new(input, attrs)?;

        match &input.data {
            Data::Struct(data) => {
                let Fields::Named(named) = &data.fields else {
                    return Err(syn::Error::new(
                        input.ident.span(),
                        "`Reflect` can only be derived for structs with named fields",
                    ));
                };
                let fields = named
                    .named
                    .iter()
                    .map(|field| {
                        Ok(StructField {
                            data: field,
                            attrs: FieldAttributes::parse_attrs(&field.attrs)?,
                        })
                    })
                    .collect::<syn::Result<Vec<_>>>()?;
                Ok(Self::Struct(ReflectStruct { meta, fields }))
            }
            Data::Enum(data) => {
                if !input.generics.params.is_empty() {
                    return Err(syn::Error::new(
                        input.generics.span(),
                        "`Reflect` cannot be derived for generic enums",
                    ));
                }
                if data.variants.is_empty() {
                    return Err(syn::Error::new(
                        input.ident.span(),
                        "`Reflect` requires at least one enum variant",
                    ));
                }
                let variants = data
                    .variants
                    .iter()
                    .map(|variant| {
                        if !matches!(variant.fields, Fields::Unit) {
                            return Err(syn::Error::new(
                                variant.span(),
                                "`Reflect` can only be derived for enums without fields",
                            ));
                        }
                        Ok(EnumVariant {
                            data: variant,
                            attrs: VariantAttributes::parse_attrs(&variant.attrs)?,
                        })
                    })
                    .collect::<syn::Result<Vec<_>>>()?;
                Ok(Self::Enum(ReflectEnum { meta, variants }))
            }
            Data::Union(_) => Err(syn::Error::new(
                input.ident.span(),
                "`Reflect` cannot be derived for unions",
            )),
        }
    }
}
