use proc_macro2::Span;
use syn::{Attribute, LitStr, spanned::Spanned};

use tl_macro_utils::Symbol;

const REFLECT: Symbol = Symbol("reflect");

const DEFAULT: Symbol = Symbol("default");
const TYPE_PATH: Symbol = Symbol("type_path");

const SKIP: Symbol = Symbol("skip");
const RENAME: Symbol = Symbol("rename");
const REQUIRED: Symbol = Symbol("required");
const OPTIONAL: Symbol = Symbol("optional");
const READ_ONLY: Symbol = Symbol("read_only");
const WRITE_ONLY: Symbol = Symbol("write_only");
const ATTRIBUTE: Symbol = Symbol("attribute");
const ITEM_NAME: Symbol = Symbol("item_name");

fn reflect_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path() == REFLECT)
}

// -----------------------------------------------------------------------------
// TypeAttributes

/// `#[reflect(...)]` on the type itself.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub default: Option<Span>,
    pub type_path: Option<LitStr>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in reflect_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path == DEFAULT {
                    this.default = Some(meta.path.span());
                    Ok(())
                } else if meta.path == TYPE_PATH {
                    let lit: LitStr = meta.value()?.parse()?;
                    if lit.value().trim().is_empty() {
                        return Err(syn::Error::new(lit.span(), "`type_path` cannot be empty"));
                    }
                    this.type_path = Some(lit);
                    Ok(())
                } else {
                    Err(meta.error("unsupported type attribute, expected `default` or `type_path`"))
                }
            })?;
        }
        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// `#[reflect(...)]` on a named field.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub skip: Option<Span>,
    pub rename: Option<LitStr>,
    pub item_name: Option<LitStr>,
    pub required: Option<Span>,
    pub optional: Option<Span>,
    pub read_only: Option<Span>,
    pub write_only: Option<Span>,
    pub attribute: Option<Span>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in reflect_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                let span = meta.path.span();
                if meta.path == SKIP {
                    this.skip = Some(span);
                } else if meta.path == RENAME {
                    this.rename = Some(meta.value()?.parse()?);
                } else if meta.path == ITEM_NAME {
                    this.item_name = Some(meta.value()?.parse()?);
                } else if meta.path == REQUIRED {
                    this.required = Some(span);
                } else if meta.path == OPTIONAL {
                    this.optional = Some(span);
                } else if meta.path == READ_ONLY {
                    this.read_only = Some(span);
                } else if meta.path == WRITE_ONLY {
                    this.write_only = Some(span);
                } else if meta.path == ATTRIBUTE {
                    this.attribute = Some(span);
                } else {
                    return Err(meta.error(
                        "unsupported field attribute, expected one of `skip`, `rename`, \
                         `item_name`, `required`, `optional`, `read_only`, `write_only`, `attribute`",
                    ));
                }
                Ok(())
            })?;
        }
        this.validity()?;
        Ok(this)
    }

    fn validity(&self) -> syn::Result<()> {
        if let (Some(_), Some(span)) = (self.required, self.optional) {
            return Err(syn::Error::new(span, "`required` and `optional` are exclusive"));
        }
        if let (Some(_), Some(span)) = (self.read_only, self.write_only) {
            return Err(syn::Error::new(span, "`read_only` and `write_only` are exclusive"));
        }
        if let Some(span) = self.skip
            && (self.rename.is_some() || self.required.is_some() || self.attribute.is_some())
        {
            return Err(syn::Error::new(span, "a skipped field takes no other attributes"));
        }
        if let Some(lit) = &self.rename
            && lit.value().is_empty()
        {
            return Err(syn::Error::new(lit.span(), "`rename` cannot be empty"));
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// VariantAttributes

/// `#[reflect(...)]` on an enum variant.
#[derive(Default)]
pub(crate) struct VariantAttributes {
    pub rename: Option<LitStr>,
}

impl VariantAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in reflect_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path == RENAME {
                    this.rename = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unsupported variant attribute, expected `rename`"))
                }
            })?;
        }
        Ok(this)
    }
}
