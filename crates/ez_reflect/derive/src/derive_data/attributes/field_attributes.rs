use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, LitStr};

use crate::REFLECT_ATTRIBUTE_NAME;

/// Field-level attributes.
///
/// - `skip`: the field is not reflected at all.
/// - `non_serialized`, `serialize_field`: serialization opt-out and opt-in.
/// - `read_only`: no mutator is generated.
/// - `base`: the field embeds the base type.
/// - `rename = "..."`: the member name, defaults to the field name.
#[derive(Debug, Default)]
pub(crate) struct FieldAttributes {
    pub skip: Option<Span>,
    pub non_serialized: Option<Span>,
    pub serialize_field: Option<Span>,
    pub read_only: Option<Span>,
    pub base: Option<Span>,
    pub rename: Option<LitStr>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| this.parse_meta(meta))?;
            }
        }
        this.validate()?;
        Ok(this)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        let span = meta.path.span();
        let slot = if meta.path.is_ident("skip") {
            &mut self.skip
        } else if meta.path.is_ident("non_serialized") {
            &mut self.non_serialized
        } else if meta.path.is_ident("serialize_field") {
            &mut self.serialize_field
        } else if meta.path.is_ident("read_only") {
            &mut self.read_only
        } else if meta.path.is_ident("base") {
            &mut self.base
        } else if meta.path.is_ident("rename") {
            self.rename = Some(meta.value()?.parse()?);
            return Ok(());
        } else {
            return Err(meta.error(
                "unknown field attribute, expected one of `skip`, `non_serialized`, \
                 `serialize_field`, `read_only`, `base`, `rename`",
            ));
        };

        if slot.replace(span).is_some() {
            return Err(syn::Error::new(span, "duplicate field attribute"));
        }
        Ok(())
    }

    fn validate(&self) -> syn::Result<()> {
        if let (Some(_), Some(span)) = (self.non_serialized, self.serialize_field) {
            return Err(syn::Error::new(span, "`serialize_field` conflicts with `non_serialized`"));
        }
        if let (Some(_), Some(span)) = (self.skip, self.base) {
            return Err(syn::Error::new(span, "a `base` field cannot be skipped"));
        }
        Ok(())
    }
}
