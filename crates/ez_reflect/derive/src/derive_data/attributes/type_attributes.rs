use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, Ident, LitBool, Path, token::Paren};

use crate::REFLECT_ATTRIBUTE_NAME;

/// `#[reflect(serializable(...))]`
#[derive(Debug)]
pub(crate) struct SerializableAttr {
    pub span: Span,
    /// Names of `MemberFlags` constants; empty selects the default.
    pub member_flags: Vec<Ident>,
    pub require_explicit_field_opt_in: bool,
    pub inherit: bool,
}

/// Type-level attributes.
///
/// - `serializable`, `serializable(public_fields, ..., inherit = false)`
/// - `default`: registers `Default::default` as the parameterless constructor.
/// - `value_type`: flags the type `VALUE_TYPE` instead of `REFERENCE_TYPE`.
/// - `unmanaged`: implements `Unmanaged` from the fields, in order.
/// - `auto_register`: submits the type to the automatic registry.
/// - `extend = path`: calls `path(&mut TypeMeta)` after the generated code.
#[derive(Debug, Default)]
pub(crate) struct TypeAttributes {
    pub serializable: Option<SerializableAttr>,
    pub default: Option<Span>,
    pub value_type: Option<Span>,
    pub unmanaged: Option<Span>,
    pub auto_register: Option<Span>,
    pub extend: Vec<Path>,
}

const MEMBER_FLAGS: [(&str, &str); 7] = [
    ("public_fields", "PUBLIC_FIELDS"),
    ("non_public_fields", "NON_PUBLIC_FIELDS"),
    ("public_properties", "PUBLIC_PROPERTIES"),
    ("non_public_properties", "NON_PUBLIC_PROPERTIES"),
    ("all_fields", "ALL_FIELDS"),
    ("all_properties", "ALL_PROPERTIES"),
    ("all", "ALL"),
];

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| this.parse_meta(meta))?;
            }
        }
        Ok(this)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        let span = meta.path.span();
        let Some(ident) = meta.path.get_ident() else {
            return Err(meta.error("expected an identifier"));
        };

        match ident.to_string().as_str() {
            "serializable" => self.parse_serializable(meta, span),
            "default" => set_once(&mut self.default, span, "default"),
            "value_type" => set_once(&mut self.value_type, span, "value_type"),
            "unmanaged" => set_once(&mut self.unmanaged, span, "unmanaged"),
            "auto_register" => set_once(&mut self.auto_register, span, "auto_register"),
            "extend" => {
                self.extend.push(meta.value()?.parse()?);
                Ok(())
            }
            _ => Err(meta.error(
                "unknown type attribute, expected one of `serializable`, `default`, \
                 `value_type`, `unmanaged`, `auto_register`, `extend`",
            )),
        }
    }

    fn parse_serializable(&mut self, meta: ParseNestedMeta, span: Span) -> syn::Result<()> {
        if self.serializable.is_some() {
            return Err(syn::Error::new(span, "duplicate `serializable` attribute"));
        }

        let mut attr = SerializableAttr {
            span,
            member_flags: Vec::new(),
            require_explicit_field_opt_in: false,
            inherit: true,
        };

        if meta.input.peek(Paren) {
            meta.parse_nested_meta(|inner| {
                let Some(ident) = inner.path.get_ident() else {
                    return Err(inner.error("expected an identifier"));
                };
                let name = ident.to_string();

                if name == "require_explicit_field_opt_in" {
                    attr.require_explicit_field_opt_in = true;
                } else if name == "inherit" {
                    attr.inherit = inner.value()?.parse::<LitBool>()?.value;
                } else if let Some((_, flag)) = MEMBER_FLAGS.iter().find(|(key, _)| *key == name) {
                    attr.member_flags.push(Ident::new(flag, ident.span()));
                } else {
                    return Err(inner.error("unknown `serializable` option"));
                }
                Ok(())
            })?;
        }

        self.serializable = Some(attr);
        Ok(())
    }
}

fn set_once(slot: &mut Option<Span>, span: Span, name: &str) -> syn::Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new(span, format!("duplicate `{name}` attribute")));
    }
    *slot = Some(span);
    Ok(())
}
