use proc_macro2::Span;
use syn::{Attribute, Data, DeriveInput, Fields, Ident};

use super::{ReflectEnum, ReflectMeta, ReflectStruct, TypeAttributes};

/// The parsed derive input.
pub(crate) enum ReflectDerive<'a> {
    Struct(ReflectStruct<'a>),
    Enum(ReflectEnum<'a>),
}

impl<'a> ReflectDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;
        let meta = ReflectMeta::new(attrs, &input.ident, &input.generics);
        meta.check_generics()?;

        match &input.data {
            Data::Struct(data) => {
                let (fields, is_tuple) = match &data.fields {
                    Fields::Named(fields) => (fields.named.iter().collect::<Vec<_>>(), false),
                    Fields::Unnamed(fields) => (fields.unnamed.iter().collect(), true),
                    Fields::Unit => (Vec::new(), false),
                };
                Ok(Self::Struct(ReflectStruct::new(meta, fields, is_tuple)?))
            }
            Data::Enum(data) => {
                if let Some(span) = meta.attrs().unmanaged {
                    return Err(syn::Error::new(span, "`unmanaged` is not supported on enums"));
                }
                let repr = enum_repr(&input.attrs)?;
                Ok(Self::Enum(ReflectEnum::new(meta, &data.variants, repr)?))
            }
            Data::Union(data) => Err(syn::Error::new(
                data.union_token.span,
                "`Reflect` cannot be derived for unions",
            )),
        }
    }
}

/// Reads the integer representation from `#[repr(..)]`, `i32` by default.
fn enum_repr(attrs: &[Attribute]) -> syn::Result<Ident> {
    let mut repr = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("repr")) {
        attr.parse_nested_meta(|meta| {
            let kind = match meta.path.get_ident().map(Ident::to_string).as_deref() {
                Some("i8") => "I8",
                Some("i16") => "I16",
                Some("i32") => "I32",
                Some("i64" | "isize") => "I64",
                Some("u8") => "U8",
                Some("u16") => "U16",
                Some("u32") => "U32",
                Some("u64" | "usize") => "U64",
                // `C`, `align(..)` and friends
                _ => {
                    if meta.input.peek(syn::token::Paren) {
                        meta.input.parse::<proc_macro2::Group>()?;
                    }
                    return Ok(());
                }
            };
            repr = Some(Ident::new(kind, meta.path.get_ident().map_or_else(Span::call_site, Ident::span)));
            Ok(())
        })?;
    }
    Ok(repr.unwrap_or_else(|| Ident::new("I32", Span::call_site())))
}
