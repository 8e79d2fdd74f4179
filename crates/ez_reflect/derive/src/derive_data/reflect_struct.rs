use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Field, Index, Member, Visibility};

use super::{FieldAttributes, ReflectMeta};

/// A field of a struct.
pub(crate) struct StructField<'a> {
    pub data: &'a Field,
    pub attrs: FieldAttributes,
    /// `self.#member`
    pub member: Member,
}

impl StructField<'_> {
    /// The reflected member name.
    pub fn name(&self) -> String {
        match (&self.attrs.rename, &self.member) {
            (Some(rename), _) => rename.value(),
            (None, Member::Named(ident)) => ident.to_string(),
            (None, Member::Unnamed(index)) => index.index.to_string(),
        }
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        matches!(self.data.vis, Visibility::Public(_))
    }
}

pub(crate) struct ReflectStruct<'a> {
    pub meta: ReflectMeta<'a>,
    pub fields: Vec<StructField<'a>>,
    /// `true` for `struct T(..);`
    pub is_tuple: bool,
}

impl<'a> ReflectStruct<'a> {
    pub fn new(meta: ReflectMeta<'a>, fields: impl IntoIterator<Item = &'a Field>, is_tuple: bool) -> syn::Result<Self> {
        let fields = fields
            .into_iter()
            .enumerate()
            .map(|(index, data)| {
                let member = match &data.ident {
                    Some(ident) => Member::Named(ident.clone()),
                    None => Member::Unnamed(Index::from(index)),
                };
                Ok(StructField {
                    data,
                    attrs: FieldAttributes::parse_attrs(&data.attrs)?,
                    member,
                })
            })
            .collect::<syn::Result<Vec<_>>>()?;

        let mut bases = fields.iter().filter_map(|field| field.attrs.base);
        if let (Some(_), Some(span)) = (bases.next(), bases.next()) {
            return Err(syn::Error::new(span, "a type can have only one `base` field"));
        }

        Ok(Self { meta, fields, is_tuple })
    }

    #[inline]
    pub fn meta(&self) -> &ReflectMeta<'a> {
        &self.meta
    }

    /// Fields exposed to reflection, in declaration order.
    pub fn active_fields(&self) -> impl Iterator<Item = &StructField<'a>> {
        self.fields.iter().filter(|field| field.attrs.skip.is_none())
    }

    pub fn base_field(&self) -> Option<&StructField<'a>> {
        self.fields.iter().find(|field| field.attrs.base.is_some())
    }

    /// Builds `Self { a: a_expr, .. }` or `Self(a_expr, ..)` from one expression per field.
    pub fn construct(&self, values: impl Iterator<Item = TokenStream>) -> TokenStream {
        let members = self.fields.iter().map(|field| field.member.to_token_stream());
        if self.is_tuple {
            quote!(Self( #(#values),* ))
        } else {
            quote!(Self { #(#members: #values),* })
        }
    }
}
