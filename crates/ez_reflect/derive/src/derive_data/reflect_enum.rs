use syn::{Ident, Variant};

use super::ReflectMeta;

/// A unit variant of a fieldless enum.
pub(crate) struct EnumVariant<'a> {
    pub ident: &'a Ident,
}

pub(crate) struct ReflectEnum<'a> {
    pub meta: ReflectMeta<'a>,
    pub variants: Vec<EnumVariant<'a>>,
    /// The `PrimitiveKind` variant matching `#[repr(..)]`.
    pub repr: Ident,
}

impl<'a> ReflectEnum<'a> {
    pub fn new(meta: ReflectMeta<'a>, variants: impl IntoIterator<Item = &'a Variant>, repr: Ident) -> syn::Result<Self> {
        let variants = variants
            .into_iter()
            .map(|variant| {
                if !matches!(variant.fields, syn::Fields::Unit) {
                    return Err(syn::Error::new_spanned(
                        variant,
                        "only fieldless enums can be reflected",
                    ));
                }
                Ok(EnumVariant { ident: &variant.ident })
            })
            .collect::<syn::Result<Vec<_>>>()?;

        Ok(Self { meta, variants, repr })
    }

    #[inline]
    pub fn meta(&self) -> &ReflectMeta<'a> {
        &self.meta
    }
}
