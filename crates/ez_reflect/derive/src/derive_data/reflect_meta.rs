use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Generics, Ident, ImplGenerics, Path, TypeGenerics};

use super::TypeAttributes;

/// Everything about the derived type except its fields.
pub(crate) struct ReflectMeta<'a> {
    ez_reflect_path: Path,
    attrs: TypeAttributes,
    ident: &'a Ident,
    generics: &'a Generics,
}

impl core::fmt::Debug for ReflectMeta<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReflectMeta")
            .field("ez_reflect_path", &self.ez_reflect_path.to_token_stream())
            .field("ident", &self.ident)
            .field("attrs", &self.attrs)
            .finish()
    }
}

impl<'a> ReflectMeta<'a> {
    #[inline]
    pub fn new(attrs: TypeAttributes, ident: &'a Ident, generics: &'a Generics) -> Self {
        Self {
            ez_reflect_path: crate::path::ez_reflect(),
            attrs,
            ident,
            generics,
        }
    }

    #[inline]
    pub fn ez_reflect_path(&self) -> &Path {
        &self.ez_reflect_path
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn ident(&self) -> &'a Ident {
        self.ident
    }

    /// Whether the type has type parameters.
    #[inline]
    pub fn impl_with_generic(&self) -> bool {
        self.generics.type_params().next().is_some()
    }

    /// Rejects lifetime and const parameters, which `Any` cannot describe.
    pub fn check_generics(&self) -> syn::Result<()> {
        if let Some(lifetime) = self.generics.lifetimes().next() {
            return Err(syn::Error::new_spanned(lifetime, "reflected types cannot have lifetime parameters"));
        }
        if let Some(param) = self.generics.const_params().next() {
            return Err(syn::Error::new_spanned(param, "reflected types cannot have const parameters"));
        }
        Ok(())
    }

    /// Return `impl_generics`, `ty_generics` and a `where` clause requiring
    /// `extra` on every type parameter, in addition to the declared bounds.
    ///
    /// ```ignore
    /// let (impl_generics, ty_generics, where_clause) = meta.split_generics(quote!(GetTypeMeta));
    /// quote! {
    ///     impl #impl_generics GetTypeMeta for #ident #ty_generics #where_clause { /* ... */ }
    /// }
    /// ```
    pub fn split_generics(&self, extra: TokenStream) -> (ImplGenerics<'a>, TypeGenerics<'a>, TokenStream) {
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();

        let declared = where_clause.map(|clause| clause.predicates.iter().collect::<Vec<_>>()).unwrap_or_default();
        let added = self.generics.type_params().map(|param| {
            let ident = &param.ident;
            quote!(#ident: #extra)
        });

        let where_clause = quote! {
            where #(#declared,)* #(#added,)*
        };
        (impl_generics, ty_generics, where_clause)
    }

    /// `.set_generics(...)` call for generic types, empty otherwise.
    pub fn set_generics_tokens(&self, meta_ident: &Ident) -> TokenStream {
        if !self.impl_with_generic() {
            return crate::utils::empty();
        }
        let generics_ = crate::path::generics_(&self.ez_reflect_path);
        let type_param_info_ = crate::path::type_param_info_(&self.ez_reflect_path);

        let params = self.generics.type_params().map(|param| {
            let ident = &param.ident;
            let name = ident.to_string();
            quote!(.with(#type_param_info_::new::<#ident>(#name)))
        });

        quote! {
            #meta_ident.set_generics(#generics_::new() #(#params)*);
        }
    }
}
