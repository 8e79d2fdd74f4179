use proc_macro2::TokenStream;
use quote::quote;

#[inline]
pub(crate) fn type_meta_(ez_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ez_reflect_path::registry::TypeMeta
    }
}

#[inline]
pub(crate) fn get_type_meta_(ez_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ez_reflect_path::registry::GetTypeMeta
    }
}

#[inline]
pub(crate) fn type_registry_(ez_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ez_reflect_path::registry::TypeRegistry
    }
}

#[inline]
pub(crate) fn base_info_(ez_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ez_reflect_path::registry::BaseInfo
    }
}
