use proc_macro2::TokenStream;
use quote::quote;

#[inline]
pub(crate) fn member_descriptor_(ez_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ez_reflect_path::member::MemberDescriptor
    }
}

#[inline]
pub(crate) fn member_attributes_(ez_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ez_reflect_path::member::MemberAttributes
    }
}

#[inline]
pub(crate) fn visibility_(ez_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ez_reflect_path::member::Visibility
    }
}

#[inline]
pub(crate) fn constructor_descriptor_(ez_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ez_reflect_path::member::ConstructorDescriptor
    }
}
