use proc_macro2::TokenStream;
use quote::quote;

#[inline]
pub(crate) fn type_info_(ez_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ez_reflect_path::info::TypeInfo
    }
}

#[inline]
pub(crate) fn type_flags_(ez_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ez_reflect_path::info::TypeFlags
    }
}

#[inline]
pub(crate) fn enum_info_(ez_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ez_reflect_path::info::EnumInfo
    }
}

#[inline]
pub(crate) fn primitive_kind_(ez_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ez_reflect_path::info::PrimitiveKind
    }
}

#[inline]
pub(crate) fn generics_(ez_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ez_reflect_path::info::Generics
    }
}

#[inline]
pub(crate) fn type_param_info_(ez_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ez_reflect_path::info::TypeParamInfo
    }
}

#[inline]
pub(crate) fn serialization_config_(ez_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ez_reflect_path::info::SerializationConfig
    }
}

#[inline]
pub(crate) fn member_flags_(ez_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ez_reflect_path::info::MemberFlags
    }
}

#[inline]
pub(crate) fn unmanaged_(ez_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ez_reflect_path::info::Unmanaged
    }
}

#[inline]
pub(crate) fn unmanaged_info_(ez_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ez_reflect_path::info::UnmanagedInfo
    }
}
