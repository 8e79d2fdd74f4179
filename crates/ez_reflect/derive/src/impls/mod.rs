//! Code generation for each derived item.

// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod trait_get_type_meta;
mod trait_unmanaged;

// -----------------------------------------------------------------------------
// Internal API

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectDerive;

pub(crate) use auto_register::get_auto_register_impl;

/// Generates every impl for a `#[derive(Reflect)]` input.
pub(crate) fn impl_reflect(derive: &ReflectDerive) -> syn::Result<TokenStream> {
    let (meta, get_type_meta, unmanaged) = match derive {
        ReflectDerive::Struct(info) => (
            info.meta(),
            trait_get_type_meta::impl_struct_get_type_meta(info),
            trait_unmanaged::impl_trait_unmanaged(info),
        ),
        ReflectDerive::Enum(info) => (
            info.meta(),
            trait_get_type_meta::impl_enum_get_type_meta(info)?,
            crate::utils::empty(),
        ),
    };
    let auto_register = get_auto_register_impl(meta);

    Ok(quote! {
        const _: () = {
            #get_type_meta
            #unmanaged
            #auto_register
        };
    })
}
