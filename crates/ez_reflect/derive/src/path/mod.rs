//! Paths to `ez_reflect` items used by the generated code.
//!
//! Kept in one place so that moving an item in `ez_reflect` only touches
//! this module.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the access path to the `ez_reflect` crate.
///
/// Resolved from the caller's `Cargo.toml`, see [`ez_macro_utils::Manifest`].
/// This reads a file, so the path is computed once per macro invocation and
/// passed around.
pub(crate) fn ez_reflect() -> syn::Path {
    ez_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("ez_reflect"))
}

// -----------------------------------------------------------------------------
// Modules

mod info;
mod member;
mod registry;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use info::*;
pub(crate) use member::*;
pub(crate) use registry::*;

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(ez_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #ez_reflect_path::__macro_exports::auto_register
    }
}
