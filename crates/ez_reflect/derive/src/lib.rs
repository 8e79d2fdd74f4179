//! See following macros:
//!
//! - [`Reflect`](derive_reflect)
//! - [`impl_auto_register`]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;
mod utils;

// -----------------------------------------------------------------------------
// Macros

/// # Reflection Metadata Derivation
///
/// `#[derive(Reflect)]` implements `GetTypeMeta` (and `Unmanaged` when asked
/// to), describing the type to a `TypeRegistry`.
///
/// - Structs with named fields, tuple structs and unit structs: every field
///   becomes a field member. Tuple fields are named `0`, `1`, ...
/// - Fieldless enums: the variants and their discriminants become an
///   `EnumInfo`. The underlying integer follows `#[repr(..)]`, `i32` when
///   absent.
///
/// Generic parameters must be types; every parameter gets a `GetTypeMeta`
/// bound and is listed in the type's `Generics`.
///
/// ## Type Attributes
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// #[reflect(serializable(public_fields, non_public_fields, inherit = false))]
/// #[reflect(default, auto_register)]
/// struct Player { /* ... */ }
/// ```
///
/// - `serializable`: opts the type into the serializer. The optional list
///   selects the member kinds, defaulting to all fields:
///   `public_fields`, `non_public_fields`, `public_properties`,
///   `non_public_properties`, `all_fields`, `all_properties`, `all`.
///   With `require_explicit_field_opt_in`, non-public fields also need
///   `serialize_field`. `inherit = false` stops derived types from
///   inheriting the opt-in.
/// - `default`: registers `Default::default` as the parameterless
///   constructor.
/// - `value_type`: flags the type as a value type.
/// - `unmanaged`: implements `Unmanaged` by laying the fields out in order.
///   Every field must be `Unmanaged` itself.
/// - `auto_register`: submits the type to the automatic registry. No effect
///   on generic types or when the `auto_register` feature is disabled.
/// - `extend = path::to::func`: calls `func(&mut TypeMeta)` after the
///   generated code. Use it to add properties, methods and interfaces.
///
/// ## Field Attributes
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// struct Warrior {
///     #[reflect(base)]
///     unit: Unit,
///     #[reflect(read_only)]
///     id: u32,
///     #[reflect(non_serialized)]
///     cache: Vec<u8>,
///     #[reflect(rename = "Hp")]
///     hp: f32,
/// }
/// ```
///
/// - `skip`: the field is not reflected.
/// - `base`: the field holds the base type's data. At most one per struct.
/// - `read_only`: no setter is generated.
/// - `serialize_field`: explicit opt-in, see `require_explicit_field_opt_in`.
/// - `non_serialized`: excluded from serialization.
/// - `rename = "..."`: the reflected member name.
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::ReflectDerive::from_input(&ast).and_then(|derive| impls::impl_reflect(&derive)) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Submit a non-generic type to the automatic registry.
///
/// The type must implement `GetTypeMeta`.
///
/// ```rust, ignore
/// impl_auto_register!(foo::Foo);
/// impl_auto_register!(Vec<u32>); // Ok
/// impl_auto_register!(Vec<T: Clone>); // Error
/// ```
///
/// This is not conflict with `reflect(auto_register)` attribute.
#[proc_macro]
pub fn impl_auto_register(_input: TokenStream) -> TokenStream {
    #[cfg(not(feature = "auto_register"))]
    return utils::empty().into();

    #[cfg(feature = "auto_register")]
    {
        let type_path = parse_macro_input!(_input as syn::Type);

        let ez_reflect_path = path::ez_reflect();
        let auto_register_ = path::auto_register_(&ez_reflect_path);

        TokenStream::from(quote::quote! {
            const _: () = {
                #auto_register_::inventory::submit!{
                    #auto_register_::__AutoRegisterFunc(
                        <#type_path as #auto_register_::__RegisterType>::__register
                    )
                }
            };
        })
    }
}
