use proc_macro2::{Span, TokenStream};
use quote::{quote, quote_spanned};
use syn::Ident;

use crate::derive_data::{ReflectEnum, ReflectMeta, ReflectStruct, SerializableAttr, StructField};

/// Generate the `GetTypeMeta` impl for a struct.
///
/// Every active field becomes a `MemberDescriptor::field`, the `base` field
/// also sets the `BaseInfo`, and the field types become dependencies.
pub(crate) fn impl_struct_get_type_meta(info: &ReflectStruct) -> TokenStream {
    let meta = info.meta();
    let ez_reflect_path = meta.ez_reflect_path();
    let type_info_ = crate::path::type_info_(ez_reflect_path);
    let base_info_ = crate::path::base_info_(ez_reflect_path);
    let unmanaged_info_ = crate::path::unmanaged_info_(ez_reflect_path);

    let outer_ = Ident::new("__meta", Span::call_site());

    let members = info.active_fields().map(|field| member_tokens(meta, field, &outer_));

    let set_base = match info.base_field() {
        Some(field) => {
            let ty = &field.data.ty;
            let member = &field.member;
            quote! {
                #outer_.set_base(#base_info_::new::<Self, #ty>(|__v| &__v.#member, |__v| &mut __v.#member));
            }
        }
        None => crate::utils::empty(),
    };

    let set_serialization = match &meta.attrs().serializable {
        Some(attr) => serialization_tokens(meta, attr, &outer_),
        None => crate::utils::empty(),
    };

    let set_unmanaged = match meta.attrs().unmanaged {
        Some(span) => quote_spanned! { span =>
            #outer_.set_unmanaged(#unmanaged_info_::of::<Self>());
        },
        None => crate::utils::empty(),
    };

    let dependencies = info.active_fields().map(|field| &field.data.ty);

    impl_get_type_meta(
        meta,
        quote!(#type_info_::Struct),
        false,
        &outer_,
        quote! {
            #(#members)*
            #set_base
            #set_serialization
            #set_unmanaged
        },
        quote! {
            #(__registry.register::<#dependencies>();)*
        },
    )
}

/// Generate the `GetTypeMeta` impl for a fieldless enum.
pub(crate) fn impl_enum_get_type_meta(info: &ReflectEnum) -> syn::Result<TokenStream> {
    let meta = info.meta();
    if let Some(attr) = &meta.attrs().serializable {
        return Err(syn::Error::new(attr.span, "`serializable` is only supported on structs"));
    }

    let ez_reflect_path = meta.ez_reflect_path();
    let type_info_ = crate::path::type_info_(ez_reflect_path);
    let enum_info_ = crate::path::enum_info_(ez_reflect_path);
    let primitive_kind_ = crate::path::primitive_kind_(ez_reflect_path);

    let outer_ = Ident::new("__meta", Span::call_site());

    let repr = &info.repr;
    let names = info.variants.iter().map(|variant| variant.ident.to_string());
    let to_arms = info.variants.iter().map(|variant| {
        let ident = variant.ident;
        quote!(Self::#ident => Self::#ident as i64,)
    });
    let from_arms = info.variants.iter().map(|variant| {
        let ident = variant.ident;
        quote!(__d if __d == Self::#ident as i64 => ::core::option::Option::Some(Self::#ident),)
    });

    let enum_info = quote! {
        #type_info_::Enum(#enum_info_::new::<Self>(
            #primitive_kind_::#repr,
            &[ #(#names),* ],
            |__v| match *__v {
                #(#to_arms)*
            },
            |__d| match __d {
                #(#from_arms)*
                _ => ::core::option::Option::None,
            },
        ))
    };

    Ok(impl_get_type_meta(meta, enum_info, true, &outer_, crate::utils::empty(), crate::utils::empty()))
}

/// The shared `impl GetTypeMeta` skeleton.
///
/// Type attributes that apply to every kind (`value_type`, `default`,
/// generics and `extend`) are handled here.
fn impl_get_type_meta(
    meta: &ReflectMeta,
    type_info: TokenStream,
    is_enum: bool,
    outer_: &Ident,
    body: TokenStream,
    register_deps: TokenStream,
) -> TokenStream {
    let ez_reflect_path = meta.ez_reflect_path();
    let get_type_meta_ = crate::path::get_type_meta_(ez_reflect_path);
    let type_meta_ = crate::path::type_meta_(ez_reflect_path);
    let type_registry_ = crate::path::type_registry_(ez_reflect_path);
    let type_flags_ = crate::path::type_flags_(ez_reflect_path);
    let constructor_descriptor_ = crate::path::constructor_descriptor_(ez_reflect_path);

    let attrs = meta.attrs();

    // Enums and unmanaged structs are plain data.
    let is_value_type = is_enum || attrs.value_type.is_some() || attrs.unmanaged.is_some();
    let with_flags = if is_value_type {
        quote!(.with_flags(#type_flags_::VALUE_TYPE))
    } else {
        crate::utils::empty()
    };

    let push_default = match attrs.default {
        Some(span) => quote_spanned! { span =>
            #outer_.push_constructor(#constructor_descriptor_::default_of::<Self>());
        },
        None => crate::utils::empty(),
    };

    let set_generics = meta.set_generics_tokens(outer_);
    let extend = attrs.extend.iter().map(|func| quote!(#func(&mut #outer_);));

    let bounds = match attrs.unmanaged {
        Some(_) => {
            let unmanaged_ = crate::path::unmanaged_(ez_reflect_path);
            quote!(#get_type_meta_ + #unmanaged_)
        }
        None => quote!(#get_type_meta_),
    };
    let (impl_generics, ty_generics, where_clause) = meta.split_generics(bounds);
    let ident = meta.ident();

    quote! {
        impl #impl_generics #get_type_meta_ for #ident #ty_generics #where_clause {
            fn get_type_meta() -> #type_meta_ {
                let mut #outer_ = #type_meta_::new::<Self>(#type_info) #with_flags;
                #body
                #push_default
                #set_generics
                #(#extend)*
                #outer_
            }

            #[allow(unused_variables)]
            fn register_dependencies(__registry: &mut #type_registry_) {
                #register_deps
            }
        }
    }
}

fn member_tokens(meta: &ReflectMeta, field: &StructField, outer_: &Ident) -> TokenStream {
    let ez_reflect_path = meta.ez_reflect_path();
    let member_descriptor_ = crate::path::member_descriptor_(ez_reflect_path);
    let member_attributes_ = crate::path::member_attributes_(ez_reflect_path);
    let visibility_ = crate::path::visibility_(ez_reflect_path);

    let ty = &field.data.ty;
    let member = &field.member;
    let name = field.name();

    let visibility = if field.is_public() {
        quote!(#visibility_::Public)
    } else {
        quote!(#visibility_::NonPublic)
    };

    let get_mut = if field.attrs.read_only.is_some() {
        quote!(::core::option::Option::None)
    } else {
        quote!(::core::option::Option::Some(|__v| &mut __v.#member))
    };

    let attrs = &field.attrs;
    let flags = [
        (attrs.read_only, "READ_ONLY"),
        (attrs.serialize_field, "SERIALIZE_FIELD"),
        (attrs.non_serialized, "NON_SERIALIZED"),
        (attrs.base, "BASE"),
    ]
    .into_iter()
    .filter_map(|(span, flag)| span.map(|span| Ident::new(flag, span)))
    .map(|flag| quote!(#member_attributes_::#flag))
    .collect::<Vec<_>>();

    let with_attributes = if flags.is_empty() {
        crate::utils::empty()
    } else {
        quote!(.with_attributes(#member_attributes_::empty() #(| #flags)*))
    };

    quote! {
        #outer_.push_member(
            #member_descriptor_::field::<Self, #ty>(#name, #visibility, |__v| &__v.#member, #get_mut)
                #with_attributes
        );
    }
}

fn serialization_tokens(meta: &ReflectMeta, attr: &SerializableAttr, outer_: &Ident) -> TokenStream {
    let ez_reflect_path = meta.ez_reflect_path();
    let serialization_config_ = crate::path::serialization_config_(ez_reflect_path);
    let member_flags_ = crate::path::member_flags_(ez_reflect_path);

    let member_flags = if attr.member_flags.is_empty() {
        quote!(<#member_flags_ as ::core::default::Default>::default())
    } else {
        let flags = attr.member_flags.iter().map(|flag| quote!(#member_flags_::#flag));
        quote!(#member_flags_::empty() #(| #flags)*)
    };
    let require_explicit_field_opt_in = attr.require_explicit_field_opt_in;
    let inherit = attr.inherit;

    quote_spanned! { attr.span =>
        #outer_.set_serialization(#serialization_config_ {
            member_flags: #member_flags,
            require_explicit_field_opt_in: #require_explicit_field_opt_in,
            inherit_to_derived_types: #inherit,
        });
    }
}
