use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};

use crate::derive_data::ReflectStruct;

/// Generate the `Unmanaged` impl for `#[reflect(unmanaged)]` structs.
///
/// The byte form is every field in declaration order, skipped fields
/// included, with no padding.
pub(crate) fn impl_trait_unmanaged(info: &ReflectStruct) -> TokenStream {
    let meta = info.meta();
    let Some(span) = meta.attrs().unmanaged else {
        return crate::utils::empty();
    };

    let unmanaged_ = crate::path::unmanaged_(meta.ez_reflect_path());
    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics(unmanaged_.clone());

    let types = info.fields.iter().map(|field| &field.data.ty).collect::<Vec<_>>();
    let members = info.fields.iter().map(|field| &field.member);

    let writes = types.iter().zip(members).map(|(ty, member)| {
        quote! {
            <#ty as #unmanaged_>::write_le(&self.#member, &mut out[offset..]);
            offset += <#ty as #unmanaged_>::SIZE;
        }
    });

    let reads = types.iter().map(|ty| {
        quote! {{
            let value = <#ty as #unmanaged_>::read_le(&bytes[offset..]);
            offset += <#ty as #unmanaged_>::SIZE;
            value
        }}
    });
    let construct = info.construct(reads);
    let sizes = types.iter().map(|ty| quote!(<#ty as #unmanaged_>::SIZE));

    quote_spanned! { span =>
        impl #impl_generics #unmanaged_ for #ident #ty_generics #where_clause {
            const SIZE: usize = 0 #(+ #sizes)*;

            #[allow(unused_mut, unused_assignments, unused_variables)]
            fn write_le(&self, out: &mut [u8]) {
                let mut offset = 0_usize;
                #(#writes)*
            }

            #[allow(unused_mut, unused_assignments, unused_variables)]
            fn read_le(bytes: &[u8]) -> Self {
                let mut offset = 0_usize;
                #construct
            }
        }
    }
}
