use proc_macro::{self, TokenStream};
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Marks a struct as a set of query parameters that can be sent with
/// `vk_photo_backup::Client`.
#[proc_macro_derive(ApiRequest)]
pub fn derive_api_request(input: TokenStream) -> TokenStream {
    let DeriveInput {
        ident, generics, ..
    } = parse_macro_input!(input);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let output = quote! {
        impl #impl_generics crate::api::Request for #ident #ty_generics #where_clause {}
    };
    output.into()
}
