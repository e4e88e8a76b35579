//! `#[request]` and `#[derive(FormRequest)]`

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// `impl ::kit::FormRequest for T {}`
///
/// The struct must also derive `Deserialize` and `Validate`.
pub fn derive_form_request_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    quote! {
        impl #impl_generics ::kit::FormRequest for #name #ty_generics #where_clause {}
    }
    .into()
}

/// Adds the serde and validator derives, then implements `FormRequest`
///
/// ```rust,ignore
/// #[request]
/// pub struct LoginRequest {
///     #[validate(email)]
///     pub email: String,
///     pub password: String,
/// }
/// ```
pub fn request_attr_impl(_attr: TokenStream, input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let vis = &input.vis;
    let attrs = &input.attrs;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let syn::Data::Struct(data) = &input.data else {
        return syn::Error::new_spanned(&input, "#[request] can only be used on structs")
            .to_compile_error()
            .into();
    };
    let fields = &data.fields;
    let semi = matches!(fields, syn::Fields::Unnamed(_) | syn::Fields::Unit).then(|| quote!(;));

    quote! {
        #(#attrs)*
        #[derive(::serde::Deserialize, ::validator::Validate)]
        #vis struct #name #generics #fields #semi

        impl #impl_generics ::kit::FormRequest for #name #ty_generics #where_clause {}
    }
    .into()
}
