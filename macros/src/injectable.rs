//! `#[injectable]`: register a struct as a container singleton at boot
//!
//! Fields marked `#[inject]` are resolved from the container; every other
//! field starts from `Default`. A dependency that is not registered yet is
//! logged and the type is left unregistered.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Fields, FieldsNamed};

fn has_inject_attr(field: &syn::Field) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident("inject"))
}

pub fn injectable_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let name_str = name.to_string();
    let vis = &input.vis;
    let attrs = &input.attrs;
    let generics = &input.generics;

    let syn::Data::Struct(data_struct) = &input.data else {
        return syn::Error::new_spanned(&input, "injectable can only be used on structs")
            .to_compile_error()
            .into();
    };

    let expanded = match &data_struct.fields {
        Fields::Named(fields) if fields.named.iter().any(has_inject_attr) => {
            with_injection(name, &name_str, vis, attrs, generics, fields)
        }
        Fields::Named(fields) => {
            let fields = fields.named.iter();
            let definition = quote! {
                #(#attrs)*
                #[derive(Default, Clone)]
                #vis struct #name #generics {
                    #(#fields),*
                }
            };
            with_default(definition, name, &name_str)
        }
        Fields::Unit => {
            let definition = quote! {
                #(#attrs)*
                #[derive(Default, Clone)]
                #vis struct #name #generics;
            };
            with_default(definition, name, &name_str)
        }
        Fields::Unnamed(_) => syn::Error::new_spanned(
            &input,
            "injectable does not support tuple structs. Use named fields instead.",
        )
        .to_compile_error(),
    };

    expanded.into()
}

fn with_default(
    definition: proc_macro2::TokenStream,
    name: &syn::Ident,
    name_str: &str,
) -> proc_macro2::TokenStream {
    quote! {
        #definition

        ::kit::inventory::submit! {
            ::kit::container::provider::SingletonEntry {
                register: || {
                    ::kit::App::singleton(<#name as ::std::default::Default>::default());
                },
                name: #name_str,
            }
        }
    }
}

fn with_injection(
    name: &syn::Ident,
    name_str: &str,
    vis: &syn::Visibility,
    attrs: &[syn::Attribute],
    generics: &syn::Generics,
    fields: &FieldsNamed,
) -> proc_macro2::TokenStream {
    let mut definitions = Vec::new();
    let mut initializers = Vec::new();

    for field in &fields.named {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let field_ty = &field.ty;
        let field_vis = &field.vis;
        let other_attrs = field.attrs.iter().filter(|attr| !attr.path().is_ident("inject"));

        definitions.push(quote! {
            #(#other_attrs)*
            #field_vis #field_name: #field_ty
        });

        if has_inject_attr(field) {
            initializers.push(quote! {
                #field_name: match ::kit::App::get::<#field_ty>() {
                    Some(value) => value,
                    None => {
                        ::kit::tracing::error!(
                            service = #name_str,
                            dependency = stringify!(#field_ty),
                            "dependency not registered; skipping injectable"
                        );
                        return None;
                    }
                }
            });
        } else {
            initializers.push(quote! {
                #field_name: ::std::default::Default::default()
            });
        }
    }

    quote! {
        #(#attrs)*
        #[derive(Clone)]
        #vis struct #name #generics {
            #(#definitions),*
        }

        impl #name {
            fn __resolve_dependencies() -> Option<Self> {
                Some(Self {
                    #(#initializers),*
                })
            }
        }

        ::kit::inventory::submit! {
            ::kit::container::provider::SingletonEntry {
                register: || {
                    if let Some(instance) = #name::__resolve_dependencies() {
                        ::kit::App::singleton(instance);
                    }
                },
                name: #name_str,
            }
        }
    }
}
