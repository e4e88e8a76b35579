//! `#[handler]`: typed parameters for route handlers
//!
//! ```rust,ignore
//! #[handler]
//! pub async fn store(user: AuthUser, form: CreateWorkflowRequest) -> Response { ... }
//! ```
//!
//! becomes
//!
//! ```rust,ignore
//! pub async fn store(__kit_req: ::kit::Request) -> Response {
//!     let user: AuthUser = match <AuthUser as ::kit::FromRequestParts>::from_request_parts(&__kit_req) { .. };
//!     let form: CreateWorkflowRequest = match <CreateWorkflowRequest as ::kit::FromRequest>::from_request(__kit_req).await { .. };
//!     // original body
//! }
//! ```
//!
//! Every parameter but the last borrows the request; the last may consume it.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, FnArg, ItemFn, PatType, Type};

pub fn handler_impl(_attr: TokenStream, input: TokenStream) -> TokenStream {
    let input_fn = parse_macro_input!(input as ItemFn);

    let fn_vis = &input_fn.vis;
    let fn_name = &input_fn.sig.ident;
    let fn_generics = &input_fn.sig.generics;
    let fn_output = &input_fn.sig.output;
    let fn_block = &input_fn.block;
    let fn_attrs = &input_fn.attrs;

    if input_fn.sig.asyncness.is_none() {
        return syn::Error::new_spanned(&input_fn.sig, "#[handler] functions must be async")
            .to_compile_error()
            .into();
    }

    let mut params: Vec<&PatType> = Vec::new();
    for arg in &input_fn.sig.inputs {
        match arg {
            FnArg::Typed(pat_type) => params.push(pat_type),
            FnArg::Receiver(receiver) => {
                return syn::Error::new_spanned(
                    receiver,
                    "#[handler] does not support methods with self receiver",
                )
                .to_compile_error()
                .into();
            }
        }
    }

    let Some((last, leading)) = params.split_last() else {
        return quote! {
            #(#fn_attrs)*
            #fn_vis async fn #fn_name #fn_generics(_: ::kit::Request) #fn_output {
                #fn_block
            }
        }
        .into();
    };

    let leading = leading.iter().map(|param| {
        let pat = &param.pat;
        let ty = &param.ty;
        quote! {
            let #pat: #ty = match <#ty as ::kit::FromRequestParts>::from_request_parts(&__kit_req) {
                Ok(v) => v,
                Err(e) => return Err(e.into()),
            };
        }
    });

    let last_pat = &last.pat;
    let last_ty = &last.ty;
    let last = if is_request_type(last_ty) {
        quote! { let #last_pat = __kit_req; }
    } else {
        quote! {
            let #last_pat: #last_ty = match <#last_ty as ::kit::FromRequest>::from_request(__kit_req).await {
                Ok(v) => v,
                Err(e) => return Err(e.into()),
            };
        }
    };

    quote! {
        #(#fn_attrs)*
        #fn_vis async fn #fn_name #fn_generics(__kit_req: ::kit::Request) #fn_output {
            #(#leading)*
            #last
            #fn_block
        }
    }
    .into()
}

/// `Request` or `kit::Request`
fn is_request_type(ty: &Type) -> bool {
    let Type::Path(type_path) = ty else {
        return false;
    };
    let segments: Vec<_> = type_path.path.segments.iter().map(|s| s.ident.to_string()).collect();
    matches!(
        segments.iter().map(String::as_str).collect::<Vec<_>>().as_slice(),
        ["Request"] | ["kit", "Request"]
    )
}
