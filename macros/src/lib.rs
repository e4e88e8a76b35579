//! Procedural macros for the Flowpilot kit
//!
//! - `#[handler]`: typed handler parameters
//! - `#[request]` / `#[derive(FormRequest)]`: validated request bodies
//! - `#[injectable]`: container singletons registered at boot
//! - `#[domain_error]`: errors that carry an HTTP status

use proc_macro::TokenStream;

mod domain_error;
mod form_request;
mod handler;
mod injectable;

/// Extract handler parameters from the request
///
/// Every parameter but the last implements `FromRequestParts`; the last one
/// implements `FromRequest` and may read the body.
///
/// ```rust,ignore
/// #[handler]
/// pub async fn update(user: AuthUser, form: UpdateWorkflowRequest) -> Response { ... }
/// ```
#[proc_macro_attribute]
pub fn handler(attr: TokenStream, input: TokenStream) -> TokenStream {
    handler::handler_impl(attr, input)
}

#[proc_macro_derive(FormRequest)]
pub fn derive_form_request(input: TokenStream) -> TokenStream {
    form_request::derive_form_request_impl(input)
}

/// Turn a struct into a validated request body
///
/// ```rust,ignore
/// #[request]
/// pub struct SignupRequest {
///     #[validate(email)]
///     pub email: String,
///     pub password: String,
///     pub full_name: Option<String>,
/// }
/// ```
#[proc_macro_attribute]
pub fn request(attr: TokenStream, input: TokenStream) -> TokenStream {
    form_request::request_attr_impl(attr, input)
}

/// Register a struct as a singleton when the container boots
///
/// ```rust,ignore
/// #[injectable]
/// pub struct CreateWorkflowAction;
///
/// let action = App::resolve::<CreateWorkflowAction>()?;
/// ```
#[proc_macro_attribute]
pub fn injectable(_attr: TokenStream, input: TokenStream) -> TokenStream {
    injectable::injectable_impl(input)
}

/// Define an error type with an HTTP status
///
/// ```rust,ignore
/// #[domain_error(status = 404, message = "Workflow not found")]
/// pub struct WorkflowNotFound;
/// ```
#[proc_macro_attribute]
pub fn domain_error(attr: TokenStream, input: TokenStream) -> TokenStream {
    domain_error::domain_error_impl(attr, input)
}
