mod body;
mod extract;
mod form_request;
mod request;
mod response;

pub use body::{collect_body, parse_form, parse_json};
pub use extract::{FromRequest, FromRequestParts, Query};
pub use form_request::FormRequest;
pub use request::{Request, RequestParts};
pub use response::{HttpResponse, Response, ResponseExt};

/// Error type for missing route parameters
#[derive(Debug)]
pub struct ParamError {
    pub param_name: String,
}

impl From<ParamError> for crate::error::FrameworkError {
    fn from(err: ParamError) -> crate::error::FrameworkError {
        crate::error::FrameworkError::ParamError {
            param_name: err.param_name,
        }
    }
}

impl From<ParamError> for HttpResponse {
    fn from(err: ParamError) -> HttpResponse {
        crate::error::FrameworkError::from(err).into()
    }
}

/// Create a text response
pub fn text(body: impl Into<String>) -> Response {
    Ok(HttpResponse::text(body))
}

/// Create a JSON response from a serde_json::Value
pub fn json(body: serde_json::Value) -> Response {
    Ok(HttpResponse::json(body))
}

/// Build a JSON `Response` with `serde_json::json!` syntax
///
/// ```rust,ignore
/// json_response!({ "message": "Successfully logged out" })
/// ```
#[macro_export]
macro_rules! json_response {
    ($($json:tt)+) => {
        ::std::result::Result::Ok($crate::HttpResponse::json($crate::serde_json::json!($($json)+)))
    };
}
