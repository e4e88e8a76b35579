//! Request extraction traits for handler parameter injection
//!
//! `#[handler]` functions may take several typed parameters. Every parameter
//! except the last is built from a borrowed request through [`FromRequestParts`];
//! the last one may consume the request (and its body) through [`FromRequest`].
//!
//! ```rust,ignore
//! #[handler]
//! pub async fn store(user: AuthUser, form: CreateWorkflowRequest) -> Response {
//!     // ...
//! }
//! ```
//!
//! expands to roughly:
//!
//! ```rust,ignore
//! pub async fn store(req: Request) -> Response {
//!     let user = <AuthUser as FromRequestParts>::from_request_parts(&req)?;
//!     let form = <CreateWorkflowRequest as FromRequest>::from_request(req).await?;
//!     // ...
//! }
//! ```

use super::Request;
use crate::error::FrameworkError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Trait for types that can be extracted from an HTTP request
///
/// Returns `Err(FrameworkError)` if extraction fails, which will be
/// converted to an appropriate HTTP error response.
#[async_trait]
pub trait FromRequest: Sized + Send {
    /// Extract Self from the incoming request
    async fn from_request(req: Request) -> Result<Self, FrameworkError>;
}

/// Trait for types extracted without consuming the request body
pub trait FromRequestParts: Sized + Send {
    /// Extract Self from a borrowed request
    fn from_request_parts(req: &Request) -> Result<Self, FrameworkError>;
}

/// Request passes through unchanged
#[async_trait]
impl FromRequest for Request {
    async fn from_request(req: Request) -> Result<Self, FrameworkError> {
        Ok(req)
    }
}

/// Deserialized query string
///
/// ```rust,ignore
/// #[derive(Deserialize)]
/// struct TelemetryParams { range: Option<String> }
///
/// #[handler]
/// pub async fn telemetry(Query(params): Query<TelemetryParams>) -> Response { ... }
/// ```
#[derive(Debug, Clone)]
pub struct Query<T>(pub T);

impl<T: DeserializeOwned + Send> FromRequestParts for Query<T> {
    fn from_request_parts(req: &Request) -> Result<Self, FrameworkError> {
        req.query().map(Query)
    }
}

#[async_trait]
impl<T: DeserializeOwned + Send> FromRequest for Query<T> {
    async fn from_request(req: Request) -> Result<Self, FrameworkError> {
        Self::from_request_parts(&req)
    }
}
