use super::body::{collect_body, parse_form, parse_json};
use super::ParamError;
use crate::error::FrameworkError;
use bytes::Bytes;
use hyper::body::Incoming;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::str::FromStr;

/// Request body: either still streaming from the connection or already buffered
enum Body {
    Incoming(Incoming),
    Buffered(Bytes),
}

/// HTTP Request wrapper providing Laravel-like access to request data
pub struct Request {
    head: http::request::Parts,
    body: Body,
    params: HashMap<String, String>,
    body_limit: Option<usize>,
}

impl Request {
    pub fn new(inner: hyper::Request<Incoming>) -> Self {
        let (head, body) = inner.into_parts();
        Self {
            head,
            body: Body::Incoming(body),
            params: HashMap::new(),
            body_limit: None,
        }
    }

    /// Build a request around an already buffered body
    ///
    /// Used by the in-process test client.
    pub fn from_bytes(inner: http::Request<Bytes>) -> Self {
        let (head, body) = inner.into_parts();
        Self {
            head,
            body: Body::Buffered(body),
            params: HashMap::new(),
            body_limit: None,
        }
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    /// Cap the number of body bytes that will be read
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = Some(limit);
        self
    }

    /// Get the request method
    pub fn method(&self) -> &hyper::Method {
        &self.head.method
    }

    /// Get the request path
    pub fn path(&self) -> &str {
        self.head.uri.path()
    }

    /// Raw query string, if any
    pub fn query_string(&self) -> Option<&str> {
        self.head.uri.query()
    }

    /// Deserialize the query string into `T`
    ///
    /// A missing query string is treated as empty, so `T` fields with
    /// `#[serde(default)]` pick up their defaults.
    pub fn query<T: DeserializeOwned>(&self) -> Result<T, FrameworkError> {
        serde_urlencoded::from_str(self.query_string().unwrap_or(""))
            .map_err(|e| FrameworkError::invalid_body(format!("Invalid query string: {}", e)))
    }

    /// Get a route parameter by name (e.g., /workflows/{id})
    /// Returns Err(ParamError) if the parameter is missing, enabling use of `?` operator
    pub fn param(&self, name: &str) -> Result<&str, ParamError> {
        self.params
            .get(name)
            .map(|s| s.as_str())
            .ok_or_else(|| ParamError {
                param_name: name.to_string(),
            })
    }

    /// Get a route parameter parsed into `T`
    pub fn param_as<T: FromStr>(&self, name: &str) -> Result<T, FrameworkError> {
        let raw = self.param(name)?;
        raw.parse::<T>()
            .map_err(|_| FrameworkError::param_parse(raw, std::any::type_name::<T>()))
    }

    /// Get all route parameters
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Get a header value by name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get the Content-Type header
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Typed request-scoped values set by middleware
    pub fn extension<T: Clone + Send + Sync + 'static>(&self) -> Option<&T> {
        self.head.extensions.get::<T>()
    }

    /// Attach a typed value for later middleware and handlers
    pub fn insert_extension<T: Clone + Send + Sync + 'static>(&mut self, value: T) {
        self.head.extensions.insert(value);
    }

    /// Consume the request and collect the body as bytes
    pub async fn body_bytes(self) -> Result<(RequestParts, Bytes), FrameworkError> {
        let content_type = self.content_type().map(|s| s.to_string());
        let parts = RequestParts {
            params: self.params,
            content_type,
        };

        let bytes = match self.body {
            Body::Incoming(body) => collect_body(body, self.body_limit).await?,
            Body::Buffered(bytes) => match self.body_limit {
                Some(limit) if bytes.len() > limit => {
                    return Err(FrameworkError::PayloadTooLarge { limit })
                }
                _ => bytes,
            },
        };

        Ok((parts, bytes))
    }

    /// Parse the request body as JSON
    ///
    /// Consumes the request since the body can only be read once.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, FrameworkError> {
        let (_, bytes) = self.body_bytes().await?;
        parse_json(&bytes)
    }

    /// Parse the request body as form-urlencoded
    pub async fn form<T: DeserializeOwned>(self) -> Result<T, FrameworkError> {
        let (_, bytes) = self.body_bytes().await?;
        parse_form(&bytes)
    }

    /// Parse the request body based on Content-Type header
    ///
    /// - `application/x-www-form-urlencoded` -> Form parsing
    /// - Otherwise -> JSON parsing (default)
    pub async fn input<T: DeserializeOwned>(self) -> Result<T, FrameworkError> {
        let (parts, bytes) = self.body_bytes().await?;

        match parts.content_type.as_deref() {
            Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => parse_form(&bytes),
            _ => parse_json(&bytes),
        }
    }
}

/// Request parts after body has been separated
///
/// Contains metadata needed for body parsing without the body itself.
#[derive(Clone)]
pub struct RequestParts {
    pub params: HashMap<String, String>,
    pub content_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn request(uri: &str, body: &'static str) -> Request {
        Request::from_bytes(
            http::Request::builder()
                .uri(uri)
                .header("content-type", "application/json")
                .body(Bytes::from_static(body.as_bytes()))
                .unwrap(),
        )
    }

    #[derive(Deserialize)]
    struct RangeQuery {
        #[serde(default)]
        range: Option<String>,
    }

    #[test]
    fn test_query_parsing() {
        let req = request("/metrics/telemetry?range=30d", "");
        let q: RangeQuery = req.query().unwrap();
        assert_eq!(q.range.as_deref(), Some("30d"));

        let req = request("/metrics/telemetry", "");
        let q: RangeQuery = req.query().unwrap();
        assert!(q.range.is_none());
    }

    #[test]
    fn test_param_as_reports_expected_type() {
        let mut params = HashMap::new();
        params.insert("id".to_string(), "abc".to_string());
        let req = request("/workflows/abc", "").with_params(params);

        let err = req.param_as::<u32>("id").unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_body_limit_is_enforced() {
        let req = request("/", r#"{"name":"a very long workflow name"}"#).with_body_limit(8);
        let err = req.body_bytes().await.err().unwrap();
        assert_eq!(err.status_code(), 413);
    }

    #[tokio::test]
    async fn test_extensions_roundtrip() {
        let mut req = request("/", "{}");
        req.insert_extension(42u32);
        assert_eq!(req.extension::<u32>(), Some(&42));
    }
}
