//! Body parsing utilities for HTTP requests
//!
//! Provides async body collection and parsing for JSON and form-urlencoded data.

use crate::error::FrameworkError;
use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use serde::de::DeserializeOwned;

/// Collect the full body from an Incoming stream
///
/// When `limit` is set, bodies larger than `limit` bytes fail with
/// [`FrameworkError::PayloadTooLarge`].
pub async fn collect_body(body: Incoming, limit: Option<usize>) -> Result<Bytes, FrameworkError> {
    match limit {
        Some(limit) => Limited::new(body, limit)
            .collect()
            .await
            .map(|collected| collected.to_bytes())
            .map_err(|e| {
                if e.downcast_ref::<LengthLimitError>().is_some() {
                    FrameworkError::PayloadTooLarge { limit }
                } else {
                    FrameworkError::internal(format!("Failed to read request body: {}", e))
                }
            }),
        None => body
            .collect()
            .await
            .map(|collected| collected.to_bytes())
            .map_err(|e| FrameworkError::internal(format!("Failed to read request body: {}", e))),
    }
}

/// Parse bytes as JSON into the target type
pub fn parse_json<T: DeserializeOwned>(bytes: &Bytes) -> Result<T, FrameworkError> {
    serde_json::from_slice(bytes)
        .map_err(|e| FrameworkError::invalid_body(format!("Invalid JSON body: {}", e)))
}

/// Parse bytes as form-urlencoded into the target type
pub fn parse_form<T: DeserializeOwned>(bytes: &Bytes) -> Result<T, FrameworkError> {
    serde_urlencoded::from_bytes(bytes)
        .map_err(|e| FrameworkError::invalid_body(format!("Invalid form body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Login {
        email: String,
    }

    #[test]
    fn test_parse_json_and_form() {
        let json: Login = parse_json(&Bytes::from_static(br#"{"email":"a@b.io"}"#)).unwrap();
        let form: Login = parse_form(&Bytes::from_static(b"email=a%40b.io")).unwrap();
        assert_eq!(json, form);
    }

    #[test]
    fn test_parse_json_rejects_missing_field() {
        let err = parse_json::<Login>(&Bytes::from_static(b"{}")).unwrap_err();
        assert_eq!(err.status_code(), 422);
    }
}
