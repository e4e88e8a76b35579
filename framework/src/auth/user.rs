use async_trait::async_trait;
use uuid::Uuid;

use super::{verify_token, AuthConfig};
use crate::error::FrameworkError;
use crate::http::{FromRequest, FromRequestParts, Request};

/// The authenticated caller
///
/// ```rust,ignore
/// #[handler]
/// pub async fn index(user: AuthUser) -> Response { ... }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

impl AuthUser {
    /// Resolve the caller from a raw bearer token
    ///
    /// Bad signatures, expiry and a missing or non-UUID `sub` all fail alike.
    pub fn from_token(config: &AuthConfig, token: &str) -> Result<Self, FrameworkError> {
        let claims = verify_token(config, token).map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            invalid_credentials()
        })?;
        let id = Uuid::parse_str(&claims.sub).map_err(|_| invalid_credentials())?;

        Ok(Self {
            id,
            email: claims.email,
        })
    }
}

fn invalid_credentials() -> FrameworkError {
    FrameworkError::domain("Could not validate credentials", 401)
}

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(req: &Request) -> Option<&str> {
    let value = req.header("authorization")?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequestParts for AuthUser {
    fn from_request_parts(req: &Request) -> Result<Self, FrameworkError> {
        req.extension::<AuthUser>()
            .cloned()
            .ok_or_else(invalid_credentials)
    }
}

#[async_trait]
impl FromRequest for AuthUser {
    async fn from_request(req: Request) -> Result<Self, FrameworkError> {
        Self::from_request_parts(&req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::issue_token;
    use bytes::Bytes;

    fn config() -> AuthConfig {
        AuthConfig {
            secret: "s3cret".to_string(),
            token_ttl_minutes: 5,
        }
    }

    fn request(auth: Option<&str>) -> Request {
        let mut builder = http::Request::builder().uri("/api/v1/workflows");
        if let Some(value) = auth {
            builder = builder.header("Authorization", value);
        }
        Request::from_bytes(builder.body(Bytes::new()).unwrap())
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&request(Some("Bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&request(Some("bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&request(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&request(Some("Bearer "))), None);
        assert_eq!(bearer_token(&request(None)), None);
    }

    #[test]
    fn test_from_token_requires_uuid_subject() {
        let id = Uuid::new_v4();
        let good = issue_token(&config(), &id.to_string(), "dev@flowpilot.io").unwrap();
        assert_eq!(AuthUser::from_token(&config(), &good).unwrap().id, id);

        let bad = issue_token(&config(), "not-a-uuid", "dev@flowpilot.io").unwrap();
        let err = AuthUser::from_token(&config(), &bad).unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn test_extractor_without_extension_is_unauthorized() {
        let err = AuthUser::from_request_parts(&request(None)).unwrap_err();
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.to_string(), "Could not validate credentials");
    }
}
