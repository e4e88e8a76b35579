use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthConfig;
use crate::error::FrameworkError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub email: String,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

pub fn issue_token(config: &AuthConfig, user_id: &str, email: &str) -> Result<String, FrameworkError> {
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: (Utc::now() + Duration::minutes(config.token_ttl_minutes)).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| FrameworkError::internal(format!("Error creating token: {}", e)))
}

/// Decode and check signature and expiry
pub fn verify_token(config: &AuthConfig, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(ttl: i64) -> AuthConfig {
        AuthConfig {
            secret: "test-secret".to_string(),
            token_ttl_minutes: ttl,
        }
    }

    #[test]
    fn test_token_roundtrip_keeps_subject() {
        let token = issue_token(&config(60), "2f1c7d1e-0000-4000-8000-000000000001", "a@b.io").unwrap();
        let claims = verify_token(&config(60), &token).unwrap();
        assert_eq!(claims.sub, "2f1c7d1e-0000-4000-8000-000000000001");
        assert_eq!(claims.email, "a@b.io");
    }

    #[test]
    fn test_expired_and_foreign_tokens_are_rejected() {
        let expired = issue_token(&config(-10), "u", "a@b.io").unwrap();
        assert!(verify_token(&config(60), &expired).is_err());

        let other = AuthConfig {
            secret: "other".to_string(),
            token_ttl_minutes: 60,
        };
        let foreign = issue_token(&other, "u", "a@b.io").unwrap();
        assert!(verify_token(&config(60), &foreign).is_err());
    }
}
