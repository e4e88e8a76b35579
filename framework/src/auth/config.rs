use crate::config::env;

const DEV_SECRET: &str = "your-secret-key-change-in-production";

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub token_ttl_minutes: i64,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        let secret = env("SECRET_KEY", DEV_SECRET.to_string());
        if secret == DEV_SECRET {
            tracing::warn!("SECRET_KEY is not set; using the development signing key");
        }
        Self {
            secret,
            token_ttl_minutes: env("ACCESS_TOKEN_EXPIRE_MINUTES", 24 * 60),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
