use kit::env;

/// Cross-origin settings for the browser dashboard
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// `*` or a comma-separated list of origins
    pub allowed_origins: String,
    pub allow_credentials: bool,
    pub max_age_secs: u32,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        Self {
            allowed_origins: env("CORS_ALLOWED_ORIGINS", "*".to_string()),
            allow_credentials: env("CORS_ALLOW_CREDENTIALS", true),
            max_age_secs: env("CORS_MAX_AGE", 600),
        }
    }

    /// The `Access-Control-Allow-Origin` value for a request origin
    ///
    /// With credentials allowed, a wildcard echoes the caller's origin since
    /// browsers reject `*` on credentialed requests.
    pub fn allow_origin(&self, origin: Option<&str>) -> Option<String> {
        let wildcard = self.allowed_origins.trim() == "*";
        match origin {
            Some(origin) if wildcard && self.allow_credentials => Some(origin.to_string()),
            _ if wildcard => Some("*".to_string()),
            Some(origin) => self
                .allowed_origins
                .split(',')
                .map(str::trim)
                .any(|allowed| allowed == origin)
                .then(|| origin.to_string()),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(origins: &str, credentials: bool) -> CorsConfig {
        CorsConfig {
            allowed_origins: origins.to_string(),
            allow_credentials: credentials,
            max_age_secs: 600,
        }
    }

    #[test]
    fn test_wildcard_echoes_origin_with_credentials() {
        let cors = config("*", true);
        assert_eq!(cors.allow_origin(Some("http://localhost:5173")).as_deref(), Some("http://localhost:5173"));
        assert_eq!(cors.allow_origin(None).as_deref(), Some("*"));
        assert_eq!(config("*", false).allow_origin(Some("http://a.io")).as_deref(), Some("*"));
    }

    #[test]
    fn test_origin_list() {
        let cors = config("http://a.io, http://b.io", true);
        assert_eq!(cors.allow_origin(Some("http://b.io")).as_deref(), Some("http://b.io"));
        assert_eq!(cors.allow_origin(Some("http://c.io")), None);
    }
}
