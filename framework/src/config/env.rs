use std::path::Path;

/// Deployment environment, from `APP_ENV`
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Local,
    Development,
    Staging,
    Production,
    Testing,
    Custom(String),
}

impl Environment {
    /// Detect environment from APP_ENV or default to Local
    pub fn detect() -> Self {
        Self::parse(std::env::var("APP_ENV").ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("production") => Self::Production,
            Some("staging") => Self::Staging,
            Some("development") => Self::Development,
            Some("testing") => Self::Testing,
            Some("local") | None => Self::Local,
            Some(other) => Self::Custom(other.to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Local | Self::Development)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Development => write!(f, "development"),
            Self::Staging => write!(f, "staging"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
            Self::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// Load environment variables from .env files
///
/// Precedence, highest first:
/// 1. real process environment
/// 2. `.env.{environment}.local`
/// 3. `.env.{environment}`
/// 4. `.env.local`
/// 5. `.env`
///
/// dotenvy never overwrites a variable that is already set, so files are
/// loaded from most to least specific.
pub fn load_dotenv(project_root: &Path) -> Environment {
    let env = Environment::detect();

    let files = [
        format!(".env.{}.local", env),
        format!(".env.{}", env),
        ".env.local".to_string(),
        ".env".to_string(),
    ];
    for file in files {
        let _ = dotenvy::from_path(project_root.join(file));
    }

    env
}

/// Get an environment variable with a default value
///
/// Unset or unparsable values fall back to `default`.
///
/// ```
/// use kit::config::env;
///
/// let port: u16 = env("SERVER_PORT", 8080);
/// ```
pub fn env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env_optional(key).unwrap_or(default)
}

/// Get an optional environment variable; empty values count as unset
pub fn env_optional<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| v.parse().ok())
}
