//! Configuration
//!
//! - `.env` cascade loading with environment-based precedence
//! - typed config structs stored by type in a global repository
//!
//! ```rust,ignore
//! use kit::{Config, ServerConfig};
//!
//! Config::init(std::path::Path::new("."));
//! let server = Config::get::<ServerConfig>();
//! ```

pub mod env;
pub mod providers;
pub mod repository;

pub use env::{env, env_optional, load_dotenv, Environment};
pub use providers::{AppConfig, AppConfigBuilder, ServerConfig, ServerConfigBuilder};

use std::path::Path;

/// Config facade
pub struct Config;

impl Config {
    /// Load `.env` files from `project_root` and register the framework configs
    ///
    /// Returns the detected environment.
    pub fn init(project_root: &Path) -> Environment {
        let env = env::load_dotenv(project_root);

        repository::register(AppConfig::from_env());
        repository::register(ServerConfig::from_env());

        env
    }

    /// Get a typed config struct from the repository
    pub fn get<T: std::any::Any + Send + Sync + Clone + 'static>() -> Option<T> {
        repository::get::<T>()
    }

    /// Get a registered config, or build it from the environment
    pub fn get_or<T, F>(fallback: F) -> T
    where
        T: std::any::Any + Send + Sync + Clone + 'static,
        F: FnOnce() -> T,
    {
        Self::get::<T>().unwrap_or_else(fallback)
    }

    /// Register a custom config struct
    ///
    /// Registering the same type twice replaces the earlier value.
    pub fn register<T: std::any::Any + Send + Sync + 'static>(config: T) {
        repository::register(config);
    }

    /// Check if a config type is registered
    pub fn has<T: std::any::Any + 'static>() -> bool {
        repository::has::<T>()
    }

    /// The current environment, from `AppConfig` if registered, else `APP_ENV`
    pub fn environment() -> Environment {
        Config::get::<AppConfig>()
            .map(|c| c.environment)
            .unwrap_or_else(Environment::detect)
    }

    pub fn is_production() -> bool {
        Self::environment().is_production()
    }

    pub fn is_debug() -> bool {
        Config::get::<AppConfig>().map(|c| c.debug).unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Limits {
        max: u32,
    }

    #[test]
    fn test_register_and_get() {
        Config::register(Limits { max: 3 });
        assert!(Config::has::<Limits>());
        assert_eq!(Config::get::<Limits>(), Some(Limits { max: 3 }));

        Config::register(Limits { max: 5 });
        assert_eq!(Config::get_or(|| Limits { max: 0 }).max, 5);
    }
}
