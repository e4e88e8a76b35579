mod cors;
mod database;
mod llm;
mod mail;
mod ml;

pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use llm::LlmConfig;
pub use mail::MailConfig;
pub use ml::MlConfig;

use kit::{AuthConfig, Config};

/// Register all application configs
pub fn register_all() {
    Config::register(DatabaseConfig::from_env());
    Config::register(AuthConfig::from_env());
    Config::register(LlmConfig::from_env());
    Config::register(MailConfig::from_env());
    Config::register(MlConfig::from_env());
    Config::register(CorsConfig::from_env());
}
