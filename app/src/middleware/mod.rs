//! Application middleware
//!
//! Each middleware has its own dedicated file following the framework convention.

mod auth;
mod cors;
mod logging;

pub use auth::Authenticate;
pub use cors::Cors;
pub use logging::RequestLogger;
