//! Bearer-token authentication primitives
//!
//! - [`AuthConfig`]: signing secret and token lifetime
//! - [`issue_token`] / [`verify_token`]: HS256 JWTs with `sub` and `email` claims
//! - [`hash_password`] / [`verify_password`]: bcrypt
//! - [`AuthUser`]: the caller, placed in request extensions by an auth middleware

mod config;
mod password;
mod token;
mod user;

pub use config::AuthConfig;
pub use password::{hash_password, verify_password};
pub use token::{issue_token, verify_token, Claims};
pub use user::{bearer_token, AuthUser};
