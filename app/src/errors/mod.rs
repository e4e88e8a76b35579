//! Domain errors
//!
//! Each converts into `FrameworkError` (and from there into a `{"detail": ...}`
//! response), so actions can return them with `?`.

mod auth;
mod workflow;

pub use auth::{
    EmailAlreadyRegistered, InvalidCredentials, InvalidVerificationCode, PasswordTooShort,
    UserNotFound, VerificationCodeExpired,
};
pub use workflow::{AgentNotFound, NoUpdateData, WorkflowNotFound};
