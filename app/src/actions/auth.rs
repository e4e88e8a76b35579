//! Account actions: signup, login and email verification codes

use chrono::{Duration, Utc};
use kit::auth::{hash_password, issue_token, verify_password};
use kit::database::ModelMut;
use kit::{injectable, App, AuthConfig, Config, FrameworkError};
use rand::Rng;
use sea_orm::Set;
use serde::Serialize;
use std::sync::Arc;

use crate::errors::{
    EmailAlreadyRegistered, InvalidCredentials, InvalidVerificationCode, PasswordTooShort,
    UserNotFound, VerificationCodeExpired,
};
use crate::models::users;
use crate::requests::{LoginRequest, SignupRequest, VerifyOtpRequest};
use crate::services::mailer::{dispatch_otp, LogMailer, Mailer, OTP_TTL_MINUTES};

const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, Clone, Serialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: &'static str,
}

impl AccessToken {
    fn issue(user: &users::Model) -> Result<Self, FrameworkError> {
        let config = Config::get_or(AuthConfig::from_env);
        Ok(Self {
            access_token: issue_token(&config, &user.id.to_string(), &user.email)?,
            token_type: "bearer",
        })
    }
}

/// bcrypt is CPU-bound, keep it off the reactor
async fn blocking<T, F>(what: &str, task: F) -> Result<T, FrameworkError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(task).await.map_err(|e| {
        tracing::error!(error = %e, task = what, "Password task failed");
        FrameworkError::internal(format!("Error {}: {}", what, e))
    })
}

#[injectable]
pub struct SignupAction;

impl SignupAction {
    pub async fn execute(&self, form: SignupRequest) -> Result<AccessToken, FrameworkError> {
        if users::Model::find_by_email(&form.email).await?.is_some() {
            return Err(EmailAlreadyRegistered.into());
        }
        if form.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(PasswordTooShort.into());
        }

        let password = form.password;
        let password_hash = blocking("hashing password", move || hash_password(&password)).await??;
        let user =
            users::Entity::insert_one(users::ActiveModel::signup(&form.email, password_hash, form.full_name))
                .await?;

        tracing::info!(user_id = %user.id, "User signed up");
        AccessToken::issue(&user)
    }
}

#[injectable]
pub struct LoginAction;

impl LoginAction {
    pub async fn execute(&self, form: LoginRequest) -> Result<AccessToken, FrameworkError> {
        let user = users::Model::find_by_email(&form.email)
            .await?
            .ok_or(InvalidCredentials)?;

        let hash = user.password_hash.clone();
        let password = form.password;
        let matches = blocking("verifying password", move || verify_password(&password, &hash)).await?;
        if !matches {
            tracing::debug!(user_id = %user.id, "Login rejected");
            return Err(InvalidCredentials.into());
        }

        AccessToken::issue(&user)
    }
}

#[injectable]
pub struct SendOtpAction;

impl SendOtpAction {
    /// Store a fresh six-digit code and mail it in the background
    pub async fn execute(&self, email: &str) -> Result<&'static str, FrameworkError> {
        let user = users::Model::find_by_email(email).await?.ok_or(UserNotFound)?;

        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
        let name = user.full_name.clone().unwrap_or_default();
        let to = user.email.clone();

        let mut active: users::ActiveModel = user.into();
        active.otp_code = Set(Some(code.clone()));
        active.otp_expires_at = Set(Some(Utc::now() + Duration::minutes(OTP_TTL_MINUTES)));
        users::Entity::update_one(active).await?;

        tracing::info!(email = %to, code = %code, "Verification code issued");

        let mailer = App::make::<dyn Mailer>().unwrap_or_else(|| Arc::new(LogMailer) as Arc<dyn Mailer>);
        let delivers = mailer.delivers();
        dispatch_otp(mailer, to, code, name);

        Ok(if delivers {
            "OTP sent (check terminal for code)"
        } else {
            "OTP generated (check terminal - no email API configured)"
        })
    }
}

#[injectable]
pub struct VerifyOtpAction;

impl VerifyOtpAction {
    pub async fn execute(&self, form: VerifyOtpRequest) -> Result<AccessToken, FrameworkError> {
        let user = users::Model::find_by_email(&form.email)
            .await?
            .ok_or(UserNotFound)?;

        if user.otp_code.as_deref() != Some(form.code.trim()) {
            return Err(InvalidVerificationCode.into());
        }
        if !user.otp_is_live(Utc::now()) {
            return Err(VerificationCodeExpired.into());
        }

        let mut active: users::ActiveModel = user.into();
        active.email_verified = Set(true);
        active.otp_code = Set(None);
        active.otp_expires_at = Set(None);
        let user = users::Entity::update_one(active).await?;

        tracing::info!(user_id = %user.id, "Email verified");
        AccessToken::issue(&user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kit::expect;

    #[tokio::test]
    async fn test_blocking_returns_task_value() {
        let value = blocking("verifying password", || 7).await;
        expect!(value.ok()).to_equal(Some(7));
    }

    #[tokio::test]
    async fn test_crashed_password_task_is_a_server_error() {
        let result = blocking("verifying password", || -> bool { panic!("bcrypt worker crashed") }).await;

        let error = result.err().map(|e| e.status_code());
        expect!(error).to_equal(Some(500));
    }
}
