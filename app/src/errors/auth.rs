use kit::domain_error;

#[domain_error(status = 400, message = "Email already registered")]
pub struct EmailAlreadyRegistered;

#[domain_error(status = 400, message = "Password must be at least 8 characters")]
pub struct PasswordTooShort;

#[domain_error(status = 401, message = "Invalid email or password")]
pub struct InvalidCredentials;

#[domain_error(status = 404)]
pub struct UserNotFound;

#[domain_error(status = 400, message = "Invalid verification code")]
pub struct InvalidVerificationCode;

#[domain_error(status = 400, message = "Verification code has expired")]
pub struct VerificationCodeExpired;
