use kit::request;

#[request]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[request]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

#[request]
pub struct SendOtpRequest {
    #[validate(email)]
    pub email: String,
}

/// A malformed code is reported as invalid, not as a validation error
#[request]
pub struct VerifyOtpRequest {
    #[validate(email)]
    pub email: String,
    pub code: String,
}
