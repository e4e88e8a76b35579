use kit::env;

/// Transactional email settings
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Resend API key; without one, codes are only logged
    pub resend_api_key: Option<String>,
    pub from_address: String,
    pub api_url: String,
    pub timeout_secs: u64,
}

impl MailConfig {
    pub fn from_env() -> Self {
        Self {
            resend_api_key: kit::env_optional("RESEND_API_KEY"),
            from_address: env("FROM_EMAIL", "Flowpilot <onboarding@resend.dev>".to_string()),
            api_url: env("RESEND_API_URL", "https://api.resend.com/emails".to_string()),
            timeout_secs: env("MAIL_TIMEOUT_SECS", 5),
        }
    }
}
