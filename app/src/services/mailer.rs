//! Verification-code email
//!
//! Delivery is best effort. [`dispatch_otp`] spawns the send and returns at
//! once; failures are logged and never reach the request.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::config::MailConfig;

pub const OTP_TTL_MINUTES: i64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("mail provider returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_otp(&self, to: &str, code: &str, name: &str) -> Result<(), MailError>;

    /// Whether mail actually leaves the process
    fn delivers(&self) -> bool;
}

/// Resend HTTP API
pub struct ResendMailer {
    client: Client,
    api_key: String,
    api_url: String,
    from: String,
}

impl ResendMailer {
    /// `None` without an API key
    pub fn from_config(config: &MailConfig) -> Result<Option<Self>, MailError> {
        let Some(api_key) = config.resend_api_key.clone() else {
            return Ok(None);
        };
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Some(Self {
            client,
            api_key,
            api_url: config.api_url.clone(),
            from: config.from_address.clone(),
        }))
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send_otp(&self, to: &str, code: &str, name: &str) -> Result<(), MailError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": self.from,
                "to": [to],
                "subject": format!("Your Flowpilot verification code: {}", code),
                "html": otp_html(code, name),
                "text": format!("Your Flowpilot verification code is: {}", code),
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    fn delivers(&self) -> bool {
        true
    }
}

/// Development mailer: the code only goes to the log
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_otp(&self, to: &str, _code: &str, _name: &str) -> Result<(), MailError> {
        tracing::info!(to, "No mail provider configured, verification code only logged");
        Ok(())
    }

    fn delivers(&self) -> bool {
        false
    }
}

/// Send in the background
pub fn dispatch_otp(mailer: Arc<dyn Mailer>, to: String, code: String, name: String) {
    tokio::spawn(async move {
        match mailer.send_otp(&to, &code, &name).await {
            Ok(()) => tracing::debug!(to = %to, "Verification email sent"),
            Err(e) => tracing::warn!(to = %to, error = %e, "Verification email failed"),
        }
    });
}

fn otp_html(code: &str, name: &str) -> String {
    let name = if name.trim().is_empty() { "User" } else { name };
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="margin:0;padding:0;background-color:#0a0a0a;font-family:'Segoe UI',Tahoma,sans-serif;">
  <table role="presentation" style="width:100%;max-width:600px;margin:40px auto;background:#1a1a2e;border-radius:16px;">
    <tr><td style="padding:40px;text-align:center;">
      <h1 style="color:#F97316;margin:0;">Flowpilot</h1>
      <h2 style="color:#ffffff;">Verify Your Email</h2>
      <p style="color:#94a3b8;">Hi {name},<br>Use the code below to verify your email address.</p>
      <div style="font-size:36px;font-weight:700;color:#ffffff;letter-spacing:8px;font-family:monospace;">{code}</div>
      <p style="color:#64748b;font-size:13px;">This code expires in {ttl} minutes</p>
      <p style="color:#64748b;font-size:12px;">If you didn't request this code, you can safely ignore this email.</p>
    </td></tr>
  </table>
</body>
</html>"#,
        name = name,
        code = code,
        ttl = OTP_TTL_MINUTES,
    )
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use std::sync::Mutex;

    /// Records every send
    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send_otp(&self, to: &str, code: &str, _name: &str) -> Result<(), MailError> {
            if let Ok(mut sent) = self.sent.lock() {
                sent.push((to.to_string(), code.to_string()));
            }
            Ok(())
        }

        fn delivers(&self) -> bool {
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::RecordingMailer;
    use super::*;
    use kit::expect;

    #[test]
    fn test_html_carries_code_and_name() {
        let html = otp_html("482913", "");
        expect!(html.clone()).to_contain("482913");
        expect!(html).to_contain("Hi User,");
    }

    #[test]
    fn test_no_key_means_no_resend() {
        let config = MailConfig {
            resend_api_key: None,
            from_address: "x@example.com".to_string(),
            api_url: "http://localhost".to_string(),
            timeout_secs: 1,
        };
        expect!(ResendMailer::from_config(&config).unwrap().is_none()).to_be_true();
        expect!(LogMailer.delivers()).to_be_false();
    }

    #[tokio::test]
    async fn test_dispatch_runs_in_background() {
        let mailer = Arc::new(RecordingMailer::default());
        dispatch_otp(
            mailer.clone(),
            "ada@example.com".to_string(),
            "123456".to_string(),
            "Ada".to_string(),
        );

        for _ in 0..50 {
            if !mailer.sent.lock().unwrap().is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        expect!(mailer.sent.lock().unwrap().clone())
            .to_equal(vec![("ada@example.com".to_string(), "123456".to_string())]);
    }
}
