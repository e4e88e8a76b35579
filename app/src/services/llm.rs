//! Chat-completions client
//!
//! Everything that talks to a language model goes through [`LanguageModel`],
//! bound in the container only when `OPENAI_API_KEY` is set. Callers treat
//! every error as "use the local fallback".

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::LlmConfig;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("reply was not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reply had no content")]
    Empty,
}

/// One system + user exchange
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the provider for a JSON object reply
    pub json: bool,
}

impl ChatRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: 0.3,
            max_tokens: 300,
            json: false,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Raw text of the first choice
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError>;

    fn model(&self) -> &str;

    /// Complete and parse the reply as JSON
    async fn complete_json(&self, request: ChatRequest) -> Result<Value, LlmError> {
        let reply = self.complete(request.json()).await?;
        Ok(serde_json::from_str(strip_code_fence(&reply))?)
    }
}

/// Models often wrap JSON in a markdown fence even when asked not to
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// OpenAI-compatible provider
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    /// `None` when no API key is configured
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>, LlmError> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Some(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }))
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });
        if request.json {
            body["response_format"] = json!({ "type": "json_object" });
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: Value = response.json().await?;
        reply["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::Empty)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
pub mod fake {
    use super::*;

    /// Replies with canned text, or fails when built with `failing()`
    pub struct FakeModel {
        reply: Option<String>,
    }

    impl FakeModel {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
            }
        }

        pub fn failing() -> Self {
            Self { reply: None }
        }
    }

    #[async_trait]
    impl LanguageModel for FakeModel {
        async fn complete(&self, _request: ChatRequest) -> Result<String, LlmError> {
            self.reply.clone().ok_or(LlmError::Empty)
        }

        fn model(&self) -> &str {
            "fake"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeModel;
    use super::*;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n[1]\n```"), "[1]");
    }

    #[test]
    fn test_no_key_means_no_client() {
        let config = LlmConfig {
            api_key: None,
            model: "gpt-4".to_string(),
            base_url: "http://localhost".to_string(),
            timeout_secs: 1,
        };
        assert!(OpenAiClient::from_config(&config).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_complete_json_parses_fenced_reply() {
        let model = FakeModel::replying("```json\n{\"complexity_score\": 0.4}\n```");
        let value = model
            .complete_json(ChatRequest::new("system", "user"))
            .await
            .unwrap();
        assert_eq!(value["complexity_score"], 0.4);

        let err = FakeModel::replying("not json")
            .complete_json(ChatRequest::new("system", "user"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Json(_)));
    }
}
