use kit::env;

/// OpenAI-compatible chat completions endpoint
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Without a key every LLM-backed feature uses its local fallback
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: kit::env_optional("OPENAI_API_KEY"),
            model: env("OPENAI_MODEL", "gpt-4".to_string()),
            base_url: env("OPENAI_BASE_URL", "https://api.openai.com/v1".to_string()),
            timeout_secs: env("OPENAI_TIMEOUT_SECS", 30),
        }
    }
}
