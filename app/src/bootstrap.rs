//! Runtime services and global middleware
//!
//! Runs after config registration and before the server starts. Optional
//! integrations (LLM, mail) are bound only when configured.

use kit::{bind, global_middleware, singleton, Config, FrameworkError, DB};

use crate::config::{LlmConfig, MailConfig, MlConfig};
use crate::middleware;
use crate::services::llm::{LanguageModel, OpenAiClient};
use crate::services::mailer::{LogMailer, Mailer, ResendMailer};
use crate::services::predictor::Predictor;

pub async fn register() -> Result<(), FrameworkError> {
    DB::init().await?;

    let llm = Config::get_or(LlmConfig::from_env);
    match OpenAiClient::from_config(&llm) {
        Ok(Some(client)) => {
            tracing::info!(model = %llm.model, "LLM enabled");
            bind!(dyn LanguageModel, client);
        }
        Ok(None) => tracing::info!("No OPENAI_API_KEY, using rule-based fallbacks"),
        Err(e) => tracing::warn!(error = %e, "LLM client unavailable, using rule-based fallbacks"),
    }

    let mail = Config::get_or(MailConfig::from_env);
    match ResendMailer::from_config(&mail) {
        Ok(Some(mailer)) => bind!(dyn Mailer, mailer),
        Ok(None) => bind!(dyn Mailer, LogMailer),
        Err(e) => {
            tracing::warn!(error = %e, "Mail client unavailable, verification codes are only logged");
            bind!(dyn Mailer, LogMailer);
        }
    }

    let predictor = tokio::task::spawn_blocking(move || {
        Predictor::from_config(&Config::get_or(MlConfig::from_env))
    })
    .await
    .map_err(|e| FrameworkError::internal(format!("Model loading panicked: {}", e)))?;
    singleton!(predictor);

    // Outermost first: preflight answers still get logged
    global_middleware!(middleware::RequestLogger);
    global_middleware!(middleware::Cors::from_config());

    Ok(())
}
