//! OpenAI-compatible client configuration.

use crate::config::LlmSettings;
use crate::error::{Result, SongVocabError};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Key sent to local servers (Ollama) that ignore authentication.
const PLACEHOLDER_API_KEY: &str = "ollama";

/// Create a chat client for the configured endpoint and timeout.
pub fn create_client(settings: &LlmSettings) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()?;

    let api_key = settings
        .api_key
        .clone()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()))
        .unwrap_or_else(|| PLACEHOLDER_API_KEY.to_string());

    if settings.api_base.is_empty() {
        return Err(SongVocabError::Config("llm.api_base is empty".to_string()));
    }

    let config = OpenAIConfig::new()
        .with_api_base(settings.api_base.trim_end_matches('/'))
        .with_api_key(api_key);

    Ok(Client::with_config(config).with_http_client(http_client))
}
