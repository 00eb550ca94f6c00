pub mod huggingface;
pub mod ollama;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use super::{ normalize_base_url, ConfigError, GenerationConfig, LlmConfig, LlmType };
use self::huggingface::HuggingFaceClient;
use self::ollama::OllamaClient;
use reqwest::Client as HttpClient;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request to generation backend failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("generation backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("unexpected response from generation backend: {0}")]
    MalformedResponse(String),
    #[error("generation backend returned no text")]
    EmptyResponse,
}

/// A black-box text completion capability.
///
/// Implementations return the prompt followed by the generated continuation,
/// the same shape a text-generation pipeline produces.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig
    ) -> Result<String, GenerationError>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> Option<String>;
}

/// Returns the trimmed text that follows `prompt` in `generated`.
pub fn extract_continuation(prompt: &str, generated: &str) -> String {
    match generated.strip_prefix(prompt) {
        Some(rest) => rest.trim().to_string(),
        // Backend re-tokenized the prompt; fall back to skipping its length.
        None => generated.chars().skip(prompt.chars().count()).collect::<String>().trim().to_string(),
    }
}

pub(crate) fn build_http_client(timeout: Duration) -> Result<HttpClient, ConfigError> {
    Ok(HttpClient::builder().timeout(timeout).build()?)
}

pub(crate) async fn ensure_success(
    resp: reqwest::Response
) -> Result<reqwest::Response, GenerationError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(GenerationError::Status { status, body })
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn TextGenerator>, ConfigError> {
    let base_url = config.base_url.as_deref().map(normalize_base_url).transpose()?;
    let http = build_http_client(config.timeout)?;
    let client: Arc<dyn TextGenerator> = match config.llm_type {
        LlmType::HuggingFace => {
            let specific_client = HuggingFaceClient::new(
                http,
                base_url,
                config.model.clone(),
                config.api_key.clone()
            );
            Arc::new(specific_client)
        }
        LlmType::Ollama => {
            let specific_client = OllamaClient::new(http, base_url, config.model.clone());
            Arc::new(specific_client)
        }
    };
    Ok(client)
}
