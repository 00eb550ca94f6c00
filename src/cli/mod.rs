use clap::Parser;
use std::time::Duration;
use crate::llm::{ ConfigError, GenerationConfig, LlmConfig };

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Generation Backend Args ---
    /// Text generation backend (huggingface, ollama)
    #[arg(long, env = "CHAT_BACKEND", default_value = "huggingface")]
    pub backend: String,

    /// Base URL for the backend API (e.g., http://localhost:11434 for Ollama)
    #[arg(long, env = "CHAT_BASE_URL")] // No default, let adapters handle defaults if None
    pub base_url: Option<String>,

    /// Access token for the backend (Hugging Face token)
    #[arg(long, env = "HF_TOKEN", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Model to generate with (e.g., google/gemma-3-270m-it, gemma3:270m)
    #[arg(long, env = "CHAT_MODEL")] // No default, rely on adapter defaults if None
    pub model: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "CHAT_TIMEOUT_SECS", default_value = "120")]
    pub timeout_secs: u64,

    // --- Sampling Args ---
    /// Maximum new tokens for the primary reply.
    #[arg(long, env = "MAX_NEW_TOKENS", default_value = "40")]
    pub max_new_tokens: u32,

    #[arg(long, env = "TEMPERATURE", default_value = "0.5")]
    pub temperature: f32,

    /// Nucleus sampling threshold for the primary reply.
    #[arg(long, env = "TOP_P", default_value = "0.8")]
    pub top_p: f32,

    #[arg(long, env = "REPETITION_PENALTY", default_value = "1.1")]
    pub repetition_penalty: f32,

    /// Maximum new tokens for the simplified retry.
    #[arg(long, env = "RETRY_MAX_NEW_TOKENS", default_value = "25")]
    pub retry_max_new_tokens: u32,

    #[arg(long, env = "RETRY_TEMPERATURE", default_value = "0.3")]
    pub retry_temperature: f32,

    /// End-of-sequence token, sent to the backend as a stop sequence.
    #[arg(long, env = "EOS_TOKEN")]
    pub eos_token: Option<String>,

    // --- General App Args ---
    /// Number of recent turns included in the prompt (the current input counts as one).
    #[arg(long, env = "HISTORY_WINDOW", default_value = "2")]
    pub history_window: usize,

    /// Enable debug logging on stderr
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}

impl Args {
    pub fn llm_config(&self) -> Result<LlmConfig, ConfigError> {
        Ok(LlmConfig {
            llm_type: self.backend.parse()?,
            api_key: Some(self.api_key.clone()).filter(|k| !k.is_empty()),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }

    pub fn primary_generation(&self) -> GenerationConfig {
        GenerationConfig {
            max_new_tokens: self.max_new_tokens,
            temperature: self.temperature,
            top_p: Some(self.top_p),
            repetition_penalty: Some(self.repetition_penalty),
            ..GenerationConfig::primary(self.eos_token.clone())
        }
    }

    pub fn retry_generation(&self) -> GenerationConfig {
        GenerationConfig {
            max_new_tokens: self.retry_max_new_tokens,
            temperature: self.retry_temperature,
            ..GenerationConfig::retry()
        }
    }
}
