pub mod generate;
use serde::{ Deserialize, Serialize };
use std::str::FromStr;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmType {
    HuggingFace,
    Ollama,
}

impl fmt::Display for LlmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmType::HuggingFace => write!(f, "huggingface"),
            LlmType::Ollama => write!(f, "ollama"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid LLM backend: '{0}'")]
    UnknownBackend(String),
    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl FromStr for LlmType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(LlmType::HuggingFace),
            "ollama" => Ok(LlmType::Ollama),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub llm_type: LlmType,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            llm_type: LlmType::HuggingFace,
            api_key: None,
            model: None,
            base_url: None,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Checks a user supplied base URL and strips any trailing slash.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    url::Url::parse(raw).map_err(|source| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;
    Ok(raw.trim_end_matches('/').to_string())
}

/// Sampling parameters for a single generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: Option<f32>,
    pub do_sample: bool,
    pub repetition_penalty: Option<f32>,
    /// End-of-sequence marker, forwarded to backends as a stop sequence.
    pub eos_token: Option<String>,
}

impl GenerationConfig {
    /// Moderate-randomness settings for the history-aware prompt.
    pub fn primary(eos_token: Option<String>) -> Self {
        Self {
            max_new_tokens: 40,
            temperature: 0.5,
            top_p: Some(0.8),
            do_sample: true,
            repetition_penalty: Some(1.1),
            eos_token,
        }
    }

    /// Cooler, shorter settings for the instruction-style retry.
    pub fn retry() -> Self {
        Self {
            max_new_tokens: 25,
            temperature: 0.3,
            top_p: None,
            do_sample: true,
            repetition_penalty: None,
            eos_token: None,
        }
    }

    pub fn stop_sequences(&self) -> Vec<String> {
        self.eos_token.iter().filter(|t| !t.is_empty()).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_names() {
        assert_eq!("huggingface".parse::<LlmType>().unwrap(), LlmType::HuggingFace);
        assert_eq!("HF".parse::<LlmType>().unwrap(), LlmType::HuggingFace);
        assert_eq!(" Ollama ".parse::<LlmType>().unwrap(), LlmType::Ollama);
        assert!(matches!("gpt".parse::<LlmType>(), Err(ConfigError::UnknownBackend(_))));
    }

    #[test]
    fn base_url_is_validated() {
        assert_eq!(
            normalize_base_url("http://localhost:11434/").unwrap(),
            "http://localhost:11434"
        );
        assert!(matches!(
            normalize_base_url("localhost 11434"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn primary_and_retry_settings() {
        let primary = GenerationConfig::primary(Some("<eos>".into()));
        assert_eq!(primary.max_new_tokens, 40);
        assert_eq!(primary.top_p, Some(0.8));
        assert_eq!(primary.repetition_penalty, Some(1.1));
        assert_eq!(primary.stop_sequences(), vec!["<eos>".to_string()]);

        let retry = GenerationConfig::retry();
        assert_eq!(retry.max_new_tokens, 25);
        assert!(retry.temperature < primary.temperature);
        assert!(retry.stop_sequences().is_empty());
    }
}
