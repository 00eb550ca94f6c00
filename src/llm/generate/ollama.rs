use reqwest::Client as HttpClient;
use serde::{ Deserialize, Serialize };
use async_trait::async_trait;
use super::{ ensure_success, GenerationError, TextGenerator };
use crate::llm::GenerationConfig;
use log::debug;

const DEFAULT_MODEL: &str = "gemma3:270m";
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

#[derive(Debug)]
pub struct OllamaClient {
    http: HttpClient,
    base_url: String,
    completion_model: String,
}

#[derive(Serialize, Debug)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    // Skip the model's chat template; the prompt already carries the dialogue format.
    raw: bool,
    options: GenerateOptions,
}

#[derive(Serialize, Debug, PartialEq)]
struct GenerateOptions {
    num_predict: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repeat_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
}

impl From<&GenerationConfig> for GenerateOptions {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            num_predict: config.max_new_tokens,
            // Ollama has no sampling switch; zero temperature is greedy decoding.
            temperature: if config.do_sample { config.temperature } else { 0.0 },
            top_p: config.top_p,
            repeat_penalty: config.repetition_penalty,
            stop: config.stop_sequences(),
        }
    }
}

#[derive(Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}

impl OllamaClient {
    pub fn new(http: HttpClient, base_url: Option<String>, completion_model: Option<String>) -> Self {
        let model = completion_model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.into());

        Self {
            http,
            base_url: url,
            completion_model: model,
        }
    }

    fn request<'a>(&'a self, prompt: &'a str, config: &GenerationConfig) -> GenerateRequest<'a> {
        GenerateRequest {
            model: &self.completion_model,
            prompt,
            stream: false,
            raw: true,
            options: GenerateOptions::from(config),
        }
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig
    ) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.base_url);
        let req = self.request(prompt, config);
        debug!("Ollama generate: model={} options={:?}", self.completion_model, req.options);
        let resp = ensure_success(self.http.post(&url).json(&req).send().await?).await?;
        let data = resp.json::<GenerateResponse>().await?;
        // Ollama returns only the continuation; echo the prompt to match the pipeline contract.
        Ok(format!("{}{}", prompt, data.response))
    }

    fn get_model(&self) -> String {
        self.completion_model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}
