use reqwest::Client as HttpClient;
use serde::{ Deserialize, Serialize };
use async_trait::async_trait;
use super::{ ensure_success, GenerationError, TextGenerator };
use crate::llm::GenerationConfig;
use log::debug;

const DEFAULT_MODEL: &str = "google/gemma-3-270m-it";
const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Client for a Hugging Face hosted text-generation endpoint.
#[derive(Debug)]
pub struct HuggingFaceClient {
    http: HttpClient,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Serialize, Debug)]
struct TextGenerationRequest<'a> {
    inputs: &'a str,
    parameters: TextGenerationParameters,
}

#[derive(Serialize, Debug)]
struct TextGenerationParameters {
    max_new_tokens: u32,
    do_sample: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repetition_penalty: Option<f32>,
    return_full_text: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
}

impl From<&GenerationConfig> for TextGenerationParameters {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            max_new_tokens: config.max_new_tokens,
            do_sample: config.do_sample,
            // The endpoint rejects sampling parameters on greedy requests.
            temperature: config.do_sample.then_some(config.temperature),
            top_p: config.top_p.filter(|_| config.do_sample),
            repetition_penalty: config.repetition_penalty,
            return_full_text: true,
            stop: config.stop_sequences(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct GeneratedText {
    generated_text: String,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum TextGenerationResponse {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
    Error { error: String },
}

fn parse_response(body: &str) -> Result<String, GenerationError> {
    let parsed: TextGenerationResponse = serde_json
        ::from_str(body)
        .map_err(|e| GenerationError::MalformedResponse(format!("{}: {}", e, body)))?;
    match parsed {
        TextGenerationResponse::Batch(items) =>
            items
                .into_iter()
                .next()
                .map(|item| item.generated_text)
                .ok_or(GenerationError::EmptyResponse),
        TextGenerationResponse::Single(item) => Ok(item.generated_text),
        TextGenerationResponse::Error { error } => Err(GenerationError::MalformedResponse(error)),
    }
}

impl HuggingFaceClient {
    pub fn new(
        http: HttpClient,
        base_url: Option<String>,
        model: Option<String>,
        api_key: Option<String>
    ) -> Self {
        Self {
            http,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }
}

#[async_trait]
impl TextGenerator for HuggingFaceClient {
    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig
    ) -> Result<String, GenerationError> {
        let req = TextGenerationRequest {
            inputs: prompt,
            parameters: TextGenerationParameters::from(config),
        };
        debug!("Hugging Face generate: model={} parameters={:?}", self.model, req.parameters);

        let mut builder = self.http.post(self.endpoint()).json(&req);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let resp = ensure_success(builder.send().await?).await?;
        let body = resp.text().await?;
        parse_response(&body)
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}
