use async_trait::async_trait;
use tracing::debug;

use crate::types::{GenerationParameters, InferenceBody, InferenceResponse, PromptBody};
use crate::{LlmError, Result};

pub const DEFAULT_HF_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_HF_MODEL: &str = "tiiuae/falcon-7b-instruct";

/// Single-prompt text generation. `Ok(None)` means the upstream answered
/// successfully but without any generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Option<String>>;
}

// ─── Hugging Face ─────────────────────────────────────────────────────────

const HF_SERVICE: &str = "Hugging Face";

#[derive(Debug, Clone)]
pub struct HuggingFaceClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    parameters: GenerationParameters,
}

impl HuggingFaceClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
            parameters: GenerationParameters::default(),
        }
    }

    pub fn with_parameters(mut self, parameters: GenerationParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// The configured key, or the error [`generate`](TextGenerator::generate)
    /// would return. Lets callers fail before doing any other work.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey {
                service: HF_SERVICE,
                message: "Server config error: HF_API_KEY not set.",
            })
    }
}

#[async_trait]
impl TextGenerator for HuggingFaceClient {
    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        let api_key = self.api_key()?;

        debug!(model = %self.model, prompt_len = prompt.len(), "text generation");

        let response = self
            .http
            .post(format!("{}/models/{}", self.base_url, self.model))
            .bearer_auth(api_key)
            .json(&InferenceBody {
                inputs: prompt,
                parameters: &self.parameters,
            })
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::Api {
                service: HF_SERVICE,
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: InferenceResponse =
            serde_json::from_str(&text).map_err(|source| LlmError::Parse {
                service: HF_SERVICE,
                source,
            })?;
        Ok(parsed.into_text())
    }
}

// ─── Bare prompt endpoint ─────────────────────────────────────────────────

const PROMPT_SERVICE: &str = "Inference endpoint";

/// Client for endpoints that take `{"prompt": ...}` and answer with
/// `{"generated_text": ...}`. The bearer key is optional.
#[derive(Debug, Clone)]
pub struct PromptEndpointClient {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl PromptEndpointClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            url: url.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }
}

#[async_trait]
impl TextGenerator for PromptEndpointClient {
    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        let mut request = self.http.post(&self.url).json(&PromptBody { prompt });
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::Api {
                service: PROMPT_SERVICE,
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: InferenceResponse =
            serde_json::from_str(&text).map_err(|source| LlmError::Parse {
                service: PROMPT_SERVICE,
                source,
            })?;
        Ok(parsed.into_text())
    }
}
