use async_trait::async_trait;
use tracing::debug;

use crate::types::{ChatCompletionBody, ChatCompletionResponse, ChatRequest};
use crate::{LlmError, Result};

const SERVICE: &str = "OpenAI";

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";

/// Anything that can turn a chat prompt into a single reply.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    /// Returns the first choice's content, trimmed.
    async fn complete(&self, request: ChatRequest) -> Result<String>;
}

/// Chat-completions client for OpenAI-compatible endpoints.
///
/// The API key is optional at construction time; a missing key is reported
/// on the first call and no request is sent.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiClient {
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
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionApi for OpenAiClient {
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(LlmError::MissingApiKey {
                service: SERVICE,
                message: "Missing OpenAI API key. Please set OPENAI_API_KEY.",
            });
        };

        let body = ChatCompletionBody {
            model: &self.model,
            messages: &request.messages,
            sampling: &request.sampling,
        };

        debug!(model = %self.model, max_tokens = request.sampling.max_tokens, "chat completion");

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::Api {
                service: SERVICE,
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|source| LlmError::Parse {
                service: SERVICE,
                source,
            })?;

        parsed
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| LlmError::MalformedResponse {
                service: SERVICE,
                detail: "no message content in first choice".into(),
            })
    }
}
