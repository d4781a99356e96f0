use serde::{Deserialize, Serialize};

// ─── Chat completion (OpenAI wire format) ─────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Sampling knobs sent alongside the messages. `None` fields are omitted
/// from the request so the upstream default applies.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Sampling {
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
}

/// A model-agnostic chat request. The client fills in the model name.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub sampling: Sampling,
}

/// Exact body posted to `/chat/completions`.
#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionBody<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    #[serde(flatten)]
    pub sampling: &'a Sampling,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, trimmed.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
    }
}

// ─── Text generation (Hugging Face inference wire format) ────────────────

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GenerationParameters {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub repetition_penalty: f32,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            max_new_tokens: 150,
            temperature: 0.1,
            top_p: 0.7,
            repetition_penalty: 2.0,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct InferenceBody<'a> {
    pub inputs: &'a str,
    pub parameters: &'a GenerationParameters,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedText {
    #[serde(default)]
    pub generated_text: Option<String>,
}

/// The inference API answers with either a list of generations or a single
/// object depending on the model task.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InferenceResponse {
    Many(Vec<GeneratedText>),
    One(GeneratedText),
}

impl InferenceResponse {
    pub fn into_text(self) -> Option<String> {
        match self {
            InferenceResponse::Many(items) => items.into_iter().next()?.generated_text,
            InferenceResponse::One(item) => item.generated_text,
        }
    }
}

/// Body for a bare `{prompt}` endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct PromptBody<'a> {
    pub prompt: &'a str,
}
