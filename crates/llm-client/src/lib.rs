//! `llm-client`: typed HTTP clients for the text-generation services the
//! orchestrator talks to.
//!
//! # Architecture
//!
//! ```text
//! ChatRequest ──► CompletionApi ──► OpenAiClient          POST {base}/chat/completions
//!
//! &str prompt ──► TextGenerator ──► HuggingFaceClient     POST {base}/models/{model}
//!                               └─► PromptEndpointClient  POST {url}  {"prompt": ...}
//! ```
//!
//! Credentials are passed in per client instance and checked on the call, so
//! a missing key surfaces as [`LlmError::MissingApiKey`] without any request
//! leaving the process.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use llm_client::{ChatMessage, ChatRequest, CompletionApi, OpenAiClient, Sampling};
//!
//! let client = OpenAiClient::new(reqwest::Client::new(), llm_client::DEFAULT_OPENAI_BASE_URL,
//!     "gpt-3.5-turbo", std::env::var("OPENAI_API_KEY").ok());
//! let reply = client.complete(ChatRequest {
//!     messages: vec![ChatMessage::user("say hello")],
//!     sampling: Sampling { max_tokens: 20, temperature: 0.0, ..Default::default() },
//! }).await?;
//! ```

pub mod completion;
pub mod error;
pub mod inference;
pub mod types;


pub use completion::{CompletionApi, OpenAiClient, DEFAULT_CHAT_MODEL, DEFAULT_OPENAI_BASE_URL};
pub use error::LlmError;
pub use inference::{
    HuggingFaceClient, PromptEndpointClient, TextGenerator, DEFAULT_HF_BASE_URL, DEFAULT_HF_MODEL,
};
pub use types::{
    ChatCompletionResponse, ChatMessage, ChatRequest, GenerationParameters, InferenceResponse,
    Role, Sampling,
};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, LlmError>;
