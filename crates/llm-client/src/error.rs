use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    /// The credential for `service` was not available when the call was made.
    /// The message is user-facing, so it names the variable to set.
    #[error("{message}")]
    MissingApiKey {
        service: &'static str,
        message: &'static str,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status.
    #[error("{service} API error: {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} returned an unexpected response: {detail}")]
    MalformedResponse {
        service: &'static str,
        detail: String,
    },

    #[error("Failed to parse {service} response: {source}")]
    Parse {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl LlmError {
    /// Upstream HTTP status, when the failure came from a non-2xx response.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            LlmError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
