use llm_client::LlmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Missing '{0}' in request body")]
    MissingField(&'static str),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    MissingConfig(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Hosting(#[from] HostingError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;

#[derive(Debug, Error)]
pub enum HostingError {
    #[error("Missing GitHub environment variables (GITHUB_TOKEN, GITHUB_OWNER, GITHUB_REPO)")]
    MissingCredentials,

    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("GitHub returned an unexpected response: {0}")]
    MalformedResponse(String),
}
