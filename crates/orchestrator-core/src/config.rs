use crate::cleanup::{CleanupPlan, CleanupStep};
use crate::documents::DocumentSource;
use crate::error::Result;
use llm_client::GenerationParameters;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

// ---------------------------------------------------------------------------
// OpenAiConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    #[serde(default = "default_chat_model")]
    pub model: String,
}

fn default_openai_base_url() -> String {
    llm_client::DEFAULT_OPENAI_BASE_URL.to_string()
}

fn default_chat_model() -> String {
    llm_client::DEFAULT_CHAT_MODEL.to_string()
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_base_url(),
            model: default_chat_model(),
        }
    }
}

// ---------------------------------------------------------------------------
// GitHubConfig
// ---------------------------------------------------------------------------

/// Where approved changes are published. Credentials are not part of this;
/// see [`crate::secrets`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    #[serde(default = "default_github_api")]
    pub api_base_url: String,
    /// File on the new branch that receives the generated change. Consumers
    /// of the target repository read this path, so it is fixed per deployment.
    #[serde(default = "default_proposal_path")]
    pub proposal_path: String,
    #[serde(default = "default_pr_body")]
    pub pull_request_body: String,
}

fn default_github_api() -> String {
    "https://api.github.com".to_string()
}

fn default_proposal_path() -> String {
    "proposed_changes.txt".to_string()
}

fn default_pr_body() -> String {
    "This pull request contains automated code changes generated by the AI Orchestrator."
        .to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_github_api(),
            proposal_path: default_proposal_path(),
            pull_request_body: default_pr_body(),
        }
    }
}

// ---------------------------------------------------------------------------
// HuggingFaceConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuggingFaceConfig {
    #[serde(default = "default_hf_base_url")]
    pub base_url: String,
    #[serde(default = "default_hf_model")]
    pub model: String,
    #[serde(default)]
    pub parameters: GenerationParameters,
}

fn default_hf_base_url() -> String {
    llm_client::DEFAULT_HF_BASE_URL.to_string()
}

fn default_hf_model() -> String {
    llm_client::DEFAULT_HF_MODEL.to_string()
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            base_url: default_hf_base_url(),
            model: default_hf_model(),
            parameters: GenerationParameters::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Query profiles
// ---------------------------------------------------------------------------

/// Settings for the public knowledge-base assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "default_knowledge_base")]
    pub knowledge_base: Vec<DocumentSource>,
    #[serde(default = "default_public_cleanup")]
    pub cleanup: Vec<CleanupStep>,
}

fn default_knowledge_base() -> Vec<DocumentSource> {
    vec![DocumentSource::Url {
        url: "https://raw.githubusercontent.com/simwilso/virtualaiofficer-site/main/knowledge_base.md"
            .to_string(),
    }]
}

fn default_public_cleanup() -> Vec<CleanupStep> {
    vec![
        CleanupStep::AfterMarker {
            marker: crate::query::ANSWER_MARKER.to_string(),
        },
        CleanupStep::StripPhrases {
            patterns: vec![
                r"(?i)\bas an ai\b(?: language model)?,?\s*".to_string(),
                r"(?im)^\s*(?:knowledge base|user's question):.*$".to_string(),
            ],
        },
        CleanupStep::Truncate { max_chars: 1200 },
    ]
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            knowledge_base: default_knowledge_base(),
            cleanup: default_public_cleanup(),
        }
    }
}

/// Settings for the authenticated proposal assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecureQueryConfig {
    /// `{prompt}` → `{generated_text}` endpoint. Unset means the secure
    /// assistant answers every request with a configuration error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub documents: Vec<DocumentSource>,
    #[serde(default = "default_secure_cleanup")]
    pub cleanup: Vec<CleanupStep>,
}

fn default_secure_cleanup() -> Vec<CleanupStep> {
    vec![
        CleanupStep::LastParagraph,
        CleanupStep::Truncate { max_chars: 2000 },
    ]
}

impl Default for SecureQueryConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            documents: Vec::new(),
            cleanup: default_secure_cleanup(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

/// Non-secret service settings. Every section is optional in YAML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub huggingface: HuggingFaceConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub secure_query: SecureQueryConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_yaml(&data)
    }

    /// Load `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn from_yaml(data: &str) -> Result<Self> {
        // An empty file deserializes to unit, not an empty map.
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(data)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        for (name, steps) in [
            ("query.cleanup", &self.query.cleanup),
            ("secure_query.cleanup", &self.secure_query.cleanup),
        ] {
            if let Err(e) = CleanupPlan::compile(steps) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("{name}: {e}"),
                });
            }
            for step in steps {
                if let CleanupStep::Truncate { max_chars: 0 } = step {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Warning,
                        message: format!("{name}: truncate to 0 characters empties every reply"),
                    });
                }
            }
        }

        if self.secure_query.endpoint.is_none() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "secure_query.endpoint is not set; the secure assistant will reject \
                          every request"
                    .to_string(),
            });
        }

        if self.query.knowledge_base.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "query.knowledge_base is empty; answers will have no business context"
                    .to_string(),
            });
        }

        if self.github.proposal_path.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "github.proposal_path must not be empty".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
