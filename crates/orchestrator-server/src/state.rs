use std::sync::Arc;

use llm_client::{HuggingFaceClient, OpenAiClient, PromptEndpointClient};
use orchestrator_core::cleanup::CleanupPlan;
use orchestrator_core::config::Config;
use orchestrator_core::documents::DocumentCache;
use orchestrator_core::error::OrchestratorError;
use orchestrator_core::hosting::GitHubClient;
use orchestrator_core::pipeline::{Orchestrator, PublishSettings};
use orchestrator_core::secrets::{Credentials, SecretSource};

/// Shared application state passed to all route handlers.
///
/// Clients are built per request from freshly resolved credentials, so a
/// rotated secret takes effect on the next call.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub secrets: Arc<dyn SecretSource>,
    pub http: reqwest::Client,
    pub knowledge_base: Arc<DocumentCache>,
    pub reference_documents: Arc<DocumentCache>,
    pub public_cleanup: Arc<CleanupPlan>,
    pub secure_cleanup: Arc<CleanupPlan>,
}

impl AppState {
    /// Fails only when a cleanup profile does not compile.
    pub fn new(config: Config, secrets: Arc<dyn SecretSource>) -> Result<Self, OrchestratorError> {
        let http = reqwest::Client::new();
        let public_cleanup = CleanupPlan::compile(&config.query.cleanup)?;
        let secure_cleanup = CleanupPlan::compile(&config.secure_query.cleanup)?;
        let knowledge_base =
            DocumentCache::new(http.clone(), config.query.knowledge_base.clone());
        let reference_documents =
            DocumentCache::new(http.clone(), config.secure_query.documents.clone());

        Ok(Self {
            config: Arc::new(config),
            secrets,
            http,
            knowledge_base: Arc::new(knowledge_base),
            reference_documents: Arc::new(reference_documents),
            public_cleanup: Arc::new(public_cleanup),
            secure_cleanup: Arc::new(secure_cleanup),
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::resolve(self.secrets.as_ref())
    }

    pub fn orchestrator(&self) -> Orchestrator {
        let credentials = self.credentials();
        let completion = OpenAiClient::new(
            self.http.clone(),
            &self.config.openai.base_url,
            &self.config.openai.model,
            credentials.openai_api_key,
        );
        let hosting = GitHubClient::new(
            self.http.clone(),
            &self.config.github.api_base_url,
            credentials.github,
        );
        Orchestrator::new(
            Arc::new(completion),
            Arc::new(hosting),
            PublishSettings::from(&self.config.github),
        )
    }

    /// Fails without `HF_API_KEY`, before any request is made.
    pub fn public_generator(&self) -> Result<HuggingFaceClient, OrchestratorError> {
        let hf = &self.config.huggingface;
        let client = HuggingFaceClient::new(
            self.http.clone(),
            &hf.base_url,
            &hf.model,
            self.credentials().hf_api_key,
        )
        .with_parameters(hf.parameters.clone());
        client.api_key()?;
        Ok(client)
    }

    pub fn secure_generator(&self) -> Result<PromptEndpointClient, OrchestratorError> {
        let endpoint = self.config.secure_query.endpoint.as_deref().ok_or_else(|| {
            OrchestratorError::MissingConfig(
                "Server config error: secure_query.endpoint not set.".to_string(),
            )
        })?;
        Ok(PromptEndpointClient::new(
            self.http.clone(),
            endpoint,
            self.credentials().alt_inference_api_key,
        ))
    }
}
