pub mod config;
pub mod pipeline;
pub mod serve;

use anyhow::Context;
use orchestrator_core::config::Config;
use orchestrator_core::secrets::EnvSecrets;
use orchestrator_server::AppState;
use std::path::Path;
use std::sync::Arc;

pub(crate) fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    tracing::debug!(path = ?path, "loading config");
    Config::load_or_default(path).with_context(|| match path {
        Some(p) => format!("failed to load config from {}", p.display()),
        None => "failed to build default config".to_string(),
    })
}

/// State backed by the process environment, as the server uses it.
pub(crate) fn app_state(path: Option<&Path>) -> anyhow::Result<AppState> {
    let config = load_config(path)?;
    Ok(AppState::new(config, Arc::new(EnvSecrets))?)
}
