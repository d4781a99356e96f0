use orchestrator_core::config::WarnLevel;
use orchestrator_core::secrets::Credentials;
use std::path::Path;

pub fn run(config_path: Option<&Path>, port: Option<u16>) -> anyhow::Result<()> {
    let state = super::app_state(config_path)?;
    let port = port.unwrap_or(state.config.server.port);

    for w in state.config.validate() {
        match w.level {
            WarnLevel::Warning => tracing::warn!("{}", w.message),
            WarnLevel::Error => tracing::error!("{}", w.message),
        }
    }
    // Requests that need a missing secret fail individually; say so up front.
    let missing = Credentials::resolve(state.secrets.as_ref()).missing();
    if !missing.is_empty() {
        tracing::warn!(missing = %missing.join(", "), "some credentials are not set");
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        orchestrator_server::serve_on(state, listener).await
    })
}
