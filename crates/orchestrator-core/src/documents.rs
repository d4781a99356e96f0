//! Application-scoped reference text for the query assistants.
//!
//! A [`DocumentCache`] is created once per server and handed to the routes
//! that need it. It loads its sources on first use, keeps the text until
//! [`DocumentCache::invalidate`] is called, and never caches a failed load.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Written in YAML as `- url: https://...` or `- path: docs/file.md`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentSource {
    Url { url: String },
    Path { path: PathBuf },
}

impl std::fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentSource::Url { url } => write!(f, "{url}"),
            DocumentSource::Path { path } => write!(f, "{}", path.display()),
        }
    }
}

pub struct DocumentCache {
    http: reqwest::Client,
    sources: Vec<DocumentSource>,
    cached: RwLock<Option<Arc<str>>>,
}

impl DocumentCache {
    pub fn new(http: reqwest::Client, sources: Vec<DocumentSource>) -> Self {
        Self {
            http,
            sources,
            cached: RwLock::new(None),
        }
    }

    pub fn sources(&self) -> &[DocumentSource] {
        &self.sources
    }

    pub async fn is_loaded(&self) -> bool {
        self.cached.read().await.is_some()
    }

    /// Concatenated text of every source, separated by blank lines.
    ///
    /// A source that fails to load is logged and skipped; the partial text is
    /// returned but not cached, so the next call tries again.
    pub async fn text(&self) -> Arc<str> {
        if let Some(text) = self.cached.read().await.as_ref() {
            return Arc::clone(text);
        }

        let mut cached = self.cached.write().await;
        // Another request may have filled it while we waited for the lock.
        if let Some(text) = cached.as_ref() {
            return Arc::clone(text);
        }

        let mut parts = Vec::with_capacity(self.sources.len());
        let mut complete = true;
        for source in &self.sources {
            match self.load(source).await {
                Ok(text) => parts.push(text),
                Err(reason) => {
                    warn!(%source, %reason, "could not load reference document");
                    complete = false;
                }
            }
        }

        let text: Arc<str> = Arc::from(parts.join("\n\n"));
        if complete {
            debug!(sources = self.sources.len(), bytes = text.len(), "reference documents cached");
            *cached = Some(Arc::clone(&text));
        }
        text
    }

    /// Drop the cached text; the next [`text`](Self::text) call reloads.
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }

    async fn load(&self, source: &DocumentSource) -> std::result::Result<String, String> {
        match source {
            DocumentSource::Url { url } => {
                let response = self.http.get(url).send().await.map_err(|e| e.to_string())?;
                let status = response.status();
                if !status.is_success() {
                    return Err(format!("HTTP {status}"));
                }
                response.text().await.map_err(|e| e.to_string())
            }
            DocumentSource::Path { path } => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_once_until_invalidated() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/kb.md")
            .with_status(200)
            .with_body("# Services\nAI audits")
            .expect(2)
            .create_async()
            .await;

        let cache = DocumentCache::new(
            reqwest::Client::new(),
            vec![DocumentSource::Url {
                url: format!("{}/kb.md", server.url()),
            }],
        );
        assert_eq!(&*cache.text().await, "# Services\nAI audits");
        assert_eq!(&*cache.text().await, "# Services\nAI audits");
        assert!(cache.is_loaded().await);

        cache.invalidate().await;
        assert!(!cache.is_loaded().await);
        cache.text().await;
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn failed_load_is_not_cached() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/kb.md")
            .with_status(404)
            .expect(2)
            .create_async()
            .await;

        let cache = DocumentCache::new(
            reqwest::Client::new(),
            vec![DocumentSource::Url {
                url: format!("{}/kb.md", server.url()),
            }],
        );
        assert_eq!(&*cache.text().await, "");
        assert!(!cache.is_loaded().await);
        assert_eq!(&*cache.text().await, "");
    }

    #[tokio::test]
    async fn joins_files_and_keeps_partial_text() {
        let dir = tempfile::TempDir::new().unwrap();
        let proposal = dir.path().join("proposal.md");
        std::fs::write(&proposal, "Proposal").unwrap();

        let cache = DocumentCache::new(
            reqwest::Client::new(),
            vec![
                DocumentSource::Path {
                    path: proposal.clone(),
                },
                DocumentSource::Path {
                    path: dir.path().join("missing.md"),
                },
            ],
        );
        assert_eq!(&*cache.text().await, "Proposal");
        assert!(!cache.is_loaded().await);

        let process = dir.path().join("process.md");
        std::fs::write(&process, "Process").unwrap();
        let cache = DocumentCache::new(
            reqwest::Client::new(),
            vec![
                DocumentSource::Path { path: proposal },
                DocumentSource::Path { path: process },
            ],
        );
        assert_eq!(&*cache.text().await, "Proposal\n\nProcess");
        assert!(cache.is_loaded().await);
    }

    #[tokio::test]
    async fn no_sources_is_empty_and_cached() {
        let cache = DocumentCache::new(reqwest::Client::new(), Vec::new());
        assert_eq!(&*cache.text().await, "");
        assert!(cache.is_loaded().await);
    }
}
