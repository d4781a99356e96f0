//! Source-hosting API access: branches, file contents, pull requests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::HostingError;
use crate::secrets::GitHubCredentials;

pub type HostingResult<T> = std::result::Result<T, HostingError>;

/// File create-or-update on a branch. `content_base64` is already encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWrite {
    pub path: String,
    pub branch: String,
    pub message: String,
    pub content_base64: String,
    /// Blob SHA of the file being replaced, if it exists on the branch.
    pub sha: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPullRequest {
    pub title: String,
    pub head: String,
    pub base: String,
    pub body: String,
}

#[async_trait]
pub trait HostingApi: Send + Sync {
    /// Default branch of the repository; `main` when the API omits it.
    async fn default_branch(&self) -> HostingResult<String>;
    async fn branch_head_sha(&self, branch: &str) -> HostingResult<String>;
    async fn create_branch(&self, name: &str, sha: &str) -> HostingResult<()>;
    /// Blob SHA of `path` on `branch`, `None` if it cannot be read.
    async fn file_sha(&self, path: &str, branch: &str) -> HostingResult<Option<String>>;
    async fn put_file(&self, write: FileWrite) -> HostingResult<()>;
    /// Returns the pull request's HTML URL.
    async fn create_pull_request(&self, pr: NewPullRequest) -> HostingResult<String>;
}

// ---------------------------------------------------------------------------
// GitHub REST implementation
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RepoResponse {
    #[serde(default)]
    default_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BranchResponse {
    commit: CommitRef,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    html_url: String,
}

#[derive(Debug, Serialize)]
struct CreateRefPayload<'a> {
    #[serde(rename = "ref")]
    ref_name: String,
    sha: &'a str,
}

#[derive(Debug, Serialize)]
struct PutContentPayload<'a> {
    message: &'a str,
    content: &'a str,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct PullRequestPayload<'a> {
    title: &'a str,
    head: &'a str,
    base: &'a str,
    body: &'a str,
}

/// GitHub client bound to one repository. Credentials are checked on every
/// call so constructing the client never fails.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    credentials: GitHubCredentials,
}

impl GitHubClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        credentials: GitHubCredentials,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn repo_url(&self, suffix: &str) -> HostingResult<(String, &str)> {
        let (token, owner, repo) = self
            .credentials
            .complete()
            .ok_or(HostingError::MissingCredentials)?;
        Ok((
            format!("{}/repos/{}/{}{}", self.base_url, owner, repo, suffix),
            token,
        ))
    }

    fn request(&self, method: reqwest::Method, url: &str, token: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(token)
            .header("User-Agent", "ai-orchestrator")
            .header("Accept", "application/vnd.github+json")
    }

    async fn send<T: serde::de::DeserializeOwned>(
        request: reqwest::RequestBuilder,
    ) -> HostingResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HostingError::Api {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| HostingError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl HostingApi for GitHubClient {
    async fn default_branch(&self) -> HostingResult<String> {
        let (url, token) = self.repo_url("")?;
        let repo: RepoResponse = Self::send(self.request(reqwest::Method::GET, &url, token)).await?;
        Ok(repo
            .default_branch
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| "main".to_string()))
    }

    async fn branch_head_sha(&self, branch: &str) -> HostingResult<String> {
        let (url, token) = self.repo_url(&format!("/branches/{branch}"))?;
        let data: BranchResponse =
            Self::send(self.request(reqwest::Method::GET, &url, token)).await?;
        Ok(data.commit.sha)
    }

    async fn create_branch(&self, name: &str, sha: &str) -> HostingResult<()> {
        let (url, token) = self.repo_url("/git/refs")?;
        debug!(branch = name, %sha, "creating branch");
        let _: serde_json::Value = Self::send(
            self.request(reqwest::Method::POST, &url, token)
                .json(&CreateRefPayload {
                    ref_name: format!("refs/heads/{name}"),
                    sha,
                }),
        )
        .await?;
        Ok(())
    }

    async fn file_sha(&self, path: &str, branch: &str) -> HostingResult<Option<String>> {
        let (url, token) = self.repo_url(&format!("/contents/{path}"))?;
        let result: HostingResult<ContentResponse> = Self::send(
            self.request(reqwest::Method::GET, &url, token)
                .query(&[("ref", branch)]),
        )
        .await;
        match result {
            Ok(content) => Ok(Some(content.sha)),
            Err(e) => {
                debug!(path, branch, error = %e, "no existing file; will create");
                Ok(None)
            }
        }
    }

    async fn put_file(&self, write: FileWrite) -> HostingResult<()> {
        let (url, token) = self.repo_url(&format!("/contents/{}", write.path))?;
        debug!(path = %write.path, branch = %write.branch, update = write.sha.is_some(), "writing file");
        let _: serde_json::Value = Self::send(
            self.request(reqwest::Method::PUT, &url, token)
                .json(&PutContentPayload {
                    message: &write.message,
                    content: &write.content_base64,
                    branch: &write.branch,
                    sha: write.sha.as_deref(),
                }),
        )
        .await?;
        Ok(())
    }

    async fn create_pull_request(&self, pr: NewPullRequest) -> HostingResult<String> {
        let (url, token) = self.repo_url("/pulls")?;
        debug!(head = %pr.head, base = %pr.base, "opening pull request");
        let data: PullResponse = Self::send(
            self.request(reqwest::Method::POST, &url, token)
                .json(&PullRequestPayload {
                    title: &pr.title,
                    head: &pr.head,
                    base: &pr.base,
                    body: &pr.body,
                }),
        )
        .await?;
        Ok(data.html_url)
    }
}
