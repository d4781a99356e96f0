//! In-memory stand-ins for the completion and hosting APIs.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use llm_client::{ChatRequest, CompletionApi, LlmError};

use crate::error::HostingError;
use crate::hosting::{FileWrite, HostingApi, HostingResult, NewPullRequest};

/// Replays canned replies in order and records the user prompt of each call.
/// Running out of replies behaves like an upstream 500.
pub struct FakeCompletion {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeCompletion {
    pub fn replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionApi for FakeCompletion {
    async fn complete(&self, request: ChatRequest) -> llm_client::Result<String> {
        let user = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.prompts.lock().unwrap().push(user);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .map(|r| r.trim().to_string())
            .ok_or(LlmError::Api {
                service: "OpenAI",
                status: 500,
                body: "no more replies".into(),
            })
    }
}

/// Records every hosting call as `name:detail` in call order.
#[derive(Default)]
pub struct RecordingHosting {
    calls: Mutex<Vec<String>>,
    writes: Mutex<Vec<FileWrite>>,
    existing_file: Option<String>,
    fail_on: Option<&'static str>,
}

impl RecordingHosting {
    pub const PR_URL: &'static str = "https://github.com/octo/site/pull/7";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_existing_file(mut self, sha: &str) -> Self {
        self.existing_file = Some(sha.to_string());
        self
    }

    /// Make the named operation answer with a 409.
    pub fn failing_on(mut self, op: &'static str) -> Self {
        self.fail_on = Some(op);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.split(':').next() == Some(op))
            .count()
    }

    pub fn last_write(&self) -> Option<FileWrite> {
        self.writes.lock().unwrap().last().cloned()
    }

    fn record(&self, op: &'static str, detail: String) -> HostingResult<()> {
        self.calls.lock().unwrap().push(format!("{op}:{detail}"));
        if self.fail_on == Some(op) {
            return Err(HostingError::Api {
                status: 409,
                body: format!("{op} rejected"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl HostingApi for RecordingHosting {
    async fn default_branch(&self) -> HostingResult<String> {
        self.record("default_branch", String::new())?;
        Ok("main".into())
    }

    async fn branch_head_sha(&self, branch: &str) -> HostingResult<String> {
        self.record("branch_head_sha", branch.to_string())?;
        Ok("base-sha".into())
    }

    async fn create_branch(&self, name: &str, sha: &str) -> HostingResult<()> {
        self.record("create_branch", format!("{name}@{sha}"))
    }

    async fn file_sha(&self, path: &str, branch: &str) -> HostingResult<Option<String>> {
        self.record("file_sha", format!("{path}@{branch}"))?;
        Ok(self.existing_file.clone())
    }

    async fn put_file(&self, write: FileWrite) -> HostingResult<()> {
        self.record("put_file", format!("{}@{}", write.path, write.branch))?;
        self.writes.lock().unwrap().push(write);
        Ok(())
    }

    async fn create_pull_request(&self, pr: NewPullRequest) -> HostingResult<String> {
        self.record("create_pull_request", format!("{}->{}", pr.head, pr.base))?;
        Ok(Self::PR_URL.to_string())
    }
}
