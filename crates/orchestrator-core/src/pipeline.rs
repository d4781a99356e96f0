//! The issue → suggestion → diff → review → pull request workflow.
//!
//! Every step is a single awaited call; the first error aborts the run.
//! Nothing is retried and nothing already created upstream is rolled back,
//! so a failure after branch creation leaves that branch behind.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use llm_client::CompletionApi;
use tracing::{info, info_span, Instrument};

use crate::error::{OrchestratorError, Result};
use crate::hosting::{FileWrite, HostingApi, NewPullRequest};
use crate::prompts;
use crate::types::{AutomationOutcome, CodeDiff, PullRequestRef, PushRequest, Review, Suggestion};

pub const DEFAULT_COMMIT_MESSAGE: &str = "Automated update: proposed code changes";

/// Where and how an approved change is published.
#[derive(Debug, Clone)]
pub struct PublishSettings {
    pub file_path: String,
    pub pull_request_body: String,
}

impl From<&crate::config::GitHubConfig> for PublishSettings {
    fn from(cfg: &crate::config::GitHubConfig) -> Self {
        Self {
            file_path: cfg.proposal_path.clone(),
            pull_request_body: cfg.pull_request_body.clone(),
        }
    }
}

pub struct Orchestrator {
    completion: Arc<dyn CompletionApi>,
    hosting: Arc<dyn HostingApi>,
    publish: PublishSettings,
}

impl Orchestrator {
    pub fn new(
        completion: Arc<dyn CompletionApi>,
        hosting: Arc<dyn HostingApi>,
        publish: PublishSettings,
    ) -> Self {
        Self {
            completion,
            hosting,
            publish,
        }
    }

    pub async fn analyze_issue(&self, issue: &str) -> Result<Suggestion> {
        let text = self.completion.complete(prompts::analyze_issue(issue)).await?;
        Ok(Suggestion { text })
    }

    pub async fn generate_code_diff(&self, suggestion: &str) -> Result<CodeDiff> {
        let text = self
            .completion
            .complete(prompts::generate_code_diff(suggestion))
            .await?;
        Ok(CodeDiff { text })
    }

    pub async fn review_code_diff(&self, code_diff: &str) -> Result<Review> {
        let text = self
            .completion
            .complete(prompts::review_code_diff(code_diff))
            .await?;
        Ok(Review::from_text(text))
    }

    /// Publish `code_diff` on a new branch and open a pull request against
    /// the default branch.
    pub async fn push_changes(&self, request: PushRequest) -> Result<PullRequestRef> {
        let hosting = &self.hosting;

        let base = hosting.default_branch().await?;
        let base_sha = hosting.branch_head_sha(&base).await?;

        let branch = request
            .branch_name
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(timestamp_branch_name);
        hosting.create_branch(&branch, &base_sha).await?;
        info!(%branch, %base, "branch created");

        let message = request
            .commit_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COMMIT_MESSAGE.to_string());
        let existing = hosting.file_sha(&self.publish.file_path, &branch).await?;
        hosting
            .put_file(FileWrite {
                path: self.publish.file_path.clone(),
                branch: branch.clone(),
                message: message.clone(),
                content_base64: BASE64.encode(request.code_diff.as_bytes()),
                sha: existing,
            })
            .await?;

        let url = hosting
            .create_pull_request(NewPullRequest {
                title: message,
                head: branch.clone(),
                base,
                body: self.publish.pull_request_body.clone(),
            })
            .await?;
        info!(%url, "pull request opened");

        Ok(PullRequestRef { url, branch })
    }

    /// Run the whole workflow for one issue. A pull request is opened only
    /// when the review verdict is [`Approved`](crate::types::ReviewVerdict::Approved).
    pub async fn automate(&self, issue: &str) -> Result<AutomationOutcome> {
        let run_id = uuid::Uuid::new_v4();
        async move {
            let suggestion = self.analyze_issue(issue).await?;
            info!(suggestion = %suggestion.text, "suggestion ready");

            let code_diff = self.generate_code_diff(&suggestion.text).await?;
            info!(code_diff = %code_diff.text, "code diff ready");

            let review = self.review_code_diff(&code_diff.text).await?;
            info!(review = %review.text, approved = review.verdict.is_approved(), "review ready");

            let pull_request = if review.verdict.is_approved() {
                let pr = self
                    .push_changes(PushRequest {
                        code_diff: code_diff.text.clone(),
                        branch_name: None,
                        commit_message: Some(format!("Auto-update for issue: {issue}")),
                    })
                    .await?;
                Some(pr)
            } else {
                info!("review did not approve; leaving for manual review");
                None
            };

            Ok::<_, OrchestratorError>(AutomationOutcome {
                suggestion,
                code_diff,
                review,
                pull_request,
            })
        }
        .instrument(info_span!("automate", %run_id))
        .await
    }
}

fn timestamp_branch_name() -> String {
    format!("auto-update-{}", chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HostingError;
    use crate::fakes::{FakeCompletion, RecordingHosting};
    use crate::types::ReviewVerdict;

    fn settings() -> PublishSettings {
        PublishSettings {
            file_path: "proposed_changes.txt".into(),
            pull_request_body: "body".into(),
        }
    }

    fn orchestrator(
        completion: &Arc<FakeCompletion>,
        hosting: &Arc<RecordingHosting>,
    ) -> Orchestrator {
        Orchestrator::new(completion.clone(), hosting.clone(), settings())
    }

    #[tokio::test]
    async fn approved_review_publishes_in_order() {
        let completion = Arc::new(FakeCompletion::replies([
            "Use a darker navy header.",
            "header { color: navy; }",
            "APPROVED",
        ]));
        let hosting = Arc::new(RecordingHosting::new());
        let outcome = orchestrator(&completion, &hosting)
            .automate("The header color is too dull")
            .await
            .unwrap();

        assert_eq!(outcome.suggestion.text, "Use a darker navy header.");
        assert_eq!(outcome.review.verdict, ReviewVerdict::Approved);
        let pr = outcome.pull_request.expect("pull request");
        assert_eq!(pr.url, RecordingHosting::PR_URL);
        assert!(pr.branch.starts_with("auto-update-"));

        let calls = hosting.calls();
        let names: Vec<&str> = calls.iter().map(|c| c.split(':').next().unwrap()).collect();
        assert_eq!(
            names,
            vec![
                "default_branch",
                "branch_head_sha",
                "create_branch",
                "file_sha",
                "put_file",
                "create_pull_request"
            ]
        );
        assert_eq!(hosting.count("create_branch"), 1);
        assert_eq!(hosting.count("put_file"), 1);
        assert_eq!(hosting.count("create_pull_request"), 1);

        let write = hosting.last_write().unwrap();
        assert_eq!(write.content_base64, BASE64.encode("header { color: navy; }"));
        assert_eq!(
            write.message,
            "Auto-update for issue: The header color is too dull"
        );
        assert_eq!(completion.prompts().len(), 3);
    }

    #[tokio::test]
    async fn rejected_review_publishes_nothing() {
        let completion = Arc::new(FakeCompletion::replies([
            "s",
            "d",
            "1. Missing alt text",
        ]));
        let hosting = Arc::new(RecordingHosting::new());
        let outcome = orchestrator(&completion, &hosting)
            .automate("issue")
            .await
            .unwrap();

        assert!(outcome.pull_request.is_none());
        assert!(outcome.message().is_some());
        assert_eq!(
            outcome.review.verdict,
            ReviewVerdict::NeedsRevision(vec!["Missing alt text".into()])
        );
        assert!(hosting.calls().is_empty());
    }

    #[tokio::test]
    async fn review_input_is_generated_diff() {
        let completion = Arc::new(FakeCompletion::replies(["s", "the diff", "nope"]));
        let hosting = Arc::new(RecordingHosting::new());
        orchestrator(&completion, &hosting)
            .automate("issue")
            .await
            .unwrap();

        let prompts = completion.prompts();
        assert!(prompts[1].contains("Suggestion: \"s\""));
        assert!(prompts[2].contains("Code Diff:\nthe diff\nReview:"));
    }

    #[tokio::test]
    async fn completion_failure_aborts_before_review() {
        let completion = Arc::new(FakeCompletion::replies(["s"]));
        let hosting = Arc::new(RecordingHosting::new());
        let err = orchestrator(&completion, &hosting)
            .automate("issue")
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::Llm(_)));
        assert_eq!(completion.prompts().len(), 2);
        assert!(hosting.calls().is_empty());
    }

    #[tokio::test]
    async fn push_uses_caller_branch_and_existing_sha() {
        let completion = Arc::new(FakeCompletion::replies(Vec::<&str>::new()));
        let hosting = Arc::new(RecordingHosting::new().with_existing_file("blob-1"));
        let pr = orchestrator(&completion, &hosting)
            .push_changes(PushRequest {
                code_diff: "diff".into(),
                branch_name: Some("fix/header".into()),
                commit_message: None,
            })
            .await
            .unwrap();

        assert_eq!(pr.branch, "fix/header");
        let write = hosting.last_write().unwrap();
        assert_eq!(write.sha.as_deref(), Some("blob-1"));
        assert_eq!(write.branch, "fix/header");
        assert_eq!(write.message, DEFAULT_COMMIT_MESSAGE);
        assert!(hosting
            .calls()
            .contains(&"create_pull_request:fix/header->main".to_string()));
    }

    #[tokio::test]
    async fn failure_after_branch_creation_leaves_branch() {
        let completion = Arc::new(FakeCompletion::replies(Vec::<&str>::new()));
        let hosting = Arc::new(RecordingHosting::new().failing_on("put_file"));
        let err = orchestrator(&completion, &hosting)
            .push_changes(PushRequest {
                code_diff: "diff".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            OrchestratorError::Hosting(HostingError::Api { status: 409, .. })
        ));
        assert_eq!(hosting.count("create_branch"), 1);
        assert_eq!(hosting.count("create_pull_request"), 0);
    }
}
