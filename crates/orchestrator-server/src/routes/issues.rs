use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use orchestrator_core::types::PushRequest;
use serde_json::json;

use super::required;
use crate::error::AppError;
use crate::state::AppState;

// Bodies are taken as `Result<Json<_>, _>` so that a body that does not
// parse is reported like a missing field instead of axum's plain-text 4xx.

#[derive(serde::Deserialize)]
pub struct IssueBody {
    #[serde(default)]
    issue: Option<String>,
}

#[derive(serde::Deserialize)]
pub struct SuggestionBody {
    #[serde(default)]
    suggestion: Option<String>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeDiffBody {
    #[serde(default)]
    code_diff: Option<String>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushChangesBody {
    #[serde(default)]
    code_diff: Option<String>,
    #[serde(default)]
    branch_name: Option<String>,
    #[serde(default)]
    commit_message: Option<String>,
}

/// POST /processIssue: suggest an improvement for an issue.
pub async fn process_issue(
    State(app): State<AppState>,
    body: Result<Json<IssueBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let issue = required(body.ok().and_then(|Json(b)| b.issue), "issue")?;
    let suggestion = app.orchestrator().analyze_issue(&issue).await?;
    Ok(Json(json!({ "suggestion": suggestion.text })))
}

/// POST /generateCode: turn a suggestion into a code diff.
pub async fn generate_code(
    State(app): State<AppState>,
    body: Result<Json<SuggestionBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let suggestion = required(body.ok().and_then(|Json(b)| b.suggestion), "suggestion")?;
    let diff = app.orchestrator().generate_code_diff(&suggestion).await?;
    Ok(Json(json!({ "codeDiff": diff.text })))
}

/// POST /reviewCode: review a code diff.
pub async fn review_code(
    State(app): State<AppState>,
    body: Result<Json<CodeDiffBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let code_diff = required(body.ok().and_then(|Json(b)| b.code_diff), "codeDiff")?;
    let review = app.orchestrator().review_code_diff(&code_diff).await?;
    Ok(Json(json!({ "review": review.text })))
}

/// POST /pushChanges: publish a code diff on a new branch and open a PR.
pub async fn push_changes(
    State(app): State<AppState>,
    body: Result<Json<PushChangesBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(body) = body.map_err(|_| AppError::missing_field("codeDiff"))?;
    let code_diff = required(body.code_diff, "codeDiff")?;
    let pr = app
        .orchestrator()
        .push_changes(PushRequest {
            code_diff,
            branch_name: body.branch_name,
            commit_message: body.commit_message,
        })
        .await?;
    Ok(Json(json!({ "prUrl": pr.url })))
}

/// POST /automateIssue: analyze, generate, review and, when approved,
/// publish in one call.
pub async fn automate_issue(
    State(app): State<AppState>,
    body: Result<Json<IssueBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let issue = required(body.ok().and_then(|Json(b)| b.issue), "issue")?;
    let outcome = app.orchestrator().automate(&issue).await?;

    let mut response = json!({
        "suggestion": outcome.suggestion.text,
        "codeDiff": outcome.code_diff.text,
        "review": outcome.review.text,
    });
    if let Some(message) = outcome.message() {
        response["message"] = json!(message);
    }
    if let Some(pr) = outcome.pull_request {
        response["prUrl"] = json!(pr.url);
    }
    Ok(Json(response))
}
