use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use orchestrator_core::query;
use serde_json::json;

use super::required_query;
use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct QueryBody {
    #[serde(default)]
    user_query: Option<String>,
}

/// POST /.netlify/functions/query-ai: public business assistant backed by the
/// knowledge base. Inference API errors keep their upstream status.
pub async fn query_ai(
    State(app): State<AppState>,
    body: Result<Json<QueryBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let question = required_query(body.ok().and_then(|Json(b)| b.user_query), "user_query")?;
    let generator = app.public_generator().map_err(AppError::forward_upstream)?;

    let knowledge_base = app.knowledge_base.text().await;
    let prompt = query::public_prompt(&knowledge_base, &question);
    let reply = query::answer(
        &generator,
        &prompt,
        query::PUBLIC_FALLBACK,
        &app.public_cleanup,
    )
    .await
    .map_err(AppError::forward_upstream)?;

    Ok(Json(json!({ "aiReply": reply })))
}

/// POST /.netlify/functions/query-ai-secure: proposal assistant. Sits behind
/// [`crate::auth::require_authorization`].
pub async fn query_ai_secure(
    State(app): State<AppState>,
    body: Result<Json<QueryBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let question = required_query(body.ok().and_then(|Json(b)| b.user_query), "user_query")?;
    let generator = app.secure_generator()?;

    let documents = app.reference_documents.text().await;
    let prompt = query::secure_prompt(&documents, &question);
    let reply = query::answer(
        &generator,
        &prompt,
        query::SECURE_FALLBACK,
        &app.secure_cleanup,
    )
    .await?;

    Ok(Json(json!({ "aiReply": reply })))
}
