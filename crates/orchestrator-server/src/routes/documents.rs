use axum::extract::State;
use axum::Json;

use crate::state::AppState;

/// DELETE /api/documents/cache: drop the cached knowledge base and reference
/// documents so the next query reloads them.
pub async fn invalidate_cache(State(app): State<AppState>) -> Json<serde_json::Value> {
    app.knowledge_base.invalidate().await;
    app.reference_documents.invalidate().await;
    tracing::info!("document caches invalidated");
    Json(serde_json::json!({ "ok": true }))
}
