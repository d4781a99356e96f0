use axum::{
    extract::Request,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use orchestrator_core::error::OrchestratorError;

use crate::error::AppError;

/// Axum middleware for the secure assistant: the request must carry a
/// non-empty `Authorization` header.
///
/// Only presence is checked. The header value is not verified here; the
/// deployment in front of this service is expected to do that.
pub async fn require_authorization(req: Request, next: Next) -> Response {
    let present = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| !v.trim().is_empty());

    if !present {
        tracing::debug!(path = %req.uri().path(), "rejected request without authorization");
        return AppError(OrchestratorError::Unauthorized.into()).into_response();
    }
    next.run(req).await
}
