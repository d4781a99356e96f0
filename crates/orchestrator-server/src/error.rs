use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use orchestrator_core::error::OrchestratorError;

// ---------------------------------------------------------------------------
// Internal sentinel for explicit statuses
// ---------------------------------------------------------------------------

/// Private sentinel error type used to carry an explicit HTTP status through
/// the `anyhow::Error` chain without adding variants to `OrchestratorError`.
#[derive(Debug)]
struct StatusError {
    status: StatusCode,
    message: String,
}

impl std::fmt::Display for StatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StatusError {}

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses. The body is always
/// `{"error": "<message>"}`.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request for a missing or empty body field.
    pub fn missing_field(field: &'static str) -> Self {
        Self(OrchestratorError::MissingField(field).into())
    }

    /// 400 in the wording the chat widget's query functions use.
    pub fn missing_query_field(field: &'static str) -> Self {
        Self::with_status(
            StatusCode::BAD_REQUEST,
            format!("Missing '{field}' in request body."),
        )
    }

    pub fn method_not_allowed() -> Self {
        Self::with_status(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed. Use POST.")
    }

    pub fn with_status(status: StatusCode, msg: impl Into<String>) -> Self {
        Self(
            StatusError {
                status,
                message: msg.into(),
            }
            .into(),
        )
    }

    /// Like `From`, but an upstream API error keeps the status the upstream
    /// answered with instead of becoming a 500.
    pub fn forward_upstream(err: OrchestratorError) -> Self {
        let status = match &err {
            OrchestratorError::Llm(e) => e.upstream_status(),
            _ => None,
        }
        .and_then(|s| StatusCode::from_u16(s).ok());
        match status {
            Some(status) => Self::with_status(status, err.to_string()),
            None => Self(err.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(s) = self.0.downcast_ref::<StatusError>() {
            s.status
        } else if let Some(e) = self.0.downcast_ref::<OrchestratorError>() {
            match e {
                OrchestratorError::MissingField(_) => StatusCode::BAD_REQUEST,
                OrchestratorError::Unauthorized => StatusCode::UNAUTHORIZED,
                OrchestratorError::MissingConfig(_)
                | OrchestratorError::InvalidConfig(_)
                | OrchestratorError::Llm(_)
                | OrchestratorError::Hosting(_)
                | OrchestratorError::Io(_)
                | OrchestratorError::Yaml(_)
                | OrchestratorError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{:#}", self.0);
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
