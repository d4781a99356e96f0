pub mod documents;
pub mod health;
pub mod issues;
pub mod query;

use crate::error::AppError;

/// Fallback for the query functions, which only accept POST.
pub async fn method_not_allowed() -> AppError {
    AppError::method_not_allowed()
}

/// A present, non-blank string field, or 400 naming the field.
pub(crate) fn required(value: Option<String>, field: &'static str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::missing_field(field))
}

/// Same check for the query functions, whose message ends with a period.
pub(crate) fn required_query(value: Option<String>, field: &'static str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::missing_query_field(field))
}
