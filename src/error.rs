// src/error.rs

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::repositories::StoreError;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
/// Every variant carries a stable error code alongside a human-readable message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // 400 Bad Request: structurally invalid input
    #[error("{0}")]
    Validation(String),

    // 401 Unauthorized
    #[error("{0}")]
    AuthError(String),

    // 403 Forbidden: wrong role or not the resource owner
    #[error("{0}")]
    Forbidden(String),

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 409 Conflict (e.g., duplicate email)
    #[error("{0}")]
    Conflict(String),

    // 409 Conflict: an attempt for this exam already exists
    #[error("Exam already started")]
    AlreadyStarted,

    // 409 Conflict: the attempt has already been submitted
    #[error("Exam already submitted")]
    AlreadySubmitted,

    // 500 Internal Server Error
    #[error("{0}")]
    InternalServerError(String),
}

impl AppError {
    /// Stable machine-readable error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::AuthError(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::AlreadyStarted => "ALREADY_STARTED",
            AppError::AlreadySubmitted => "ALREADY_SUBMITTED",
            AppError::InternalServerError(_) => "SERVER_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::AlreadyStarted | AppError::AlreadySubmitted => {
                StatusCode::CONFLICT
            }
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
/// Internal details are logged, never returned to the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let error_message = match &self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

/// Allows using `?` on repository calls.
/// Context-specific conflicts (e.g. `AlreadyStarted`) are mapped by the caller first.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists => AppError::Conflict("Record already exists".to_string()),
            StoreError::AlreadySubmitted => AppError::AlreadySubmitted,
            StoreError::NotFound => AppError::NotFound("Record not found".to_string()),
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected JSON body: {}", rejection.body_text());
        let message = match rejection {
            JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON",
            JsonRejection::JsonDataError(_) => "Request body has missing or mistyped fields",
            JsonRejection::MissingJsonContentType(_) => "Expected a JSON request body",
            _ => "Invalid request body",
        };
        AppError::Validation(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicts_share_status_but_keep_distinct_codes() {
        assert_eq!(AppError::AlreadyStarted.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::AlreadySubmitted.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::AlreadyStarted.code(), "ALREADY_STARTED");
        assert_eq!(AppError::AlreadySubmitted.code(), "ALREADY_SUBMITTED");
    }

    #[test]
    fn store_conflicts_map_to_domain_errors() {
        assert!(matches!(
            AppError::from(StoreError::AlreadySubmitted),
            AppError::AlreadySubmitted
        ));
        assert!(matches!(
            AppError::from(StoreError::AlreadyExists),
            AppError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn server_errors_hide_details() {
        let response = AppError::InternalServerError("connection reset by peer".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Internal Server Error");
        assert_eq!(body["code"], "SERVER_ERROR");
    }
}
