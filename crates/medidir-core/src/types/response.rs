//! Error response body and the `AppError` to HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorKind {
    /// HTTP status and machine-readable code for this kind.
    pub fn status(self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Authentication => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Authorization => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Serialization => (StatusCode::BAD_REQUEST, "INVALID_BODY"),
            Self::Database | Self::Internal | Self::Configuration => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.kind.status();

        // Storage and internal causes are logged, never returned.
        let message = if status.is_server_error() {
            tracing::error!(
                kind = %self.kind,
                error = %self.message,
                source = ?self.source,
                "Request failed"
            );
            "Internal server error".to_string()
        } else {
            self.message
        };

        let body = ApiErrorResponse {
            error: code.to_string(),
            message,
            details: self.details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_status_mapping() {
        assert_eq!(ErrorKind::NotFound.status().0, StatusCode::NOT_FOUND);
        assert_eq!(ErrorKind::Validation.status().0, StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::Conflict.status().0, StatusCode::CONFLICT);
        assert_eq!(ErrorKind::Authentication.status().0, StatusCode::UNAUTHORIZED);
        assert_eq!(
            ErrorKind::Database.status().0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_database_error_hides_message() {
        let response = AppError::database("relation \"cities\" does not exist").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
