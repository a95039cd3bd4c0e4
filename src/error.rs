use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::validation::{ValidationError, ValidationErrors};

/// Every failure that can reach the request boundary, one variant per kind.
/// `into_response` is the single place that decides client-visible wording,
/// status and log severity.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body could not be parsed into the expected shape.
    #[error("malformed request body: {0}")]
    MalformedInput(String),

    /// The domain validation accumulator came back non-empty.
    #[error("validation failed")]
    Validation(ValidationErrors),

    /// Referenced identifier does not exist in storage.
    #[error("Id = {0} Lecture Not Found")]
    NotFound(i64),

    /// Credential check failed. Re-signaled for the security layer to
    /// format; this core does not own the response body.
    #[error("unauthorized")]
    Unauthorized,

    /// Authorization check failed. Re-signaled like `Unauthorized`.
    #[error("forbidden")]
    Forbidden,

    /// A business-rule failure raised mid-operation, carrying its own
    /// status. The message is intentional and safe for the client.
    #[error("{message}")]
    Domain { status: StatusCode, message: String },

    /// Storage fault. Full detail goes to the log only.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Anything unanticipated. Full detail goes to the log only.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Uniform client-facing error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'static str>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
}

impl ErrorResponse {
    fn new(status: StatusCode, message: String, category: Option<&'static str>) -> Self {
        Self {
            message,
            status: status.as_u16(),
            category,
            timestamp: Utc::now(),
            errors: Vec::new(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::MalformedInput(detail) => {
                let status = StatusCode::BAD_REQUEST;
                (status, ErrorResponse::new(status, detail, Some("BadRequest")))
            }
            AppError::Validation(errors) => {
                let status = StatusCode::BAD_REQUEST;
                let mut body = ErrorResponse::new(
                    status,
                    "validation failed".to_string(),
                    Some("Validation"),
                );
                body.errors = errors.entries().to_vec();
                (status, body)
            }
            AppError::NotFound(id) => {
                let status = StatusCode::NOT_FOUND;
                let message = format!("Id = {id} Lecture Not Found");
                (status, ErrorResponse::new(status, message, Some("Generic")))
            }
            // 401/403 belong to the security layer; emit the bare status
            // and let it shape the body.
            AppError::Unauthorized => return StatusCode::UNAUTHORIZED.into_response(),
            AppError::Forbidden => return StatusCode::FORBIDDEN.into_response(),
            AppError::Domain { status, message } => {
                (status, ErrorResponse::new(status, message, Some("Generic")))
            }
            AppError::Database(e) => {
                error!("database error: {e}");
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                (
                    status,
                    ErrorResponse::new(
                        status,
                        "Database error occurred".to_string(),
                        Some("System"),
                    ),
                )
            }
            AppError::Internal(detail) => {
                error!("unexpected error: {detail}");
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                (
                    status,
                    ErrorResponse::new(
                        status,
                        "An unexpected problem occurred. Please contact the administrator."
                            .to_string(),
                        Some("Unknown"),
                    ),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn every_kind_maps_to_its_status_class() {
        assert_eq!(
            status_of(AppError::MalformedInput("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Validation(ValidationErrors::new())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(AppError::NotFound(7)), StatusCode::NOT_FOUND);
        assert_eq!(status_of(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AppError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(AppError::Domain {
                status: StatusCode::CONFLICT,
                message: "seat already taken".into(),
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Database(sqlx::Error::PoolClosed)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AppError::Internal("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_the_id() {
        assert_eq!(AppError::NotFound(42).to_string(), "Id = 42 Lecture Not Found");
    }

    #[test]
    fn domain_message_passes_through_verbatim() {
        let err = AppError::Domain {
            status: StatusCode::CONFLICT,
            message: "seat already taken".into(),
        };
        assert_eq!(err.to_string(), "seat already taken");
    }

    #[tokio::test]
    async fn system_and_unknown_payloads_never_leak_detail() {
        use http_body_util::BodyExt;

        for err in [
            AppError::Database(sqlx::Error::Protocol("secret dsn detail".into())),
            AppError::Internal("stack: secret frame".into()),
        ] {
            let response = err.into_response();
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            let body = String::from_utf8(bytes.to_vec()).unwrap();
            assert!(!body.contains("secret"), "leaked internal detail: {body}");
        }
    }
}
