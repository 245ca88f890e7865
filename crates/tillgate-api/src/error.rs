//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps engine errors to HTTP status codes and JSON error bodies with a
//! machine-readable code. Never exposes internal error details in
//! responses.
//!
//! Quota exhaustion (`TRIAL_LIMIT_REACHED`) is an expected steady-state
//! condition: it maps to 409 and is never logged as a server fault.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use tillgate_core::ActivationErrorKind;
use tillgate_engine::EngineError;

/// Structured JSON error response body.
///
/// All error responses use this format. The `details` field carries
/// additional context (e.g. the existing-installations list) for client
/// errors and is omitted for 500-class errors.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "INVALID_FORMAT",
    /// "TRIAL_LIMIT_REACHED").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`].
#[derive(Error, Debug)]
pub enum AppError {
    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Authentication failure — missing or invalid token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A licensing operation was refused by the engine.
    #[error(transparent)]
    Licensing(EngineError),

    /// Internal server error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status and machine-readable code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::Licensing(err) => {
                let kind = err.kind();
                let status = match kind {
                    ActivationErrorKind::InvalidFormat | ActivationErrorKind::InvalidChecksum => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                    ActivationErrorKind::SnNotFound => StatusCode::NOT_FOUND,
                    ActivationErrorKind::MaxInstallationsReached
                    | ActivationErrorKind::TrialLimitReached => StatusCode::CONFLICT,
                    ActivationErrorKind::ActivationFailed => StatusCode::BAD_REQUEST,
                };
                (status, kind.as_str())
            }
        }
    }

    /// Additional detail payload for client errors.
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::Licensing(EngineError::MaxInstallationsReached { installations })
                if !installations.is_empty() =>
            {
                Some(serde_json::json!({ "installations": installations }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        // Log internal errors for operator visibility. Quota and
        // validation rejections are expected traffic, not faults.
        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let details = self.details();
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Convert engine errors, routing storage faults to the internal bucket
/// so their messages never reach clients.
impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Storage(inner) => Self::Internal(inner.to_string()),
            other => Self::Licensing(other),
        }
    }
}
