//! HTTP-facing error type.
//!
//! Upstream and auth failures map to 502, rendering failures to 500, and bad
//! input to 400. Bodies are always `{"error": {"code", "message"}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rollbook_core::{FetchError, RenderError};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error(transparent)]
    Upstream(#[from] FetchError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::Upstream(e) => {
                warn!(error = %e, auth_failure = e.is_auth_failure(), "Upstream request failed");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", e.to_string())
            }
            AppError::Render(e) => {
                error!(error = %e, "Report rendering failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "REPORT_RENDER_FAILED",
                    "PDF generation failed".into(),
                )
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}
