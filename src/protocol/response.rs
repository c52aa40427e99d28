//! Response definitions
//!
//! Error bodies and status mapping for HTTP clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::StrataError;

/// Body sent with every error status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub tables: usize,
    pub next_lsn: u64,
}

/// Engine error on its way out as an HTTP response
#[derive(Debug)]
pub struct ApiError(pub StrataError);

impl From<StrataError> for ApiError {
    fn from(err: StrataError) -> Self {
        ApiError(err)
    }
}

/// HTTP status for an engine error
pub fn status_for(err: &StrataError) -> StatusCode {
    match err {
        StrataError::TableNotFound(_) => StatusCode::NOT_FOUND,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::error!("request failed: {}", self.0);
        }

        let body = Json(ErrorResponse {
            status: status.as_u16(),
            message: self.0.to_string(),
        });
        (status, body).into_response()
    }
}
