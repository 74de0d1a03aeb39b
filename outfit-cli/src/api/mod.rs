//! HTTP handlers. Every response is a JSON envelope carrying a `success` flag.

pub mod cities;
pub mod recommendation;
pub mod weather;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use outfit_core::{Language, MessageKey};
use serde::Serialize;

/// Shared error envelope used by all endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: MessageKey,
}

impl ErrorResponse {
    pub fn new(code: MessageKey, error: impl Into<String>) -> Self {
        Self { success: false, error: error.into(), code }
    }
}

pub fn error_response(status: StatusCode, code: MessageKey, language: Language) -> Response {
    (status, Json(ErrorResponse::new(code, code.text(language)))).into_response()
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
