use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use outfit_core::{Language, MessageKey, RecommendationRequest, RecommendationResult};
use serde::Serialize;
use serde_json::Value;

use crate::api::{ErrorResponse, error_response};
use crate::server::SharedState;

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub success: bool,
    pub recommendation: String,
}

/// `POST /api/recommendation`
///
/// Body: `{ weatherData, gender, language }`. Returns 200 with the
/// recommendation, 400 for invalid input, 500 for configuration or model failures.
pub async fn recommend(
    State(state): State<SharedState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::info!("unreadable recommendation body: {rejection}");
            return malformed_request();
        }
    };
    let Some(request) = RecommendationRequest::from_json(body) else {
        tracing::info!("recommendation body is not a JSON object");
        return malformed_request();
    };

    match state.recommendations.get_recommendation(&request).await {
        RecommendationResult::Success { text } => (
            StatusCode::OK,
            Json(RecommendationResponse { success: true, recommendation: text }),
        )
            .into_response(),
        RecommendationResult::Failure { error_message, http_status, code } => {
            let status =
                StatusCode::from_u16(http_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(ErrorResponse::new(code, error_message))).into_response()
        }
    }
}

fn malformed_request() -> Response {
    error_response(StatusCode::BAD_REQUEST, MessageKey::MalformedRequest, Language::default())
}
