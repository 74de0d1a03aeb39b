use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use outfit_core::{
    City, Language, MessageKey,
    weather::{DEFAULT_PREFERRED_COUNTRY, search_cities},
};
use serde::{Deserialize, Serialize};

use crate::api::error_response;
use crate::server::SharedState;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CityParams {
    pub q: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CitiesResponse {
    pub success: bool,
    pub cities: Vec<City>,
}

/// `GET /api/cities?q=..`, with optional `country` (default `TR`) and `language`.
///
/// Suggestions for a partially typed city name. Fewer than two characters
/// yield an empty list.
pub async fn search(
    State(state): State<SharedState>,
    params: Result<Query<CityParams>, QueryRejection>,
) -> Response {
    let Ok(Query(params)) = params else {
        return error_response(
            StatusCode::BAD_REQUEST,
            MessageKey::MalformedRequest,
            Language::default(),
        );
    };

    let language = Language::for_messages(params.language.as_deref());

    let Some(provider) = state.weather.as_ref() else {
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            MessageKey::ServiceUnavailable,
            language,
        );
    };

    let country = params
        .country
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_uppercase)
        .unwrap_or_else(|| DEFAULT_PREFERRED_COUNTRY.to_string());
    let text = params.q.as_deref().unwrap_or_default();

    match search_cities(&**provider, text, &country).await {
        Ok(cities) => Json(CitiesResponse { success: true, cities }).into_response(),
        Err(err) => {
            tracing::warn!("city search failed: {err:#}");
            error_response(StatusCode::BAD_GATEWAY, MessageKey::WeatherUnavailable, language)
        }
    }
}
