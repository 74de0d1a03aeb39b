use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use outfit_core::{Language, Location, MessageKey, WeatherQuery};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::error_response;
use crate::server::SharedState;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherParams {
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeatherResponse {
    pub success: bool,
    pub weather: Value,
}

/// `GET /api/weather?city=..` or `?lat=..&lon=..`, with optional `language`.
///
/// Proxies the provider's current-weather payload so its API key stays on the server.
pub async fn current_weather(
    State(state): State<SharedState>,
    params: Result<Query<WeatherParams>, QueryRejection>,
) -> Response {
    let Ok(Query(params)) = params else {
        return error_response(
            StatusCode::BAD_REQUEST,
            MessageKey::MalformedRequest,
            Language::default(),
        );
    };

    let language = match params.language.as_deref() {
        None => Language::default(),
        Some(code) => match Language::try_from(code) {
            Ok(language) => language,
            Err(_) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    MessageKey::InvalidLanguage,
                    Language::default(),
                );
            }
        },
    };

    let Some(location) = location(&params) else {
        return error_response(StatusCode::BAD_REQUEST, MessageKey::EmptyCity, language);
    };

    let Some(provider) = state.weather.as_ref() else {
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            MessageKey::ServiceUnavailable,
            language,
        );
    };

    let query = WeatherQuery { location, language };
    match provider.current_weather(&query).await {
        Ok(weather) => Json(WeatherResponse { success: true, weather }).into_response(),
        Err(err) => {
            tracing::warn!("weather lookup failed: {err:#}");
            error_response(StatusCode::BAD_GATEWAY, MessageKey::WeatherUnavailable, language)
        }
    }
}

/// A non-blank city wins over coordinates; coordinates must be in range.
fn location(params: &WeatherParams) -> Option<Location> {
    if let Some(city) = params.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        return Some(Location::City(city.to_string()));
    }

    match (params.lat, params.lon) {
        (Some(lat), Some(lon)) if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) => {
            Some(Location::Coordinates { lat, lon })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{StubWeather, json_body, state_with_weather as state};
    use serde_json::json;
    use std::sync::Arc;

    fn params(city: Option<&str>, language: Option<&str>) -> WeatherParams {
        WeatherParams {
            city: city.map(str::to_string),
            language: language.map(str::to_string),
            ..WeatherParams::default()
        }
    }

    #[tokio::test]
    async fn passes_provider_payload_through() {
        let stub = Arc::new(StubWeather::default());

        let response = current_weather(
            State(state(Some(stub.clone()))),
            Ok(Query(params(Some(" Ankara "), Some("en")))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["weather"]["name"], json!("Ankara"));

        let seen = stub.seen.lock().unwrap();
        assert_eq!(
            seen.as_slice(),
            &[WeatherQuery { location: Location::City("Ankara".into()), language: Language::En }]
        );
    }

    #[tokio::test]
    async fn blank_city_without_coordinates_is_rejected() {
        let stub = Arc::new(StubWeather::default());

        let response = current_weather(
            State(state(Some(stub.clone()))),
            Ok(Query(params(Some("   "), Some("tr")))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], json!("empty_city"));
        assert!(stub.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_language_is_rejected() {
        let response =
            current_weather(State(state(None)), Ok(Query(params(Some("Izmir"), Some("de"))))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], json!("invalid_language"));
    }

    #[tokio::test]
    async fn missing_provider_is_unavailable() {
        let response =
            current_weather(State(state(None)), Ok(Query(params(Some("Izmir"), None)))).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["code"], json!("service_unavailable"));
    }

    #[tokio::test]
    async fn provider_failure_is_bad_gateway_without_detail() {
        let stub = Arc::new(StubWeather { fail: true, ..StubWeather::default() });

        let response =
            current_weather(State(state(Some(stub))), Ok(Query(params(Some("Nowhere"), None))))
                .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["code"], json!("weather_unavailable"));
        assert!(!body["error"].as_str().unwrap().contains("city not found"));
    }

    #[test]
    fn coordinates_are_used_when_city_missing() {
        let params = WeatherParams { lat: Some(41.0), lon: Some(29.0), ..WeatherParams::default() };
        assert_eq!(location(&params), Some(Location::Coordinates { lat: 41.0, lon: 29.0 }));

        let out_of_range = WeatherParams { lat: Some(95.0), lon: Some(29.0), ..WeatherParams::default() };
        assert_eq!(location(&out_of_range), None);

        let half = WeatherParams { lat: Some(41.0), ..WeatherParams::default() };
        assert_eq!(location(&half), None);
    }
}
