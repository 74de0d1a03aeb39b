use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{City, Location, WeatherProvider, WeatherQuery};
use crate::http::truncate_body;

const CURRENT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const GEOCODING_URL: &str = "https://api.openweathermap.org/geo/1.0/direct";
const GEOCODING_LIMIT: u8 = 10;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: Client::new(),
        }
    }

    fn query_params(&self, query: &WeatherQuery) -> Vec<(&'static str, String)> {
        let mut params = match &query.location {
            Location::City(city) => vec![("q", city.trim().to_string())],
            Location::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        };

        params.extend([
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
            ("lang", query.language.as_str().to_string()),
        ]);

        params
    }

    fn geocoding_params(&self, text: &str) -> Vec<(&'static str, String)> {
        vec![
            ("q", text.to_string()),
            ("limit", GEOCODING_LIMIT.to_string()),
            ("appid", self.api_key.clone()),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct GeoMatch {
    name: String,
    #[serde(default)]
    state: Option<String>,
    country: String,
    #[serde(default)]
    population: Option<u64>,
    lat: f64,
    lon: f64,
}

impl From<GeoMatch> for City {
    fn from(m: GeoMatch) -> Self {
        City::new(m.name, m.state, m.country, m.population.unwrap_or(0), m.lat, m.lon)
    }
}

fn parse_geocoding(body: &str) -> Result<Vec<City>> {
    let matches: Vec<GeoMatch> =
        serde_json::from_str(body).context("Failed to parse OpenWeather geocoding JSON")?;

    Ok(matches.into_iter().map(City::from).collect())
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, query: &WeatherQuery) -> Result<Value> {
        debug!(location = ?query.location, language = %query.language, "fetching current weather");

        let res = self
            .http
            .get(CURRENT_WEATHER_URL)
            .query(&self.query_params(query))
            .send()
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather current request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: Value =
            serde_json::from_str(&body).context("Failed to parse OpenWeather current JSON")?;

        if !parsed.is_object() {
            return Err(anyhow!("OpenWeather current response is not a JSON object"));
        }

        Ok(parsed)
    }

    async fn find_cities(&self, text: &str) -> Result<Vec<City>> {
        debug!(query = %text, "searching cities");

        let res = self
            .http
            .get(GEOCODING_URL)
            .query(&self.geocoding_params(text))
            .send()
            .await
            .context("Failed to send request to OpenWeather (geocoding)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather geocoding response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather geocoding request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        parse_geocoding(&body)
    }
}
