use crate::{Config, model::Language, weather::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::{collections::HashMap, fmt::Debug, sync::Arc};

pub mod openweather;

/// Where to look up the weather.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherQuery {
    pub location: Location,
    pub language: Language,
}

/// Shortest query, in characters, that is sent to the geocoder.
pub const MIN_CITY_QUERY_CHARS: usize = 2;

/// Country listed first when no other is requested.
pub const DEFAULT_PREFERRED_COUNTRY: &str = "TR";

/// A geocoding match offered as a city suggestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub country: String,
    pub full_name: String,
    pub population: u64,
    pub lat: f64,
    pub lon: f64,
}

impl City {
    pub fn new(
        name: String,
        state: Option<String>,
        country: String,
        population: u64,
        lat: f64,
        lon: f64,
    ) -> Self {
        let state = state.filter(|s| !s.trim().is_empty());
        let full_name = match &state {
            Some(state) => format!("{name}, {state}, {country}"),
            None => format!("{name}, {country}"),
        };

        Self { name, state, country, full_name, population, lat, lon }
    }
}

/// Source of current-weather payloads and city suggestions.
///
/// Implementations return the provider's JSON as-is; the recommendation
/// pipeline validates it like any other client input.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, query: &WeatherQuery) -> anyhow::Result<Value>;

    /// Raw geocoding matches for `text`, in provider order.
    async fn find_cities(&self, text: &str) -> anyhow::Result<Vec<City>>;
}

/// City suggestions for a partially typed name.
///
/// Queries shorter than [`MIN_CITY_QUERY_CHARS`] return nothing without
/// contacting the provider. Matches are deduplicated and ranked by
/// [`rank_cities`].
pub async fn search_cities(
    provider: &dyn WeatherProvider,
    text: &str,
    preferred_country: &str,
) -> anyhow::Result<Vec<City>> {
    let text = text.trim();
    if text.chars().count() < MIN_CITY_QUERY_CHARS {
        return Ok(Vec::new());
    }

    let matches = provider.find_cities(text).await?;
    Ok(rank_cities(matches, preferred_country))
}

/// One entry per name and country, keeping the most populous match.
///
/// Entries from `preferred_country` come first, then by population,
/// largest first. Ties keep the order the provider returned them in.
pub fn rank_cities(matches: Vec<City>, preferred_country: &str) -> Vec<City> {
    let mut unique: Vec<City> = Vec::with_capacity(matches.len());
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for city in matches {
        let key = (city.name.clone(), city.country.clone());
        match index.get(&key) {
            Some(&at) => {
                if city.population > unique[at].population {
                    unique[at] = city;
                }
            }
            None => {
                index.insert(key, unique.len());
                unique.push(city);
            }
        }
    }

    unique.sort_by(|a, b| {
        let a_preferred = a.country == preferred_country;
        let b_preferred = b.country == preferred_country;
        b_preferred
            .cmp(&a_preferred)
            .then_with(|| b.population.cmp(&a.population))
    });

    unique
}

/// Construct the weather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.weather_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `outfit configure` or set OPENWEATHER_API_KEY."
        )
    })?;

    Ok(Arc::new(OpenWeatherProvider::new(api_key.to_owned())))
}
