use serde::Deserialize;
use serde_json::Value;

use crate::messages::MessageKey;

/// Gender the recommendation is tailored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub const fn all() -> &'static [Gender] {
        &[Gender::Male, Gender::Female]
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Gender {
    type Error = anyhow::Error;

    /// Exact, case-sensitive match. "Male" or " male" are rejected.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(anyhow::anyhow!(
                "Unknown gender '{value}'. Supported values: male, female."
            )),
        }
    }
}

/// Language of the prompt and of user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    Tr,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Tr => "tr",
            Language::En => "en",
        }
    }

    pub const fn all() -> &'static [Language] {
        &[Language::Tr, Language::En]
    }

    /// Language for error messages when the requested one may be invalid.
    ///
    /// Falls back to Turkish for anything that is not a supported code.
    pub fn for_messages(raw: Option<&str>) -> Self {
        raw.and_then(|code| Language::try_from(code).ok())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Language {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "tr" => Ok(Language::Tr),
            "en" => Ok(Language::En),
            _ => Err(anyhow::anyhow!(
                "Unknown language '{value}'. Supported languages: tr, en."
            )),
        }
    }
}

/// Weather conditions after validation and sanitization.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub condition_description: String,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_ms: f64,
}

/// Input that is safe to interpolate into a prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput {
    pub weather: WeatherSnapshot,
    pub gender: Gender,
    pub language: Language,
}

/// Untrusted request body as received from the client.
///
/// Every field is kept as raw JSON so that shape problems surface as
/// validation errors instead of deserialization failures.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[serde(default)]
    pub weather_data: Option<Value>,
    #[serde(default)]
    pub gender: Option<Value>,
    #[serde(default)]
    pub language: Option<Value>,
}

impl RecommendationRequest {
    pub fn new(weather_data: Value, gender: &str, language: &str) -> Self {
        Self {
            weather_data: Some(weather_data),
            gender: Some(Value::String(gender.to_string())),
            language: Some(Value::String(language.to_string())),
        }
    }

    /// Reads a request from an already-parsed JSON body.
    ///
    /// Only objects are accepted. Serde would otherwise map a three-element
    /// array onto the fields positionally.
    pub fn from_json(body: Value) -> Option<Self> {
        if !body.is_object() {
            return None;
        }
        serde_json::from_value(body).ok()
    }

    /// Raw language code, if the client sent a string.
    pub fn raw_language(&self) -> Option<&str> {
        self.language.as_ref().and_then(Value::as_str)
    }
}

/// Outcome of a recommendation request: exactly one of success or failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationResult {
    Success {
        text: String,
    },
    Failure {
        error_message: String,
        http_status: u16,
        code: MessageKey,
    },
}

impl RecommendationResult {
    pub fn failure(code: MessageKey, http_status: u16, language: Language) -> Self {
        RecommendationResult::Failure {
            error_message: code.text(language).to_string(),
            http_status,
            code,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RecommendationResult::Success { .. })
    }

    pub fn http_status(&self) -> u16 {
        match self {
            RecommendationResult::Success { .. } => 200,
            RecommendationResult::Failure { http_status, .. } => *http_status,
        }
    }
}
