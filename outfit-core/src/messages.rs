//! User-facing message keys and their localized texts.

use serde::Serialize;

use crate::model::Language;

/// Stable identifier of a user-facing message.
///
/// Clients receive both the key and the localized text, never raw error detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKey {
    MissingWeatherData,
    MissingLocationName,
    MissingCondition,
    InvalidTemperature,
    InvalidHumidity,
    InvalidWindSpeed,
    InvalidGender,
    InvalidLanguage,
    MalformedRequest,
    ServiceUnavailable,
    RecommendationFailed,
    EmptyCity,
    WeatherUnavailable,
}

impl MessageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::MissingWeatherData => "missing_weather_data",
            MessageKey::MissingLocationName => "missing_location_name",
            MessageKey::MissingCondition => "missing_condition",
            MessageKey::InvalidTemperature => "invalid_temperature",
            MessageKey::InvalidHumidity => "invalid_humidity",
            MessageKey::InvalidWindSpeed => "invalid_wind_speed",
            MessageKey::InvalidGender => "invalid_gender",
            MessageKey::InvalidLanguage => "invalid_language",
            MessageKey::MalformedRequest => "malformed_request",
            MessageKey::ServiceUnavailable => "service_unavailable",
            MessageKey::RecommendationFailed => "recommendation_failed",
            MessageKey::EmptyCity => "empty_city",
            MessageKey::WeatherUnavailable => "weather_unavailable",
        }
    }

    pub const fn all() -> &'static [MessageKey] {
        &[
            MessageKey::MissingWeatherData,
            MessageKey::MissingLocationName,
            MessageKey::MissingCondition,
            MessageKey::InvalidTemperature,
            MessageKey::InvalidHumidity,
            MessageKey::InvalidWindSpeed,
            MessageKey::InvalidGender,
            MessageKey::InvalidLanguage,
            MessageKey::MalformedRequest,
            MessageKey::ServiceUnavailable,
            MessageKey::RecommendationFailed,
            MessageKey::EmptyCity,
            MessageKey::WeatherUnavailable,
        ]
    }

    pub fn text(&self, language: Language) -> &'static str {
        match language {
            Language::Tr => self.text_tr(),
            Language::En => self.text_en(),
        }
    }

    fn text_en(&self) -> &'static str {
        match self {
            MessageKey::MissingWeatherData => "Missing weather data.",
            MessageKey::MissingLocationName => "The weather data has no location name.",
            MessageKey::MissingCondition => "The weather data has no weather description.",
            MessageKey::InvalidTemperature => "The temperature must be a number within a plausible range.",
            MessageKey::InvalidHumidity => "The humidity must be a number between 0 and 100.",
            MessageKey::InvalidWindSpeed => "The wind speed must be a number within a plausible range.",
            MessageKey::InvalidGender => "Please select a valid gender.",
            MessageKey::InvalidLanguage => "Unsupported language.",
            MessageKey::MalformedRequest => "The request body could not be read.",
            MessageKey::ServiceUnavailable => "The recommendation service is currently unavailable.",
            MessageKey::RecommendationFailed => {
                "An error occurred while getting clothing recommendations."
            }
            MessageKey::EmptyCity => "Please enter a city name.",
            MessageKey::WeatherUnavailable => "Weather information could not be retrieved.",
        }
    }

    fn text_tr(&self) -> &'static str {
        match self {
            MessageKey::MissingWeatherData => "Hava durumu bilgisi eksik.",
            MessageKey::MissingLocationName => "Hava durumu bilgisinde şehir adı yok.",
            MessageKey::MissingCondition => "Hava durumu bilgisinde hava açıklaması yok.",
            MessageKey::InvalidTemperature => "Sıcaklık makul aralıkta bir sayı olmalıdır.",
            MessageKey::InvalidHumidity => "Nem oranı 0 ile 100 arasında bir sayı olmalıdır.",
            MessageKey::InvalidWindSpeed => "Rüzgar hızı makul aralıkta bir sayı olmalıdır.",
            MessageKey::InvalidGender => "Lütfen geçerli bir cinsiyet seçin.",
            MessageKey::InvalidLanguage => "Desteklenmeyen dil.",
            MessageKey::MalformedRequest => "İstek gövdesi okunamadı.",
            MessageKey::ServiceUnavailable => "Öneri servisi şu anda kullanılamıyor.",
            MessageKey::RecommendationFailed => "Giyim önerisi alınırken bir hata oluştu.",
            MessageKey::EmptyCity => "Lütfen bir şehir adı girin.",
            MessageKey::WeatherUnavailable => "Hava durumu bilgisi alınamadı.",
        }
    }
}

impl std::fmt::Display for MessageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
