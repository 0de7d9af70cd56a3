//! Weather-driven husbandry suggestions.
//!
//! Air conditions are a leading indicator for the pond: warm spells precede
//! oxygen crashes, rain brings runoff. These rules turn a weather report into
//! a short list of farmer-facing suggestions for the pond's species.

use serde::Serialize;

use crate::ingest::weather::WeatherReport;
use crate::model::FishType;

const HIGH_WIND_MPS: f64 = 5.0;
const HIGH_HUMIDITY_PCT: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Warning,
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub title: String,
    pub message: String,
}

/// Air (not water) temperature comfort range for a species. Independent of
/// the water bands in `species`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirTempRange {
    pub min: f64,
    pub max: f64,
    pub optimal_min: f64,
    pub optimal_max: f64,
}

pub fn air_temp_range(fish: FishType) -> AirTempRange {
    match fish {
        FishType::Trout => AirTempRange { min: 10.0, max: 18.0, optimal_min: 12.0, optimal_max: 16.0 },
        FishType::Carp => AirTempRange { min: 15.0, max: 30.0, optimal_min: 20.0, optimal_max: 25.0 },
    }
}

fn suggestion(kind: SuggestionKind, title: &str, message: String) -> Suggestion {
    Suggestion {
        kind,
        title: title.to_string(),
        message,
    }
}

/// Builds suggestions in a fixed order: temperature, wind, humidity, rain.
pub fn advise(weather: &WeatherReport, fish: FishType) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();
    let temp = weather.current.temp;
    let range = air_temp_range(fish);

    if temp < range.min {
        suggestions.push(suggestion(
            SuggestionKind::Warning,
            "Cold Temperature Alert",
            format!(
                "Temperature below optimal range for {}. Consider reducing feeding frequency as metabolism slows.",
                fish
            ),
        ));
    } else if temp > range.max {
        suggestions.push(suggestion(
            SuggestionKind::Warning,
            "Warm Temperature Alert",
            format!(
                "Temperature above optimal range for {}. Monitor oxygen levels closely and increase aeration.",
                fish
            ),
        ));
    } else if temp >= range.optimal_min && temp <= range.optimal_max {
        suggestions.push(suggestion(
            SuggestionKind::Success,
            "Optimal Temperature",
            format!("Current temperature is ideal for {} growth and feeding.", fish),
        ));
    }

    if weather.current.wind_speed > HIGH_WIND_MPS {
        suggestions.push(suggestion(
            SuggestionKind::Info,
            "High Wind Activity",
            "Strong winds can increase water oxygenation but may stress fish. Monitor behavior closely."
                .to_string(),
        ));
    }

    if weather.current.humidity > HIGH_HUMIDITY_PCT {
        suggestions.push(suggestion(
            SuggestionKind::Info,
            "High Humidity",
            "Good conditions for maintaining water levels. Check for potential algae growth."
                .to_string(),
        ));
    }

    let rain_expected = weather
        .daily
        .iter()
        .any(|day| day.weather.first().is_some_and(|w| w.main == "Rain"));
    if rain_expected {
        suggestions.push(suggestion(
            SuggestionKind::Info,
            "Rain Expected",
            "Prepare for potential water level changes and runoff that may affect water quality."
                .to_string(),
        ));
    }

    suggestions
}
