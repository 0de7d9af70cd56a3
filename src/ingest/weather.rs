/// Weather conditions client for pond advisories.
///
/// Accepts One Call-shaped JSON (a `current` block plus a `daily` forecast),
/// either fetched from a configured URL or loaded from a file for offline
/// use. Interpretation lives in `analysis::weather_advisory`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::model::DrFishError;

// ============================================================================
// Response Structures
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    #[serde(default)]
    pub daily: Vec<DailyForecast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp: f64,  // °C
    pub feels_like: f64,
    pub humidity: f64,  // %
    pub pressure: f64,  // hPa
    pub wind_speed: f64,  // m/s
    #[serde(default)]
    pub wind_deg: f64,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    #[serde(default)]
    pub visibility: f64,  // metres
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub dt: i64,  // unix seconds
    pub temp: TempRange,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    pub humidity: f64,
    pub wind_speed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempRange {
    pub min: f64,
    pub max: f64,
}

impl WeatherReport {
    /// Main condition of the current weather (e.g. "Clouds"), if reported.
    pub fn current_condition(&self) -> Option<&str> {
        self.current.weather.first().map(|w| w.main.as_str())
    }
}

// ============================================================================
// Condition labels
// ============================================================================

/// Coarse sky category used to pick a display glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyCategory {
    Clear,
    Rain,
    Snow,
    Cloud,
}

/// Maps a condition `main` string onto a sky category (case-insensitive).
/// Anything unrecognized, including drizzle and fog, shows as cloud.
pub fn sky_category(main: &str) -> SkyCategory {
    match main.to_ascii_lowercase().as_str() {
        "clear" => SkyCategory::Clear,
        "rain" => SkyCategory::Rain,
        "snow" => SkyCategory::Snow,
        _ => SkyCategory::Cloud,
    }
}

// ============================================================================
// Loading
// ============================================================================

pub fn parse_weather(body: &str) -> Result<WeatherReport, DrFishError> {
    serde_json::from_str(body).map_err(|e| DrFishError::ParseError(e.to_string()))
}

/// Fetch the current report from a One Call-compatible endpoint.
pub fn fetch_weather(
    client: &reqwest::blocking::Client,
    url: &str,
) -> Result<WeatherReport, DrFishError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| DrFishError::RequestFailed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(DrFishError::HttpError(response.status().as_u16()));
    }

    let body = response
        .text()
        .map_err(|e| DrFishError::RequestFailed(e.to_string()))?;
    parse_weather(&body)
}

/// Load a report saved to disk.
pub fn load_weather_file(path: &Path) -> Result<WeatherReport, DrFishError> {
    let body = std::fs::read_to_string(path).map_err(|e| {
        DrFishError::NoDataAvailable(format!("cannot read {}: {}", path.display(), e))
    })?;
    parse_weather(&body)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "current": {
            "temp": 18.5, "feels_like": 17.2, "humidity": 72, "pressure": 1015,
            "wind_speed": 3.2, "wind_deg": 230,
            "weather": [{"main": "Clouds", "description": "scattered clouds", "icon": "03d"}],
            "visibility": 10000
        },
        "daily": [
            {"dt": 1714564800, "temp": {"min": 12, "max": 22}, "weather": [{"main": "Clouds"}], "humidity": 75, "wind_speed": 2.8},
            {"dt": 1714651200, "temp": {"min": 14, "max": 24}, "weather": [{"main": "Rain"}], "humidity": 85, "wind_speed": 4.2}
        ]
    }"#;

    #[test]
    fn test_parses_one_call_shape() {
        let report = parse_weather(SAMPLE).expect("sample should parse");
        assert_eq!(report.current.temp, 18.5);
        assert_eq!(report.current_condition(), Some("Clouds"));
        assert_eq!(report.daily.len(), 2);
        assert_eq!(report.daily[1].weather[0].main, "Rain");
        assert_eq!(report.daily[0].temp.max, 22.0);
    }

    #[test]
    fn test_daily_is_optional() {
        let report = parse_weather(
            r#"{"current": {"temp": 5, "feels_like": 3, "humidity": 40, "pressure": 1020, "wind_speed": 1}}"#,
        )
        .unwrap();
        assert!(report.daily.is_empty());
        assert_eq!(report.current_condition(), None);
    }

    #[test]
    fn test_missing_current_is_parse_error() {
        assert!(matches!(parse_weather(r#"{"daily": []}"#), Err(DrFishError::ParseError(_))));
    }

    #[test]
    fn test_sky_category_is_case_insensitive() {
        assert_eq!(sky_category("Clear"), SkyCategory::Clear);
        assert_eq!(sky_category("RAIN"), SkyCategory::Rain);
        assert_eq!(sky_category("snow"), SkyCategory::Snow);
        assert_eq!(sky_category("Mist"), SkyCategory::Cloud);
    }
}
