/// Pond sensor readings API client.
///
/// The readings endpoint returns one flat JSON object per request:
///
/// ```json
/// { "temperature": 24.1, "oxygen": 6.3, "ph": 7.8, "turbidity": 41 }
/// ```
///
/// Fields are mapped onto `WaterReadings`. A missing or null field reads as
/// `0.0`, which classifies as critical for every species, so a dropped probe
/// is loud rather than silently healthy.

use serde_json::Value;

use crate::model::{DrFishError, WaterReadings};

pub const DEFAULT_READINGS_URL: &str = "https://simple-hf-api-server.onrender.com/random-int";

/// Response keys, in `WaterParameter::ALL` order.
const FIELD_TEMPERATURE: &str = "temperature";
const FIELD_OXYGEN: &str = "oxygen";
const FIELD_PH: &str = "ph";
const FIELD_TURBIDITY: &str = "turbidity";

/// Optional observation timestamp some deployments add to the payload.
const FIELD_TIMESTAMP: &str = "timestamp";

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Reads one numeric field. Numbers pass through, numeric strings are parsed,
/// missing/null become 0.0, and anything else becomes NaN (classified critical).
fn numeric_field(obj: &serde_json::Map<String, Value>, key: &str) -> f64 {
    match obj.get(key) {
        None | Some(Value::Null) => 0.0,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(f64::NAN),
        Some(_) => f64::NAN,
    }
}

/// Parses a readings API response body.
///
/// Returns `ParseError` if the body is not a JSON object, and
/// `NoDataAvailable` if none of the four sensor fields are present (the
/// upstream has changed shape, not merely dropped a probe).
pub fn parse_readings_response(body: &str) -> Result<WaterReadings, DrFishError> {
    let json: Value =
        serde_json::from_str(body).map_err(|e| DrFishError::ParseError(e.to_string()))?;

    let obj = json
        .as_object()
        .ok_or_else(|| DrFishError::ParseError("expected a JSON object".to_string()))?;

    let fields = [FIELD_TEMPERATURE, FIELD_OXYGEN, FIELD_PH, FIELD_TURBIDITY];
    if !fields.iter().any(|f| obj.contains_key(*f)) {
        return Err(DrFishError::NoDataAvailable(
            "response has no sensor fields".to_string(),
        ));
    }

    Ok(WaterReadings {
        temperature: numeric_field(obj, FIELD_TEMPERATURE),
        dissolved_oxygen: numeric_field(obj, FIELD_OXYGEN),
        ph: numeric_field(obj, FIELD_PH),
        turbidity: numeric_field(obj, FIELD_TURBIDITY),
        observed_at: obj
            .get(FIELD_TIMESTAMP)
            .and_then(|v| v.as_str())
            .map(String::from),
    })
}

// ---------------------------------------------------------------------------
// API client
// ---------------------------------------------------------------------------

/// Fetches the current pond readings.
pub fn fetch_readings(
    client: &reqwest::blocking::Client,
    url: &str,
) -> Result<WaterReadings, DrFishError> {
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

    parse_readings_response(&body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_full_response() {
        let r = parse_readings_response(
            r#"{"temperature": 24.5, "oxygen": 6.1, "ph": 7.9, "turbidity": 40}"#,
        )
        .expect("valid response should parse");
        assert_eq!(r, WaterReadings::new(24.5, 6.1, 7.9, 40.0));
    }

    #[test]
    fn test_missing_and_null_fields_default_to_zero() {
        let r = parse_readings_response(r#"{"temperature": 24.5, "ph": null}"#).unwrap();
        assert_eq!(r.temperature, 24.5);
        assert_eq!(r.dissolved_oxygen, 0.0);
        assert_eq!(r.ph, 0.0);
        assert_eq!(r.turbidity, 0.0);
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let r = parse_readings_response(
            r#"{"temperature": "12.40", "oxygen": "8.8", "ph": " 7.2 ", "turbidity": "110"}"#,
        )
        .unwrap();
        assert_eq!(r, WaterReadings::new(12.4, 8.8, 7.2, 110.0));
    }

    #[test]
    fn test_garbage_field_becomes_nan() {
        let r = parse_readings_response(r#"{"temperature": "warm", "oxygen": [1]}"#).unwrap();
        assert!(r.temperature.is_nan());
        assert!(r.dissolved_oxygen.is_nan());
    }

    #[test]
    fn test_timestamp_is_carried_through() {
        let r = parse_readings_response(
            r#"{"temperature": 1, "timestamp": "2024-05-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(r.observed_at.as_deref(), Some("2024-05-01T12:00:00Z"));
    }

    #[test]
    fn test_non_object_body_is_parse_error() {
        assert!(matches!(
            parse_readings_response("[1, 2, 3]"),
            Err(DrFishError::ParseError(_))
        ));
        assert!(matches!(
            parse_readings_response("<html>502</html>"),
            Err(DrFishError::ParseError(_))
        ));
    }

    #[test]
    fn test_object_without_sensor_fields_is_no_data() {
        assert!(matches!(
            parse_readings_response(r#"{"status": "ok"}"#),
            Err(DrFishError::NoDataAvailable(_))
        ));
    }
}
