/// Core data types for the Dr. Fish pond monitoring service.
///
/// This module defines the shared domain model imported by all other modules:
/// fish species, water-quality parameters, status levels, band tables, and
/// the service error type. It contains no I/O.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Fish species
// ---------------------------------------------------------------------------

/// Species selector that chooses which band table applies to a pond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FishType {
    Trout,
    Carp,
}

impl FishType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FishType::Trout => "Trout",
            FishType::Carp => "Carp",
        }
    }
}

impl fmt::Display for FishType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FishType {
    type Err = DrFishError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trout" => Ok(FishType::Trout),
            "carp" => Ok(FishType::Carp),
            _ => Err(DrFishError::UnknownFishType(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Water-quality parameters
// ---------------------------------------------------------------------------

/// One monitored water-quality metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaterParameter {
    #[serde(rename = "temperature")]
    Temperature,
    #[serde(rename = "dissolvedOxygen")]
    DissolvedOxygen,
    #[serde(rename = "pH")]
    Ph,
    #[serde(rename = "turbidity")]
    Turbidity,
}

impl WaterParameter {
    /// Evaluation order. Warnings, recommendations and alerts follow it.
    pub const ALL: [WaterParameter; 4] = [
        WaterParameter::Temperature,
        WaterParameter::DissolvedOxygen,
        WaterParameter::Ph,
        WaterParameter::Turbidity,
    ];

    /// Stable key used in warning messages and alert ids.
    pub fn key(&self) -> &'static str {
        match self {
            WaterParameter::Temperature => "temperature",
            WaterParameter::DissolvedOxygen => "dissolvedOxygen",
            WaterParameter::Ph => "pH",
            WaterParameter::Turbidity => "turbidity",
        }
    }
}

impl fmt::Display for WaterParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Status levels
// ---------------------------------------------------------------------------

/// Qualitative status of a parameter, in ascending order of severity.
///
/// The derived `Ord` is load-bearing: the overall status of a reading set
/// is the `max` of its per-parameter statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterStatus {
    Optimal,
    Good,
    Poor,
    Critical,
}

impl fmt::Display for ParameterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterStatus::Optimal => write!(f, "optimal"),
            ParameterStatus::Good => write!(f, "good"),
            ParameterStatus::Poor => write!(f, "poor"),
            ParameterStatus::Critical => write!(f, "critical"),
        }
    }
}

// ---------------------------------------------------------------------------
// Band tables
// ---------------------------------------------------------------------------

/// A closed numeric interval. Either end may be infinite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    pub const fn new(min: f64, max: f64) -> Self {
        Band { min, max }
    }

    /// Inclusive on both ends. NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Status bands for one parameter of one species.
///
/// Bands are consulted in order optimal → good → poor. `critical` documents
/// the low-side danger zone for display; anything outside `poor` is critical
/// whether or not it falls inside this band.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterBands {
    pub name: &'static str,
    pub unit: &'static str,
    pub optimal: Band,
    pub good: Band,
    pub poor: Band,
    pub critical: Band,
}

/// Full band table for one species.
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesBands {
    pub temperature: ParameterBands,
    pub dissolved_oxygen: ParameterBands,
    pub ph: ParameterBands,
    pub turbidity: ParameterBands,
}

impl SpeciesBands {
    pub fn get(&self, parameter: WaterParameter) -> &ParameterBands {
        match parameter {
            WaterParameter::Temperature => &self.temperature,
            WaterParameter::DissolvedOxygen => &self.dissolved_oxygen,
            WaterParameter::Ph => &self.ph,
            WaterParameter::Turbidity => &self.turbidity,
        }
    }
}

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// One set of pond sensor readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterReadings {
    pub temperature: f64,       // °C
    pub dissolved_oxygen: f64,  // mg/L
    pub ph: f64,
    pub turbidity: f64,         // cm (Secchi depth)
    /// RFC 3339 observation time, when the source provides one.
    pub observed_at: Option<String>,
}

impl WaterReadings {
    pub fn new(temperature: f64, dissolved_oxygen: f64, ph: f64, turbidity: f64) -> Self {
        WaterReadings {
            temperature,
            dissolved_oxygen,
            ph,
            turbidity,
            observed_at: None,
        }
    }

    pub fn value(&self, parameter: WaterParameter) -> f64 {
        match parameter {
            WaterParameter::Temperature => self.temperature,
            WaterParameter::DissolvedOxygen => self.dissolved_oxygen,
            WaterParameter::Ph => self.ph,
            WaterParameter::Turbidity => self.turbidity,
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching, parsing or configuring pond data.
#[derive(Debug, PartialEq)]
pub enum DrFishError {
    /// Non-2xx HTTP response from an upstream API.
    HttpError(u16),
    /// The request could not be sent or the body could not be read.
    RequestFailed(String),
    /// The response body could not be deserialized.
    ParseError(String),
    /// The response parsed but carried no usable values.
    NoDataAvailable(String),
    /// A reading exists but is older than the configured freshness threshold.
    StaleData { age_minutes: u64 },
    /// A fish type other than Trout or Carp was requested.
    UnknownFishType(String),
    /// The inference endpoint rejected or failed the prediction.
    PredictionFailed(String),
    /// The configuration file or an override is invalid.
    Config(String),
}

impl fmt::Display for DrFishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrFishError::HttpError(code) => write!(f, "HTTP error: {}", code),
            DrFishError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            DrFishError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DrFishError::NoDataAvailable(what) => write!(f, "No data available: {}", what),
            DrFishError::StaleData { age_minutes } => {
                write!(f, "Stale data: {} minutes old", age_minutes)
            }
            DrFishError::UnknownFishType(s) => {
                write!(f, "Unknown fish type '{}' (expected Trout or Carp)", s)
            }
            DrFishError::PredictionFailed(msg) => write!(f, "Failed to get prediction: {}", msg),
            DrFishError::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for DrFishError {}
