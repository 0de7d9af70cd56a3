//! Alert cards for the pond analysis view.
//!
//! Each parameter outside its optimal band becomes one card with a severity,
//! a short description of where the value sits, and a list of solutions. The
//! first solution is always the recommendation produced by
//! `thresholds::recommendation_for`, so cards and assessments never disagree.

use serde::Serialize;

use crate::alert::thresholds::{classify, recommendation_for};
use crate::model::{FishType, ParameterBands, ParameterStatus, WaterParameter, WaterReadings};
use crate::species::bands_for;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

impl From<ParameterStatus> for AlertSeverity {
    fn from(status: ParameterStatus) -> Self {
        match status {
            ParameterStatus::Optimal | ParameterStatus::Good => AlertSeverity::Info,
            ParameterStatus::Poor => AlertSeverity::Warning,
            ParameterStatus::Critical => AlertSeverity::Critical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub id: String,
    pub title: String,
    pub description: String,
    pub parameter: WaterParameter,
    pub severity: AlertSeverity,
    pub icon: &'static str,
    pub solutions: Vec<String>,
}

fn icon_for(parameter: WaterParameter) -> &'static str {
    match parameter {
        WaterParameter::Temperature => "🌡️",
        WaterParameter::DissolvedOxygen => "💧",
        WaterParameter::Ph => "🧪",
        WaterParameter::Turbidity => "🌫️",
    }
}

fn follow_ups(parameter: WaterParameter, above_optimal: bool) -> &'static [&'static str] {
    match (parameter, above_optimal) {
        (WaterParameter::Temperature, true) => &[
            "Shade the pond surface during peak sun hours",
            "Feed during the cooler parts of the day",
        ],
        (WaterParameter::Temperature, false) => &[
            "Reduce feeding frequency while metabolism is slow",
        ],
        (WaterParameter::DissolvedOxygen, _) => &[
            "Run aerators overnight when oxygen demand peaks",
            "Remove uneaten feed and decaying matter",
        ],
        (WaterParameter::Ph, true) => &["Check for algae blooms driving pH up in daylight"],
        (WaterParameter::Ph, false) => &["Test alkalinity and buffer the water if low"],
        (WaterParameter::Turbidity, _) => &[
            "Inspect inflow for runoff or sediment",
        ],
    }
}

fn describe(value: f64, bands: &ParameterBands, status: ParameterStatus) -> String {
    let unit = if bands.unit.is_empty() {
        String::new()
    } else {
        format!(" {}", bands.unit)
    };
    let optimal = if bands.optimal.max.is_finite() {
        format!("{}–{}{}", bands.optimal.min, bands.optimal.max, unit)
    } else {
        format!("at least {}{}", bands.optimal.min, unit)
    };
    format!(
        "{} is {}{} ({} condition). Optimal range: {}.",
        bands.name, value, unit, status, optimal
    )
}

/// Builds one alert per non-optimal parameter, in evaluation order.
///
/// An empty result means every parameter is within its optimal band.
pub fn build_alerts(readings: &WaterReadings, fish: FishType) -> Vec<Alert> {
    let table = bands_for(fish);

    WaterParameter::ALL
        .iter()
        .filter_map(|&param| {
            let bands = table.get(param);
            let value = readings.value(param);
            let status = classify(value, bands);
            if status == ParameterStatus::Optimal {
                return None;
            }

            let title = match status {
                ParameterStatus::Good => format!("{} slightly off optimal", bands.name),
                _ if value > bands.optimal.max => format!("High {}", bands.name),
                _ => format!("Low {}", bands.name),
            };

            let mut solutions = vec![recommendation_for(param, value, bands).to_string()];
            solutions.extend(
                follow_ups(param, value > bands.optimal.max)
                    .iter()
                    .map(|s| s.to_string()),
            );

            Some(Alert {
                id: format!("{}-{}", param.key(), status),
                title,
                description: describe(value, bands, status),
                parameter: param,
                severity: status.into(),
                icon: icon_for(param),
                solutions,
            })
        })
        .collect()
}
