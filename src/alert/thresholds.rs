//! Water-quality band classification.
//!
//! Maps each reading to an ordinal status for the pond's species and folds
//! the four per-parameter statuses into one overall status. Warnings and
//! recommended actions are derived here too, since they depend on the same
//! band metadata (which side of the optimal band a value fell on).

use serde::Serialize;

use crate::model::{FishType, ParameterBands, ParameterStatus, WaterParameter, WaterReadings};
use crate::species::bands_for;

/// Result of evaluating one reading set against a species' band table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub fish_type: FishType,
    /// Per-parameter statuses in evaluation order.
    pub statuses: Vec<(WaterParameter, ParameterStatus)>,
    /// Worst of `statuses`.
    pub status: ParameterStatus,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

impl Assessment {
    pub fn status_of(&self, parameter: WaterParameter) -> Option<ParameterStatus> {
        self.statuses
            .iter()
            .find(|(p, _)| *p == parameter)
            .map(|(_, s)| *s)
    }
}

/// Classifies a single value against a parameter's bands.
///
/// Bands are checked optimal → good → poor with inclusive bounds; the first
/// match wins. Anything that matches none of them is critical, including
/// values above the poor band and NaN.
pub fn classify(value: f64, bands: &ParameterBands) -> ParameterStatus {
    if bands.optimal.contains(value) {
        ParameterStatus::Optimal
    } else if bands.good.contains(value) {
        ParameterStatus::Good
    } else if bands.poor.contains(value) {
        ParameterStatus::Poor
    } else {
        ParameterStatus::Critical
    }
}

/// Recommended corrective action for a parameter in poor or critical
/// condition.
pub fn recommendation_for(
    parameter: WaterParameter,
    value: f64,
    bands: &ParameterBands,
) -> &'static str {
    let above_optimal = value > bands.optimal.max;
    match parameter {
        WaterParameter::Temperature if above_optimal => {
            "Increase water flow rate or add cooling system"
        }
        WaterParameter::Temperature => "Add heaters or reduce water flow",
        WaterParameter::DissolvedOxygen => "Install additional aerators or reduce fish density",
        WaterParameter::Ph if above_optimal => "Add pH reducer or increase water exchange",
        WaterParameter::Ph => "Add limestone or increase alkalinity",
        WaterParameter::Turbidity => "Check filtration system and reduce feeding rate",
    }
}

/// Evaluates a full reading set for a species.
pub fn assess(readings: &WaterReadings, fish: FishType) -> Assessment {
    let table = bands_for(fish);

    let statuses: Vec<_> = WaterParameter::ALL
        .iter()
        .map(|&p| (p, classify(readings.value(p), table.get(p))))
        .collect();

    let mut warnings = Vec::new();
    let mut recommendations = Vec::new();

    for &(param, status) in &statuses {
        if status >= ParameterStatus::Poor {
            warnings.push(format!("{} is in {} condition", param.key(), status));
            recommendations.push(
                recommendation_for(param, readings.value(param), table.get(param)).to_string(),
            );
        }
    }

    let status = statuses
        .iter()
        .map(|(_, s)| *s)
        .max()
        .unwrap_or(ParameterStatus::Optimal);

    Assessment {
        fish_type: fish,
        statuses,
        status,
        warnings,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::{CARP_BANDS, TROUT_BANDS};

    fn trout_optimal() -> WaterReadings {
        WaterReadings::new(12.0, 9.0, 7.5, 150.0)
    }

    fn carp_optimal() -> WaterReadings {
        WaterReadings::new(30.0, 7.0, 8.0, 45.0)
    }

    // --- classify -----------------------------------------------------------

    #[test]
    fn test_band_edges_are_inclusive_and_first_match_wins() {
        let temp = &TROUT_BANDS.temperature;
        assert_eq!(classify(10.0, temp), ParameterStatus::Optimal);
        assert_eq!(classify(15.0, temp), ParameterStatus::Optimal);
        assert_eq!(classify(18.0, temp), ParameterStatus::Good);
        assert_eq!(classify(22.0, temp), ParameterStatus::Poor);
        assert_eq!(classify(2.0, temp), ParameterStatus::Poor);
    }

    #[test]
    fn test_value_above_poor_band_is_critical() {
        assert_eq!(classify(22.5, &TROUT_BANDS.temperature), ParameterStatus::Critical);
        assert_eq!(classify(40.0, &CARP_BANDS.temperature), ParameterStatus::Critical);
    }

    #[test]
    fn test_value_below_poor_band_is_critical() {
        assert_eq!(classify(1.9, &TROUT_BANDS.temperature), ParameterStatus::Critical);
        assert_eq!(classify(-5.0, &CARP_BANDS.ph), ParameterStatus::Critical);
    }

    #[test]
    fn test_stacked_bands_leave_high_oxygen_critical() {
        // Trout DO good band is 5.8-8 and optimal tops out at 9.5; nothing
        // covers supersaturation, so it falls through to critical.
        assert_eq!(classify(10.0, &TROUT_BANDS.dissolved_oxygen), ParameterStatus::Critical);
        assert_eq!(classify(5.8, &TROUT_BANDS.dissolved_oxygen), ParameterStatus::Good);
    }

    #[test]
    fn test_open_ended_optimal_band() {
        assert_eq!(classify(5000.0, &TROUT_BANDS.turbidity), ParameterStatus::Optimal);
        assert_eq!(classify(100.0, &TROUT_BANDS.turbidity), ParameterStatus::Optimal);
        assert_eq!(classify(99.0, &TROUT_BANDS.turbidity), ParameterStatus::Good);
    }

    #[test]
    fn test_nan_is_critical() {
        assert_eq!(classify(f64::NAN, &CARP_BANDS.ph), ParameterStatus::Critical);
    }

    // --- assess -------------------------------------------------------------

    #[test]
    fn test_all_optimal_yields_optimal_with_no_warnings() {
        let a = assess(&trout_optimal(), FishType::Trout);
        assert_eq!(a.status, ParameterStatus::Optimal);
        assert!(a.warnings.is_empty());
        assert!(a.recommendations.is_empty());

        let a = assess(&carp_optimal(), FishType::Carp);
        assert_eq!(a.status, ParameterStatus::Optimal);
    }

    #[test]
    fn test_good_parameter_lowers_overall_without_warning() {
        let mut r = trout_optimal();
        r.ph = 8.3;
        let a = assess(&r, FishType::Trout);
        assert_eq!(a.status, ParameterStatus::Good);
        assert_eq!(a.status_of(WaterParameter::Ph), Some(ParameterStatus::Good));
        assert!(a.warnings.is_empty(), "good is not a warning-worthy status");
    }

    #[test]
    fn test_overall_status_is_worst_parameter() {
        let mut r = trout_optimal();
        r.ph = 8.3; // good
        r.dissolved_oxygen = 5.0; // poor
        r.turbidity = 10.0; // critical
        let a = assess(&r, FishType::Trout);
        assert_eq!(a.status, ParameterStatus::Critical);
    }

    #[test]
    fn test_warnings_follow_evaluation_order_and_message_format() {
        let r = WaterReadings::new(25.0, 5.0, 9.2, 20.0);
        let a = assess(&r, FishType::Trout);
        assert_eq!(
            a.warnings,
            vec![
                "temperature is in critical condition",
                "dissolvedOxygen is in poor condition",
                "pH is in critical condition",
                "turbidity is in poor condition",
            ]
        );
        assert_eq!(
            a.recommendations,
            vec![
                "Increase water flow rate or add cooling system",
                "Install additional aerators or reduce fish density",
                "Add pH reducer or increase water exchange",
                "Check filtration system and reduce feeding rate",
            ]
        );
    }

    #[test]
    fn test_low_side_recommendations() {
        let r = WaterReadings::new(21.0, 7.0, 6.2, 45.0);
        let a = assess(&r, FishType::Carp);
        assert_eq!(a.status, ParameterStatus::Poor);
        assert_eq!(
            a.recommendations,
            vec!["Add heaters or reduce water flow", "Add limestone or increase alkalinity"]
        );
    }

    #[test]
    fn test_same_reading_differs_by_species() {
        let r = WaterReadings::new(30.0, 7.0, 8.0, 45.0);
        assert_eq!(assess(&r, FishType::Carp).status, ParameterStatus::Optimal);
        let trout = assess(&r, FishType::Trout);
        assert_eq!(trout.status, ParameterStatus::Critical);
        assert_eq!(
            trout.status_of(WaterParameter::Temperature),
            Some(ParameterStatus::Critical)
        );
    }

    #[test]
    fn test_zeroed_readings_are_critical() {
        // Missing API fields default to 0.0, which must never look healthy.
        let a = assess(&WaterReadings::new(0.0, 0.0, 0.0, 0.0), FishType::Carp);
        assert_eq!(a.status, ParameterStatus::Critical);
        assert_eq!(a.warnings.len(), 4);
    }
}
