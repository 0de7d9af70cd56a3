/// Species band registry for the Dr. Fish monitoring service.
///
/// Defines the water-quality band tables for every supported fish species.
/// This is the single source of truth for thresholds: the classification
/// engine, alert builder and dashboards all look bands up from here rather
/// than hardcoding numbers.

use crate::model::{Band, FishType, ParameterBands, SpeciesBands};

const NEG_INF: f64 = f64::NEG_INFINITY;
const INF: f64 = f64::INFINITY;

// ---------------------------------------------------------------------------
// Band tables
// ---------------------------------------------------------------------------

/// Cold-water species. Prefers clear water, so turbidity is measured as
/// Secchi depth and the optimal band is open-ended upward.
pub static TROUT_BANDS: SpeciesBands = SpeciesBands {
    temperature: ParameterBands {
        name: "Temperature",
        unit: "°C",
        optimal: Band::new(10.0, 15.0),
        good: Band::new(5.0, 18.0),
        poor: Band::new(2.0, 22.0),
        critical: Band::new(NEG_INF, 2.0),
    },
    dissolved_oxygen: ParameterBands {
        name: "Dissolved Oxygen",
        unit: "mg/L",
        optimal: Band::new(8.0, 9.5),
        good: Band::new(5.8, 8.0),
        poor: Band::new(4.0, 5.8),
        critical: Band::new(NEG_INF, 4.0),
    },
    ph: ParameterBands {
        name: "pH",
        unit: "",
        optimal: Band::new(7.0, 8.0),
        good: Band::new(6.5, 8.5),
        poor: Band::new(6.0, 9.0),
        critical: Band::new(NEG_INF, 6.0),
    },
    turbidity: ParameterBands {
        name: "Turbidity",
        unit: "cm",
        optimal: Band::new(100.0, INF),
        good: Band::new(25.0, 100.0),
        poor: Band::new(15.0, 25.0),
        critical: Band::new(NEG_INF, 15.0),
    },
};

/// Warm-water species.
pub static CARP_BANDS: SpeciesBands = SpeciesBands {
    temperature: ParameterBands {
        name: "Temperature",
        unit: "°C",
        optimal: Band::new(28.0, 32.0),
        good: Band::new(24.0, 35.0),
        poor: Band::new(20.0, 38.0),
        critical: Band::new(NEG_INF, 20.0),
    },
    dissolved_oxygen: ParameterBands {
        name: "Dissolved Oxygen",
        unit: "mg/L",
        optimal: Band::new(6.0, 9.0),
        good: Band::new(5.0, 6.0),
        poor: Band::new(3.0, 5.0),
        critical: Band::new(NEG_INF, 3.0),
    },
    ph: ParameterBands {
        name: "pH",
        unit: "",
        optimal: Band::new(7.5, 8.5),
        good: Band::new(6.5, 9.0),
        poor: Band::new(6.0, 9.5),
        critical: Band::new(NEG_INF, 6.0),
    },
    turbidity: ParameterBands {
        name: "Turbidity",
        unit: "cm",
        optimal: Band::new(30.0, 60.0),
        good: Band::new(25.0, 80.0),
        poor: Band::new(15.0, 100.0),
        critical: Band::new(NEG_INF, 15.0),
    },
};

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Returns the band table for a species.
pub fn bands_for(fish: FishType) -> &'static SpeciesBands {
    match fish {
        FishType::Trout => &TROUT_BANDS,
        FishType::Carp => &CARP_BANDS,
    }
}

/// All supported species, in display order.
pub fn all_fish_types() -> [FishType; 2] {
    [FishType::Trout, FishType::Carp]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
