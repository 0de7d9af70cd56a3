//! Interpretation helpers built on top of ingested data.
//!
//! Water-quality classification itself lives in `alert::thresholds`; this
//! module holds the softer, advisory-style analysis.
//!
//! Submodules:
//! - `weather_advisory`: turns a weather report into husbandry suggestions.

pub mod weather_advisory;
