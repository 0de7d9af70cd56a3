//! Threshold evaluation and alerting.
//!
//! Submodules:
//! - `thresholds`: band classification and overall assessment.
//! - `alerts`: per-parameter alert cards with solutions.
//! - `stalenesses`: reading freshness checks.

pub mod alerts;
pub mod stalenesses;
pub mod thresholds;
