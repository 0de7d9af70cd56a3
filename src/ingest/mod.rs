//! Upstream API clients.
//!
//! Submodules:
//! - `sensors`: pond water-quality readings.
//! - `disease`: image upload to the disease inference endpoint.
//! - `weather`: current conditions and short forecast.

pub mod disease;
pub mod sensors;
pub mod weather;
