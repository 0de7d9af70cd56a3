//! Dr. Fish pond monitoring service.
//!
//! Classifies pond water-quality readings against species-specific bands,
//! raises alerts with recommended actions, forwards fish images to a disease
//! inference endpoint, and derives weather advisories.

pub mod alert;
pub mod analysis;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod monitor;
pub mod species;
pub mod verify;
