//! Endpoint Verification Module
//!
//! Checks the configured upstream endpoints (readings, disease inference,
//! weather) against the live network and reports which are usable.
//!
//! Run this after changing endpoint URLs in the config.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;

use crate::config::Config;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub timestamp: String,
    pub results: Vec<EndpointVerification>,
    pub summary: VerificationSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub working: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointVerification {
    pub name: String,
    pub url: String,
    pub status: VerificationStatus,
    pub http_status: Option<u16>,
    /// Body parsed into the expected shape.
    pub payload_valid: bool,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum VerificationStatus {
    Success,
    PartialSuccess,
    Failed,
}

/// Decides a status from what a probe saw.
///
/// `route_ok` marks HTTP codes that prove the route exists even without a
/// usable payload (e.g. 405 from a POST-only inference route).
pub fn classify_probe(http_status: Option<u16>, payload_valid: bool, route_ok: bool) -> VerificationStatus {
    match http_status {
        None => VerificationStatus::Failed,
        Some(code) if (200..300).contains(&code) && payload_valid => VerificationStatus::Success,
        Some(_) if route_ok => VerificationStatus::Success,
        Some(code) if (200..300).contains(&code) => VerificationStatus::PartialSuccess,
        Some(_) => VerificationStatus::Failed,
    }
}

impl VerificationSummary {
    fn record(&mut self, status: VerificationStatus) {
        self.total += 1;
        match status {
            VerificationStatus::Success | VerificationStatus::PartialSuccess => self.working += 1,
            VerificationStatus::Failed => self.failed += 1,
        }
    }
}

// ============================================================================
// Probes
// ============================================================================

/// GETs `url` and validates the body with `parse`.
fn probe_json<T, E: std::fmt::Display>(
    client: &reqwest::blocking::Client,
    name: &str,
    url: &str,
    parse: impl Fn(&str) -> Result<T, E>,
) -> EndpointVerification {
    let mut result = EndpointVerification {
        name: name.to_string(),
        url: url.to_string(),
        status: VerificationStatus::Failed,
        http_status: None,
        payload_valid: false,
        error_message: None,
    };

    match client.get(url).timeout(PROBE_TIMEOUT).send() {
        Ok(response) => {
            let code = response.status().as_u16();
            result.http_status = Some(code);
            if response.status().is_success() {
                match response.text() {
                    Ok(body) => match parse(&body) {
                        Ok(_) => result.payload_valid = true,
                        Err(e) => result.error_message = Some(format!("Parse error: {}", e)),
                    },
                    Err(e) => result.error_message = Some(format!("Failed to read body: {}", e)),
                }
            } else {
                result.error_message = Some(format!("HTTP {}", code));
            }
        }
        Err(e) => {
            result.error_message = Some(format!("Request failed: {}", e));
        }
    }

    result.status = classify_probe(result.http_status, result.payload_valid, false);
    result
}

pub fn verify_readings_endpoint(client: &reqwest::blocking::Client, url: &str) -> EndpointVerification {
    probe_json(client, "Sensor readings", url, crate::ingest::sensors::parse_readings_response)
}

pub fn verify_weather_endpoint(client: &reqwest::blocking::Client, url: &str) -> EndpointVerification {
    probe_json(client, "Weather", url, crate::ingest::weather::parse_weather)
}

/// The inference route only accepts image uploads, so a GET can at best
/// show that the route exists (405 Method Not Allowed, or a 2xx info page).
pub fn verify_predict_endpoint(client: &reqwest::blocking::Client, url: &str) -> EndpointVerification {
    let mut result = EndpointVerification {
        name: "Disease inference".to_string(),
        url: url.to_string(),
        status: VerificationStatus::Failed,
        http_status: None,
        payload_valid: false,
        error_message: None,
    };

    match client.get(url).timeout(PROBE_TIMEOUT).send() {
        Ok(response) => {
            let code = response.status().as_u16();
            result.http_status = Some(code);
            let route_ok = response.status().is_success() || code == 405;
            if !route_ok {
                result.error_message = Some(format!("HTTP {}", code));
            }
            result.status = classify_probe(Some(code), false, route_ok);
        }
        Err(e) => {
            result.error_message = Some(format!("Request failed: {}", e));
        }
    }

    result
}

// ============================================================================
// Full Verification Runner
// ============================================================================

pub fn run_full_verification(config: &Config) -> Result<VerificationReport, Box<dyn Error>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.monitor.request_timeout_secs))
        .build()?;

    let mut report = VerificationReport {
        timestamp: Utc::now().to_rfc3339(),
        results: Vec::new(),
        summary: VerificationSummary::default(),
    };

    let mut results = vec![
        verify_readings_endpoint(&client, &config.endpoints.readings_url),
        verify_predict_endpoint(&client, &config.endpoints.predict_url),
    ];
    if let Some(url) = &config.endpoints.weather_url {
        results.push(verify_weather_endpoint(&client, url));
    }

    for result in results {
        print!("  {} ... ", result.name);
        match result.status {
            VerificationStatus::Success => println!("✓ OK"),
            VerificationStatus::PartialSuccess => {
                println!("⚠ Partial ({})", result.error_message.as_deref().unwrap_or("no detail"))
            }
            VerificationStatus::Failed => {
                println!("✗ FAILED: {}", result.error_message.as_deref().unwrap_or("Unknown"))
            }
        }
        report.summary.record(result.status);
        report.results.push(result);
    }

    Ok(report)
}

pub fn print_summary(report: &VerificationReport) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("📊 VERIFICATION SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!(
        "Endpoints:  {}/{} working  ({} failed)",
        report.summary.working, report.summary.total, report.summary.failed
    );
    println!("═══════════════════════════════════════════════════════════");
}

/// Renders the report as a Markdown table.
pub fn generate_markdown_report(report: &VerificationReport) -> String {
    let mut md = String::new();
    md.push_str("# Endpoint Verification Report\n\n");
    md.push_str(&format!("Generated: {}\n\n", report.timestamp));
    md.push_str(&format!(
        "**{}/{} endpoints working, {} failed**\n\n",
        report.summary.working, report.summary.total, report.summary.failed
    ));
    md.push_str("| Endpoint | URL | Status | HTTP | Notes |\n");
    md.push_str("|---|---|---|---|---|\n");
    for r in &report.results {
        md.push_str(&format!(
            "| {} | {} | {:?} | {} | {} |\n",
            r.name,
            r.url,
            r.status,
            r.http_status.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()),
            r.error_message.as_deref().unwrap_or(""),
        ));
    }
    md
}
