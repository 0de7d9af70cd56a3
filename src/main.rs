//! drfish_service entry point
//!
//! Usage:
//!   drfish_service [monitor [CYCLES]]   poll the readings API (default)
//!   drfish_service once                 one poll, print assessment as JSON
//!   drfish_service detect IMAGE         run disease detection on an image
//!   drfish_service weather [FILE]       weather advisories (file or configured URL)
//!   drfish_service bands                print the band table for the pond's species
//!   drfish_service verify [--markdown]  check configured endpoints

use serde::Serialize;
use std::error::Error;
use std::path::Path;
use std::time::Duration;

use drfish_service::alert::alerts::Alert;
use drfish_service::alert::thresholds::Assessment;
use drfish_service::analysis::weather_advisory::advise;
use drfish_service::config::{self, Config};
use drfish_service::ingest::{disease, weather};
use drfish_service::logging::{self, DataSource};
use drfish_service::model::{DrFishError, WaterReadings};
use drfish_service::monitor::{HttpReadingSource, Monitor};
use drfish_service::species::bands_for;
use drfish_service::verify;

const USAGE: &str = "usage: drfish_service [monitor [CYCLES] | once | detect IMAGE | weather [FILE] | bands | verify [--markdown]]";

#[derive(Serialize)]
struct Snapshot<'a> {
    pond: &'a str,
    readings: &'a WaterReadings,
    assessment: &'a Assessment,
    alerts: &'a [Alert],
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = config::load()?;
    logging::init_logger(
        config.log_level()?,
        config.logging.file.as_deref(),
        config.logging.console_timestamps,
    );

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.monitor.request_timeout_secs))
        .build()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("monitor") => {
            let cycles = match args.get(1) {
                Some(n) => Some(n.parse::<u64>().map_err(|_| format!("invalid cycle count '{}'", n))?),
                None => None,
            };
            run_monitor(&config, client, cycles)
        }
        Some("once") => run_once(&config, client),
        Some("detect") => {
            let image = args.get(1).ok_or(USAGE)?;
            run_detect(&config, &client, Path::new(image))
        }
        Some("weather") => run_weather(&config, &client, args.get(1).map(Path::new)),
        Some("bands") => {
            let table = bands_for(config.fish_type()?);
            println!("{}", serde_json::to_string_pretty(table)?);
            Ok(())
        }
        Some("verify") => {
            println!("🔍 Verifying endpoints...");
            let report = verify::run_full_verification(&config)?;
            verify::print_summary(&report);
            if args.get(1).map(String::as_str) == Some("--markdown") {
                println!("\n{}", verify::generate_markdown_report(&report));
            }
            Ok(())
        }
        Some(other) => Err(format!("unknown command '{}'\n{}", other, USAGE).into()),
    }
}

fn run_monitor(
    config: &Config,
    client: reqwest::blocking::Client,
    cycles: Option<u64>,
) -> Result<(), Box<dyn Error>> {
    let source = HttpReadingSource::new(client, config.endpoints.readings_url.clone());
    let mut monitor = Monitor::new(
        config.pond.name.clone(),
        config.fish_type()?,
        config.monitor.max_reading_age_minutes,
        source,
    );
    monitor.run(Duration::from_secs(config.monitor.poll_interval_secs), cycles);
    Ok(())
}

fn run_once(config: &Config, client: reqwest::blocking::Client) -> Result<(), Box<dyn Error>> {
    let source = HttpReadingSource::new(client, config.endpoints.readings_url.clone());
    let mut monitor = Monitor::new(
        config.pond.name.clone(),
        config.fish_type()?,
        config.monitor.max_reading_age_minutes,
        source,
    );
    let outcome = monitor.poll_once(chrono::Utc::now())?;

    let snapshot = Snapshot {
        pond: &config.pond.name,
        readings: &outcome.readings,
        assessment: &outcome.assessment,
        alerts: &outcome.alerts,
    };
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn run_detect(
    config: &Config,
    client: &reqwest::blocking::Client,
    image: &Path,
) -> Result<(), Box<dyn Error>> {
    logging::info(
        DataSource::Disease,
        None,
        &format!("Analyzing {}", image.display()),
    );
    match disease::predict_disease(client, &config.endpoints.predict_url, image) {
        Ok(response) => {
            println!("Result: {}", disease::interpret_prediction(&response));
            Ok(())
        }
        Err(e) => {
            logging::log_disease_failure("Disease detection", &e);
            Err("Failed to detect disease. Please try again.".into())
        }
    }
}

fn run_weather(
    config: &Config,
    client: &reqwest::blocking::Client,
    file: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let report = match (file, config.endpoints.weather_url.as_deref()) {
        (Some(path), _) => weather::load_weather_file(path),
        (None, Some(url)) => weather::fetch_weather(client, url),
        (None, None) => Err(DrFishError::Config(
            "no weather file given and endpoints.weather_url is unset".to_string(),
        )),
    };
    let report = report.inspect_err(|e| logging::log_weather_failure("Weather load", e))?;

    let fish = config.fish_type()?;
    if let Some(condition) = report.current_condition() {
        println!(
            "{} ({:?} sky), {}°C, humidity {}%, wind {} m/s",
            condition,
            weather::sky_category(condition),
            report.current.temp,
            report.current.humidity,
            report.current.wind_speed
        );
    }
    for s in advise(&report, fish) {
        println!("[{:?}] {}: {}", s.kind, s.title, s.message);
    }
    Ok(())
}
