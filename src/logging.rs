/// Structured logging for the pond monitoring service
///
/// Provides context-rich logging with source and pond identifiers,
/// timestamps, and severity levels. Supports both console output
/// and file-based logging for daemon operations.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::{Mutex, MutexGuard};

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Sensor,
    Disease,
    Weather,
    Analysis,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Sensor => write!(f, "SENSOR"),
            DataSource::Disease => write!(f, "DISEASE"),
            DataSource::Weather => write!(f, "WEATHER"),
            DataSource::Analysis => write!(f, "ANALYSIS"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - e.g. a free-tier host waking from sleep
    Expected,
    /// Unexpected failure - indicates service degradation or configuration issue
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

fn logger() -> MutexGuard<'static, Option<Logger>> {
    // A panic while logging must not silence every later message.
    LOGGER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        *logger() = Some(Logger {
            min_level,
            log_file,
            console_timestamps,
        });
    }

    /// Render one log line in the file format.
    fn format_entry(level: LogLevel, source: &DataSource, pond: Option<&str>, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let pond_part = pond.map(|s| format!(" [{}]", s)).unwrap_or_default();
        format!("{} {} {}{}: {}", timestamp, level, source, pond_part, message)
    }

    fn log(&self, level: LogLevel, source: &DataSource, pond: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = Self::format_entry(level, source, pond, message);
        let pond_part = pond.map(|s| format!(" [{}]", s)).unwrap_or_default();

        // Console output
        if self.console_timestamps {
            match level {
                LogLevel::Error => eprintln!("{}", log_entry),
                LogLevel::Warning => eprintln!("   {}", log_entry),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, pond_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", source, pond_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => {}  // Skip debug in non-timestamp mode
            }
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

/// Log a message at an explicit level
pub fn log(level: LogLevel, source: DataSource, pond: Option<&str>, message: &str) {
    if let Some(logger) = logger().as_ref() {
        logger.log(level, &source, pond, message);
    }
}

/// Log a general informational message
pub fn info(source: DataSource, pond: Option<&str>, message: &str) {
    log(LogLevel::Info, source, pond, message);
}

/// Log a warning message
pub fn warn(source: DataSource, pond: Option<&str>, message: &str) {
    log(LogLevel::Warning, source, pond, message);
}

/// Log an error message
pub fn error(source: DataSource, pond: Option<&str>, message: &str) {
    log(LogLevel::Error, source, pond, message);
}

/// Log a debug message
pub fn debug(source: DataSource, pond: Option<&str>, message: &str) {
    log(LogLevel::Debug, source, pond, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a readings API failure based on the error text
pub fn classify_sensor_failure(error_message: &str) -> FailureType {
    // The readings host sleeps when idle and answers the first request
    // with a gateway error while it spins up.
    if error_message.contains("HTTP error: 502") || error_message.contains("HTTP error: 503") {
        FailureType::Expected
    }
    // Other HTTP errors and malformed bodies point at the upstream
    else if error_message.contains("HTTP error") || error_message.contains("Parse error") {
        FailureType::Unexpected
    }
    else if error_message.contains("No data available") {
        FailureType::Unexpected
    }
    else {
        FailureType::Unknown
    }
}

/// Classify a disease inference failure
pub fn classify_disease_failure(error_message: &str) -> FailureType {
    if error_message.contains("cannot read") {
        // Local file problem, not the endpoint's fault
        FailureType::Expected
    } else if error_message.contains("HTTP") || error_message.contains("timeout") {
        FailureType::Unexpected
    } else {
        FailureType::Unknown
    }
}

/// Classify a weather source failure
pub fn classify_weather_failure(error_message: &str) -> FailureType {
    if error_message.contains("cannot read") {
        // Missing or unreadable local weather file
        FailureType::Expected
    } else if error_message.contains("HTTP") || error_message.contains("timeout") {
        FailureType::Unexpected
    } else {
        FailureType::Unknown
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

fn log_classified(
    source: DataSource,
    pond: Option<&str>,
    operation: &str,
    failure_type: FailureType,
    error_msg: &str,
) {
    let message = format!("{} failed [{}]: {}", operation, failure_type, error_msg);

    match failure_type {
        FailureType::Expected => debug(source, pond, &message),
        FailureType::Unexpected => error(source, pond, &message),
        FailureType::Unknown => warn(source, pond, &message),
    }
}

/// Log a readings API failure with automatic classification
pub fn log_sensor_failure(pond: &str, operation: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_sensor_failure(&error_msg);
    log_classified(DataSource::Sensor, Some(pond), operation, failure_type, &error_msg);
}

/// Log a disease inference failure with classification
pub fn log_disease_failure(operation: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_disease_failure(&error_msg);
    log_classified(DataSource::Disease, None, operation, failure_type, &error_msg);
}

/// Log a weather failure with classification
pub fn log_weather_failure(operation: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_weather_failure(&error_msg);
    log_classified(DataSource::Weather, None, operation, failure_type, &error_msg);
}

// ---------------------------------------------------------------------------
// Run Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of a monitoring run
pub fn log_run_summary(total: usize, successful: usize, failed: usize) {
    let message = format!(
        "Monitoring run complete: {}/{} polls successful, {} failed",
        successful,
        total,
        failed
    );

    if failed == 0 {
        info(DataSource::System, None, &message);
    } else if successful == 0 {
        error(DataSource::System, None, &message);
    } else {
        warn(DataSource::System, None, &message);
    }
}
