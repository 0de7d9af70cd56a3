//! Polling monitor for one pond.
//!
//! Each cycle fetches readings, rejects stale ones, classifies the rest and
//! logs the result. Status is logged on transitions only; a pond that stays
//! critical for an hour produces one ERROR line, then DEBUG lines.

use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::alert::alerts::{build_alerts, Alert};
use crate::alert::stalenesses::age_minutes_at;
use crate::alert::thresholds::{assess, Assessment};
use crate::ingest::sensors::fetch_readings;
use crate::logging::{self, DataSource, LogLevel};
use crate::model::{DrFishError, FishType, ParameterStatus, WaterReadings};

// ---------------------------------------------------------------------------
// Reading sources
// ---------------------------------------------------------------------------

/// Where a monitor gets its readings from.
pub trait ReadingSource {
    fn fetch(&self) -> Result<WaterReadings, DrFishError>;
}

/// Readings API over HTTP.
pub struct HttpReadingSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpReadingSource {
    pub fn new(client: reqwest::blocking::Client, url: impl Into<String>) -> Self {
        HttpReadingSource {
            client,
            url: url.into(),
        }
    }
}

impl ReadingSource for HttpReadingSource {
    fn fetch(&self) -> Result<WaterReadings, DrFishError> {
        fetch_readings(&self.client, &self.url)
    }
}

// ---------------------------------------------------------------------------
// Monitor
// ---------------------------------------------------------------------------

/// Everything one successful poll produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PollOutcome {
    pub readings: WaterReadings,
    pub assessment: Assessment,
    pub alerts: Vec<Alert>,
    /// Overall status differs from the previous successful poll (or this is the first).
    pub status_changed: bool,
}

pub struct Monitor<S: ReadingSource> {
    pond: String,
    fish: FishType,
    max_age_minutes: u64,
    source: S,
    last_status: Option<ParameterStatus>,
    successes: usize,
    failures: usize,
}

/// Log level for an overall status.
pub fn level_for(status: ParameterStatus) -> LogLevel {
    match status {
        ParameterStatus::Optimal | ParameterStatus::Good => LogLevel::Info,
        ParameterStatus::Poor => LogLevel::Warning,
        ParameterStatus::Critical => LogLevel::Error,
    }
}

impl<S: ReadingSource> Monitor<S> {
    pub fn new(pond: impl Into<String>, fish: FishType, max_age_minutes: u64, source: S) -> Self {
        Monitor {
            pond: pond.into(),
            fish,
            max_age_minutes,
            source,
            last_status: None,
            successes: 0,
            failures: 0,
        }
    }

    pub fn last_status(&self) -> Option<ParameterStatus> {
        self.last_status
    }

    /// (successful polls, failed polls) so far.
    pub fn counts(&self) -> (usize, usize) {
        (self.successes, self.failures)
    }

    fn fail(&mut self, err: DrFishError) -> Result<PollOutcome, DrFishError> {
        self.failures += 1;
        Err(err)
    }

    /// Runs one fetch → freshness → assess cycle.
    pub fn poll_once(&mut self, now: DateTime<Utc>) -> Result<PollOutcome, DrFishError> {
        let readings = match self.source.fetch() {
            Ok(r) => r,
            Err(e) => {
                logging::log_sensor_failure(&self.pond, "Readings fetch", &e);
                return self.fail(e);
            }
        };

        match age_minutes_at(&readings, now) {
            Ok(Some(age)) if age > self.max_age_minutes => {
                logging::warn(
                    DataSource::Sensor,
                    Some(&self.pond),
                    &format!(
                        "Readings are {} minutes old (limit {}), skipping classification",
                        age, self.max_age_minutes
                    ),
                );
                return self.fail(DrFishError::StaleData { age_minutes: age });
            }
            Ok(_) => {}
            Err(e) => {
                logging::warn(
                    DataSource::Sensor,
                    Some(&self.pond),
                    &format!("Unreadable observation time, treating as stale: {}", e),
                );
                return self.fail(e);
            }
        }

        let assessment = assess(&readings, self.fish);
        let alerts = build_alerts(&readings, self.fish);
        let status_changed = self.last_status != Some(assessment.status);

        self.log_status(&assessment, status_changed);

        self.last_status = Some(assessment.status);
        self.successes += 1;

        Ok(PollOutcome {
            readings,
            assessment,
            alerts,
            status_changed,
        })
    }

    fn log_status(&self, assessment: &Assessment, status_changed: bool) {
        let pond = Some(self.pond.as_str());
        let status = assessment.status;

        if !status_changed {
            logging::debug(
                DataSource::Analysis,
                pond,
                &format!("{} pond still {}", self.fish, status),
            );
            return;
        }

        let message = match self.last_status {
            None => format!("{} pond status: {}", self.fish, status),
            Some(prev) if status < prev => {
                format!("{} pond improved: {} -> {}", self.fish, prev, status)
            }
            Some(prev) => format!("{} pond degraded: {} -> {}", self.fish, prev, status),
        };
        logging::log(level_for(status), DataSource::Analysis, pond, &message);

        for (warning, recommendation) in assessment
            .warnings
            .iter()
            .zip(assessment.recommendations.iter())
        {
            logging::log(
                level_for(status),
                DataSource::Analysis,
                pond,
                &format!("{}: {}", warning, recommendation),
            );
        }
    }

    /// Polls until `max_cycles` is reached, or forever when `None`.
    pub fn run(&mut self, interval: Duration, max_cycles: Option<u64>) -> (usize, usize) {
        logging::info(
            DataSource::System,
            Some(&self.pond),
            &format!(
                "Monitoring {} pond every {}s",
                self.fish,
                interval.as_secs()
            ),
        );

        let mut cycles = 0u64;
        while max_cycles.is_none_or(|max| cycles < max) {
            if cycles > 0 {
                std::thread::sleep(interval);
            }
            // Failures are already logged inside poll_once.
            let _ = self.poll_once(Utc::now());
            cycles += 1;
        }

        let (ok, failed) = self.counts();
        logging::log_run_summary(ok + failed, ok, failed);
        (ok, failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Serves a scripted sequence of fetch results.
    struct Scripted(RefCell<VecDeque<Result<WaterReadings, DrFishError>>>);

    impl Scripted {
        fn new(items: Vec<Result<WaterReadings, DrFishError>>) -> Self {
            Scripted(RefCell::new(items.into()))
        }
    }

    impl ReadingSource for Scripted {
        fn fetch(&self) -> Result<WaterReadings, DrFishError> {
            self.0
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(DrFishError::NoDataAvailable("script exhausted".into())))
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap()
    }

    fn optimal() -> WaterReadings {
        WaterReadings::new(12.0, 9.0, 7.5, 150.0)
    }

    fn critical() -> WaterReadings {
        WaterReadings::new(25.0, 9.0, 7.5, 150.0)
    }

    #[test]
    fn test_first_poll_reports_change() {
        let mut m = Monitor::new("p1", FishType::Trout, 15, Scripted::new(vec![Ok(optimal())]));
        let out = m.poll_once(now()).expect("poll should succeed");
        assert!(out.status_changed);
        assert_eq!(out.assessment.status, ParameterStatus::Optimal);
        assert!(out.alerts.is_empty());
        assert_eq!(m.last_status(), Some(ParameterStatus::Optimal));
    }

    #[test]
    fn test_status_change_tracking() {
        let source = Scripted::new(vec![Ok(optimal()), Ok(critical()), Ok(critical()), Ok(optimal())]);
        let mut m = Monitor::new("p1", FishType::Trout, 15, source);
        let changes: Vec<bool> = (0..4)
            .map(|_| m.poll_once(now()).unwrap().status_changed)
            .collect();
        assert_eq!(changes, [true, true, false, true]);
        assert_eq!(m.counts(), (4, 0));
    }

    #[test]
    fn test_fetch_failure_keeps_last_status() {
        let source = Scripted::new(vec![Ok(critical()), Err(DrFishError::HttpError(503))]);
        let mut m = Monitor::new("p1", FishType::Trout, 15, source);
        m.poll_once(now()).unwrap();
        assert_eq!(m.poll_once(now()), Err(DrFishError::HttpError(503)));
        assert_eq!(m.last_status(), Some(ParameterStatus::Critical));
        assert_eq!(m.counts(), (1, 1));
    }

    #[test]
    fn test_stale_readings_are_not_classified() {
        let mut old = critical();
        old.observed_at = Some("2024-05-01T12:00:00Z".to_string());
        let mut m = Monitor::new("p1", FishType::Trout, 15, Scripted::new(vec![Ok(old)]));
        assert_eq!(m.poll_once(now()), Err(DrFishError::StaleData { age_minutes: 60 }));
        assert_eq!(m.last_status(), None);
    }

    #[test]
    fn test_unparseable_timestamp_is_a_failure() {
        let mut r = optimal();
        r.observed_at = Some("yesterday".to_string());
        let mut m = Monitor::new("p1", FishType::Trout, 15, Scripted::new(vec![Ok(r)]));
        assert!(matches!(m.poll_once(now()), Err(DrFishError::ParseError(_))));
        assert_eq!(m.counts(), (0, 1));
    }

    #[test]
    fn test_run_stops_after_max_cycles() {
        let source = Scripted::new(vec![Ok(optimal()), Ok(optimal())]);
        let mut m = Monitor::new("p1", FishType::Trout, 15, source);
        let (ok, failed) = m.run(Duration::from_millis(1), Some(3));
        assert_eq!((ok, failed), (2, 1), "third poll hits the exhausted script");
    }

    #[test]
    fn test_run_with_zero_cycles_never_polls() {
        let mut m = Monitor::new("p1", FishType::Trout, 15, Scripted::new(vec![Ok(optimal())]));
        assert_eq!(m.run(Duration::from_millis(1), Some(0)), (0, 0));
        assert_eq!(m.last_status(), None);
    }

    #[test]
    fn test_transitions_are_logged_at_new_status_level() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("monitor.log");
        logging::init_logger(LogLevel::Debug, path.to_str(), false);

        // Other tests share the global logger; a unique pond name keeps this
        // trail separable.
        let source = Scripted::new(vec![Ok(optimal()), Ok(critical()), Ok(critical()), Ok(optimal())]);
        let mut m = Monitor::new("log-trail", FishType::Trout, 15, source);
        for _ in 0..4 {
            m.poll_once(now()).unwrap();
        }

        let text = std::fs::read_to_string(&path).expect("log file written");
        let lines: Vec<&str> = text
            .lines()
            .filter(|l| l.contains("[log-trail]"))
            .map(|l| l.splitn(4, ' ').nth(3).unwrap_or(""))
            .collect();

        assert_eq!(
            lines,
            [
                "INFO ANALYSIS [log-trail]: Trout pond status: optimal",
                "ERROR ANALYSIS [log-trail]: Trout pond degraded: optimal -> critical",
                "ERROR ANALYSIS [log-trail]: temperature is in critical condition: Increase water flow rate or add cooling system",
                "DEBUG ANALYSIS [log-trail]: Trout pond still critical",
                "INFO ANALYSIS [log-trail]: Trout pond improved: critical -> optimal",
            ]
        );
    }

    #[test]
    fn test_level_for_status() {
        assert_eq!(level_for(ParameterStatus::Good), LogLevel::Info);
        assert_eq!(level_for(ParameterStatus::Poor), LogLevel::Warning);
        assert_eq!(level_for(ParameterStatus::Critical), LogLevel::Error);
    }
}
