//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::{
    clock::{CountdownConfig, CountdownConfigError, SyncFailurePolicy},
    display::Language,
    state::AppSettings,
};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "exam-clock")]
#[command(about = "Server-time synchronized exam-room clock and countdown")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, env = "EXAM_CLOCK_PORT", default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, env = "EXAM_CLOCK_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// URL whose `Date` response header is the trusted time. Without it the
    /// local clock is trusted.
    #[arg(long, env = "EXAM_CLOCK_SYNC_URL")]
    pub sync_url: Option<String>,

    /// Time probe timeout in seconds
    #[arg(long, env = "EXAM_CLOCK_SYNC_TIMEOUT_SECS", default_value = "3")]
    pub sync_timeout_secs: u64,

    /// Minutes between server time resyncs
    #[arg(long, env = "EXAM_CLOCK_RESYNC_MINUTES", default_value = "10")]
    pub resync_minutes: u64,

    /// Minutes left at which the countdown turns yellow
    #[arg(long, env = "EXAM_CLOCK_YELLOW_THRESHOLD", default_value = "30")]
    pub yellow_threshold: u64,

    /// Minutes left at which the countdown turns red
    #[arg(long, env = "EXAM_CLOCK_RED_THRESHOLD", default_value = "15")]
    pub red_threshold: u64,

    /// Minutes left at which to announce an alert
    #[arg(
        long,
        env = "EXAM_CLOCK_ALERT_MARKS",
        value_delimiter = ',',
        default_value = "30,15,5"
    )]
    pub alert_marks: Vec<u64>,

    /// Display and announcement language
    #[arg(short, long, env = "EXAM_CLOCK_LANGUAGE", value_enum, default_value = "th")]
    pub language: Language,

    /// Initial exam time range, e.g. "09:00 - 12:00"
    #[arg(long, env = "EXAM_CLOCK_EXAM_TIME")]
    pub exam_time: Option<String>,

    /// Reset the offset to zero when a resync fails instead of keeping the
    /// last good one
    #[arg(long, env = "EXAM_CLOCK_RESET_OFFSET_ON_FAILURE")]
    pub reset_offset_on_failure: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn sync_timeout(&self) -> Duration {
        Duration::from_secs(self.sync_timeout_secs.max(1))
    }

    pub fn resync_interval(&self) -> Duration {
        Duration::from_secs(self.resync_minutes.max(1).saturating_mul(60))
    }

    pub fn failure_policy(&self) -> SyncFailurePolicy {
        if self.reset_offset_on_failure {
            SyncFailurePolicy::ResetToZero
        } else {
            SyncFailurePolicy::KeepLastOffset
        }
    }

    /// Validated countdown thresholds
    pub fn countdown_config(&self) -> Result<CountdownConfig, CountdownConfigError> {
        CountdownConfig::new(
            self.yellow_threshold,
            self.red_threshold,
            self.alert_marks.clone(),
        )
    }

    pub fn app_settings(&self) -> Result<AppSettings, CountdownConfigError> {
        Ok(AppSettings {
            host: self.host.clone(),
            port: self.port,
            language: self.language,
            sync_timeout: self.sync_timeout(),
            resync_interval: self.resync_interval(),
            countdown: self.countdown_config()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["exam-clock"]).unwrap();
        assert_eq!(config.address(), "0.0.0.0:20554");
        assert_eq!(config.sync_timeout(), Duration::from_secs(3));
        assert_eq!(config.resync_interval(), Duration::from_secs(600));
        assert_eq!(config.alert_marks, vec![30, 15, 5]);
        assert_eq!(config.language, Language::Th);
        assert_eq!(config.failure_policy(), SyncFailurePolicy::KeepLastOffset);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn parses_overrides() {
        let config = Config::try_parse_from([
            "exam-clock",
            "--sync-url",
            "http://clock.local/time",
            "--alert-marks",
            "10,1",
            "--language",
            "en",
            "--reset-offset-on-failure",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.sync_url.as_deref(), Some("http://clock.local/time"));
        assert_eq!(config.countdown_config().unwrap().alert_marks, vec![10, 1]);
        assert_eq!(config.language, Language::En);
        assert_eq!(config.failure_policy(), SyncFailurePolicy::ResetToZero);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn huge_resync_interval_saturates() {
        let config = Config::try_parse_from([
            "exam-clock",
            "--resync-minutes",
            "18446744073709551615",
        ])
        .unwrap();
        assert_eq!(config.resync_interval(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let config = Config::try_parse_from([
            "exam-clock",
            "--yellow-threshold",
            "10",
            "--red-threshold",
            "20",
        ])
        .unwrap();
        assert!(config.app_settings().is_err());
    }
}
