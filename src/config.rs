//! Environment configuration
//!
//! Read once at startup, after `.env` has been loaded. Unset or unparseable values fall
//! back to their defaults.

use {
    crate::fetch::{DatasetSource, FileSource, HttpSource},
    std::{env, path::PathBuf, time::Duration},
};

pub const DEFAULT_DATASET_URL: &str = "http://localhost:8000/data.json";

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub dataset_url: String,
    /// Local GeoJSON file; takes precedence over the URL
    pub dataset_path: Option<PathBuf>,
    pub tick_interval_ms: u64,
    pub event_buffer: usize,
    /// File the filtered view JSON is written to for the map layer
    pub view_export_path: Option<PathBuf>,
    /// File or FIFO the map layer writes hovered postcodes to, one per line
    pub hover_feed_path: Option<PathBuf>,
    pub fetch_timeout_secs: u64,
    pub rust_log: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `DATASET_URL` (default: http://localhost:8000/data.json)
    /// - `DATASET_PATH` (optional, overrides the URL)
    /// - `TICK_INTERVAL_MS` (default: 1000)
    /// - `EVENT_CHANNEL_BUFFER` (default: 256)
    /// - `VIEW_EXPORT_PATH` (optional)
    /// - `HOVER_FEED_PATH` (optional)
    /// - `FETCH_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Self {
        Self {
            dataset_url: env::var("DATASET_URL")
                .unwrap_or_else(|_| DEFAULT_DATASET_URL.to_string()),

            dataset_path: non_empty_var("DATASET_PATH").map(PathBuf::from),

            tick_interval_ms: env::var("TICK_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(1_000),

            event_buffer: env::var("EVENT_CHANNEL_BUFFER")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(256),

            view_export_path: non_empty_var("VIEW_EXPORT_PATH").map(PathBuf::from),

            hover_feed_path: non_empty_var("HOVER_FEED_PATH").map(PathBuf::from),

            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),

            rust_log: env::var("RUST_LOG").ok(),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// The configured dataset source: local file if set, otherwise HTTP
    pub fn dataset_source(&self) -> Box<dyn DatasetSource> {
        match &self.dataset_path {
            Some(path) => Box::new(FileSource::new(path.clone())),
            None => Box::new(HttpSource::new(
                self.dataset_url.clone(),
                Duration::from_secs(self.fetch_timeout_secs),
            )),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
