//! Dataset fetch
//!
//! One attempt, no retry. The result is delivered to the runtime as a single
//! [`Event::DatasetLoaded`] or [`Event::DatasetFailed`].

use {
    crate::{dataset::Dataset, state::Event},
    async_trait::async_trait,
    std::{path::PathBuf, time::Duration},
    tokio::sync::mpsc,
};

#[derive(Debug)]
pub enum FetchError {
    Http(reqwest::Error),
    Status(reqwest::StatusCode),
    Decode(serde_json::Error),
    Io(std::io::Error),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Http(e) => write!(f, "request failed: {}", e),
            FetchError::Status(status) => write!(f, "dataset server returned {}", status),
            FetchError::Decode(e) => write!(f, "dataset is not valid GeoJSON: {}", e),
            FetchError::Io(e) => write!(f, "could not read dataset: {}", e),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Http(e)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e)
    }
}

impl From<std::io::Error> for FetchError {
    fn from(e: std::io::Error) -> Self {
        FetchError::Io(e)
    }
}

/// Where the dataset comes from
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn fetch(&self) -> Result<Dataset, FetchError>;

    /// Human-readable location for logs
    fn describe(&self) -> String;
}

/// HTTP GET with a cache-busting query token
pub struct HttpSource {
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    /// Append `token` as a bare query component
    pub fn busted_url(&self, token: &str) -> String {
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.url, separator, token)
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    async fn fetch(&self) -> Result<Dataset, FetchError> {
        let token = chrono::Utc::now().timestamp_millis().to_string();
        let url = self.busted_url(&token);

        let client = reqwest::Client::builder().timeout(self.timeout).build()?;
        let response = client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let body = response.text().await?;
        Ok(Dataset::from_geojson(&body)?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// GeoJSON document on local disk
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for FileSource {
    async fn fetch(&self) -> Result<Dataset, FetchError> {
        let body = tokio::fs::read_to_string(&self.path).await?;
        Ok(Dataset::from_geojson(&body)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fetch once and report the outcome as an event
pub async fn load_dataset_task(source: Box<dyn DatasetSource>, tx: mpsc::Sender<Event>) {
    log::info!("📥 Fetching dataset from {}", source.describe());

    let event = match source.fetch().await {
        Ok(dataset) => {
            log::info!("✅ Dataset fetched: {} postcodes", dataset.len());
            Event::DatasetLoaded(dataset)
        }
        Err(e) => {
            log::warn!("⚠️  Dataset unavailable, dashboard stays empty: {}", e);
            Event::DatasetFailed(e.to_string())
        }
    };

    if tx.send(event).await.is_err() {
        log::debug!("Runtime gone before dataset arrived");
    }
}
