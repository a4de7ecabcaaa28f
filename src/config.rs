use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Configuration for an archive download run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// URL of the exam material archive page
    #[serde(default = "default_archive_url")]
    pub archive_url: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Milliseconds to wait after each dropdown selection so dependent
    /// dropdowns can repopulate
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Milliseconds to wait between successful downloads (politeness to the
    /// remote server, not a correctness requirement)
    #[serde(default = "default_download_delay_ms")]
    pub download_delay_ms: u64,

    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Maximum download attempts per document (including the first)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base backoff delay between retries, in milliseconds
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Upper bound on the backoff delay, in milliseconds
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            archive_url: default_archive_url(),
            webdriver_url: default_webdriver_url(),
            settle_ms: default_settle_ms(),
            download_delay_ms: default_download_delay_ms(),
            http_timeout_secs: default_http_timeout_secs(),
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
        }
    }
}

impl ArchiveConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Retry policy derived from the backoff settings
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.backoff_base_ms),
            max_delay: Duration::from_millis(self.backoff_max_ms),
        }
    }

    /// Settle delay as a [`Duration`]
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Inter-download delay as a [`Duration`]
    pub fn download_delay(&self) -> Duration {
        Duration::from_millis(self.download_delay_ms)
    }

    /// HTTP timeout as a [`Duration`]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Default value for archive_url
fn default_archive_url() -> String {
    "https://www.examinations.ie/exammaterialarchive/?i=91.97.108.95.95.104".to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

/// Default settle delay after dropdown selections
fn default_settle_ms() -> u64 {
    2000
}

/// Default delay between downloads
fn default_download_delay_ms() -> u64 {
    2000
}

/// Default HTTP timeout
fn default_http_timeout_secs() -> u64 {
    30
}

/// Default number of download attempts
fn default_max_attempts() -> u32 {
    3
}

/// Default backoff base delay
fn default_backoff_base_ms() -> u64 {
    2000
}

/// Default backoff cap
fn default_backoff_max_ms() -> u64 {
    30000
}
