use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for linkwalk
///
/// Every section is optional; an empty file (or no file at all) yields
/// `Config::default()`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub crawl: CrawlConfig,
    pub output: OutputConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout (milliseconds)
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,

    /// TCP/TLS connect timeout (milliseconds)
    #[serde(rename = "connect-timeout-ms")]
    pub connect_timeout_ms: u64,

    /// Accept gzip-encoded responses
    pub gzip: bool,

    /// Accept brotli-encoded responses
    pub brotli: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("linkwalk/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_ms: 30_000,
            connect_timeout_ms: 10_000,
            gzip: true,
            brotli: true,
        }
    }
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// Crawl run configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Stop the run after this many seconds even if fetches are outstanding.
    /// Absent means the run ends only at quiescence or on shutdown.
    #[serde(rename = "deadline-secs")]
    pub deadline_secs: Option<u64>,
}

impl CrawlConfig {
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// What to do with each fetched page body
    pub mode: OutputMode,
}

/// Built-in content callbacks selectable from the config file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// Print every body between separator lines
    #[default]
    Body,

    /// Print one `url<TAB>bytes` line per page
    Summary,

    /// Read and drop the body
    Discard,
}
