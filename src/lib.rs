//! Linkwalk: a concurrent, deduplicating web crawler
//!
//! Starting from a seed URL, linkwalk fetches each page, extracts its anchor
//! links and dispatches a fetch for every link it has not seen before. A
//! single coordinator owns the visited ledger, so every distinct URL is
//! fetched at most once per run no matter how many pages reference it.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for linkwalk operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Content callback failed for {url}: {source}")]
    Callback { url: String, source: CallbackError },

    #[error("Invalid task transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::TaskState,
        to: state::TaskState,
    },

    #[error("Coordinator mailbox is closed")]
    MailboxClosed,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL '{input}': {source}")]
    Parse {
        input: String,
        source: ::url::ParseError,
    },

    #[error("Failed to resolve '{href}' against {base}: {source}")]
    Resolve {
        href: String,
        base: String,
        source: ::url::ParseError,
    },

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// Errors raised by a content callback
#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Rejected(String),
}

/// Result type alias for linkwalk operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, crawl_with, ContentCallback, Coordinator, CoordinatorHandle, LinkBatch};
pub use output::{CrawlReport, StopReason};
pub use state::{TaskState, VisitedSet};
pub use crate::url::{parse_seed, resolve_href};
