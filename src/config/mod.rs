//! Configuration module for linkwalk
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. A configuration file is optional: every setting has a default.
//!
//! # Example
//!
//! ```no_run
//! use linkwalk::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("linkwalk.toml")).unwrap();
//! println!("Crawl deadline: {:?}", config.crawl.deadline());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, HttpConfig, OutputConfig, OutputMode};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
