//! Output module for page bodies and crawl reports
//!
//! This module handles:
//! - The built-in content callbacks selected by `[output] mode`
//! - The report a finished crawl returns, and its text rendering

pub mod report;
pub mod sink;

pub use report::{format_report, print_report, CrawlReport, StopReason, TaskStats};
pub use sink::{callback_for_mode, Discard, PageSummary, PrintBody};
