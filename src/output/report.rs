//! Crawl run report
//!
//! What a finished coordinator hands back, plus a human-readable rendering
//! for the command line.

use chrono::{DateTime, Utc};
use std::fmt::{self, Write};

/// Why a crawl run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// Every dispatched fetch finished and no batch is waiting
    Quiescent,

    /// The configured crawl deadline passed
    Deadline,

    /// An external shutdown was requested
    Shutdown,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quiescent => "quiescent",
            Self::Deadline => "deadline",
            Self::Shutdown => "shutdown",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the fetch tasks of a run ended
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    /// Tasks that visited their page and reported a batch
    pub reported: u64,

    /// Tasks that failed to fetch, extract or run the callback
    pub failed: u64,

    /// Tasks cancelled by a deadline or shutdown
    pub aborted: u64,

    /// Tasks that panicked
    pub panicked: u64,
}

impl TaskStats {
    pub fn total(&self) -> u64 {
        self.reported + self.failed + self.aborted + self.panicked
    }
}

/// Summary of a finished crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Every URL dispatched for fetching, sorted
    pub visited: Vec<String>,

    /// Task outcome counts
    pub stats: TaskStats,

    /// Link batches the coordinator handled, seed included
    pub batches_handled: u64,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    pub stop_reason: StopReason,
}

impl CrawlReport {
    /// Wall-clock duration of the run
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Returns true if `url` was dispatched during the run
    pub fn was_visited(&self, url: &str) -> bool {
        self.visited.binary_search_by(|v| v.as_str().cmp(url)).is_ok()
    }
}

/// Renders a report as plain text
pub fn format_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "=== Crawl Report ===\n");
    let _ = writeln!(out, "Stopped: {}", report.stop_reason);
    let _ = writeln!(out, "Started: {}", report.started_at.to_rfc3339());
    let _ = writeln!(out, "Duration: {:.3}s", report.duration().num_milliseconds() as f64 / 1000.0);
    let _ = writeln!(out);

    let _ = writeln!(out, "Tasks:");
    let _ = writeln!(out, "  Reported: {}", report.stats.reported);
    let _ = writeln!(out, "  Failed: {}", report.stats.failed);
    if report.stats.aborted > 0 {
        let _ = writeln!(out, "  Aborted: {}", report.stats.aborted);
    }
    if report.stats.panicked > 0 {
        let _ = writeln!(out, "  Panicked: {}", report.stats.panicked);
    }
    let _ = writeln!(out, "  Batches handled: {}", report.batches_handled);
    let _ = writeln!(out);

    let _ = writeln!(out, "Visited URLs ({}):", report.visited.len());
    for url in &report.visited {
        let _ = writeln!(out, "  - {}", url);
    }

    out
}

/// Prints a report to stdout
pub fn print_report(report: &CrawlReport) {
    print!("{}", format_report(report));
}
