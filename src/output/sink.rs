//! Built-in content callbacks
//!
//! These are the callbacks the command line can select with
//! `[output] mode`. Library users can pass any other `ContentCallback`.

use crate::config::OutputMode;
use crate::crawler::{ContentCallback, SharedCallback};
use crate::CallbackError;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex};
use tokio::runtime::{Handle, RuntimeFlavor};
use url::Url;

const SEPARATOR: &str = "================================================";

/// Runs blocking writes, moving other tasks off this worker when possible
///
/// Callbacks run on the fetch task, so a large body written to a slow
/// stdout would otherwise stall every task scheduled on the same worker.
/// `block_in_place` is unavailable on a current-thread runtime; there the
/// write simply runs inline.
fn write_blocking<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

/// Writes each body between separator lines
pub struct PrintBody<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> PrintBody<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl PrintBody<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ContentCallback for PrintBody<W> {
    fn visit(&self, _page: &Url, body: &mut dyn Read) -> Result<(), CallbackError> {
        write_blocking(|| -> Result<(), CallbackError> {
            // Bodies from concurrent tasks must not interleave.
            let mut out = self
                .out
                .lock()
                .map_err(|_| CallbackError::Rejected("output lock poisoned".to_string()))?;

            writeln!(out, "{}", SEPARATOR)?;
            io::copy(body, &mut *out)?;
            writeln!(out)?;
            writeln!(out, "{}", SEPARATOR)?;
            out.flush()?;
            Ok(())
        })
    }
}

/// Writes one `url<TAB>bytes` line per page
pub struct PageSummary<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> PageSummary<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl PageSummary<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ContentCallback for PageSummary<W> {
    fn visit(&self, page: &Url, body: &mut dyn Read) -> Result<(), CallbackError> {
        let bytes = io::copy(body, &mut io::sink())?;

        write_blocking(|| -> Result<(), CallbackError> {
            let mut out = self
                .out
                .lock()
                .map_err(|_| CallbackError::Rejected("output lock poisoned".to_string()))?;
            writeln!(out, "{}\t{}", page, bytes)?;
            Ok(())
        })
    }
}

/// Reads the body and drops it
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl ContentCallback for Discard {
    fn visit(&self, _page: &Url, body: &mut dyn Read) -> Result<(), CallbackError> {
        io::copy(body, &mut io::sink())?;
        Ok(())
    }
}

/// Picks the stdout-backed callback for an output mode
pub fn callback_for_mode(mode: OutputMode) -> SharedCallback {
    match mode {
        OutputMode::Body => Arc::new(PrintBody::stdout()),
        OutputMode::Summary => Arc::new(PageSummary::stdout()),
        OutputMode::Discard => Arc::new(Discard),
    }
}
