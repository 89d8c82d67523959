//! Pluggable content callbacks
//!
//! A content callback decides what happens to the body of every page the
//! crawl fetches. The crawler treats it as opaque: it is called once per
//! successfully fetched page with a reader over the complete body, and an
//! error from it fails that page's task like a transport error would.

use crate::CallbackError;
use std::io::Read;
use std::sync::Arc;
use url::Url;

/// What to do with a fetched page body
///
/// Implementations are shared by every task of a run, so they must be
/// `Send + Sync`. They run synchronously on the fetch task's async worker,
/// so an implementation that does slow blocking IO should wrap it in
/// `tokio::task::block_in_place`, as the built-in stdout sinks do.
pub trait ContentCallback: Send + Sync {
    /// Consumes the body of `page`
    ///
    /// `body` yields the complete, unmodified response body and is handed
    /// over exactly once per page.
    fn visit(&self, page: &Url, body: &mut dyn Read) -> Result<(), CallbackError>;
}

/// Shared handle threaded through link batches and spawn directives
pub type SharedCallback = Arc<dyn ContentCallback>;

impl<F> ContentCallback for F
where
    F: Fn(&Url, &mut dyn Read) -> Result<(), CallbackError> + Send + Sync,
{
    fn visit(&self, page: &Url, body: &mut dyn Read) -> Result<(), CallbackError> {
        self(page, body)
    }
}

/// Wraps a closure as a shared callback
///
/// # Example
///
/// ```
/// use linkwalk::crawler::callback_fn;
/// use std::io::Read;
///
/// let callback = callback_fn(|page, body| {
///     let mut text = String::new();
///     body.read_to_string(&mut text)?;
///     println!("{page}: {} bytes", text.len());
///     Ok(())
/// });
/// # let _ = callback;
/// ```
pub fn callback_fn<F>(f: F) -> SharedCallback
where
    F: Fn(&Url, &mut dyn Read) -> Result<(), CallbackError> + Send + Sync + 'static,
{
    Arc::new(f)
}
