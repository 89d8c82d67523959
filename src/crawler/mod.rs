//! Crawler module: coordination of concurrent fetch tasks
//!
//! This module contains the core crawling logic, including:
//! - Link extraction from HTML
//! - The per-URL fetch task
//! - The coordinator that owns the visited ledger and spawns tasks
//! - The messages connecting the two

mod callback;
mod coordinator;
mod fetcher;
mod parser;
mod protocol;

pub use callback::{callback_fn, ContentCallback, SharedCallback};
pub use coordinator::{Coordinator, CoordinatorOptions};
pub use fetcher::{build_http_client, fetch_body, FetchTask, TaskOutcome};
pub use parser::extract_links;
pub use protocol::{CoordinatorHandle, LinkBatch, SpawnDirective};

use crate::config::Config;
use crate::output::{callback_for_mode, CrawlReport};
use crate::CrawlError;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Runs a complete crawl with the callback selected by the configuration
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Start a coordinator
/// 3. Inject the seed as the first link batch
/// 4. Run until quiescence, the configured deadline, or `shutdown`
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - The URL to start from
/// * `shutdown` - Cancel to stop the crawl early
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The crawl ran; see the report for how it ended
/// * `Err(CrawlError)` - The crawl could not start
pub async fn crawl(
    config: &Config,
    seed: Url,
    shutdown: CancellationToken,
) -> Result<CrawlReport, CrawlError> {
    let callback = callback_for_mode(config.output.mode);
    crawl_with(config, seed, callback, shutdown).await
}

/// Runs a complete crawl with a caller-supplied content callback
///
/// # Example
///
/// ```no_run
/// use linkwalk::config::Config;
/// use linkwalk::crawler::{callback_fn, crawl_with};
/// use tokio_util::sync::CancellationToken;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let seed = Url::parse("https://example.com/")?;
/// let callback = callback_fn(|page, _body| {
///     println!("fetched {page}");
///     Ok(())
/// });
/// let report = crawl_with(&Config::default(), seed, callback, CancellationToken::new()).await?;
/// println!("{} pages visited", report.visited.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl_with(
    config: &Config,
    seed: Url,
    callback: SharedCallback,
    shutdown: CancellationToken,
) -> Result<CrawlReport, CrawlError> {
    let client = build_http_client(&config.http)?;
    let options = CoordinatorOptions {
        deadline: config.crawl.deadline(),
    };

    let (coordinator, handle) = Coordinator::new(client, options);

    tracing::info!(seed = %seed, "injecting seed");
    handle.submit(LinkBatch::seed(seed, callback))?;
    drop(handle);

    Ok(coordinator.run(shutdown).await)
}
