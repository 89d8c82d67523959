//! Messages exchanged between fetch tasks and the coordinator
//!
//! Two shapes flow through a crawl:
//!
//! - [`LinkBatch`]: seed injection or fetch task -> coordinator, carrying
//!   the discovered URLs and the callback to use when fetching them
//! - [`SpawnDirective`]: coordinator -> new fetch task, carrying the one URL
//!   the task owns
//!
//! Delivery is fire-and-forget over an unbounded single-consumer channel:
//! no acknowledgement, no retry, no backpressure. Messages from one sender
//! arrive in order; each fetch task sends at most one batch.

use crate::crawler::callback::SharedCallback;
use crate::CrawlError;
use std::fmt;
use tokio::sync::mpsc;
use url::Url;

/// A batch of discovered URLs plus the content callback to propagate
#[derive(Clone)]
pub struct LinkBatch {
    /// URLs in discovery order, possibly with duplicates
    pub links: Vec<Url>,

    /// Callback to run on each page once fetched
    pub callback: SharedCallback,
}

impl LinkBatch {
    pub fn new(links: Vec<Url>, callback: SharedCallback) -> Self {
        Self { links, callback }
    }

    /// Builds the batch that starts a crawl
    pub fn seed(url: Url, callback: SharedCallback) -> Self {
        Self::new(vec![url], callback)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl fmt::Debug for LinkBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkBatch")
            .field("links", &self.links)
            .finish_non_exhaustive()
    }
}

/// Everything a new fetch task is handed at spawn time
pub struct SpawnDirective {
    /// The URL the task owns
    pub url: Url,

    /// Callback inherited unchanged from the batch that discovered `url`
    pub callback: SharedCallback,

    /// Where the task reports its links
    pub parent: CoordinatorHandle,
}

/// Sending side of the coordinator's mailbox
///
/// Cheap to clone; every fetch task holds one.
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    tx: mpsc::UnboundedSender<LinkBatch>,
}

impl CoordinatorHandle {
    pub(crate) fn new(tx: mpsc::UnboundedSender<LinkBatch>) -> Self {
        Self { tx }
    }

    /// Delivers a batch to the coordinator
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The batch is queued
    /// * `Err(CrawlError::MailboxClosed)` - The coordinator has stopped
    pub fn submit(&self, batch: LinkBatch) -> Result<(), CrawlError> {
        self.tx.send(batch).map_err(|_| CrawlError::MailboxClosed)
    }

    /// Returns true once the coordinator has stopped receiving
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
