//! Crawler coordinator - the single owner of the visited ledger
//!
//! The coordinator receives link batches over its mailbox, drops URLs it has
//! already dispatched, marks the rest visited and spawns one fetch task per
//! new URL. It handles one batch at a time on one loop, and the ledger lives
//! inside the coordinator value rather than behind a lock. That
//! serialization is what guarantees each URL is fetched at most once.
//!
//! Spawned tasks are tracked in a `JoinSet` so a run can tell when it has
//! gone quiet and so that a deadline or shutdown can abort outstanding
//! fetches.

use crate::crawler::fetcher::{FetchTask, TaskOutcome};
use crate::crawler::protocol::{CoordinatorHandle, LinkBatch, SpawnDirective};
use crate::output::{CrawlReport, StopReason, TaskStats};
use crate::state::VisitedSet;
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

/// Run-level knobs for a coordinator
#[derive(Debug, Clone, Default)]
pub struct CoordinatorOptions {
    /// Stop the run after this long even if fetches are outstanding
    pub deadline: Option<Duration>,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    visited: VisitedSet,
    tasks: JoinSet<TaskOutcome>,
    mailbox: mpsc::UnboundedReceiver<LinkBatch>,
    /// Cloned into every spawned task as its parent handle
    handle: CoordinatorHandle,
    client: Client,
    options: CoordinatorOptions,
    batches_handled: u64,
    stats: TaskStats,
}

impl Coordinator {
    /// Creates a coordinator and the handle used to feed it
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client shared by every fetch task
    /// * `options` - Run-level options
    ///
    /// # Returns
    ///
    /// The coordinator and a handle for injecting the seed batch
    pub fn new(client: Client, options: CoordinatorOptions) -> (Self, CoordinatorHandle) {
        let (tx, mailbox) = mpsc::unbounded_channel();
        let handle = CoordinatorHandle::new(tx);

        let coordinator = Self {
            visited: VisitedSet::new(),
            tasks: JoinSet::new(),
            mailbox,
            handle: handle.clone(),
            client,
            options,
            batches_handled: 0,
            stats: TaskStats::default(),
        };

        (coordinator, handle)
    }

    /// The URLs dispatched so far
    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    /// Number of fetch tasks that have not finished yet
    pub fn outstanding(&self) -> usize {
        self.tasks.len()
    }

    /// Handles one link batch to completion
    ///
    /// For each URL in batch order: skip it if already visited, otherwise
    /// mark it and spawn a fetch task with the batch's callback. Re-offering
    /// visited URLs is not an error; they are simply skipped.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Returns
    ///
    /// The number of fetch tasks spawned
    pub fn handle_batch(&mut self, batch: LinkBatch) -> usize {
        self.batches_handled += 1;
        let mut spawned = 0;

        for link in batch.links {
            if !self.visited.mark(&link) {
                tracing::trace!(url = %link, "already visited");
                continue;
            }

            tracing::info!(url = %link, "visiting url");

            let directive = SpawnDirective {
                url: link,
                callback: batch.callback.clone(),
                parent: self.handle.clone(),
            };
            let task = FetchTask::new(directive, self.client.clone());
            self.tasks.spawn(task.run());
            spawned += 1;
        }

        spawned
    }

    /// Runs the coordinator loop until the crawl stops
    ///
    /// The loop ends when one of these happens:
    /// 1. Quiescence: at least one batch was handled, no fetch task is
    ///    outstanding and the mailbox is empty
    /// 2. The configured deadline passes
    /// 3. `shutdown` is cancelled
    ///
    /// In cases 2 and 3 outstanding fetch tasks are aborted. Batches still
    /// in the mailbox at that point are discarded.
    ///
    /// The coordinator keeps a sender of its own, so a closed mailbox never
    /// ends the loop: without a deadline or shutdown, `run` returns only
    /// after at least one batch has been submitted.
    pub async fn run(mut self, shutdown: CancellationToken) -> CrawlReport {
        let started_at = Utc::now();
        tracing::info!("coordinator started");

        let deadline = self.options.deadline;
        let expiry = async move {
            match deadline {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(expiry);

        let stop_reason = loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => break StopReason::Shutdown,

                _ = &mut expiry => break StopReason::Deadline,

                // The coordinator holds a sender itself, so recv never yields None.
                Some(batch) = self.mailbox.recv() => {
                    let spawned = self.handle_batch(batch);
                    tracing::debug!(
                        spawned,
                        outstanding = self.tasks.len(),
                        visited = self.visited.len(),
                        "batch handled"
                    );
                }

                Some(joined) = self.tasks.join_next() => self.record(joined),
            }

            if self.is_quiescent() {
                break StopReason::Quiescent;
            }
        };

        if stop_reason != StopReason::Quiescent {
            tracing::info!(
                reason = %stop_reason,
                outstanding = self.tasks.len(),
                "stopping crawl early"
            );
            self.tasks.abort_all();
            while let Some(joined) = self.tasks.join_next().await {
                self.record(joined);
            }
        }

        tracing::info!(
            visited = self.visited.len(),
            reported = self.stats.reported,
            failed = self.stats.failed,
            "coordinator stopped"
        );

        CrawlReport {
            visited: self.visited.to_sorted_strings(),
            stats: self.stats,
            batches_handled: self.batches_handled,
            started_at,
            finished_at: Utc::now(),
            stop_reason,
        }
    }

    /// Quiescent once seeded with nothing in flight and nothing queued
    fn is_quiescent(&mut self) -> bool {
        if self.batches_handled == 0 || !self.tasks.is_empty() {
            return false;
        }

        // A task's batch is sent before the task finishes, so anything it
        // reported is already in the mailbox.
        while let Ok(batch) = self.mailbox.try_recv() {
            self.handle_batch(batch);
        }

        self.tasks.is_empty()
    }

    /// Folds a finished task into the run statistics
    fn record(&mut self, joined: Result<TaskOutcome, JoinError>) {
        match joined {
            Ok(TaskOutcome::Reported { .. }) => self.stats.reported += 1,
            Ok(TaskOutcome::Failed { .. }) => self.stats.failed += 1,
            Err(e) if e.is_cancelled() => self.stats.aborted += 1,
            Err(e) => {
                tracing::error!(error = %e, "fetch task panicked");
                self.stats.panicked += 1;
            }
        }
    }
}
