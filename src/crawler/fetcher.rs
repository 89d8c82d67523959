//! Fetch tasks
//!
//! This module handles the per-URL unit of work, including:
//! - Building the shared HTTP client
//! - Fetching one page body
//! - Running the link extractor and the content callback over it
//! - Reporting the discovered links to the coordinator
//!
//! A fetch task never recurses and never deduplicates; both are the
//! coordinator's job.

use crate::config::HttpConfig;
use crate::crawler::callback::SharedCallback;
use crate::crawler::parser::extract_links;
use crate::crawler::protocol::{CoordinatorHandle, LinkBatch, SpawnDirective};
use crate::state::TaskState;
use crate::CrawlError;
use bytes::Bytes;
use reqwest::Client;
use std::io::Cursor;
use url::Url;

/// Result of a finished fetch task, as seen by its supervisor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The page was visited and a batch of `links` URLs was reported
    Reported { url: Url, links: usize },

    /// Fetch, extraction or callback failed; nothing was reported
    Failed { url: Url, error: String },
}

impl TaskOutcome {
    pub fn url(&self) -> &Url {
        match self {
            Self::Reported { url, .. } | Self::Failed { url, .. } => url,
        }
    }

    pub fn is_reported(&self) -> bool {
        matches!(self, Self::Reported { .. })
    }
}

/// Builds the HTTP client shared by every fetch task of a run
///
/// Redirects follow reqwest's default policy. Response status codes are not
/// inspected by the crawler, so the client does not error on them either.
///
/// # Example
///
/// ```
/// use linkwalk::config::HttpConfig;
/// use linkwalk::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// # let _ = client;
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout())
        .connect_timeout(config.connect_timeout())
        .gzip(config.gzip)
        .brotli(config.brotli)
        .build()
}

/// Fetches the complete body of `url`
///
/// Any response that arrives counts as success regardless of its status;
/// only transport failures (DNS, refused connection, timeout, truncated
/// body) are errors.
pub async fn fetch_body(client: &Client, url: &Url) -> Result<Bytes, CrawlError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| CrawlError::Http {
            url: url.to_string(),
            source,
        })?;

    tracing::debug!(url = %url, status = response.status().as_u16(), "response received");

    response.bytes().await.map_err(|source| CrawlError::Http {
        url: url.to_string(),
        source,
    })
}

/// One isolated fetch-extract-callback-report cycle for a single URL
pub struct FetchTask {
    url: Url,
    parent: CoordinatorHandle,
    callback: SharedCallback,
    client: Client,
    state: TaskState,
}

impl FetchTask {
    /// Creates a task in the `Created` state
    pub fn new(directive: SpawnDirective, client: Client) -> Self {
        Self {
            url: directive.url,
            parent: directive.parent,
            callback: directive.callback,
            client,
            state: TaskState::Created,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Runs the task to completion
    ///
    /// On success exactly one batch (possibly empty) is sent to the parent.
    /// On failure the error is logged and nothing is sent. Either way the
    /// response, body buffer and parent handle are released when this
    /// returns.
    pub async fn run(mut self) -> TaskOutcome {
        let outcome = match self.visit().await {
            Ok(links) => self.report(links),
            Err(e) => {
                self.settle(TaskState::Failed);
                tracing::error!(url = %self.url, error = %e, "visit error");
                TaskOutcome::Failed {
                    url: self.url.clone(),
                    error: e.to_string(),
                }
            }
        };

        self.settle(TaskState::Terminated);
        tracing::info!(url = %self.url, "visitor stopped");
        outcome
    }

    /// Fetches, extracts and hands the body to the callback
    async fn visit(&mut self) -> Result<Vec<Url>, CrawlError> {
        self.transition(TaskState::Started)?;
        tracing::info!(url = %self.url, "visitor started");

        self.transition(TaskState::Fetching)?;
        let body = fetch_body(&self.client, &self.url).await?;

        self.transition(TaskState::Extracting)?;
        let links = extract_links(&body, &self.url)?;
        tracing::debug!(url = %self.url, links = links.len(), "links extracted");

        self.transition(TaskState::InvokingCallback)?;
        let mut reader = Cursor::new(body);
        self.callback
            .visit(&self.url, &mut reader)
            .map_err(|source| CrawlError::Callback {
                url: self.url.to_string(),
                source,
            })?;

        Ok(links)
    }

    /// Sends the single batch this task is allowed to send
    fn report(&mut self, links: Vec<Url>) -> TaskOutcome {
        self.settle(TaskState::Reporting);

        let count = links.len();
        let batch = LinkBatch::new(links, self.callback.clone());
        if let Err(e) = self.parent.submit(batch) {
            // The run is shutting down; the links are dropped with it.
            tracing::debug!(url = %self.url, error = %e, "batch not delivered");
        }

        TaskOutcome::Reported {
            url: self.url.clone(),
            links: count,
        }
    }

    fn transition(&mut self, next: TaskState) -> Result<(), CrawlError> {
        if !self.state.can_transition_to(next) {
            return Err(CrawlError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::trace!(url = %self.url, from = %self.state, to = %next, "task transition");
        self.state = next;
        Ok(())
    }

    /// Transition on an exit path, where there is no caller to return to
    fn settle(&mut self, next: TaskState) {
        if let Err(e) = self.transition(next) {
            tracing::warn!(url = %self.url, error = %e, "unexpected task transition");
            self.state = next;
        }
    }
}
