//! The visited-URL ledger
//!
//! Owned by the coordinator and mutated only from its message loop. Entries
//! are never removed, so membership only grows for the lifetime of a run.

use std::collections::HashSet;
use url::Url;

/// Set of URLs already dispatched for fetching
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: HashSet<Url>,
}

impl VisitedSet {
    /// Creates an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL as visited
    ///
    /// This is the insert-if-absent primitive: the check and the insertion
    /// happen in one step.
    ///
    /// # Returns
    ///
    /// * `true` - The URL was not present and is now marked
    /// * `false` - The URL was already marked
    pub fn mark(&mut self, url: &Url) -> bool {
        if self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.clone())
    }

    /// Returns true if the URL has been marked
    pub fn contains(&self, url: &Url) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Iterates over the marked URLs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Url> {
        self.urls.iter()
    }

    /// Returns the marked URLs as sorted strings
    pub fn to_sorted_strings(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.urls.iter().map(|u| u.to_string()).collect();
        urls.sort();
        urls
    }
}
