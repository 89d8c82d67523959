//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `TaskState`: Lifecycle of an individual fetch task
//! - `VisitedSet`: The coordinator-owned ledger of URLs already dispatched

mod task_state;
mod visited;

// Re-export main types
pub use task_state::TaskState;
pub use visited::VisitedSet;
