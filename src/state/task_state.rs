/// Lifecycle state definitions for fetch tasks
///
/// This module defines every state a fetch task passes through between being
/// spawned by the coordinator and terminating.
use std::fmt;

/// Represents the current state of a fetch task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    // ===== Setup =====
    /// Task value exists but has not been polled yet
    Created,

    /// Task is running on the runtime
    Started,

    // ===== Visit cycle =====
    /// Waiting on the HTTP response and its body
    Fetching,

    /// Running the link extractor over the body
    Extracting,

    /// Handing the body to the content callback
    InvokingCallback,

    /// Sending the discovered links to the coordinator
    Reporting,

    // ===== Exit =====
    /// Fetch, extraction or callback failed; nothing will be reported
    Failed,

    /// Task is done and its resources are released
    Terminated,
}

impl TaskState {
    /// Returns true if the task holds no more work
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }

    /// Checks whether moving from `self` to `next` is a legal transition
    ///
    /// ```text
    /// Created -> Started -> Fetching -> Extracting -> InvokingCallback -> Reporting -> Terminated
    ///               \__________\____________\______________\____________-> Failed -> Terminated
    /// ```
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        use TaskState::*;

        matches!(
            (self, next),
            (Created, Started)
                | (Started, Fetching)
                | (Fetching, Extracting)
                | (Extracting, InvokingCallback)
                | (InvokingCallback, Reporting)
                | (Reporting, Terminated)
                | (Started | Fetching | Extracting | InvokingCallback, Failed)
                | (Failed, Terminated)
        )
    }

    /// Short name used in log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Started => "started",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::InvokingCallback => "invoking_callback",
            Self::Reporting => "reporting",
            Self::Failed => "failed",
            Self::Terminated => "terminated",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
