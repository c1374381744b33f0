use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle state. Never persisted: every read path recomputes it
/// from the deadline and submission count so a stored copy can never
/// drift from the facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Open,
    Judging,
    Closed,
}

impl TaskStatus {
    /// Total over its whole input domain; never fails.
    ///
    /// A task past its deadline is Closed even when it has submissions.
    /// Judging is only reachable strictly before the deadline.
    pub fn derive(deadline: u64, submission_count: u64, now: u64) -> Self {
        if now > deadline {
            TaskStatus::Closed
        } else if submission_count > 0 {
            TaskStatus::Judging
        } else {
            TaskStatus::Open
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskStatus::Open => "Open",
            TaskStatus::Judging => "Judging",
            TaskStatus::Closed => "Closed",
        };
        f.write_str(label)
    }
}
