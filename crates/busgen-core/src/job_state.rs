//! Generation job state machine

use serde::{Deserialize, Serialize};

/// Generation job states
///
/// State transitions:
/// ```text
/// Pending → Running → Done
///    │         │
///    └─────────┴────→ Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Job is queued and waiting for a worker
    #[default]
    Pending,
    /// Job is executing the synthesis pipeline
    Running,
    /// Job produced an artifact
    Done,
    /// Job failed; the error is kept for every waiter
    Failed,
}

impl JobState {
    /// Check if this state can transition to the target state
    pub fn can_transition_to(&self, target: JobState) -> bool {
        use JobState::*;
        matches!(
            (self, target),
            (Pending, Running) | (Running, Done) | (Running, Failed)
                // Rejected before a worker picked it up
                | (Pending, Failed)
        )
    }

    /// Check if the job still occupies its target's single-flight slot
    pub fn is_in_flight(&self) -> bool {
        matches!(self, JobState::Pending | JobState::Running)
    }

    /// Check if the job is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Done | JobState::Failed)
    }

    /// Get a human-readable description of this state
    pub fn description(&self) -> &'static str {
        match self {
            JobState::Pending => "Job is waiting for a worker",
            JobState::Running => "Job is generating source",
            JobState::Done => "Job produced an artifact",
            JobState::Failed => "Job failed",
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Pending => write!(f, "PENDING"),
            JobState::Running => write!(f, "RUNNING"),
            JobState::Done => write!(f, "DONE"),
            JobState::Failed => write!(f, "FAILED"),
        }
    }
}
