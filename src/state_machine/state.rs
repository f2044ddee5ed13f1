use std::fmt;

use serde::{Deserialize, Serialize};

/// The five states of the triage job state machine.
///
/// Each job flows through: PENDING → CLASSIFIED → VALIDATED → PLACED,
/// or drops to FAILED from any non-terminal state. Both PLACED and FAILED
/// are terminal; a job never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Pending,
    Classified,
    Validated,
    Placed,
    Failed,
}

impl JobState {
    /// Whether the state machine accepts a direct transition to `next`.
    ///
    /// Failure is reachable from every non-terminal state; success advances
    /// one step at a time.
    pub fn can_advance_to(self, next: JobState) -> bool {
        matches!(
            (self, next),
            (JobState::Pending, JobState::Classified)
                | (JobState::Classified, JobState::Validated)
                | (JobState::Validated, JobState::Placed)
                | (JobState::Pending, JobState::Failed)
                | (JobState::Classified, JobState::Failed)
                | (JobState::Validated, JobState::Failed)
        )
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Placed | JobState::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Pending => write!(f, "PENDING"),
            JobState::Classified => write!(f, "CLASSIFIED"),
            JobState::Validated => write!(f, "VALIDATED"),
            JobState::Placed => write!(f, "PLACED"),
            JobState::Failed => write!(f, "FAILED"),
        }
    }
}
