mod job;
mod state;

pub use job::{ContentKind, Job, JobRecord, SuggestionBundle};
pub use state::JobState;
