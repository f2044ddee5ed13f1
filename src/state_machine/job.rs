use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::JobState;

/// Coarse content kind assigned at ingestion time, immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    Text,
    Image,
    Pdf,
    Tabular,
    Unknown,
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Text => write!(f, "text"),
            ContentKind::Image => write!(f, "image"),
            ContentKind::Pdf => write!(f, "pdf"),
            ContentKind::Tabular => write!(f, "tabular"),
            ContentKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// The parsed, normalized result of a successful classification: everything
/// the pipeline needs to file the note.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionBundle {
    /// Normalized frontmatter mapping; contains every recognized key.
    pub metadata: serde_yaml::Mapping,
    pub summary: Option<String>,
    /// Vault-relative destination folder proposed by the model.
    pub folder: String,
    /// Destination filename, not yet sanitized.
    pub filename: String,
}

/// One unit of work: a single inbox file carried through the pipeline.
///
/// Identity fields (`source_path`, `display_name`, `raw_content`,
/// `content_kind`) are set at creation and never change. Classification
/// results are filled in stage by stage; which fields are populated is
/// determined by the current [`JobState`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub source_path: PathBuf,
    pub display_name: String,
    pub raw_content: Vec<u8>,
    pub content_kind: ContentKind,
    /// Present from `Classified` onwards; rewritten at most once by the
    /// orchestrator when the validator forces triage.
    pub metadata: Option<serde_yaml::Mapping>,
    pub summary: Option<String>,
    pub destination_folder: Option<String>,
    pub destination_filename: Option<String>,
    pub state: JobState,
    pub state_history: Vec<JobState>,
    /// Set exactly once, when the job fails. Never overwritten.
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(
        source_path: PathBuf,
        display_name: String,
        raw_content: Vec<u8>,
        content_kind: ContentKind,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            source_path,
            display_name,
            raw_content,
            content_kind,
            metadata: None,
            summary: None,
            destination_folder: None,
            destination_filename: None,
            state: JobState::Pending,
            state_history: Vec::new(),
            failure_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a successful classification and advance to `Classified`.
    pub fn mark_classified(&mut self, bundle: SuggestionBundle) {
        self.metadata = Some(bundle.metadata);
        self.summary = bundle.summary;
        self.destination_folder = Some(bundle.folder);
        self.destination_filename = Some(bundle.filename);
        self.advance(JobState::Classified);
    }

    /// Record the validated (possibly rewritten) destination folder and
    /// advance to `Validated`.
    pub fn mark_validated(&mut self, final_folder: String) {
        self.destination_folder = Some(final_folder);
        self.advance(JobState::Validated);
    }

    /// Record the resolved destination filename and advance to `Placed`.
    /// Does nothing unless the placement preconditions hold.
    pub fn mark_placed(&mut self, final_filename: String) {
        if !self.is_ready_to_place() {
            return;
        }
        self.destination_filename = Some(final_filename);
        self.advance(JobState::Placed);
    }

    /// Transition to the terminal `Failed` state with a reason.
    /// A no-op on jobs that already reached a terminal state, so the first
    /// recorded reason always wins.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if self.state.is_terminal() {
            return;
        }
        self.state_history.push(self.state);
        self.state = JobState::Failed;
        self.failure_reason = Some(reason.into());
        self.updated_at = Utc::now();
    }

    /// A job may only be placed once folder, filename and metadata are all
    /// populated and it has passed validation.
    pub fn is_ready_to_place(&self) -> bool {
        self.state == JobState::Validated
            && self.destination_folder.as_deref().is_some_and(|f| !f.is_empty())
            && self.destination_filename.as_deref().is_some_and(|f| !f.is_empty())
            && self.metadata.as_ref().is_some_and(|m| !m.is_empty())
    }

    fn advance(&mut self, next: JobState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transition {} → {next}",
            self.state
        );
        if self.state.can_advance_to(next) {
            self.state_history.push(self.state);
            self.state = next;
            self.updated_at = Utc::now();
        }
    }
}

/// Structured audit record produced when a job reaches a terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: String,
    pub display_name: String,
    pub content_kind: ContentKind,
    pub state: JobState,
    pub state_transitions: Vec<JobState>,
    /// Vault-relative final path, when the job was placed.
    pub destination: Option<String>,
    pub failure_reason: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl JobRecord {
    pub fn from_job(job: &Job) -> Self {
        let now = Utc::now();
        let duration = now - job.created_at;
        let mut transitions = job.state_history.clone();
        transitions.push(job.state);

        let destination = match (&job.destination_folder, &job.destination_filename) {
            (Some(folder), Some(name)) if job.state == JobState::Placed => {
                Some(format!("{folder}/{name}"))
            }
            _ => None,
        };

        Self {
            job_id: job.id.clone(),
            display_name: job.display_name.clone(),
            content_kind: job.content_kind,
            state: job.state,
            state_transitions: transitions,
            destination,
            failure_reason: job.failure_reason.clone(),
            started_at: job.created_at,
            completed_at: now,
            duration_ms: duration.num_milliseconds(),
        }
    }
}
