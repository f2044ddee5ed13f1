use anyhow::Result;

use crate::config::GardenerConfig;
use crate::gemini::ContentGenerator;
use crate::indexer::update_index;
use crate::ingestor::scan_inbox;
use crate::metadata::apply_forced_triage;
use crate::processor::{ClassifyError, classify_job, fallback_bundle};
use crate::router::file_note;
use crate::state_machine::{Job, JobRecord, JobState};
use crate::ui::JobProgress;
use crate::vault::{Vault, validate_destination};

/// Drives every inbox file through the full pipeline: classify, validate,
/// file, index. One pass, one job at a time, in inbox listing order.
pub struct Pipeline<C> {
    client: C,
    vault: Vault,
    model: String,
    dry_run: bool,
    allow_new_folders: bool,
}

/// Aggregated outcome of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub records: Vec<JobRecord>,
    /// Jobs whose proposed destination was rejected and rewritten to triage.
    pub forced_triage: usize,
}

impl PipelineReport {
    pub fn placed(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.state == JobState::Placed)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.state == JobState::Failed)
            .count()
    }
}

impl<C: ContentGenerator> Pipeline<C> {
    pub fn new(client: C, vault: Vault, config: &GardenerConfig) -> Self {
        Self {
            client,
            vault,
            model: config.model.clone(),
            dry_run: config.dry_run,
            allow_new_folders: config.allow_new_folders,
        }
    }

    /// Process every file currently in the inbox. A single job's failure is
    /// recorded and never aborts the run.
    pub async fn run(&self) -> Result<PipelineReport> {
        let folders = self.vault.known_folders();
        let mut jobs = scan_inbox(&self.vault)?;

        let mut records = Vec::with_capacity(jobs.len());
        let mut forced_triage = 0;

        for job in &mut jobs {
            let progress = JobProgress::start(&job.display_name);
            if self.run_job(job, &folders, &progress).await {
                forced_triage += 1;
            }
            let record = JobRecord::from_job(job);
            progress.complete(&record);
            records.push(record);
        }

        Ok(PipelineReport {
            records,
            forced_triage,
        })
    }

    /// Carry one job to a terminal state. Returns whether the destination
    /// validator forced the item back to triage.
    async fn run_job(&self, job: &mut Job, folders: &[String], progress: &JobProgress) -> bool {
        // PENDING → CLASSIFIED. Model and parse failures are not retried;
        // they downgrade to the fixed safe suggestion so the job still
        // reaches an inspectable terminal state.
        let bundle = match classify_job(&self.client, &self.model, job, folders).await {
            Ok(bundle) => bundle,
            Err(err @ (ClassifyError::Model(_) | ClassifyError::Parse(_))) => {
                progress.warn(&format!("{err}; falling back to triage"));
                fallback_bundle(&job.display_name)
            }
            Err(err @ ClassifyError::Unsupported(_)) => {
                job.fail(err.to_string());
                return false;
            }
        };
        job.mark_classified(bundle);
        progress.update_state(job.state);

        // CLASSIFIED → VALIDATED. Never fails; worst case is a rewrite to
        // the inbox plus the triage override on the metadata.
        let proposed = job.destination_folder.clone().unwrap_or_default();
        let (final_folder, forced) =
            validate_destination(&proposed, folders, self.allow_new_folders);
        if forced {
            progress.warn(&format!(
                "unsafe or unknown destination `{proposed}`; forced to triage"
            ));
            if let Some(metadata) = job.metadata.as_mut() {
                apply_forced_triage(metadata);
            }
        }
        job.mark_validated(final_folder);
        progress.update_state(job.state);

        // VALIDATED → PLACED. Filesystem failures are fatal to the job and
        // leave the source untouched in the inbox.
        match file_note(&self.vault, job, self.dry_run) {
            Ok(final_name) => {
                job.mark_placed(final_name);
                if !self.dry_run
                    && let Err(err) = update_index(&self.vault, job)
                {
                    // Informational only; never fails the job.
                    progress.warn(&format!("index update failed: {err}"));
                }
            }
            Err(err) => job.fail(err.to_string()),
        }

        forced
    }
}
