//! Best-effort per-folder index of filed notes.
//!
//! Every successfully placed item gets one human-readable line appended to
//! `_index.md` inside its destination folder. The index is informational
//! only; a write failure is reported by the caller but never fails the job.

use std::io::Write as _;

use crate::state_machine::Job;
use crate::vault::Vault;

const INDEX_FILE: &str = "_index.md";

/// Append the job's entry to the destination folder's index.
pub fn update_index(vault: &Vault, job: &Job) -> std::io::Result<()> {
    let (Some(folder), Some(filename)) =
        (job.destination_folder.as_deref(), job.destination_filename.as_deref())
    else {
        return Ok(());
    };

    let priority = metadata_str(job, "priority");
    let kind = metadata_str(job, "type");
    let summary = job.summary.as_deref().unwrap_or("");

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(vault.absolute(folder).join(INDEX_FILE))?;
    writeln!(
        file,
        "- [[{filename}]] (Priority: {priority}, Type: {kind}) - {summary}"
    )?;
    Ok(())
}

fn metadata_str<'a>(job: &'a Job, key: &str) -> &'a str {
    job.metadata
        .as_ref()
        .and_then(|m| m.get(key))
        .and_then(|v| v.as_str())
        .unwrap_or("N/A")
}
