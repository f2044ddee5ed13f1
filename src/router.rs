//! Files a validated job into the vault.
//!
//! The router owns the only destructive step of the pipeline, so the write
//! order is fixed: the annotated copy is written at the destination first and
//! the inbox source is removed only after that write succeeded. When the
//! destination is the source itself (the triage fallback) the rewrite goes
//! through a temporary file and an atomic rename. A crash mid-operation
//! leaves at most a duplicate, never data loss.

use std::path::PathBuf;

use crate::error::GardenerError;
use crate::filename::{resolve_conflict, sanitize};
use crate::metadata::render_frontmatter;
use crate::state_machine::Job;
use crate::vault::Vault;

/// Write the job's content, frontmatter prepended, to its validated
/// destination and remove the inbox source. Returns the final filename
/// actually used (conflict suffix included).
///
/// In dry-run mode the intended actions are logged and nothing is touched.
pub fn file_note(vault: &Vault, job: &Job, dry_run: bool) -> Result<String, GardenerError> {
    let (Some(folder), Some(filename), Some(metadata)) = (
        job.destination_folder.as_deref(),
        job.destination_filename.as_deref(),
        job.metadata.as_ref(),
    ) else {
        return Err(GardenerError::MissingDestination);
    };

    let filename = sanitize(filename);
    let frontmatter = render_frontmatter(metadata)?;
    let dest_dir = vault.absolute(folder);
    let candidate = dest_dir.join(&filename);

    let mut content = Vec::with_capacity(frontmatter.len() + 1 + job.raw_content.len());
    content.extend_from_slice(frontmatter.as_bytes());
    content.push(b'\n');
    content.extend_from_slice(&job.raw_content);

    // Triage fallback can resolve to the file's own location; rewrite in
    // place instead of colliding with ourselves.
    if candidate == job.source_path {
        if dry_run {
            println!("  [dry-run] would rewrite {} in place", job.display_name);
            return Ok(filename);
        }
        let tmp = tmp_path(&job.source_path);
        std::fs::write(&tmp, &content)?;
        std::fs::rename(&tmp, &job.source_path)?;
        return Ok(filename);
    }

    if dry_run {
        println!(
            "  [dry-run] would move {} to {folder}/{filename}",
            job.display_name
        );
        return Ok(filename);
    }

    std::fs::create_dir_all(&dest_dir)?;
    let final_path = resolve_conflict(&candidate)?;

    if let Err(e) = std::fs::write(&final_path, &content) {
        // A partially written destination must not survive.
        let _ = std::fs::remove_file(&final_path);
        return Err(e.into());
    }
    std::fs::remove_file(&job.source_path)?;

    let final_name = final_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(&filename)
        .to_string();
    Ok(final_name)
}

fn tmp_path(source: &PathBuf) -> PathBuf {
    let mut os = source.clone().into_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::metadata::fallback_metadata;
    use crate::state_machine::{ContentKind, SuggestionBundle};
    use crate::suggestion::METADATA_MARKER;

    fn setup() -> (TempDir, Vault) {
        let tmp = TempDir::new().unwrap();
        let vault = Vault::new(tmp.path());
        vault.ensure_layout().unwrap();
        (tmp, vault)
    }

    fn classified_job(vault: &Vault, name: &str, content: &[u8], folder: &str) -> Job {
        let source = vault.inbox_dir().join(name);
        std::fs::write(&source, content).unwrap();
        let mut job = Job::new(source, name.to_string(), content.to_vec(), ContentKind::Text);
        job.mark_classified(SuggestionBundle {
            metadata: fallback_metadata(),
            summary: Some("A note.".into()),
            folder: folder.to_string(),
            filename: name.to_string(),
        });
        job.mark_validated(folder.to_string());
        job
    }

    #[test]
    fn files_note_with_frontmatter_and_removes_source() {
        let (_tmp, vault) = setup();
        let job = classified_job(&vault, "idea.md", b"the original body", "03_Resources/Notes");

        let final_name = file_note(&vault, &job, false).unwrap();
        assert_eq!(final_name, "idea.md");
        assert!(!job.source_path.exists());

        let written =
            std::fs::read_to_string(vault.absolute("03_Resources/Notes/idea.md")).unwrap();
        assert!(written.starts_with(METADATA_MARKER));
        assert!(written.contains("status: triage"));
        assert!(written.ends_with("the original body"));
    }

    #[test]
    fn filed_note_round_trips_original_content() {
        let (_tmp, vault) = setup();
        let body = b"line one\nline two\n";
        let job = classified_job(&vault, "note.md", body, "03_Resources/Notes");
        file_note(&vault, &job, false).unwrap();

        let written = std::fs::read(vault.absolute("03_Resources/Notes/note.md")).unwrap();
        // Frontmatter block, blank separator, then the original bytes unchanged.
        let text = String::from_utf8(written).unwrap();
        let after_block = text.splitn(3, "---\n").nth(2).unwrap();
        assert!(after_block.starts_with('\n'));
        assert_eq!(&after_block.as_bytes()[1..], body);
    }

    #[test]
    fn conflicting_name_gets_numeric_suffix() {
        let (_tmp, vault) = setup();
        std::fs::create_dir_all(vault.absolute("03_Resources/Notes")).unwrap();
        std::fs::write(vault.absolute("03_Resources/Notes/idea.md"), "existing").unwrap();

        let job = classified_job(&vault, "idea.md", b"new one", "03_Resources/Notes");
        let final_name = file_note(&vault, &job, false).unwrap();

        assert_eq!(final_name, "idea-1.md");
        assert_eq!(
            std::fs::read_to_string(vault.absolute("03_Resources/Notes/idea.md")).unwrap(),
            "existing"
        );
        assert!(vault.absolute("03_Resources/Notes/idea-1.md").exists());
    }

    #[test]
    fn sanitizes_suggested_filename() {
        let (_tmp, vault) = setup();
        let mut job = classified_job(&vault, "raw.md", b"body", "03_Resources/Notes");
        job.destination_filename = Some("My Great Note!".into());

        let final_name = file_note(&vault, &job, false).unwrap();
        assert_eq!(final_name, "my-great-note.md");
        assert!(vault.absolute("03_Resources/Notes/my-great-note.md").exists());
    }

    #[test]
    fn inbox_fallback_rewrites_in_place() {
        let (_tmp, vault) = setup();
        let job = classified_job(&vault, "stuck.md", b"unclassifiable", "00_Inbox");

        let final_name = file_note(&vault, &job, false).unwrap();
        assert_eq!(final_name, "stuck.md");

        let rewritten = std::fs::read_to_string(&job.source_path).unwrap();
        assert!(rewritten.starts_with(METADATA_MARKER));
        assert!(rewritten.ends_with("unclassifiable"));
        assert!(!vault.inbox_dir().join("stuck.md.tmp").exists());
    }

    #[test]
    fn dry_run_touches_nothing() {
        let (_tmp, vault) = setup();
        let job = classified_job(&vault, "idea.md", b"body", "03_Resources/Notes");

        let final_name = file_note(&vault, &job, true).unwrap();
        assert_eq!(final_name, "idea.md");
        assert!(job.source_path.exists());
        assert!(!vault.absolute("03_Resources/Notes/idea.md").exists());
    }

    #[test]
    fn creates_novel_destination_folder() {
        let (_tmp, vault) = setup();
        let job = classified_job(&vault, "q.md", b"qubits", "03_Resources/Quantum_Computing");
        file_note(&vault, &job, false).unwrap();
        assert!(vault.absolute("03_Resources/Quantum_Computing/q.md").exists());
    }

    #[cfg(unix)]
    #[test]
    fn failed_destination_write_keeps_source_and_removes_partial_file() {
        let (_tmp, vault) = setup();
        let job = classified_job(&vault, "idea.md", b"body", "03_Resources/Notes");
        let dest_dir = vault.absolute("03_Resources/Notes");
        std::fs::create_dir_all(&dest_dir).unwrap();
        // A dangling symlink looks free to the conflict prober but makes the
        // destination write fail, regardless of the user the tests run as.
        std::os::unix::fs::symlink("/nonexistent/idea.md", dest_dir.join("idea.md")).unwrap();

        let err = file_note(&vault, &job, false).unwrap_err();
        assert!(matches!(err, GardenerError::Io(_)));

        // Source stays in the inbox; nothing survives at the destination.
        assert!(job.source_path.exists());
        assert!(std::fs::symlink_metadata(dest_dir.join("idea.md")).is_err());
    }

    #[test]
    fn missing_destination_is_an_error() {
        let (_tmp, vault) = setup();
        let source = vault.inbox_dir().join("bare.md");
        std::fs::write(&source, "x").unwrap();
        let job = Job::new(source, "bare.md".into(), b"x".to_vec(), ContentKind::Text);

        let err = file_note(&vault, &job, false).unwrap_err();
        assert!(matches!(err, GardenerError::MissingDestination));
    }

    #[test]
    fn binary_content_is_preserved_byte_for_byte() {
        let (_tmp, vault) = setup();
        let body = [0x89, 0x50, 0x4E, 0x47, 0x00, 0xFF];
        let source = vault.inbox_dir().join("shot.png");
        std::fs::write(&source, body).unwrap();
        let mut job = Job::new(source, "shot.png".into(), body.to_vec(), ContentKind::Image);
        job.mark_classified(SuggestionBundle {
            metadata: fallback_metadata(),
            summary: None,
            folder: "03_Resources/Screens".into(),
            filename: "shot.png".into(),
        });
        job.mark_validated("03_Resources/Screens".into());

        file_note(&vault, &job, false).unwrap();
        let written = std::fs::read(vault.absolute("03_Resources/Screens/shot.png")).unwrap();
        assert!(written.ends_with(&body));
    }
}
