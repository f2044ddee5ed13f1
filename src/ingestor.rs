//! Inbox scanning and content-kind classification.
//!
//! One pass per pipeline run: lists the inbox at the instant of the call,
//! reads each file's bytes once, and builds the jobs the orchestrator will
//! carry through the pipeline. Classification is a pure inspection:
//! extension first, then content signature, then a UTF-8 fallback.

use std::path::Path;

use crate::state_machine::{ContentKind, Job};
use crate::vault::Vault;

/// Scan the inbox and build one job per visible file, in sorted listing
/// order. Hidden files (dotfiles) and directories are skipped; unreadable
/// files are skipped with a warning and left in place.
pub fn scan_inbox(vault: &Vault) -> std::io::Result<Vec<Job>> {
    let mut names: Vec<String> = std::fs::read_dir(vault.inbox_dir())?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| !name.starts_with('.'))
        .collect();
    names.sort();

    let mut jobs = Vec::with_capacity(names.len());
    for name in names {
        let path = vault.inbox_dir().join(&name);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("warning: could not read {name}: {e}");
                continue;
            }
        };
        let kind = classify(&name, &bytes);
        jobs.push(Job::new(path, name, bytes, kind));
    }
    Ok(jobs)
}

/// Classify a file into a coarse content kind.
///
/// Falls back from extension to `infer` signature sniffing to a UTF-8 check;
/// anything inconclusive is `Unknown`.
pub fn classify(name: &str, bytes: &[u8]) -> ContentKind {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("md" | "markdown" | "txt" | "org" | "rst") => return ContentKind::Text,
        Some("png" | "jpg" | "jpeg" | "gif" | "webp" | "svg" | "bmp") => {
            return ContentKind::Image;
        }
        Some("pdf") => return ContentKind::Pdf,
        Some("csv" | "tsv") => return ContentKind::Tabular,
        _ => {}
    }

    if let Some(sniffed) = infer::get(bytes) {
        let mime = sniffed.mime_type();
        if mime.starts_with("image/") {
            return ContentKind::Image;
        }
        if mime == "application/pdf" {
            return ContentKind::Pdf;
        }
    }

    if std::str::from_utf8(bytes).is_ok() {
        ContentKind::Text
    } else {
        ContentKind::Unknown
    }
}
