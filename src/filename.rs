//! Filename sanitizing and conflict resolution.
//!
//! Model-suggested filenames go through [`sanitize`] before touching the
//! filesystem; [`resolve_conflict`] guarantees no silent overwrite at the
//! destination.

use std::path::{Path, PathBuf};

use crate::error::GardenerError;

/// Extensions a filed note may keep; anything else gets the default appended.
const ACCEPTED_EXTENSIONS: [&str; 12] = [
    "md", "txt", "png", "jpg", "jpeg", "gif", "webp", "svg", "bmp", "pdf", "csv", "tsv",
];

const DEFAULT_EXTENSION: &str = "md";

/// Cap on conflict probes. Exhausting it fails the job loudly instead of
/// looping under pathological directory contents.
const MAX_CONFLICT_PROBES: u32 = 1000;

/// Produce a filesystem-safe filename. Deterministic and idempotent:
/// `sanitize(sanitize(s)) == sanitize(s)`.
///
/// Lowercases, turns whitespace into hyphens, strips everything outside
/// `[a-z0-9._-]`, collapses hyphen runs, trims leading/trailing separators,
/// and appends the default extension when no accepted one is present.
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_hyphen = false;
    for c in name.to_lowercase().chars() {
        let c = if c.is_whitespace() { '-' } else { c };
        if !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')) {
            continue;
        }
        if c == '-' && last_was_hyphen {
            continue;
        }
        last_was_hyphen = c == '-';
        out.push(c);
    }

    let trimmed = out.trim_matches(['-', '.', '_']);
    let mut name = if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    };

    let has_accepted_ext = name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ACCEPTED_EXTENSIONS.contains(&ext));
    if !has_accepted_ext {
        name.push('.');
        name.push_str(DEFAULT_EXTENSION);
    }
    name
}

/// Return `path` if nothing exists there, otherwise the first free
/// `name-1.ext`, `name-2.ext`, … candidate. Never overwrites.
pub fn resolve_conflict(path: &Path) -> Result<PathBuf, GardenerError> {
    if !path.exists() {
        return Ok(path.to_path_buf());
    }

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled");
    let ext = path.extension().and_then(|e| e.to_str());
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    for i in 1..=MAX_CONFLICT_PROBES {
        let candidate_name = match ext {
            Some(ext) => format!("{stem}-{i}.{ext}"),
            None => format!("{stem}-{i}"),
        };
        let candidate = parent.join(candidate_name);
        if !candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(GardenerError::ConflictResolutionExhausted {
        path: path.to_path_buf(),
    })
}
