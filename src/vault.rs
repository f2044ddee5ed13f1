//! Vault layout and destination validation.
//!
//! The vault is a PARA tree: an inbox plus three top-level category
//! directories, each holding topic subfolders. The validator is the safety
//! boundary between the model's proposed destination and the filesystem: no
//! proposal, however adversarial, may escape the three category roots.

use std::path::{Component, Path, PathBuf};

/// Inbox directory name, also the forced-triage destination.
pub const INBOX: &str = "00_Inbox";

/// The three category roots a destination may live under.
pub const CATEGORIES: [&str; 3] = ["01_Projects", "02_Areas", "03_Resources"];

/// Root of the PARA tree on disk.
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
}

impl Vault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn inbox_dir(&self) -> PathBuf {
        self.root.join(INBOX)
    }

    /// Absolute path for a vault-relative folder or file.
    pub fn absolute(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Create the inbox and category directories if they are missing.
    pub fn ensure_layout(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.inbox_dir())?;
        for category in CATEGORIES {
            std::fs::create_dir_all(self.root.join(category))?;
        }
        Ok(())
    }

    /// All currently valid destination folders, vault-relative: the three
    /// category roots plus their immediate subdirectories. Sorted for
    /// deterministic prompt and log output. Unreadable directories are
    /// skipped.
    pub fn known_folders(&self) -> Vec<String> {
        let mut folders = Vec::new();
        for category in CATEGORIES {
            folders.push(category.to_string());
            let Ok(entries) = std::fs::read_dir(self.root.join(category)) else {
                continue;
            };
            for entry in entries.flatten() {
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                if !is_dir {
                    continue;
                }
                if let Some(name) = entry.file_name().to_str() {
                    folders.push(format!("{category}/{name}"));
                }
            }
        }
        folders.sort();
        folders
    }
}

/// Decide whether a proposed destination is an allowed vault location.
///
/// Returns the final folder and whether the item was forced back to triage.
/// The safety rule holds regardless of `known` membership: after resolving
/// `.`/`..` segments the path must be relative and rooted under one of the
/// three category prefixes, otherwise the destination is rewritten to the
/// inbox. Safe paths are accepted if they match a known folder
/// (case-insensitive, canonical casing returned) or, when `allow_new` is set,
/// name a novel subfolder strictly under a category root.
pub fn validate_destination(
    proposed: &str,
    known: &[String],
    allow_new: bool,
) -> (String, bool) {
    let triage = || (INBOX.to_string(), true);

    let Some(normalized) = normalize_relative(proposed) else {
        return triage();
    };

    // The model deliberately triaged; not a safety rewrite.
    if normalized.eq_ignore_ascii_case(INBOX) {
        return (INBOX.to_string(), false);
    }

    let Some(canonical) = reroot_category(&normalized) else {
        return triage();
    };

    if let Some(existing) = known
        .iter()
        .find(|k| k.eq_ignore_ascii_case(&canonical))
    {
        return (existing.clone(), false);
    }

    if allow_new {
        (canonical, false)
    } else {
        triage()
    }
}

/// Lexically resolve `.` and `..` segments. `None` when the path is
/// absolute, empty, or escapes its root.
fn normalize_relative(proposed: &str) -> Option<String> {
    let mut segments: Vec<&str> = Vec::new();
    for component in Path::new(proposed.trim()).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => return None,
            Component::CurDir => {}
            Component::ParentDir => {
                segments.pop()?;
            }
            Component::Normal(segment) => segments.push(segment.to_str()?),
        }
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

/// Require the first segment to be a category prefix (case-insensitive) and
/// rewrite it to canonical casing.
fn reroot_category(normalized: &str) -> Option<String> {
    let (first, rest) = match normalized.split_once('/') {
        Some((first, rest)) => (first, Some(rest)),
        None => (normalized, None),
    };
    let category = CATEGORIES
        .iter()
        .find(|c| c.eq_ignore_ascii_case(first))?;
    Some(match rest {
        Some(rest) => format!("{category}/{rest}"),
        None => category.to_string(),
    })
}
