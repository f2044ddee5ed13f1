//! Parser for the model's structured suggestion response.
//!
//! The model is instructed to reply with a `---`-delimited metadata block
//! followed by a fixed number of single-line fields. The reply is untrusted:
//! sections may be missing, reordered, or wrapped in explanatory prose. This
//! parser enforces the contract strictly and enumerates every failure mode;
//! the caller falls back to a fixed safe suggestion rather than trusting a
//! partial parse.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Marker line delimiting the metadata block, on its own line.
pub const METADATA_MARKER: &str = "---";

/// The expected trailing fields after the metadata block, in strict order.
///
/// The source material grew three divergent response shapes over time; they
/// are expressed here as one parser with an explicit, versioned contract
/// instead of parallel ad-hoc functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseContract {
    /// `folder`
    FolderOnly,
    /// `summary`, `folder`
    SummaryAndFolder,
    /// `summary`, `folder`, `filename`
    SummaryFolderFilename,
}

impl ResponseContract {
    pub fn trailing_fields(self) -> usize {
        match self {
            ResponseContract::FolderOnly => 1,
            ResponseContract::SummaryAndFolder => 2,
            ResponseContract::SummaryFolderFilename => 3,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("response has no `---`-delimited metadata block")]
    MissingMetadataBlock,

    #[error("metadata block is not a key/value mapping")]
    InvalidMetadataShape,

    #[error("expected {expected} fields after the metadata block, found {found}")]
    FieldCountMismatch { expected: usize, found: usize },
}

/// A structurally valid suggestion, not yet normalized or validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSuggestion {
    pub metadata: Mapping,
    pub summary: Option<String>,
    pub folder: String,
    pub filename: Option<String>,
}

/// Parse raw model output against the given contract. Pure: no side effects.
///
/// Prose before the first marker and blank lines between trailing fields are
/// discarded; a genuinely missing field is an error, not a default.
pub fn parse(raw: &str, contract: ResponseContract) -> Result<ParsedSuggestion, ParseError> {
    let lines: Vec<&str> = raw.lines().collect();

    let mut markers = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.trim() == METADATA_MARKER)
        .map(|(i, _)| i);
    let (open, close) = match (markers.next(), markers.next()) {
        (Some(open), Some(close)) => (open, close),
        _ => return Err(ParseError::MissingMetadataBlock),
    };

    let block = lines[open + 1..close].join("\n");
    let value: Value =
        serde_yaml::from_str(&block).map_err(|_| ParseError::InvalidMetadataShape)?;
    let Value::Mapping(metadata) = value else {
        return Err(ParseError::InvalidMetadataShape);
    };

    // Models sometimes wrap the reply in a code fence despite instructions;
    // fence lines carry no field content.
    let fields: Vec<&str> = lines[close + 1..]
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with("```"))
        .collect();

    let expected = contract.trailing_fields();
    if fields.len() != expected {
        return Err(ParseError::FieldCountMismatch {
            expected,
            found: fields.len(),
        });
    }

    let suggestion = match contract {
        ResponseContract::FolderOnly => ParsedSuggestion {
            metadata,
            summary: None,
            folder: fields[0].to_string(),
            filename: None,
        },
        ResponseContract::SummaryAndFolder => ParsedSuggestion {
            metadata,
            summary: Some(fields[0].to_string()),
            folder: fields[1].to_string(),
            filename: None,
        },
        ResponseContract::SummaryFolderFilename => ParsedSuggestion {
            metadata,
            summary: Some(fields[0].to_string()),
            folder: fields[1].to_string(),
            filename: Some(fields[2].to_string()),
        },
    };

    Ok(suggestion)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_RESPONSE: &str = "---\n\
        status: learning\n\
        priority: P2\n\
        type: tutorial\n\
        tags: [docker]\n\
        source: \"\"\n\
        ---\n\
        Summary line.\n\
        03_Resources/DevOps\n\
        docker-guide.md";

    #[test]
    fn parses_full_contract() {
        let s = parse(FULL_RESPONSE, ResponseContract::SummaryFolderFilename).unwrap();
        assert_eq!(s.summary.as_deref(), Some("Summary line."));
        assert_eq!(s.folder, "03_Resources/DevOps");
        assert_eq!(s.filename.as_deref(), Some("docker-guide.md"));
        assert_eq!(s.metadata.get("status").unwrap().as_str(), Some("learning"));
        assert_eq!(s.metadata.get("priority").unwrap().as_str(), Some("P2"));
    }

    #[test]
    fn parses_folder_only_contract() {
        let raw = "---\nstatus: learning\n---\n03_Resources/DevOps\n";
        let s = parse(raw, ResponseContract::FolderOnly).unwrap();
        assert_eq!(s.folder, "03_Resources/DevOps");
        assert!(s.summary.is_none());
        assert!(s.filename.is_none());
    }

    #[test]
    fn parses_summary_and_folder_contract() {
        let raw = "---\nstatus: learning\n---\nA note about Docker.\n03_Resources/DevOps\n";
        let s = parse(raw, ResponseContract::SummaryAndFolder).unwrap();
        assert_eq!(s.summary.as_deref(), Some("A note about Docker."));
        assert_eq!(s.folder, "03_Resources/DevOps");
        assert!(s.filename.is_none());
    }

    #[test]
    fn single_marker_is_missing_block() {
        let raw = "---\nstatus: learning\nno closing marker here";
        assert_eq!(
            parse(raw, ResponseContract::FolderOnly),
            Err(ParseError::MissingMetadataBlock)
        );
    }

    #[test]
    fn no_marker_is_missing_block() {
        assert_eq!(
            parse("just some prose", ResponseContract::FolderOnly),
            Err(ParseError::MissingMetadataBlock)
        );
    }

    #[test]
    fn scalar_block_is_invalid_shape() {
        let raw = "---\njust a string\n---\n03_Resources/DevOps\n";
        assert_eq!(
            parse(raw, ResponseContract::FolderOnly),
            Err(ParseError::InvalidMetadataShape)
        );
    }

    #[test]
    fn list_block_is_invalid_shape() {
        let raw = "---\n- one\n- two\n---\n03_Resources/DevOps\n";
        assert_eq!(
            parse(raw, ResponseContract::FolderOnly),
            Err(ParseError::InvalidMetadataShape)
        );
    }

    #[test]
    fn empty_block_is_invalid_shape() {
        let raw = "---\n---\n03_Resources/DevOps\n";
        assert_eq!(
            parse(raw, ResponseContract::FolderOnly),
            Err(ParseError::InvalidMetadataShape)
        );
    }

    #[test]
    fn missing_field_is_count_mismatch() {
        let raw = "---\nstatus: learning\n---\nSummary only.\n03_Resources/DevOps\n";
        assert_eq!(
            parse(raw, ResponseContract::SummaryFolderFilename),
            Err(ParseError::FieldCountMismatch {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn extra_prose_is_count_mismatch() {
        let raw = "---\nstatus: learning\n---\n03_Resources/DevOps\nHope this helps!\n";
        assert_eq!(
            parse(raw, ResponseContract::FolderOnly),
            Err(ParseError::FieldCountMismatch {
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn blank_lines_between_fields_are_discarded() {
        let raw = "---\nstatus: learning\n---\n\nSummary line.\n\n03_Resources/DevOps\n\n";
        let s = parse(raw, ResponseContract::SummaryAndFolder).unwrap();
        assert_eq!(s.summary.as_deref(), Some("Summary line."));
        assert_eq!(s.folder, "03_Resources/DevOps");
    }

    #[test]
    fn preamble_prose_before_block_is_ignored() {
        let raw = "Sure, here is the classification:\n---\nstatus: learning\n---\n03_Resources/DevOps\n";
        let s = parse(raw, ResponseContract::FolderOnly).unwrap();
        assert_eq!(s.folder, "03_Resources/DevOps");
    }

    #[test]
    fn code_fence_lines_are_discarded() {
        let raw = "---\nstatus: learning\n---\n```\n03_Resources/DevOps\n```\n";
        let s = parse(raw, ResponseContract::FolderOnly).unwrap();
        assert_eq!(s.folder, "03_Resources/DevOps");
    }

    #[test]
    fn handles_crlf_line_endings() {
        let raw = "---\r\nstatus: learning\r\n---\r\n03_Resources/DevOps\r\n";
        let s = parse(raw, ResponseContract::FolderOnly).unwrap();
        assert_eq!(s.folder, "03_Resources/DevOps");
    }
}
