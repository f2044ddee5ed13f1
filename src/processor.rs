//! Type-specific processors: turn a job's content into a parsed, normalized
//! suggestion bundle via one model call.
//!
//! Text and tabular files go through the text completion; images and PDFs are
//! attached as inline data to the vision completion. Either way the raw model
//! output passes through the strict suggestion parser and the metadata
//! normalizer before anything downstream sees it. No retries: a single model
//! failure is reported to the orchestrator, which substitutes the fixed safe
//! suggestion.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;

use crate::gemini::{ContentGenerator, GeminiError, GenerateRequest};
use crate::metadata::{fallback_metadata, normalize};
use crate::state_machine::{ContentKind, Job, SuggestionBundle};
use crate::suggestion::{ParseError, ResponseContract, parse};
use crate::vault::INBOX;

/// The response contract the prompts ask for and the parser enforces.
const CONTRACT: ResponseContract = ResponseContract::SummaryFolderFilename;

/// How many data rows of a tabular file are quoted in the digest.
const TABULAR_PREVIEW_ROWS: usize = 5;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("model call failed: {0}")]
    Model(#[from] GeminiError),

    #[error("malformed model output: {0}")]
    Parse(#[from] ParseError),

    #[error("unsupported file type: {0}")]
    Unsupported(ContentKind),
}

/// Run the type-specific processor for one job: model call, parse, normalize.
pub async fn classify_job(
    client: &impl ContentGenerator,
    model: &str,
    job: &Job,
    folders: &[String],
) -> Result<SuggestionBundle, ClassifyError> {
    let request = match job.content_kind {
        ContentKind::Text => {
            let content = String::from_utf8_lossy(&job.raw_content);
            GenerateRequest::from_text(text_prompt(&content, folders))
        }
        ContentKind::Tabular => {
            let digest = tabular_digest(&job.raw_content);
            GenerateRequest::from_text(text_prompt(&digest, folders))
        }
        ContentKind::Image | ContentKind::Pdf => GenerateRequest::from_text_and_data(
            vision_prompt(folders),
            mime_for(&job.display_name, &job.raw_content),
            BASE64.encode(&job.raw_content),
        ),
        ContentKind::Unknown => return Err(ClassifyError::Unsupported(job.content_kind)),
    };

    let response = client.generate(model, &request).await?;
    let raw = response
        .text()
        .ok_or(ClassifyError::Model(GeminiError::EmptyResponse))?;

    let parsed = parse(&raw, CONTRACT)?;
    Ok(SuggestionBundle {
        metadata: normalize(parsed.metadata),
        summary: parsed.summary,
        folder: parsed.folder,
        // Contracts without a filename field keep the inbox name.
        filename: parsed
            .filename
            .unwrap_or_else(|| job.display_name.clone()),
    })
}

/// The fixed safe suggestion used when the model call or parse fails:
/// triage metadata, the inbox as destination, the original name kept.
pub fn fallback_bundle(display_name: &str) -> SuggestionBundle {
    SuggestionBundle {
        metadata: fallback_metadata(),
        summary: None,
        folder: INBOX.to_string(),
        filename: display_name.to_string(),
    }
}

fn response_format(folders: &[String]) -> String {
    format!(
        "The list of possible destination folders (relative paths from the vault root) is:\n\
         {}\n\
         \n\
         Your output must be EXACTLY, with no other text or explanation:\n\
         1. A YAML metadata block, opened and closed by a `---` line on its own.\n\
         2. One line: a concise one-sentence summary.\n\
         3. One line: the relative destination folder path (e.g. `03_Resources/DevOps`).\n\
         4. One line: a short descriptive filename for the note (e.g. `docker-guide.md`).",
        folders.join("\n")
    )
}

fn text_prompt(content: &str, folders: &[String]) -> String {
    format!(
        "You are an expert librarian triaging a note into a PARA knowledge vault.\n\
         \n\
         Generate YAML metadata with these keys:\n\
         - status: `active-tool` for usable tools/utilities, `learning` for tutorials, courses and \
         papers that need study time, `archived` for reference material, `triage` when ambiguous \
         (the default).\n\
         - priority: `P1` only for explicit urgency (deadlines, \"urgent\", \"critical\"), `P2` for \
         core professional responsibilities, `P3` for general knowledge (the default), `P4` for \
         someday/maybe material.\n\
         - type: one of `repo`, `paper`, `tutorial`, `cheatsheet`, `course`, `website`, `note`.\n\
         - tags: 3-5 lowercase hyphenated tags for key technologies, concepts and proper nouns.\n\
         - source: the primary URL if the content came from the web, otherwise empty.\n\
         - title: a short human-readable title.\n\
         \n\
         Destination rules: `01_Projects` only for content tied to a specific time-bound goal; \
         `02_Areas` for ongoing responsibilities with no end date; `03_Resources` is the default \
         for anything kept for its topic value. You may suggest a new descriptive subfolder under \
         one of those three roots if no existing folder fits. If you cannot categorize with \
         confidence, set status to `triage`, add the `needs-review` tag, and use `00_Inbox` as \
         the destination.\n\
         \n\
         The content of the note is:\n\
         ```\n\
         {content}\n\
         ```\n\
         \n\
         {}",
        response_format(folders)
    )
}

fn vision_prompt(folders: &[String]) -> String {
    format!(
        "You are an expert librarian triaging an attached file (image or PDF) into a PARA \
         knowledge vault. Base your answers on what the attachment shows.\n\
         \n\
         Generate YAML metadata with these keys:\n\
         - status: `learning` for diagrams or screenshots worth studying, `archived` for photos \
         and references, `triage` when ambiguous (the default).\n\
         - priority: `P3` unless the content indicates urgency.\n\
         - type: one of `screenshot`, `diagram`, `photo`, `illustration`, `paper`.\n\
         - tags: 3-5 lowercase hyphenated tags for the key objects, concepts or visible text.\n\
         - source: empty unless a source URL is visible.\n\
         - title: a short human-readable title.\n\
         \n\
         Destination rules: `01_Projects` only for content tied to a specific time-bound goal; \
         `02_Areas` for ongoing responsibilities; `03_Resources` is the default. If you cannot \
         categorize with confidence, set status to `triage`, add the `needs-review` tag, and use \
         `00_Inbox` as the destination.\n\
         \n\
         {}",
        response_format(folders)
    )
}

/// Compact description of a tabular file: shape, header, first rows.
/// Sent to the model instead of the raw dump.
fn tabular_digest(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let header = lines.next().unwrap_or("");
    let rows: Vec<&str> = lines.collect();
    let columns = header.split(',').count();

    let mut digest = format!(
        "CSV file with {} rows and {columns} columns.\nColumns: {header}\n",
        rows.len()
    );
    if !rows.is_empty() {
        digest.push_str("First rows:\n");
        for row in rows.iter().take(TABULAR_PREVIEW_ROWS) {
            digest.push_str(row);
            digest.push('\n');
        }
    }
    digest
}

/// MIME type for the vision attachment, by extension first, signature second.
fn mime_for(name: &str, bytes: &[u8]) -> String {
    let ext = std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    let by_ext = match ext.as_deref() {
        Some("png") => Some("image/png"),
        Some("jpg" | "jpeg") => Some("image/jpeg"),
        Some("gif") => Some("image/gif"),
        Some("webp") => Some("image/webp"),
        Some("svg") => Some("image/svg+xml"),
        Some("bmp") => Some("image/bmp"),
        Some("pdf") => Some("application/pdf"),
        _ => None,
    };
    if let Some(mime) = by_ext {
        return mime.to_string();
    }
    infer::get(bytes)
        .map(|t| t.mime_type().to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}
