//! Frontmatter metadata normalization.
//!
//! The model's metadata block is untrusted: keys may be missing, null, or the
//! wrong shape. [`normalize`] turns any mapping into one that carries every
//! recognized key with a value of the correct shape, so nothing downstream
//! ever has to handle an absent field.

use serde_yaml::{Mapping, Value};

/// Recognized frontmatter keys, in canonical output order.
const RECOGNIZED_KEYS: [&str; 8] = [
    "status",
    "priority",
    "type",
    "tags",
    "source",
    "entities",
    "confidence_score",
    "title",
];

/// Tag appended whenever an item is forced back to triage.
pub const REVIEW_TAG: &str = "needs-review";

fn default_for(key: &str) -> Value {
    match key {
        "status" => Value::from("triage"),
        "priority" => Value::from("P3"),
        "type" => Value::from("unknown"),
        "tags" | "entities" => Value::Sequence(Vec::new()),
        "source" => Value::from(""),
        "confidence_score" => Value::from(0.0),
        "title" => Value::from("Untitled"),
        _ => Value::Null,
    }
}

/// Normalize a metadata mapping. Total and idempotent:
/// `normalize(normalize(m)) == normalize(m)`.
///
/// Every recognized key is present in the output, defaulted when absent or
/// null in the input. `tags` is coerced to a deduplicated list of lowercase
/// hyphenated tokens; a non-list `tags` value is replaced with an empty list.
/// Unrecognized keys are preserved after the canonical ones.
pub fn normalize(input: Mapping) -> Mapping {
    let mut out = Mapping::new();

    for key in RECOGNIZED_KEYS {
        let value = match input.get(key) {
            None | Some(Value::Null) => default_for(key),
            Some(v) => v.clone(),
        };
        let value = if key == "tags" {
            normalize_tags(&value)
        } else {
            value
        };
        out.insert(Value::from(key), value);
    }

    for (key, value) in input {
        let is_recognized = key
            .as_str()
            .is_some_and(|k| RECOGNIZED_KEYS.contains(&k));
        if !is_recognized {
            out.insert(key, value);
        }
    }

    out
}

/// Coerce any `tags` value to a deduplicated list of normalized tokens.
/// Non-list input (including scalars) yields an empty list.
fn normalize_tags(value: &Value) -> Value {
    let Value::Sequence(items) = value else {
        return Value::Sequence(Vec::new());
    };

    let mut seen: Vec<String> = Vec::new();
    for item in items {
        let Some(raw) = item.as_str() else { continue };
        let tag = normalize_tag(raw);
        if !tag.is_empty() && !seen.contains(&tag) {
            seen.push(tag);
        }
    }

    Value::Sequence(seen.into_iter().map(Value::from).collect())
}

/// Lowercase, strip any leading `#`, and join whitespace runs with hyphens.
fn normalize_tag(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('#')
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// The fixed safe metadata used when the model call or parse fails.
pub fn fallback_metadata() -> Mapping {
    let mut m = Mapping::new();
    m.insert(Value::from("status"), Value::from("triage"));
    m.insert(Value::from("priority"), Value::from("P3"));
    m.insert(Value::from("type"), Value::from("unknown"));
    m.insert(
        Value::from("tags"),
        Value::Sequence(vec![Value::from(REVIEW_TAG)]),
    );
    m.insert(Value::from("source"), Value::from(""));
    normalize(m)
}

/// Reset `status` to triage and append the review tag. Applied by the
/// orchestrator when the destination validator forces triage.
pub fn apply_forced_triage(metadata: &mut Mapping) {
    metadata.insert(Value::from("status"), Value::from("triage"));

    let tags = metadata
        .get_mut("tags")
        .and_then(Value::as_sequence_mut);
    match tags {
        Some(seq) => {
            let already = seq.iter().any(|t| t.as_str() == Some(REVIEW_TAG));
            if !already {
                seq.push(Value::from(REVIEW_TAG));
            }
        }
        None => {
            metadata.insert(
                Value::from("tags"),
                Value::Sequence(vec![Value::from(REVIEW_TAG)]),
            );
        }
    }
}

/// Render a mapping as a `---`-delimited frontmatter block, trailing newline
/// included.
pub fn render_frontmatter(metadata: &Mapping) -> Result<String, serde_yaml::Error> {
    let yaml = serde_yaml::to_string(metadata)?;
    Ok(format!("---\n{yaml}---\n"))
}
