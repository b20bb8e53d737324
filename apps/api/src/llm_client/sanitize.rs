//! Response sanitizer — recovers a parseable JSON object from noisy
//! completion text.
//!
//! Models reliably violate "JSON only" instructions under real traffic:
//! fenced code blocks, leading commentary, trailing apologies, truncated
//! output. The strip-then-slice approach below recovers the common failure
//! modes without attempting a forgiving JSON parser, keeping the component
//! small and auditable.
//!
//! Known limitation: the outermost-brace slice does not guard against a
//! literal `}` inside a string value followed by further prose. A stricter
//! scan would count bracket depth with string-escape state.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)```json|```").expect("fence regex"));

static OBJECT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("object regex"));

/// Both variants carry the offending raw text for operator diagnosis; the
/// caller logs it and never echoes it to end users.
#[derive(Debug, Error)]
pub enum SanitizeError {
    #[error("no JSON object found in model output")]
    NoJsonFound { raw: String },

    #[error("model output is not valid JSON: {source}")]
    MalformedJson {
        raw: String,
        source: serde_json::Error,
    },
}

impl SanitizeError {
    pub fn raw(&self) -> &str {
        match self {
            SanitizeError::NoJsonFound { raw } => raw,
            SanitizeError::MalformedJson { raw, .. } => raw,
        }
    }
}

/// Extracts the structurally balanced JSON object from raw completion text.
///
/// 1. Remove fence markers (case-insensitive "```json", bare "```").
/// 2. Trim surrounding whitespace.
/// 3. Slice from the first `{` to the last `}` inclusive; this tolerates
///    prose the model added despite instructions.
/// 4. With an opening brace but no close, parse from the brace to the end so
///    truncated output surfaces as a parse error rather than "no JSON".
/// 5. With no brace pair at all, fall back to a regex scan before giving up.
pub fn extract_json_object(raw: &str) -> Result<serde_json::Value, SanitizeError> {
    let cleaned = FENCE_RE.replace_all(raw, "");
    let cleaned = cleaned.trim();

    let slice = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(first), Some(last)) if first < last => &cleaned[first..=last],
        (Some(first), _) => &cleaned[first..],
        _ => OBJECT_RE
            .find(cleaned)
            .map(|m| m.as_str())
            .ok_or_else(|| SanitizeError::NoJsonFound {
                raw: raw.to_string(),
            })?,
    };

    serde_json::from_str(slice).map_err(|source| SanitizeError::MalformedJson {
        raw: raw.to_string(),
        source,
    })
}
