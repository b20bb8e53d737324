//! Text extraction — turns binary documents and rendered pages into plain
//! normalized text for the downstream model calls.
//!
//! Near-empty input makes the model hallucinate content rather than return
//! nothing, which is worse than a hard failure, so every extraction path
//! ends at a minimum-length gate.

pub mod document;
pub mod page;

use std::time::Duration;

use thiserror::Error;

/// Minimum extracted length for a resume parse upload and a scraped page.
pub const MIN_PARSE_TEXT_LEN: usize = 50;
/// Minimum extracted length for a one-shot tailor upload.
pub const MIN_TAILOR_TEXT_LEN: usize = 100;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("could not decode document: {0}")]
    Decode(String),

    #[error("extracted text too short: {len} chars (minimum {min})")]
    TooShort { len: usize, min: usize },

    #[error("page render timed out after {0:?}")]
    RenderTimeout(Duration),

    #[error("page fetch failed with status {status}")]
    RenderUpstream { status: u16 },

    #[error("page fetch failed: {0}")]
    RenderTransport(String),
}

/// Declared media type of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Pdf,
    Docx,
}

impl MediaType {
    pub const PDF_MIME: &'static str = "application/pdf";
    pub const DOCX_MIME: &'static str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

    pub fn from_mime(mime: &str) -> Result<Self, ExtractError> {
        match mime {
            Self::PDF_MIME => Ok(MediaType::Pdf),
            Self::DOCX_MIME => Ok(MediaType::Docx),
            other => Err(ExtractError::UnsupportedMediaType(other.to_string())),
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            MediaType::Pdf => Self::PDF_MIME,
            MediaType::Docx => Self::DOCX_MIME,
        }
    }
}

/// Trims the text and enforces the minimum-length gate.
pub fn require_min_len(text: String, min: usize) -> Result<String, ExtractError> {
    let trimmed = text.trim();
    if trimmed.len() < min {
        return Err(ExtractError::TooShort {
            len: trimmed.len(),
            min,
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_from_mime() {
        assert_eq!(MediaType::from_mime("application/pdf").unwrap(), MediaType::Pdf);
        assert_eq!(
            MediaType::from_mime(MediaType::DOCX_MIME).unwrap(),
            MediaType::Docx
        );
        assert!(matches!(
            MediaType::from_mime("image/png"),
            Err(ExtractError::UnsupportedMediaType(_))
        ));
    }

    #[test]
    fn test_min_len_gate_rejects_short_text() {
        let err = require_min_len("   too short   ".to_string(), MIN_PARSE_TEXT_LEN).unwrap_err();
        assert!(matches!(err, ExtractError::TooShort { len: 9, min: 50 }));
    }

    #[test]
    fn test_min_len_gate_trims_and_passes() {
        let text = format!("  {}  ", "x".repeat(60));
        let out = require_min_len(text, MIN_PARSE_TEXT_LEN).unwrap();
        assert_eq!(out.len(), 60);
    }
}
