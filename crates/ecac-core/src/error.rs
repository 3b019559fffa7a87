//! Error types for the ecac-core library.

use thiserror::Error;

/// Main error type for the ecac library.
#[derive(Error, Debug)]
pub enum EcacError {
    /// Page text source error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Receipt extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by the collaborator that supplies extracted page text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The source has no pages.
    #[error("source has no pages")]
    NoPages,

    /// Invalid page number requested (pages are 1-indexed).
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// Failed to extract text from a page.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),
}

/// Errors related to receipt field extraction.
///
/// These are per-chunk: the parser records them next to the chunk that failed
/// and keeps going with the rest of the page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Required labeled field is missing (or empty).
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A positional line does not have the expected shape.
    #[error("structural mismatch in {what}: expected {expected}, found {found}")]
    StructuralMismatch {
        what: String,
        expected: String,
        found: usize,
    },

    /// A date substring is not a calendar date.
    #[error("invalid date for {field}: {value:?}")]
    DateFormat { field: String, value: String },

    /// A numeric token is not a decimal amount.
    #[error("invalid amount for {field}: {value:?}")]
    NumberFormat { field: String, value: String },

    /// The composition block markers were not found.
    #[error("composition block not found")]
    NoCompositionBlock,

    /// The anchor phrase that delimits the header block was not found.
    #[error("header block not found (missing {0:?})")]
    NoHeaderBlock(&'static str),

    /// Field validation failed.
    #[error("validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },
}

impl ExtractionError {
    pub(crate) fn date(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::DateFormat {
            field: field.into(),
            value: value.into(),
        }
    }

    pub(crate) fn number(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::NumberFormat {
            field: field.into(),
            value: value.into(),
        }
    }

    pub(crate) fn mismatch(
        what: impl Into<String>,
        expected: impl Into<String>,
        found: usize,
    ) -> Self {
        Self::StructuralMismatch {
            what: what.into(),
            expected: expected.into(),
            found,
        }
    }
}

/// Result type for the ecac library.
pub type Result<T> = std::result::Result<T, EcacError>;
