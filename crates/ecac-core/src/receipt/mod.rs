//! e-CAC receipt extraction module.

mod dispatch;
mod parser;
pub mod rules;
mod segment;
mod v1;
mod v2;

pub use dispatch::FormatDispatcher;
pub use parser::{
    EcacParser, ExtractionResult, PageExtraction, PageFailure, ReceiptParser, SkippedChunk,
};
pub use segment::DocumentSegmenter;
pub use v1::GrammarV1;
pub use v2::{split_composition_line, CompositionColumns, GrammarV2};

use crate::error::ExtractionError;
use crate::models::document::{DocumentHeader, GrammarVersion, LineItem};

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// One receipt layout: how to cut page text into receipts and read each one.
pub trait ReceiptGrammar: Send + Sync {
    /// Layout handled by this grammar.
    fn version(&self) -> GrammarVersion;

    /// Extract the header fields from a chunk.
    fn extract_header(&self, chunk: &str) -> Result<DocumentHeader>;

    /// Extract the composition line items from a chunk.
    fn extract_line_items(&self, chunk: &str) -> Result<Vec<LineItem>>;

    /// Segmenter for this layout's receipt boundaries.
    fn segmenter(&self) -> DocumentSegmenter {
        DocumentSegmenter::for_version(self.version())
    }

    /// Extract header and line items; both must succeed.
    fn extract(&self, chunk: &str) -> Result<(DocumentHeader, Vec<LineItem>)> {
        let header = self.extract_header(chunk)?;
        let items = self.extract_line_items(chunk)?;
        Ok((header, items))
    }
}

/// Text between the first `open` anchor and the next `close` anchor.
///
/// On failure, returns the anchor that could not be found.
pub(crate) fn section<'a>(
    text: &'a str,
    open: &'static str,
    close: &'static str,
) -> std::result::Result<&'a str, &'static str> {
    let start = text.find(open).ok_or(open)? + open.len();
    let rest = &text[start..];
    let end = rest.find(close).ok_or(close)?;
    Ok(&rest[..end])
}
