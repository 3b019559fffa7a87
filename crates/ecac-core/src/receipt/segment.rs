//! Splitting page text into one chunk per embedded receipt.

use regex::Regex;
use tracing::trace;

use super::rules::patterns::{LEFTOVER_DUE_DATE_LABEL, V1_BOUNDARY, V2_BOUNDARY};
use crate::models::document::GrammarVersion;

/// Boundary scanner for one layout.
///
/// Every boundary match opens a receipt that runs until the next match. Text
/// before the first boundary is page furniture and is dropped; text with no
/// boundary at all is a single chunk.
#[derive(Debug, Clone, Copy)]
pub struct DocumentSegmenter {
    boundary: &'static Regex,
}

impl DocumentSegmenter {
    /// Segmenter for the given layout.
    pub fn for_version(version: GrammarVersion) -> Self {
        let boundary: &'static Regex = match version {
            GrammarVersion::V1 => &*V1_BOUNDARY,
            GrammarVersion::V2 => &*V2_BOUNDARY,
        };
        Self { boundary }
    }

    /// Split text into trimmed, non-empty chunks in order of appearance.
    pub fn segment(&self, text: &str) -> Vec<String> {
        let bounds: Vec<(usize, usize)> = self
            .boundary
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect();

        let pieces: Vec<&str> = match bounds.first() {
            None => vec![text],
            Some(&(first_start, _)) => {
                if !text[..first_start].trim().is_empty() {
                    trace!("Dropping {} bytes before the first receipt boundary", first_start);
                }

                bounds
                    .iter()
                    .enumerate()
                    .map(|(i, &(_, end))| {
                        let next = bounds.get(i + 1).map_or(text.len(), |&(start, _)| start);
                        &text[end..next]
                    })
                    .collect()
            }
        };

        pieces
            .into_iter()
            .map(clean_chunk)
            .filter(|chunk| !chunk.is_empty())
            .collect()
    }
}

fn clean_chunk(piece: &str) -> String {
    LEFTOVER_DUE_DATE_LABEL.replace_all(piece, "").trim().to_string()
}
