//! Repair of page text that was decoded with the wrong character set.
//!
//! Extracted text sometimes carries UTF-8 bytes that were read as a legacy
//! single-byte encoding ("ComposiÃ§Ã£o" instead of "Composição"). Re-encoding
//! with that legacy encoding recovers the original bytes, which are then read
//! back as UTF-8.

use std::borrow::Cow;

use encoding_rs::{Encoding, WINDOWS_1252};
use tracing::trace;

use crate::error::{EcacError, Result};

/// Round-trips text through a legacy encoding to undo mis-decoding.
#[derive(Debug, Clone, Copy)]
pub struct TextNormalizer {
    encoding: &'static Encoding,
}

impl TextNormalizer {
    /// Create a normalizer for Windows-1252 mojibake.
    pub fn new() -> Self {
        Self { encoding: WINDOWS_1252 }
    }

    /// Create a normalizer for the encoding with the given WHATWG label.
    pub fn for_label(label: &str) -> Result<Self> {
        Encoding::for_label(label.trim().as_bytes())
            .map(|encoding| Self { encoding })
            .ok_or_else(|| EcacError::Config(format!("unknown text encoding: {label}")))
    }

    /// Name of the legacy encoding.
    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Repair the text, borrowing it when nothing changes.
    ///
    /// Each run of non-ASCII characters the legacy encoding can represent is
    /// repaired on its own, so correct accents and unmappable characters
    /// elsewhere on the page do not block the repair.
    pub fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if text.is_ascii() {
            return Cow::Borrowed(text);
        }

        let mut current = Cow::Borrowed(text);

        // Every repair shortens the text, so this reaches a fixpoint.
        while let Some(repaired) = self.repair_pass(&current) {
            trace!(
                "Repaired {} chars of mis-decoded text",
                current.chars().count() - repaired.chars().count()
            );
            current = Cow::Owned(repaired);
        }

        current
    }

    fn repair_pass(&self, text: &str) -> Option<String> {
        let mut out = String::with_capacity(text.len());
        let mut changed = false;
        let mut run_start = None;

        for (idx, c) in text.char_indices() {
            if !c.is_ascii() && self.can_encode(c) {
                run_start.get_or_insert(idx);
                continue;
            }
            if let Some(start) = run_start.take() {
                changed |= self.repair_run(&text[start..idx], &mut out);
            }
            out.push(c);
        }
        if let Some(start) = run_start {
            changed |= self.repair_run(&text[start..], &mut out);
        }

        changed.then_some(out)
    }

    fn can_encode(&self, c: char) -> bool {
        let mut buf = [0u8; 4];
        let (_, _, had_unmappable) = self.encoding.encode(c.encode_utf8(&mut buf));
        !had_unmappable
    }

    /// Append the repaired run to `out`, or the run itself when it is not mojibake.
    fn repair_run(&self, run: &str, out: &mut String) -> bool {
        let (bytes, _, _) = self.encoding.encode(run);
        match std::str::from_utf8(&bytes) {
            Ok(decoded) if decoded.chars().count() < run.chars().count() => {
                out.push_str(decoded);
                true
            }
            _ => {
                out.push_str(run);
                false
            }
        }
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Repair text with the default Windows-1252 round trip.
pub fn normalize_text(text: &str) -> Cow<'_, str> {
    TextNormalizer::new().normalize(text)
}
