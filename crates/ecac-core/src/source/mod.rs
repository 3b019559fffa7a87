//! Page text sources.
//!
//! PDF decoding happens outside this crate. Whatever reads the PDF exposes its
//! pages through [`PageSource`], and the parser pulls text one page at a time.

use crate::error::SourceError;

/// Result type for page source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Trait for collaborators that supply extracted page text.
pub trait PageSource {
    /// Get the number of pages.
    fn page_count(&self) -> u32;

    /// Get the extracted text of a page (1-indexed).
    fn page_text(&self, page: u32) -> Result<String>;
}

/// Already-extracted page text held in memory.
#[derive(Debug, Clone, Default)]
pub struct TextPages {
    pages: Vec<String>,
}

impl TextPages {
    /// Create a source from page texts in page order.
    pub fn new<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages.into_iter().map(Into::into).collect(),
        }
    }

    /// Access the page texts.
    pub fn pages(&self) -> &[String] {
        &self.pages
    }
}

impl PageSource for TextPages {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_text(&self, page: u32) -> Result<String> {
        if self.pages.is_empty() {
            return Err(SourceError::NoPages);
        }

        page.checked_sub(1)
            .and_then(|idx| self.pages.get(idx as usize))
            .cloned()
            .ok_or(SourceError::InvalidPage(page))
    }
}
