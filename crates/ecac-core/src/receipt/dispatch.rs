//! Grammar selection by issuance date.

use chrono::NaiveDate;

use crate::models::config::default_cutover;
use crate::models::document::GrammarVersion;

/// Picks the receipt layout from the page's issuance date.
#[derive(Debug, Clone, Copy)]
pub struct FormatDispatcher {
    cutover: NaiveDate,
}

impl FormatDispatcher {
    /// Dispatcher for the 2017-11-01 layout change.
    pub fn new() -> Self {
        Self {
            cutover: default_cutover(),
        }
    }

    /// Dispatcher with a custom first V2 issuance date.
    pub fn with_cutover(cutover: NaiveDate) -> Self {
        Self { cutover }
    }

    pub fn cutover(&self) -> NaiveDate {
        self.cutover
    }

    /// V1 strictly before the cutover; V2 on/after it or when the date is unknown.
    pub fn select(&self, issued: Option<NaiveDate>) -> GrammarVersion {
        match issued {
            Some(date) if date < self.cutover => GrammarVersion::V1,
            _ => GrammarVersion::V2,
        }
    }
}

impl Default for FormatDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
