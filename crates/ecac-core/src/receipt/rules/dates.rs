//! Date parsing and issuance date detection for e-CAC receipts.

use chrono::NaiveDate;
use tracing::warn;

use super::FieldExtractor;
use super::patterns::{DATE_DMY, DATE_MY, ISSUANCE_PHRASE};
use crate::error::ExtractionError;

/// Detects the "Comprovante emitido às ... de <date> (horário de Brasília)" stamp.
pub struct IssuanceDateExtractor;

impl IssuanceDateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IssuanceDateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for IssuanceDateExtractor {
    type Output = NaiveDate;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = ISSUANCE_PHRASE.captures(text)?;
        match parse_br_date("issuance date", &caps["date"]) {
            Ok(date) => Some(date),
            Err(e) => {
                warn!("Issuance stamp present but unreadable: {}", e);
                None
            }
        }
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        ISSUANCE_PHRASE
            .captures_iter(text)
            .filter_map(|caps| parse_br_date("issuance date", &caps["date"]).ok())
            .collect()
    }
}

/// Detect the issuance date of a page; `None` when the stamp is absent or unreadable.
pub fn detect_issuance_date(text: &str) -> Option<NaiveDate> {
    IssuanceDateExtractor::new().extract(text)
}

/// Parse a day/month/year date, or a month/year period as the first of the month.
pub fn parse_br_date(field: &str, s: &str) -> Result<NaiveDate, ExtractionError> {
    let s = s.trim();

    let date = if let Some(caps) = DATE_DMY.captures(s) {
        let day: u32 = caps[1].parse().unwrap_or(0);
        let month: u32 = caps[2].parse().unwrap_or(0);
        let year = parse_year(&caps[3]);
        NaiveDate::from_ymd_opt(year, month, day)
    } else if let Some(caps) = DATE_MY.captures(s) {
        let month: u32 = caps[1].parse().unwrap_or(0);
        let year: i32 = caps[2].parse().unwrap_or(0);
        NaiveDate::from_ymd_opt(year, month, 1)
    } else {
        None
    };

    date.ok_or_else(|| ExtractionError::date(field, s))
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if s.len() <= 2 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        if year <= 50 {
            2000 + year
        } else {
            1900 + year
        }
    } else {
        year
    }
}
