//! Amount parsing for e-CAC receipts.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{
    AMOUNT_BR_GROUPED, AMOUNT_COMMA_DECIMAL, AMOUNT_COMMA_GROUPED, AMOUNT_PLAIN,
};
use crate::error::ExtractionError;

/// Token printed in composition columns for a zero amount.
pub const ZERO_PLACEHOLDER: &str = "-";

/// Parse a currency amount ("1.234,56", "350,75" or "350.75").
///
/// Shapes are tried in order, so a single dot is always a decimal point:
/// "1.234" reads as 1.234, while "1.234.567" can only be grouping.
pub fn parse_br_amount(field: &str, s: &str) -> Result<Decimal, ExtractionError> {
    let s = s.trim();

    let normalized = if AMOUNT_PLAIN.is_match(s) {
        s.to_string()
    } else if AMOUNT_BR_GROUPED.is_match(s) {
        s.replace('.', "").replace(',', ".")
    } else if AMOUNT_COMMA_DECIMAL.is_match(s) {
        s.replace(',', ".")
    } else if AMOUNT_COMMA_GROUPED.is_match(s) {
        s.replace(',', "")
    } else {
        return Err(ExtractionError::number(field, s));
    };

    Decimal::from_str(&normalized).map_err(|_| ExtractionError::number(field, s))
}

/// Parse a composition column, where "-" stands for zero.
pub fn parse_column_amount(field: &str, s: &str) -> Result<Decimal, ExtractionError> {
    if s.trim() == ZERO_PLACEHOLDER {
        return Ok(Decimal::ZERO);
    }
    parse_br_amount(field, s)
}

/// Format amount in Brazilian style (1.234,56).
pub fn format_br_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    if amount.is_sign_negative() && !amount.is_zero() {
        formatted.push('-');
    }

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("{},{}", formatted, decimal_part)
}
