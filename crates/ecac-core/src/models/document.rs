//! Receipt data models produced by the extractors.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One tax payment receipt found in the page text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Header fields.
    pub header: DocumentHeader,

    /// Composition of the paid amounts, in source order.
    pub line_items: Vec<LineItem>,

    /// Layout the receipt was read with.
    pub version: GrammarVersion,

    /// Page the receipt was found on (1-indexed).
    pub page: u32,
}

/// Receipt header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHeader {
    /// Taxpayer identifier (CNPJ), kept as printed.
    pub taxpayer_id: String,

    /// Taxpayer name.
    pub name: String,

    /// Tax period the payment covers.
    pub assessment_period: NaiveDate,

    /// Payment due date.
    pub due_date: NaiveDate,

    /// Collection document number.
    pub document_number: String,
}

/// One revenue-code row of the composition section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Revenue code (código de receita).
    pub revenue_code: String,

    /// Revenue description; empty for V1 receipts.
    #[serde(default)]
    pub description: String,

    /// Principal amount.
    pub principal: Decimal,

    /// Penalty (multa).
    #[serde(default)]
    pub penalty: Decimal,

    /// Interest (juros).
    #[serde(default)]
    pub interest: Decimal,

    /// Line total.
    #[serde(default)]
    pub total: Decimal,
}

impl LineItem {
    /// Build a V1 row, which only reports the principal per code.
    pub fn principal_only(revenue_code: impl Into<String>, principal: Decimal) -> Self {
        Self {
            revenue_code: revenue_code.into(),
            description: String::new(),
            principal,
            penalty: Decimal::ZERO,
            interest: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }

    /// Sum of principal, penalty and interest.
    pub fn components_sum(&self) -> Decimal {
        self.principal + self.penalty + self.interest
    }
}

/// Receipt text layout, selected by issuance date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammarVersion {
    /// Receipts issued before the layout change (labeled header, one amount per code).
    V1,
    /// Receipts issued on or after the layout change (positional header, four amount columns).
    V2,
}

impl fmt::Display for GrammarVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarVersion::V1 => f.write_str("v1"),
            GrammarVersion::V2 => f.write_str("v2"),
        }
    }
}

impl Document {
    /// Sum of the line totals, falling back to the principal for V1 rows.
    pub fn total(&self) -> Decimal {
        self.line_items
            .iter()
            .map(|item| match self.version {
                GrammarVersion::V1 => item.principal,
                GrammarVersion::V2 => item.total,
            })
            .sum()
    }

    /// Validate the receipt data and return any issues found.
    ///
    /// V2 line totals may differ from their parts by up to `tolerance`.
    pub fn validate(&self, tolerance: Decimal) -> Vec<String> {
        let mut issues = Vec::new();

        if self.header.name.is_empty() {
            issues.push("Missing taxpayer name".to_string());
        }

        if self.header.document_number.is_empty() {
            issues.push("Missing document number".to_string());
        }

        if self.line_items.is_empty() {
            issues.push("No line items".to_string());
        }

        if self.version == GrammarVersion::V2 {
            for item in &self.line_items {
                let sum = item.components_sum();
                if (sum - item.total).abs() > tolerance {
                    issues.push(format!(
                        "Line {} total ({}) differs from its parts ({})",
                        item.revenue_code, item.total, sum
                    ));
                }
            }
        }

        issues
    }
}
