//! Receipts issued on or after the layout change: positional header, four amount columns.

use rust_decimal::Decimal;
use tracing::trace;

use super::rules::patterns::{COMPOSITION_CLOSE, COMPOSITION_OPEN, V2_HEADER_CLOSE};
use super::rules::{parse_br_date, parse_column_amount, tokenize};
use super::{section, ReceiptGrammar, Result};
use crate::error::ExtractionError;
use crate::models::document::{DocumentHeader, GrammarVersion, LineItem};

/// Number of amount columns at the end of every composition line.
const AMOUNT_COLUMNS: usize = 4;

/// V2 grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrammarV2 {
    /// When set, reject lines whose total is off from its parts by more than this.
    totals_tolerance: Option<Decimal>,
}

impl GrammarV2 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the line total check.
    pub fn with_totals_check(mut self, tolerance: Option<Decimal>) -> Self {
        self.totals_tolerance = tolerance;
        self
    }

    fn check_total(&self, item: &LineItem) -> Result<()> {
        let Some(tolerance) = self.totals_tolerance else {
            return Ok(());
        };

        let sum = item.components_sum();
        if (sum - item.total).abs() > tolerance {
            return Err(ExtractionError::Validation {
                field: format!("total of {}", item.revenue_code),
                reason: format!(
                    "{} != {} + {} + {}",
                    item.total, item.principal, item.penalty, item.interest
                ),
            });
        }
        Ok(())
    }
}

/// Columns of one composition line, still as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositionColumns<'a> {
    pub code: &'a str,
    pub description: &'a str,
    pub principal: &'a str,
    pub penalty: &'a str,
    pub interest: &'a str,
    pub total: &'a str,
}

/// Split a composition line with the last-four-token rule.
///
/// The first token is the revenue code and the last four are principal,
/// penalty, interest and total. Whatever lies between is the description,
/// which may contain spaces and digits of its own.
pub fn split_composition_line(line: &str) -> Result<CompositionColumns<'_>> {
    let tokens = tokenize(line);

    if tokens.len() < AMOUNT_COLUMNS + 1 {
        return Err(ExtractionError::mismatch(
            format!("composition line {line:?}"),
            "at least 5 tokens",
            tokens.len(),
        ));
    }

    let code = tokens[0];
    let amounts = &tokens[tokens.len() - AMOUNT_COLUMNS..];

    Ok(CompositionColumns {
        code: code.text,
        description: line[code.end..amounts[0].start].trim(),
        principal: amounts[0].text,
        penalty: amounts[1].text,
        interest: amounts[2].text,
        total: amounts[3].text,
    })
}

fn parse_line_item(line: &str) -> Result<LineItem> {
    let columns = split_composition_line(line)?;
    let code = columns.code;

    Ok(LineItem {
        revenue_code: code.to_string(),
        description: columns.description.to_string(),
        principal: parse_column_amount(&format!("principal of {code}"), columns.principal)?,
        penalty: parse_column_amount(&format!("penalty of {code}"), columns.penalty)?,
        interest: parse_column_amount(&format!("interest of {code}"), columns.interest)?,
        total: parse_column_amount(&format!("total of {code}"), columns.total)?,
    })
}

impl ReceiptGrammar for GrammarV2 {
    fn version(&self) -> GrammarVersion {
        GrammarVersion::V2
    }

    fn extract_header(&self, chunk: &str) -> Result<DocumentHeader> {
        let end = chunk
            .find(V2_HEADER_CLOSE)
            .ok_or(ExtractionError::NoHeaderBlock(V2_HEADER_CLOSE))?;

        let lines: Vec<&str> = chunk[..end]
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        if lines.len() < 2 {
            return Err(ExtractionError::mismatch("header block", "2 lines", lines.len()));
        }

        // Line 0: "<identifier> <name>"
        let taxpayer = tokenize(lines[0]);
        if taxpayer.len() < 2 {
            return Err(ExtractionError::mismatch(
                "taxpayer line",
                "identifier followed by name",
                taxpayer.len(),
            ));
        }

        // Line 1: "<assessment period> <due date> <document number>"
        let dates = tokenize(lines[1]);
        if dates.len() != 3 {
            return Err(ExtractionError::mismatch("period line", "3 tokens", dates.len()));
        }

        Ok(DocumentHeader {
            taxpayer_id: taxpayer[0].text.to_string(),
            name: lines[0][taxpayer[1].start..].trim().to_string(),
            assessment_period: parse_br_date("assessment period", dates[0].text)?,
            due_date: parse_br_date("due date", dates[1].text)?,
            document_number: dates[2].text.to_string(),
        })
    }

    fn extract_line_items(&self, chunk: &str) -> Result<Vec<LineItem>> {
        let block = section(chunk, COMPOSITION_OPEN, COMPOSITION_CLOSE)
            .map_err(|_| ExtractionError::NoCompositionBlock)?;

        block
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|line| -> Result<LineItem> {
                let item = parse_line_item(line)?;
                self.check_total(&item)?;
                trace!(
                    "V2 line item {}: {:?} total {}",
                    item.revenue_code,
                    item.description,
                    item.total
                );
                Ok(item)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    const RECEIPT: &str = "11.222.333/0001-81 ACME COMERCIO LTDA
31/12/2017 20/01/2018 07.18.01234.5678901-2
Comprovamos que consta, nos sistemas de controle da Receita Federal do Brasil, registro de arrecadação de DARF com as características abaixo:
Composição do Documento de Arrecadação
1234 Imposto de Renda Retido 100.00 - - 100.00
2172 COFINS 2 Trimestre 1.049,25 52,46 10,49 1.112,20
Totais 1.149,25 52,46 10,49 1.212,20
Comprovante emitido às 10:42:07 de 25/01/2018 (horário de Brasília).";

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_extract_header() {
        let header = GrammarV2::new().extract_header(RECEIPT).unwrap();

        assert_eq!(
            header,
            DocumentHeader {
                taxpayer_id: "11.222.333/0001-81".to_string(),
                name: "ACME COMERCIO LTDA".to_string(),
                assessment_period: NaiveDate::from_ymd_opt(2017, 12, 31).unwrap(),
                due_date: NaiveDate::from_ymd_opt(2018, 1, 20).unwrap(),
                document_number: "07.18.01234.5678901-2".to_string(),
            }
        );
    }

    #[test]
    fn test_extract_line_items() {
        let items = GrammarV2::new().extract_line_items(RECEIPT).unwrap();

        assert_eq!(
            items,
            vec![
                LineItem {
                    revenue_code: "1234".to_string(),
                    description: "Imposto de Renda Retido".to_string(),
                    principal: dec("100.00"),
                    penalty: Decimal::ZERO,
                    interest: Decimal::ZERO,
                    total: dec("100.00"),
                },
                LineItem {
                    revenue_code: "2172".to_string(),
                    description: "COFINS 2 Trimestre".to_string(),
                    principal: dec("1049.25"),
                    penalty: dec("52.46"),
                    interest: dec("10.49"),
                    total: dec("1112.20"),
                },
            ]
        );
    }

    #[test]
    fn test_last_four_token_rule() {
        let columns =
            split_composition_line("1234 Imposto de Renda Retido 100.00 - - 100.00").unwrap();
        assert_eq!(columns.code, "1234");
        assert_eq!(columns.description, "Imposto de Renda Retido");
        assert_eq!(columns.principal, "100.00");
        assert_eq!(columns.penalty, "-");
        assert_eq!(columns.interest, "-");
        assert_eq!(columns.total, "100.00");

        // Digits inside the description stay in the description
        let columns =
            split_composition_line("0561 IRRF 13 Salario 2017 500,00 - 1,00 501,00").unwrap();
        assert_eq!(columns.description, "IRRF 13 Salario 2017");
        assert_eq!(columns.principal, "500,00");

        // Exactly five tokens: empty description
        let columns = split_composition_line("8109   10,00 - - 10,00").unwrap();
        assert_eq!(columns.description, "");
    }

    #[test]
    fn test_short_line_is_a_mismatch() {
        assert_eq!(
            split_composition_line("1234 100.00 - -"),
            Err(ExtractionError::StructuralMismatch {
                what: "composition line \"1234 100.00 - -\"".to_string(),
                expected: "at least 5 tokens".to_string(),
                found: 4,
            })
        );
    }

    #[test]
    fn test_all_dash_amounts() {
        let item = parse_line_item("2089 IRPJ - - - -").unwrap();
        assert_eq!(item.principal, Decimal::ZERO);
        assert_eq!(item.penalty, Decimal::ZERO);
        assert_eq!(item.interest, Decimal::ZERO);
        assert_eq!(item.total, Decimal::ZERO);
    }

    #[test]
    fn test_hyphen_inside_description_is_kept() {
        let item = parse_line_item("1097 PIS - Folha de Salarios 12,00 - - 12,00").unwrap();
        assert_eq!(item.description, "PIS - Folha de Salarios");
    }

    #[test]
    fn test_unparsable_column_is_an_error() {
        assert_eq!(
            parse_line_item("1234 Imposto 100,00 x - 100,00"),
            Err(ExtractionError::NumberFormat {
                field: "penalty of 1234".to_string(),
                value: "x".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_totais_is_no_composition_block() {
        let chunk = RECEIPT.replace("Totais", "Soma");
        assert_eq!(
            GrammarV2::new().extract_line_items(&chunk),
            Err(ExtractionError::NoCompositionBlock)
        );
    }

    #[test]
    fn test_header_token_counts_are_checked() {
        let chunk = RECEIPT.replace("31/12/2017 20/01/2018 ", "31/12/2017 ");
        assert!(matches!(
            GrammarV2::new().extract_header(&chunk),
            Err(ExtractionError::StructuralMismatch { found: 2, .. })
        ));

        let chunk = RECEIPT.replace("11.222.333/0001-81 ACME COMERCIO LTDA", "11.222.333/0001-81");
        assert!(matches!(
            GrammarV2::new().extract_header(&chunk),
            Err(ExtractionError::StructuralMismatch { found: 1, .. })
        ));
    }

    #[test]
    fn test_totals_check() {
        let lenient = GrammarV2::new();
        let strict = GrammarV2::new().with_totals_check(Some(Decimal::new(1, 2)));
        let chunk = RECEIPT.replace("1.112,20", "1.000,00");

        assert!(lenient.extract_line_items(&chunk).is_ok());
        assert!(strict.extract_line_items(RECEIPT).is_ok());
        assert!(matches!(
            strict.extract_line_items(&chunk),
            Err(ExtractionError::Validation { .. })
        ));
    }
}
