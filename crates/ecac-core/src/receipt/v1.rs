//! Receipts issued before the layout change: labeled header, one amount per code.

use tracing::trace;

use super::rules::patterns::{
    LABEL_CNPJ, LABEL_DOCUMENT_NUMBER, LABEL_DUE_DATE, LABEL_PERIOD, LABEL_REVENUE_VALUE,
    LABEL_TAXPAYER, V1_HEADER_CLOSE, V1_HEADER_OPEN, V1_REVENUE_LINE,
};
use super::rules::{parse_br_amount, parse_br_date};
use super::{section, ReceiptGrammar, Result};
use crate::error::ExtractionError;
use crate::models::document::{DocumentHeader, GrammarVersion, LineItem};

/// V1 grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrammarV1;

impl GrammarV1 {
    pub fn new() -> Self {
        Self
    }
}

/// Value of the first line starting with `label`, without the label and colons.
fn required_field(lines: &[&str], label: &str) -> Result<String> {
    let line = lines
        .iter()
        .find(|l| l.starts_with(label))
        .ok_or_else(|| ExtractionError::MissingField(label.to_string()))?;

    let value = line[label.len()..].replace(':', "");
    let value = value.trim();

    if value.is_empty() {
        return Err(ExtractionError::MissingField(label.to_string()));
    }
    Ok(value.to_string())
}

fn trimmed_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}

impl ReceiptGrammar for GrammarV1 {
    fn version(&self) -> GrammarVersion {
        GrammarVersion::V1
    }

    fn extract_header(&self, chunk: &str) -> Result<DocumentHeader> {
        let block = section(chunk, V1_HEADER_OPEN, V1_HEADER_CLOSE)
            .map_err(ExtractionError::NoHeaderBlock)?;
        let lines = trimmed_lines(block);

        let taxpayer_id = required_field(&lines, LABEL_CNPJ)?;
        let period = required_field(&lines, LABEL_PERIOD)?;
        let due = required_field(&lines, LABEL_DUE_DATE)?;
        let name = required_field(&lines, LABEL_TAXPAYER)?;
        let document_number = required_field(&lines, LABEL_DOCUMENT_NUMBER)?;

        Ok(DocumentHeader {
            taxpayer_id,
            name,
            assessment_period: parse_br_date(LABEL_PERIOD, &period)?,
            due_date: parse_br_date(LABEL_DUE_DATE, &due)?,
            document_number,
        })
    }

    fn extract_line_items(&self, chunk: &str) -> Result<Vec<LineItem>> {
        let mut items = Vec::new();

        for line in trimmed_lines(chunk) {
            if !line.starts_with(LABEL_REVENUE_VALUE) {
                continue;
            }

            let caps = V1_REVENUE_LINE
                .captures(line)
                .ok_or_else(|| ExtractionError::MissingField(format!("amount in {line:?}")))?;

            let code = caps["code"].trim();
            if code.is_empty() {
                return Err(ExtractionError::MissingField(format!("revenue code in {line:?}")));
            }

            let principal = parse_br_amount(&format!("principal of {code}"), &caps["amount"])?;
            trace!("V1 line item {}: {}", code, principal);
            items.push(LineItem::principal_only(code, principal));
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const RECEIPT: &str = "Secretaria da Receita Federal do Brasil
Comprovante de Arrecadação
Comprovamos que consta, nos sistemas de controle da Receita Federal do Brasil, registro de arrecadação de DARF com as características abaixo:
Número de inscrição no CNPJ: 11.222.333/0001-81
Contribuinte: ACME COMERCIO LTDA
Período de Apuração: 30/09/2017
Data de Vencimento: 20/10/2017
Número do Documento: 07.17.28312.3456789-0
Valor no Código de Receita 5952:350,75
Valor no Código de Receita 2172: 1.049,25
Valor Total do Documento: 1.400,00
Comprovante emitido às 10:42:07 de 25/10/2017 (horário de Brasília).";

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_extract_header() {
        let header = GrammarV1.extract_header(RECEIPT).unwrap();

        assert_eq!(
            header,
            DocumentHeader {
                taxpayer_id: "11.222.333/0001-81".to_string(),
                name: "ACME COMERCIO LTDA".to_string(),
                assessment_period: NaiveDate::from_ymd_opt(2017, 9, 30).unwrap(),
                due_date: NaiveDate::from_ymd_opt(2017, 10, 20).unwrap(),
                document_number: "07.17.28312.3456789-0".to_string(),
            }
        );
    }

    #[test]
    fn test_extract_line_items() {
        let items = GrammarV1.extract_line_items(RECEIPT).unwrap();

        assert_eq!(
            items,
            vec![
                LineItem::principal_only("5952", dec("350.75")),
                LineItem::principal_only("2172", dec("1049.25")),
            ]
        );
    }

    #[test]
    fn test_single_revenue_line() {
        let items = GrammarV1
            .extract_line_items("Valor no Código de Receita 5952:350.75")
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].revenue_code, "5952");
        assert_eq!(items[0].principal, dec("350.75"));
        assert_eq!(items[0].total, Decimal::ZERO);
    }

    #[test]
    fn test_missing_label_is_reported() {
        let chunk = RECEIPT.replace("Contribuinte: ACME COMERCIO LTDA\n", "");
        assert_eq!(
            GrammarV1.extract_header(&chunk),
            Err(ExtractionError::MissingField("Contribuinte".to_string()))
        );
    }

    #[test]
    fn test_missing_header_block() {
        let chunk = RECEIPT.replace("características abaixo:", "");
        assert_eq!(
            GrammarV1.extract_header(&chunk),
            Err(ExtractionError::NoHeaderBlock(V1_HEADER_OPEN))
        );
    }

    #[test]
    fn test_bad_date_is_reported() {
        let chunk = RECEIPT.replace("20/10/2017", "20/13/2017");
        assert!(matches!(
            GrammarV1.extract_header(&chunk),
            Err(ExtractionError::DateFormat { .. })
        ));
    }

    #[test]
    fn test_bad_amount_is_an_error() {
        let err = GrammarV1
            .extract_line_items("Valor no Código de Receita 5952:abc")
            .unwrap_err();
        assert_eq!(
            err,
            ExtractionError::NumberFormat {
                field: "principal of 5952".to_string(),
                value: "abc".to_string(),
            }
        );
    }
}
