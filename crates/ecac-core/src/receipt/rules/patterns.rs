//! Common patterns and anchor phrases of e-CAC receipt text.

use lazy_static::lazy_static;
use regex::Regex;

/// Opening anchor of the V1 header block.
pub const V1_HEADER_OPEN: &str = "características abaixo:";

/// Closing anchor of the V1 header block (also starts the issuance phrase).
pub const V1_HEADER_CLOSE: &str = "Comprovante emitido às";

/// Closing anchor of the V2 header block.
pub const V2_HEADER_CLOSE: &str =
    "Comprovamos que consta, nos sistemas de controle da Receita Federal do Brasil";

/// Opening anchor of the V2 composition block.
pub const COMPOSITION_OPEN: &str = "Composição do Documento de Arrecadação";

/// Closing anchor of the V2 composition block.
pub const COMPOSITION_CLOSE: &str = "Totais";

/// V1 header labels.
pub const LABEL_CNPJ: &str = "Número de inscrição no CNPJ";
pub const LABEL_PERIOD: &str = "Período de Apuração";
pub const LABEL_DUE_DATE: &str = "Data de Vencimento";
pub const LABEL_TAXPAYER: &str = "Contribuinte";
pub const LABEL_DOCUMENT_NUMBER: &str = "Número do Documento";

/// Prefix of V1 per-code amount lines.
pub const LABEL_REVENUE_VALUE: &str = "Valor no Código de Receita ";

lazy_static! {
    // Issuance timestamp, one per receipt
    pub static ref ISSUANCE_PHRASE: Regex = Regex::new(
        r"Comprovante emitido às (?P<time>.*?) de (?P<date>[\w:/.]+) \(horário de Brasília\)"
    ).unwrap();

    // Segment boundaries
    pub static ref V1_BOUNDARY: Regex = Regex::new(r"Ministério da Fazenda").unwrap();

    pub static ref V2_BOUNDARY: Regex = Regex::new(r"Data de Vencimento").unwrap();

    pub static ref LEFTOVER_DUE_DATE_LABEL: Regex = Regex::new(r"Data de Vencimento\r?\n").unwrap();

    // V1 composition line: greedy code, so the last colon separates the amount
    pub static ref V1_REVENUE_LINE: Regex = Regex::new(
        r"^Valor no Código de Receita (?P<code>.*):(?P<amount>.*)$"
    ).unwrap();

    // Dates (DD/MM/YYYY, DD.MM.YY, MM/YYYY)
    pub static ref DATE_DMY: Regex = Regex::new(
        r"^(\d{1,2})[./\-](\d{1,2})[./\-](\d{4}|\d{2})$"
    ).unwrap();

    pub static ref DATE_MY: Regex = Regex::new(
        r"^(\d{1,2})[./\-](\d{4})$"
    ).unwrap();

    // Amounts
    pub static ref AMOUNT_PLAIN: Regex = Regex::new(r"^\d+(?:\.\d+)?$").unwrap();

    pub static ref AMOUNT_BR_GROUPED: Regex = Regex::new(r"^\d{1,3}(?:\.\d{3})+(?:,\d+)?$").unwrap();

    pub static ref AMOUNT_COMMA_DECIMAL: Regex = Regex::new(r"^\d+,\d+$").unwrap();

    pub static ref AMOUNT_COMMA_GROUPED: Regex = Regex::new(r"^\d{1,3}(?:,\d{3})+(?:\.\d+)?$").unwrap();
}
