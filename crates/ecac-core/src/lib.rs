//! Core library for reading e-CAC tax payment receipts.
//!
//! This crate provides:
//! - Encoding repair of extracted page text
//! - Layout detection by issuance date (V1 before 2017-11-01, V2 after)
//! - Segmentation of pages into one chunk per embedded receipt
//! - Header and composition extraction for both layouts
//!
//! PDF decoding stays outside: callers hand in page text, directly or through
//! a [`PageSource`].

pub mod error;
pub mod models;
pub mod receipt;
pub mod source;

pub use error::{EcacError, ExtractionError, Result, SourceError};
pub use models::config::EcacConfig;
pub use models::document::{Document, DocumentHeader, GrammarVersion, LineItem};
pub use receipt::{
    DocumentSegmenter, EcacParser, ExtractionResult, FormatDispatcher, GrammarV1, GrammarV2,
    PageExtraction, PageFailure, ReceiptGrammar, ReceiptParser, SkippedChunk,
};
pub use receipt::rules::TextNormalizer;
pub use source::{PageSource, TextPages};

/// Parse page texts (in page order) into receipts with default settings.
///
/// Chunks that cannot be read are left out; use [`EcacParser::parse`] to see them.
pub fn parse<S: AsRef<str> + Sync>(pages: &[S]) -> Vec<Document> {
    EcacParser::new().parse(pages).documents
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry_point_is_total() {
        assert!(parse::<&str>(&[]).is_empty());
        let pages = ["", "no receipts here", "Data de Vencimento\nData de Vencimento"];
        assert!(parse(&pages).is_empty());
    }

    #[test]
    fn test_parse_single_v2_receipt() {
        let page = "Data de Vencimento
11.222.333/0001-81 ACME COMERCIO LTDA
31/12/2017 20/01/2018 07.18.01234.5678901-2
Comprovamos que consta, nos sistemas de controle da Receita Federal do Brasil, o pagamento abaixo:
Composição do Documento de Arrecadação
1234 Imposto de Renda Retido 100.00 - - 100.00
Totais 100.00 - - 100.00
Comprovante emitido às 09:00:00 de 01/11/2017 (horário de Brasília).";

        let documents = parse(&[page]);
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].version, GrammarVersion::V2);
        assert_eq!(documents[0].line_items[0].revenue_code, "1234");
    }
}
