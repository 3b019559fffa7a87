//! Rule-based field extractors for e-CAC receipts.

pub mod amounts;
pub mod cnpj;
pub mod dates;
pub mod normalize;
pub mod patterns;
pub mod tokens;

pub use amounts::{format_br_amount, parse_br_amount, parse_column_amount};
pub use cnpj::{format_cnpj, taxpayer_id_issue, validate_cnpj, validate_cpf};
pub use dates::{detect_issuance_date, parse_br_date, IssuanceDateExtractor};
pub use normalize::{normalize_text, TextNormalizer};
pub use tokens::{tokenize, Token};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}
