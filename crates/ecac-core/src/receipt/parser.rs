//! Page-by-page receipt parser.

use std::borrow::Cow;
use std::time::Instant;

use chrono::NaiveDate;
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::rules::{
    detect_issuance_date, taxpayer_id_issue, FieldExtractor, IssuanceDateExtractor, TextNormalizer,
};
use super::{FormatDispatcher, GrammarV1, GrammarV2, ReceiptGrammar};
use crate::error::{ExtractionError, Result, SourceError};
use crate::models::config::EcacConfig;
use crate::models::document::{Document, GrammarVersion};
use crate::source::PageSource;

/// Result of parsing a batch of pages.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionResult {
    /// Receipts in page order, then in order of appearance within the page.
    pub documents: Vec<Document>,
    /// Chunks that could not be read as a receipt.
    pub skipped: Vec<SkippedChunk>,
    /// Pages whose text could not be obtained.
    pub failed_pages: Vec<PageFailure>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// A chunk excluded from the result, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedChunk {
    /// Page number (1-indexed).
    pub page: u32,
    /// Position of the chunk within its page (0-indexed).
    pub chunk: usize,
    /// Grammar the chunk was read with.
    pub version: GrammarVersion,
    #[serde(serialize_with = "serialize_display")]
    pub error: ExtractionError,
}

/// A page the source could not deliver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFailure {
    /// Page number (1-indexed).
    pub page: u32,
    #[serde(serialize_with = "serialize_display")]
    pub reason: SourceError,
}

fn serialize_display<T: std::fmt::Display, S: serde::Serializer>(
    value: &T,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Everything extracted from one page.
#[derive(Debug, Clone)]
pub struct PageExtraction {
    /// Page number (1-indexed).
    pub page: u32,
    /// Issuance date found on the page, if any.
    pub issued: Option<NaiveDate>,
    /// Grammar selected for the page.
    pub version: GrammarVersion,
    pub documents: Vec<Document>,
    pub skipped: Vec<SkippedChunk>,
    pub warnings: Vec<String>,
}

/// Trait for receipt parsing.
pub trait ReceiptParser {
    /// Parse the extracted text of one page.
    fn parse_page(&self, page: u32, text: &str) -> PageExtraction;
}

/// e-CAC receipt parser: normalize, detect layout, segment, extract.
#[derive(Debug, Clone)]
pub struct EcacParser {
    /// Encoding repair, when enabled.
    normalizer: Option<TextNormalizer>,
    dispatcher: FormatDispatcher,
    v1: GrammarV1,
    v2: GrammarV2,
    /// Whether to check CNPJ/CPF checksums.
    validate_cnpj: bool,
    /// Allowed line total difference before a warning.
    total_tolerance: Decimal,
    /// Whether to parse pages in parallel.
    parallel: bool,
}

impl EcacParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            normalizer: Some(TextNormalizer::new()),
            dispatcher: FormatDispatcher::new(),
            v1: GrammarV1::new(),
            v2: GrammarV2::new(),
            validate_cnpj: true,
            total_tolerance: Decimal::new(1, 2),
            parallel: false,
        }
    }

    /// Create a parser from configuration.
    pub fn from_config(config: &EcacConfig) -> Result<Self> {
        let normalizer = if config.normalize.enabled {
            Some(TextNormalizer::for_label(&config.normalize.source_encoding)?)
        } else {
            None
        };

        let totals = config
            .extraction
            .validate_totals
            .then_some(config.extraction.total_tolerance);

        Ok(Self::new()
            .with_normalizer(normalizer)
            .with_cutover(config.extraction.v2_cutover)
            .with_cnpj_validation(config.extraction.validate_cnpj)
            .with_total_tolerance(config.extraction.total_tolerance)
            .with_totals_check(totals)
            .with_parallel(config.processing.parallel))
    }

    /// Set text normalization (`None` disables it).
    pub fn with_normalizer(mut self, normalizer: Option<TextNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Set the first issuance date read as V2.
    pub fn with_cutover(mut self, cutover: NaiveDate) -> Self {
        self.dispatcher = FormatDispatcher::with_cutover(cutover);
        self
    }

    /// Set CNPJ/CPF checksum validation.
    pub fn with_cnpj_validation(mut self, validate: bool) -> Self {
        self.validate_cnpj = validate;
        self
    }

    /// Set the tolerance used when warning about line totals.
    pub fn with_total_tolerance(mut self, tolerance: Decimal) -> Self {
        self.total_tolerance = tolerance;
        self
    }

    /// Set the V2 line total check (`None` disables it).
    pub fn with_totals_check(mut self, tolerance: Option<Decimal>) -> Self {
        if let Some(tolerance) = tolerance {
            self.total_tolerance = tolerance;
        }
        self.v2 = self.v2.with_totals_check(tolerance);
        self
    }

    /// Set parallel page parsing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn grammar(&self, version: GrammarVersion) -> &dyn ReceiptGrammar {
        match version {
            GrammarVersion::V1 => &self.v1,
            GrammarVersion::V2 => &self.v2,
        }
    }

    /// Parse page texts given in page order.
    pub fn parse<S: AsRef<str> + Sync>(&self, pages: &[S]) -> ExtractionResult {
        let numbered: Vec<(u32, &str)> = pages
            .iter()
            .enumerate()
            .map(|(idx, text)| (idx as u32 + 1, text.as_ref()))
            .collect();

        self.parse_numbered(&numbered, Vec::new())
    }

    /// Parse every page of a text source, reading pages `1..=page_count()`.
    pub fn parse_source(&self, source: &dyn PageSource) -> ExtractionResult {
        let page_count = source.page_count();
        let mut texts = Vec::with_capacity(page_count as usize);
        let mut failed = Vec::new();

        for page in 1..=page_count {
            match source.page_text(page) {
                Ok(text) => texts.push((page, text)),
                Err(e) => {
                    warn!("Failed to read text of page {}: {}", page, e);
                    failed.push(PageFailure { page, reason: e });
                }
            }
        }

        let numbered: Vec<(u32, &str)> = texts
            .iter()
            .map(|(page, text)| (*page, text.as_str()))
            .collect();
        let mut result = self.parse_numbered(&numbered, failed);

        if page_count == 0 {
            result.warnings.push(SourceError::NoPages.to_string());
        }
        result
    }

    fn parse_numbered(
        &self,
        pages: &[(u32, &str)],
        failed_pages: Vec<PageFailure>,
    ) -> ExtractionResult {
        let start = Instant::now();

        info!("Parsing receipts from {} pages", pages.len());

        let extractions: Vec<PageExtraction> = if self.parallel {
            pages
                .par_iter()
                .map(|&(page, text)| self.parse_page(page, text))
                .collect()
        } else {
            pages
                .iter()
                .map(|&(page, text)| self.parse_page(page, text))
                .collect()
        };

        let mut result = ExtractionResult {
            failed_pages,
            ..ExtractionResult::default()
        };

        for extraction in extractions {
            result.documents.extend(extraction.documents);
            result.skipped.extend(extraction.skipped);
            result.warnings.extend(extraction.warnings);
        }

        result.processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "Extracted {} receipts ({} chunks skipped) in {}ms",
            result.documents.len(),
            result.skipped.len(),
            result.processing_time_ms
        );

        result
    }
}

impl Default for EcacParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptParser for EcacParser {
    fn parse_page(&self, page: u32, text: &str) -> PageExtraction {
        let text = match &self.normalizer {
            Some(normalizer) => normalizer.normalize(text),
            None => Cow::Borrowed(text),
        };

        let issued = detect_issuance_date(&text);
        let version = self.dispatcher.select(issued);
        let grammar = self.grammar(version);
        let chunks = grammar.segmenter().segment(&text);

        debug!(
            "Page {}: issued {:?}, grammar {}, {} chunks",
            page,
            issued,
            version,
            chunks.len()
        );

        let mut extraction = PageExtraction {
            page,
            issued,
            version,
            documents: Vec::new(),
            skipped: Vec::new(),
            warnings: Vec::new(),
        };

        let mixed = IssuanceDateExtractor::new()
            .extract_all(&text)
            .into_iter()
            .any(|date| self.dispatcher.select(Some(date)) != version);
        if mixed {
            warn!("Page {} has issuance stamps on both sides of the cutover", page);
            extraction.warnings.push(format!(
                "page {}: issuance stamps on both sides of the {} cutover, read as {}",
                page,
                self.dispatcher.cutover(),
                version
            ));
        }

        for (idx, chunk) in chunks.iter().enumerate() {
            match grammar.extract(chunk) {
                Ok((header, line_items)) => {
                    let document = Document {
                        header,
                        line_items,
                        version,
                        page,
                    };

                    let id_issue = self
                        .validate_cnpj
                        .then(|| taxpayer_id_issue(&document.header.taxpayer_id))
                        .flatten();

                    let issues = id_issue
                        .into_iter()
                        .chain(document.validate(self.total_tolerance));
                    extraction.warnings.extend(issues.map(|issue| {
                        let number = &document.header.document_number;
                        format!("page {} receipt {}: {}", page, number, issue)
                    }));

                    extraction.documents.push(document);
                }
                Err(error) => {
                    warn!("Skipping chunk {} of page {} ({}): {}", idx, page, version, error);
                    extraction.skipped.push(SkippedChunk {
                        page,
                        chunk: idx,
                        version,
                        error,
                    });
                }
            }
        }

        extraction
    }
}
