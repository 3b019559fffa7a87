//! Configuration structures for the receipt parser.

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Main configuration for the ecac pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EcacConfig {
    /// Text normalization configuration.
    pub normalize: NormalizeConfig,

    /// Receipt extraction configuration.
    pub extraction: ExtractionConfig,

    /// Page processing configuration.
    pub processing: ProcessingConfig,
}

/// Encoding repair applied to raw page text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Repair mis-decoded characters before parsing.
    pub enabled: bool,

    /// Legacy encoding the text went through (WHATWG label).
    pub source_encoding: String,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            source_encoding: "windows-1252".to_string(),
        }
    }
}

/// Receipt extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// First issuance date read with the V2 layout.
    pub v2_cutover: NaiveDate,

    /// Report taxpayer identifiers with a bad CNPJ or CPF checksum as warnings.
    pub validate_cnpj: bool,

    /// Reject V2 lines whose total differs from principal + penalty + interest.
    pub validate_totals: bool,

    /// Allowed line total difference, for both warnings and the strict check.
    pub total_tolerance: Decimal,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            v2_cutover: default_cutover(),
            validate_cnpj: true,
            validate_totals: false,
            total_tolerance: Decimal::new(1, 2),
        }
    }
}

/// The receipt layout changed on 2017-11-01.
pub(crate) fn default_cutover() -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 11, 1).unwrap_or(NaiveDate::MIN)
}

/// Page processing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Parse pages on the rayon thread pool.
    pub parallel: bool,
}

impl EcacConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
