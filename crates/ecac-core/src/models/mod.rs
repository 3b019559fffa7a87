//! Receipt data models and configuration.

pub mod config;
pub mod document;

pub use config::EcacConfig;
pub use document::{Document, DocumentHeader, GrammarVersion, LineItem};
