//! Core library for Chinese numeral recognition.
//!
//! This crate provides:
//! - Glyph classification (digits, magnitudes, decimal and negative markers)
//! - Recursive reading of numerals such as 三亿五千万 or 七百零三块五
//! - Extraction of every numeral in a text as character-offset spans
//! - Replacement of recognized numerals with their Arabic form

pub mod error;
pub mod models;
pub mod numeral;

pub use error::{CnumError, ExtractionError, Result};
pub use models::{CnumConfig, ExtractionConfig, NumeralMatch, OutputConfig};
pub use numeral::{
    Diagnostic, DiagnosticKind, ExtractionReport, NumeralExtractor, extract_numerals,
    replace_numerals, splice,
};
