//! Chinese numeral recognition.

pub mod decimal;
pub mod extractor;
pub mod glyphs;
pub mod reader;
pub mod replace;

use std::fmt;

use serde::Serialize;

pub use extractor::{ExtractionReport, NumeralExtractor};
pub use glyphs::{Glyph, MAGNITUDES, Magnitude, MagnitudeTable, classify};
pub use replace::splice;

use crate::error::Result;
use crate::models::numeral::NumeralMatch;

/// Why a composition around a keyword was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The multiplier before a keyword was a bare zero, as in 零百.
    LeadingZero,
    /// A fractional multiplier was followed by a remainder, as in 三点五百二.
    DecimalBeforeMagnitude { decimal: String, right: i64 },
    /// A reader was asked for a level outside the magnitude table.
    InvalidLevel { level: usize },
    /// The composed value does not fit in an `i64`.
    Overflow,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::LeadingZero => write!(f, "multiplier cannot be a leading zero"),
            DiagnosticKind::DecimalBeforeMagnitude { decimal, right } => write!(
                f,
                "fractional multiplier .{} cannot be followed by remainder {}",
                decimal, right
            ),
            DiagnosticKind::InvalidLevel { level } => {
                write!(f, "invalid magnitude level {}", level)
            }
            DiagnosticKind::Overflow => write!(f, "value overflows a 64-bit integer"),
        }
    }
}

/// A non-fatal recognition failure at a character position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub position: usize,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at {}: {}", self.position, self.kind)
    }
}

/// Extract every numeral in `text`, sorted by position.
pub fn extract_numerals(text: &str) -> Result<Vec<NumeralMatch>> {
    Ok(NumeralExtractor::new().extract(text)?.matches)
}

/// Replace every numeral in `text` with its Arabic form.
pub fn replace_numerals(text: &str) -> Result<String> {
    NumeralExtractor::new().replace(text)
}
