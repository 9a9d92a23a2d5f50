//! Error types for the cnum-core library.

use thiserror::Error;

/// Main error type for the cnum library.
#[derive(Error, Debug)]
pub enum CnumError {
    /// Numeral extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while recognizing numerals.
///
/// Inputs the grammar rejects are not errors: they simply produce no match
/// and, where useful, a [`Diagnostic`](crate::numeral::Diagnostic). The
/// variants here indicate a broken internal invariant.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A decimal carried into a magnitude's zero padding did not parse.
    #[error("invalid decimal carry 0.{decimal} at scale {scale}: {reason}")]
    InvalidDecimal {
        decimal: String,
        scale: i64,
        reason: String,
    },

    /// A match span fell outside the text it was extracted from.
    #[error("match span {begin}..{end} out of bounds for text of {len} characters")]
    SpanOutOfBounds { begin: usize, end: usize, len: usize },
}

/// Result type for the cnum library.
pub type Result<T> = std::result::Result<T, CnumError>;
