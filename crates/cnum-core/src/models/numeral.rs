//! Recognized numeral data model.

use std::fmt;
use std::num::ParseFloatError;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One numeral expression recognized in a text.
///
/// `begin` and `end` are character (not byte) offsets into the original
/// text, end exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumeralMatch {
    /// First character of the expression, including any negative marker.
    pub begin: usize,

    /// One past the last character of the expression.
    pub end: usize,

    /// Signed integer part.
    pub value: i64,

    /// Fraction digits, meaning `0.<decimal>`. Kept as text so long
    /// fractions survive without binary rounding.
    pub decimal: String,

    /// Whether a negative marker was absorbed into the span.
    #[serde(default)]
    pub negative: bool,
}

impl NumeralMatch {
    /// Create a non-negative integer match.
    pub fn new(begin: usize, end: usize, value: i64) -> Self {
        Self {
            begin,
            end,
            value,
            decimal: String::new(),
            negative: false,
        }
    }

    /// Attach a fraction suffix.
    pub fn with_decimal(mut self, decimal: impl Into<String>) -> Self {
        self.decimal = decimal.into();
        self
    }

    /// Number of characters the expression covers.
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Whether two matches share at least one character.
    pub fn overlaps(&self, other: &NumeralMatch) -> bool {
        self.begin < other.end && other.begin < self.end
    }

    /// Whether the value has a fraction part.
    pub fn has_decimal(&self) -> bool {
        !self.decimal.is_empty()
    }

    /// Canonical Arabic-numeral form, e.g. `-3.14`.
    pub fn display_string(&self) -> String {
        self.to_string()
    }

    /// Approximate floating-point value.
    ///
    /// Fails only when `decimal` holds something other than ASCII digits.
    pub fn to_f64(&self) -> Result<f64, ParseFloatError> {
        self.to_string().parse()
    }

    /// Exact decimal value.
    pub fn to_decimal(&self) -> Result<Decimal, rust_decimal::Error> {
        Decimal::from_str(&self.to_string())
    }
}

impl fmt::Display for NumeralMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `-0` has no sign in i64, so the flag carries it for fractions.
        if self.negative && self.value == 0 && self.has_decimal() {
            f.write_str("-")?;
        }
        write!(f, "{}", self.value)?;
        if self.has_decimal() {
            write!(f, ".{}", self.decimal)?;
        }
        Ok(())
    }
}
