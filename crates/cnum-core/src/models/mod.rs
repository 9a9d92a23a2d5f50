//! Data models.

pub mod config;
pub mod numeral;

pub use config::{CnumConfig, ExtractionConfig, OutputConfig};
pub use numeral::NumeralMatch;
