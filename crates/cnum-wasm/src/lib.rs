//! WASM bindings for Chinese numeral extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.

use wasm_bindgen::prelude::*;

use cnum_core::models::config::ExtractionConfig;
use cnum_core::{ExtractionReport, NumeralExtractor as CoreExtractor};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract numerals from text.
///
/// Returns an array of `{ begin, end, value, decimal, negative }` objects
/// with character offsets into `text`.
#[wasm_bindgen]
pub fn extract_numerals(text: &str) -> Result<JsValue, JsValue> {
    let matches = cnum_core::extract_numerals(text).map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&matches).map_err(to_js_error)
}

/// Replace numerals in text with Arabic numerals.
#[wasm_bindgen]
pub fn replace_numerals(text: &str) -> Result<String, JsValue> {
    cnum_core::replace_numerals(text).map_err(to_js_error)
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Numeral extractor class for browser use.
#[wasm_bindgen]
pub struct NumeralExtractor {
    config: ExtractionConfig,
}

#[wasm_bindgen]
impl NumeralExtractor {
    /// Create a new numeral extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
        }
    }

    /// Configure lone-digit reporting.
    #[wasm_bindgen]
    pub fn set_bare_digits(&mut self, enabled: bool) {
        self.config.bare_digits = enabled;
    }

    /// Configure negative marker detection.
    #[wasm_bindgen]
    pub fn set_detect_negative(&mut self, enabled: bool) {
        self.config.detect_negative = enabled;
    }

    /// Configure the context window around magnitude keywords.
    #[wasm_bindgen]
    pub fn set_context(&mut self, before: usize, after: usize) {
        self.config.context_before = before;
        self.config.context_after = after;
    }

    /// Extract numerals from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        let report = self.report(text)?;
        serde_wasm_bindgen::to_value(&report.matches).map_err(to_js_error)
    }

    /// Get extraction result with diagnostics and timing.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        let report = self.report(text)?;

        #[derive(serde::Serialize)]
        struct ExtractResult {
            matches: Vec<cnum_core::NumeralMatch>,
            display: Vec<String>,
            diagnostics: Vec<String>,
            processing_time_ms: u64,
        }

        let output = ExtractResult {
            display: report.display_strings(),
            diagnostics: report
                .diagnostics
                .iter()
                .map(ToString::to_string)
                .collect(),
            processing_time_ms: report.processing_time_ms,
            matches: report.matches,
        };

        serde_wasm_bindgen::to_value(&output).map_err(to_js_error)
    }

    /// Replace numerals in text with Arabic numerals.
    #[wasm_bindgen]
    pub fn replace(&self, text: &str) -> Result<String, JsValue> {
        self.extractor().replace(text).map_err(to_js_error)
    }

    fn extractor(&self) -> CoreExtractor {
        CoreExtractor::from_config(&self.config)
    }

    fn report(&self, text: &str) -> Result<ExtractionReport, JsValue> {
        self.extractor().extract(text).map_err(to_js_error)
    }
}

impl Default for NumeralExtractor {
    fn default() -> Self {
        Self::new()
    }
}
