//! Extraction driver.
//!
//! Magnitude keywords are processed from 亿 down to 十. Every accepted
//! expression is blanked in a private copy of the text so no character can
//! belong to two matches. Digits still standing afterwards are picked up by a
//! final single-digit sweep.

use tracing::{debug, trace};

use crate::error::Result;
use crate::models::config::ExtractionConfig;
use crate::models::numeral::NumeralMatch;

use super::Diagnostic;
use super::decimal::read_decimal;
use super::glyphs::{
    MAGNITUDES, Magnitude, MagnitudeTable, digit_value, is_decimal_marker, is_digit,
    is_negative_marker,
};
use super::reader::{Reader, Reading};
use super::replace::splice;

/// Sentinel written over consumed characters.
const CONSUMED: char = ' ';

/// Result of one extraction pass.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Matches sorted by `begin`, pairwise disjoint.
    pub matches: Vec<NumeralMatch>,
    /// Compositions that were rejected along the way.
    pub diagnostics: Vec<Diagnostic>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionReport {
    /// Display strings of all matches, in order.
    pub fn display_strings(&self) -> Vec<String> {
        self.matches.iter().map(NumeralMatch::display_string).collect()
    }
}

/// Finds Chinese numerals in text.
pub struct NumeralExtractor {
    table: &'static MagnitudeTable,
    /// Characters of context before a keyword.
    context_before: usize,
    /// Characters of context after a keyword.
    context_after: usize,
    /// Whether lone digits are reported.
    bare_digits: bool,
    /// Whether negative markers are honoured.
    detect_negative: bool,
}

impl NumeralExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            table: &MAGNITUDES,
            context_before: config.context_before,
            context_after: config.context_after,
            bare_digits: config.bare_digits,
            detect_negative: config.detect_negative,
        }
    }

    /// Set the context window around each keyword.
    pub fn with_context(mut self, before: usize, after: usize) -> Self {
        self.context_before = before;
        self.context_after = after;
        self
    }

    /// Set whether lone digits are reported.
    pub fn with_bare_digits(mut self, enabled: bool) -> Self {
        self.bare_digits = enabled;
        self
    }

    /// Set whether negative markers are honoured.
    pub fn with_negative_detection(mut self, enabled: bool) -> Self {
        self.detect_negative = enabled;
        self
    }

    /// Extract all numerals from `text`.
    pub fn extract(&self, text: &str) -> Result<ExtractionReport> {
        let stopwatch = Stopwatch::start();
        let mut scratch: Vec<char> = text.chars().collect();
        let len = scratch.len();
        let max_hits = (len / 2).max(1);

        let mut matches = Vec::new();
        let mut diagnostics = Vec::new();

        for spec in self.table.levels() {
            let magnitude = spec.magnitude;
            let mut from = 0;

            for _ in 0..max_hits {
                let Some(pos) = find_keyword(&scratch, magnitude, from) else {
                    break;
                };
                from = pos + 1;

                let begin = pos.saturating_sub(self.context_before);
                let end = (pos + self.context_after).min(len);

                let mut reader = Reader::new(&scratch, self.table);
                let reading = reader.read_anchored(begin, end, pos, magnitude)?;
                diagnostics.extend(reader.into_diagnostics());

                match reading {
                    Some(reading) => matches.push(self.accept(&mut scratch, reading)),
                    None => {
                        trace!(position = pos, keyword = %scratch[pos], "keyword left unmatched")
                    }
                }
            }
        }

        if self.bare_digits {
            self.sweep_digits(&mut scratch, &mut matches);
        }

        matches.sort_by_key(|m| m.begin);

        debug!(
            "Extracted {} numerals from {} characters ({} diagnostics)",
            matches.len(),
            len,
            diagnostics.len()
        );

        Ok(ExtractionReport {
            matches,
            diagnostics,
            processing_time_ms: stopwatch.elapsed_ms(),
        })
    }

    /// Replace all numerals in `text` with their Arabic form.
    pub fn replace(&self, text: &str) -> Result<String> {
        let report = self.extract(text)?;
        splice(text, &report.matches)
    }

    /// Finish a reading (trailing fraction, negative marker) and consume it.
    fn accept(&self, scratch: &mut [char], reading: Reading) -> NumeralMatch {
        let mut numeral = NumeralMatch::new(reading.begin, reading.end, reading.value)
            .with_decimal(reading.decimal);

        if !numeral.has_decimal() {
            if let Some((decimal, end)) = read_decimal(scratch, numeral.end) {
                numeral.decimal = decimal;
                numeral.end = end;
            }
        }

        if self.detect_negative
            && numeral.begin > 0
            && is_negative_marker(scratch[numeral.begin - 1])
        {
            numeral.value = -numeral.value;
            numeral.negative = true;
            numeral.begin -= 1;
        }

        scratch[numeral.begin..numeral.end].fill(CONSUMED);
        trace!(begin = numeral.begin, end = numeral.end, value = %numeral, "numeral accepted");
        numeral
    }

    /// Report the digits no keyword claimed, scanning right to left.
    ///
    /// ASCII digits are skipped so Arabic numerals already in the text stay
    /// as they are. A digit run following `<digit><decimal marker>` is that
    /// digit's fraction and is reported with it.
    fn sweep_digits(&self, scratch: &mut [char], matches: &mut Vec<NumeralMatch>) {
        let mut pos = scratch.len();
        while pos > 0 {
            pos -= 1;
            let ch = scratch[pos];
            if ch.is_ascii() || !is_digit(ch) {
                continue;
            }

            let anchor = fraction_anchor(scratch, pos).unwrap_or(pos);
            let Some(value) = digit_value(scratch[anchor]) else {
                continue;
            };
            let reading = Reading::new(anchor, anchor + 1, i64::from(value));
            matches.push(self.accept(scratch, reading));
            pos = anchor;
        }
    }
}

impl Default for NumeralExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Times one extraction. `std::time::Instant` panics on
/// wasm32-unknown-unknown, where the elapsed time reads as zero.
struct Stopwatch {
    #[cfg(not(target_arch = "wasm32"))]
    start: std::time::Instant,
}

impl Stopwatch {
    fn start() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            start: std::time::Instant::now(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    #[cfg(target_arch = "wasm32")]
    fn elapsed_ms(&self) -> u64 {
        0
    }
}

/// Next unconsumed keyword of `magnitude` at or after `from`.
fn find_keyword(scratch: &[char], magnitude: Magnitude, from: usize) -> Option<usize> {
    scratch
        .get(from..)?
        .iter()
        .position(|&ch| magnitude.matches(ch))
        .map(|offset| from + offset)
}

/// Position of the integer digit whose fraction ends at `pos`, as the 三 in
/// 三点一四.
fn fraction_anchor(scratch: &[char], pos: usize) -> Option<usize> {
    let mut run_start = pos;
    while run_start > 0 && is_digit(scratch[run_start - 1]) {
        run_start -= 1;
    }
    let anchored = run_start >= 2
        && is_decimal_marker(scratch[run_start - 1])
        && is_digit(scratch[run_start - 2]);
    anchored.then(|| run_start - 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn extract(text: &str) -> Vec<NumeralMatch> {
        NumeralExtractor::new().extract(text).unwrap().matches
    }

    fn values(text: &str) -> Vec<String> {
        NumeralExtractor::new().extract(text).unwrap().display_strings()
    }

    #[test]
    fn test_extract_hundreds() {
        assert_eq!(extract("一百二十三"), vec![NumeralMatch::new(0, 5, 123)]);
    }

    #[test]
    fn test_extract_implied_one() {
        assert_eq!(extract("十一"), vec![NumeralMatch::new(0, 2, 11)]);
    }

    #[test]
    fn test_extract_fractional_tens() {
        assert_eq!(extract("二百五"), vec![NumeralMatch::new(0, 3, 250)]);
    }

    #[test]
    fn test_extract_zero_padding() {
        assert_eq!(extract("一万零二"), vec![NumeralMatch::new(0, 4, 10_002)]);
        assert_eq!(extract("一万零三千"), vec![NumeralMatch::new(0, 5, 13_000)]);
    }

    #[test]
    fn test_extract_negative_decimal() {
        let matches = extract("负三点一四");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].value, -3);
        assert_eq!(matches[0].decimal, "14");
        assert_eq!((matches[0].begin, matches[0].end), (0, 5));
        assert_eq!(matches[0].to_string(), "-3.14");
    }

    #[test]
    fn test_extract_largest_composite() {
        assert_eq!(
            extract("九千九百九十九万九千九百九十九"),
            vec![NumeralMatch::new(0, 15, 99_999_999)]
        );
    }

    #[test]
    fn test_extract_hundred_millions() {
        assert_eq!(values("三亿五千万"), vec!["350000000"]);
        assert_eq!(values("两千五百万"), vec!["25000000"]);
    }

    #[test]
    fn test_extract_trailing_unit_decimal() {
        assert_eq!(values("七百零三块五"), vec!["703.5"]);
        assert_eq!(values("二十三点五"), vec!["23.5"]);
        assert_eq!(values("十点五"), vec!["10.5"]);
    }

    #[test]
    fn test_extract_fraction_before_keyword() {
        assert_eq!(values("三点五万"), vec!["35000"]);
    }

    #[test]
    fn test_extract_formal_and_fullwidth_glyphs() {
        assert_eq!(values("壹佰贰拾"), vec!["120"]);
        assert_eq!(values("３万"), vec!["30000"]);
    }

    #[test]
    fn test_extract_multiple_in_sentence() {
        let matches = extract("他买了三本书，花了二十五块，还剩七块。");
        let shown: Vec<String> = matches.iter().map(|m| m.to_string()).collect();
        assert_eq!(shown, vec!["3", "25", "7"]);
        assert!(matches.windows(2).all(|w| w[0].end <= w[1].begin));
    }

    #[test]
    fn test_extract_bare_digits_sweep() {
        assert_eq!(values("一二三"), vec!["1", "2", "3"]);
        assert_eq!(values("三块五"), vec!["3.5"]);
        assert_eq!(values("三点九"), vec!["3.9"]);
    }

    #[test]
    fn test_extract_skips_ascii_digits() {
        assert!(extract("room 42, 3.14").is_empty());
    }

    #[test]
    fn test_extract_negative_markers() {
        let matches = extract("温度是负五度");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].value, -5);
        assert!(matches[0].negative);
        assert_eq!((matches[0].begin, matches[0].end), (3, 5));

        assert_eq!(values("负一百"), vec!["-100"]);
        assert_eq!(values("负零点五"), vec!["-0.5"]);
    }

    #[test]
    fn test_negative_marker_must_be_adjacent() {
        let matches = extract("负的五");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].value, 5);
        assert!(!matches[0].negative);
    }

    #[test]
    fn test_negative_detection_disabled() {
        let report = NumeralExtractor::new()
            .with_negative_detection(false)
            .extract("负五")
            .unwrap();
        assert_eq!(report.matches, vec![NumeralMatch::new(1, 2, 5)]);
    }

    #[test]
    fn test_bare_digits_disabled() {
        let report = NumeralExtractor::new()
            .with_bare_digits(false)
            .extract("一二三和十二")
            .unwrap();
        assert_eq!(report.display_strings(), vec!["12"]);
    }

    #[test]
    fn test_failed_keyword_stays_unconsumed() {
        assert_eq!(values("万一"), vec!["1"]);
        assert_eq!(NumeralExtractor::new().replace("万一").unwrap(), "万1");
    }

    #[test]
    fn test_lone_keyword() {
        assert_eq!(values("十"), vec!["10"]);
    }

    #[test]
    fn test_replace_keeps_surrounding_text() {
        let extractor = NumeralExtractor::new();
        assert_eq!(
            extractor.replace("第十一章有两千零五个字").unwrap(),
            "第11章有2005个字"
        );
    }

    #[test]
    fn test_empty_text() {
        let report = NumeralExtractor::new().extract("").unwrap();
        assert!(report.matches.is_empty());
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_fraction_anchor() {
        let buf: Vec<char> = "负三点一四".chars().collect();
        assert_eq!(fraction_anchor(&buf, 4), Some(1));
        let buf: Vec<char> = "一二三".chars().collect();
        assert_eq!(fraction_anchor(&buf, 2), None);
    }

    const ALPHABET: &[char] = &[
        '零', '一', '二', '两', '三', '五', '九', '十', '百', '千', '万', '亿', '点', '块',
        '负', '-', '我', ' ', 'a', '7', '.', '壹', '拾', '５',
    ];

    fn arbitrary_text() -> impl Strategy<Value = String> {
        proptest::collection::vec(proptest::sample::select(ALPHABET), 0..48)
            .prop_map(|chars| chars.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_matches_are_sorted_disjoint_and_in_bounds(text in arbitrary_text()) {
            let len = text.chars().count();
            let matches = extract(&text);
            for m in &matches {
                prop_assert!(m.begin < m.end && m.end <= len);
            }
            for pair in matches.windows(2) {
                prop_assert!(pair[0].end <= pair[1].begin);
                prop_assert!(pair[0].begin < pair[1].begin);
            }
        }

        #[test]
        fn prop_replacement_preserves_unmatched_text(text in arbitrary_text()) {
            let extractor = NumeralExtractor::new();
            let matches = extractor.extract(&text).unwrap().matches;
            let replaced: Vec<char> = extractor
                .replace(&text)
                .unwrap()
                .chars()
                .collect();
            let original: Vec<char> = text.chars().collect();

            let spans = spliced_spans(&matches);
            let delta: isize = spans
                .iter()
                .zip(&matches)
                .map(|(span, m)| span.len() as isize - m.len() as isize)
                .sum();
            prop_assert_eq!(replaced.len() as isize, original.len() as isize + delta);

            for (span, m) in spans.iter().zip(&matches) {
                let spliced: String = replaced[span.clone()].iter().collect();
                prop_assert_eq!(spliced, m.to_string());
            }

            let kept_before = outside(&original, matches.iter().map(|m| m.begin..m.end));
            let kept_after = outside(&replaced, spans.iter().cloned());
            prop_assert_eq!(kept_before, kept_after);
        }

        #[test]
        fn prop_negative_iff_preceded_by_marker(text in arbitrary_text()) {
            let chars: Vec<char> = text.chars().collect();
            for m in extract(&text) {
                prop_assert_eq!(m.negative, is_negative_marker(chars[m.begin]));
            }
        }

        #[test]
        fn prop_reextraction_reads_nothing_inside_arabic_spans(text in arbitrary_text()) {
            let extractor = NumeralExtractor::new();
            let matches = extractor.extract(&text).unwrap().matches;
            let replaced = extractor.replace(&text).unwrap();
            let spans = spliced_spans(&matches);

            for again in extractor.extract(&replaced).unwrap().matches {
                let inside = spans
                    .iter()
                    .any(|span| span.start <= again.begin && again.end <= span.end);
                prop_assert!(!inside, "{:?} re-read inside {:?}", again, spans);
            }
            for m in &matches {
                prop_assert!(extract(&m.to_string()).is_empty());
            }
        }

        #[test]
        fn prop_arabic_text_is_untouched(n in any::<i64>(), frac in 0u32..100_000) {
            let text = format!("总计 {}.{} 元", n, frac);
            prop_assert_eq!(replace_twice(&text), text);
        }

        #[test]
        fn prop_replacement_is_stable_on_arabic_text(text in arabic_text()) {
            let extractor = NumeralExtractor::new();
            let once = extractor.replace(&text).unwrap();
            prop_assert_eq!(&once, &text);
            prop_assert_eq!(extractor.replace(&once).unwrap(), once);
        }
    }

    const ARABIC_ALPHABET: &[char] = &[
        '0', '1', '2', '5', '9', '.', '-', ' ', '我', '的', '钱', '度', 'a',
    ];

    fn arabic_text() -> impl Strategy<Value = String> {
        proptest::collection::vec(proptest::sample::select(ARABIC_ALPHABET), 0..48)
            .prop_map(|chars| chars.into_iter().collect())
    }

    /// Where each match's display string lands in the replaced text.
    fn spliced_spans(matches: &[NumeralMatch]) -> Vec<std::ops::Range<usize>> {
        let mut shift: isize = 0;
        matches
            .iter()
            .map(|m| {
                let begin = (m.begin as isize + shift) as usize;
                let width = m.to_string().chars().count();
                shift += width as isize - m.len() as isize;
                begin..begin + width
            })
            .collect()
    }

    /// Characters not covered by any of `spans`, in order.
    fn outside(chars: &[char], spans: impl Iterator<Item = std::ops::Range<usize>>) -> String {
        let spans: Vec<_> = spans.collect();
        chars
            .iter()
            .enumerate()
            .filter(|(index, _)| !spans.iter().any(|span| span.contains(index)))
            .map(|(_, ch)| ch)
            .collect()
    }

    fn replace_twice(text: &str) -> String {
        let extractor = NumeralExtractor::new();
        let once = extractor.replace(text).unwrap();
        extractor.replace(&once).unwrap()
    }
}
