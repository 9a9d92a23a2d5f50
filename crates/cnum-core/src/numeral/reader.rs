//! Directional readers and the numeral composer.
//!
//! A numeral is read outward from a magnitude keyword. `read_left` parses the
//! part above the keyword (the multiplier), `read_right` the part below it
//! (the remainder). Both search their window for the next smaller keyword and
//! hand off to `read_num` when one is found, so recursion depth never exceeds
//! the number of magnitude levels.

use tracing::trace;

use crate::error::ExtractionError;

use super::decimal::{carry_into_scale, read_decimal};
use super::glyphs::{
    Magnitude, MagnitudeTable, UNITS, digit_value, is_decimal_marker, is_zero, single_value,
};
use super::{Diagnostic, DiagnosticKind};

/// Outcome of one read: `None` when nothing numeric was found.
pub type ReadResult = std::result::Result<Option<Reading>, ExtractionError>;

/// A partially resolved numeral: span, integer value and fraction digits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reading {
    pub begin: usize,
    pub end: usize,
    pub value: i64,
    pub decimal: String,
}

impl Reading {
    pub fn new(begin: usize, end: usize, value: i64) -> Self {
        Self {
            begin,
            end,
            value,
            decimal: String::new(),
        }
    }

    fn has_decimal(&self) -> bool {
        !self.decimal.is_empty()
    }
}

/// Reads numerals out of a (partially consumed) character buffer.
pub struct Reader<'a> {
    buffer: &'a [char],
    table: &'a MagnitudeTable,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Reader<'a> {
    pub fn new(buffer: &'a [char], table: &'a MagnitudeTable) -> Self {
        Self {
            buffer,
            table,
            diagnostics: Vec::new(),
        }
    }

    /// Diagnostics collected by rejected compositions.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn diagnose(&mut self, position: usize, kind: DiagnosticKind) {
        trace!(position, %kind, "composition rejected");
        self.diagnostics.push(Diagnostic { position, kind });
    }

    /// Compose the numeral around a keyword found by the extraction driver.
    ///
    /// `begin..end` is the context window. The right side is read first and
    /// may carry a fraction; the left side is then read as a plain integer.
    /// With no right side the left side may itself be fractional, as in
    /// 三点五万, and a keyword with nothing on either side stands for its own
    /// scale.
    pub fn read_anchored(
        &mut self,
        begin: usize,
        end: usize,
        pos: usize,
        magnitude: Magnitude,
    ) -> ReadResult {
        let level = magnitude.level();
        let scale = magnitude.scale();

        if let Some(right) = self.read_right(pos + 1, end, level + 1, true)? {
            let tail = self.fractional_tail(pos, right.value, scale);
            return match self.read_left(begin, pos, level + 1, false)? {
                Some(left) => {
                    let value = self.scaled_sum(pos, left.value, scale, tail);
                    Ok(value.map(|value| Reading {
                        begin: left.begin,
                        end: right.end,
                        value,
                        decimal: right.decimal,
                    }))
                }
                // 十一 .. 十九: the leading one is implied.
                None if magnitude == Magnitude::Ten => {
                    let value = self.scaled_sum(pos, 1, scale, tail);
                    Ok(value.map(|value| Reading {
                        begin: pos,
                        end: right.end,
                        value,
                        decimal: right.decimal,
                    }))
                }
                None => Ok(None),
            };
        }

        let left = self
            .read_left(begin, pos, level + 1, true)?
            .unwrap_or_else(|| Reading::new(pos, pos, 1));
        let (carried, decimal) = self.carry(&left.decimal, scale)?;
        let value = self.scaled_sum(pos, left.value, scale, carried);
        Ok(value.map(|value| Reading {
            begin: left.begin,
            end: pos + 1,
            value,
            decimal,
        }))
    }

    /// Read the part of a numeral below a keyword, within `begin..end`.
    pub fn read_right(
        &mut self,
        begin: usize,
        end: usize,
        level: usize,
        want_decimal: bool,
    ) -> ReadResult {
        if begin >= end || end > self.buffer.len() {
            return Ok(None);
        }
        if level > UNITS {
            self.diagnose(begin, DiagnosticKind::InvalidLevel { level });
            return Ok(None);
        }
        if end - begin == 1 {
            return Ok(self.single(begin, end));
        }

        let Some(spec) = self.table.level(level).copied() else {
            return Ok(self.right_units(begin, end, want_decimal));
        };

        let limit = match (want_decimal, spec.right_reach) {
            (false, Some(reach)) => (begin + reach).min(end),
            _ => end,
        };
        match self.find_forward(begin, limit, spec.magnitude) {
            Some(pos) => self.read_num(begin, end, pos, level, want_decimal),
            None => self.read_right(begin, end, level + 1, want_decimal),
        }
    }

    /// Read the part of a numeral above a keyword, within `begin..end`.
    pub fn read_left(
        &mut self,
        begin: usize,
        end: usize,
        level: usize,
        want_decimal: bool,
    ) -> ReadResult {
        if begin >= end || end > self.buffer.len() {
            return Ok(None);
        }
        if level > UNITS {
            self.diagnose(end - 1, DiagnosticKind::InvalidLevel { level });
            return Ok(None);
        }
        if end - begin == 1 {
            return Ok(self.single(begin, end));
        }

        let Some(spec) = self.table.level(level).copied() else {
            return Ok(self.left_units(begin, end, want_decimal));
        };

        let limit = match (want_decimal, spec.left_reach) {
            (false, Some(reach)) => end.saturating_sub(reach).max(begin),
            _ => begin,
        };
        match self.find_backward(limit, end, spec.magnitude) {
            Some(pos) => self.read_num(begin, end, pos, level, want_decimal),
            None => self.read_left(begin, end, level + 1, want_decimal),
        }
    }

    /// Compose the numeral around the keyword at `pos`, inside `begin..end`.
    pub fn read_num(
        &mut self,
        begin: usize,
        end: usize,
        pos: usize,
        level: usize,
        want_decimal: bool,
    ) -> ReadResult {
        let Some(magnitude) = Magnitude::from_level(level) else {
            self.diagnose(pos, DiagnosticKind::InvalidLevel { level });
            return Ok(None);
        };
        let scale = magnitude.scale();

        let mut left = self.read_left(begin, pos, level + 1, want_decimal)?;
        if let Some(short_end) = left.as_ref().map(|l| l.end).filter(|&e| e < pos) {
            left = self.read_left(short_end, pos, level + 1, want_decimal)?;
        }

        if magnitude == Magnitude::Ten {
            match left.as_mut() {
                None => left = Some(Reading::new(pos, pos, 1)),
                // 一万零十一: the one before 十 is dropped after a zero.
                Some(l) if l.value == 0 && !l.has_decimal() => l.value = 1,
                Some(_) => {}
            }
        }

        let Some(left) = left else {
            return Ok(None);
        };
        if !want_decimal && left.value == 0 && !left.has_decimal() {
            self.diagnose(pos, DiagnosticKind::LeadingZero);
            return Ok(None);
        }
        let Some(base) = self.checked(pos, left.value.checked_mul(scale)) else {
            return Ok(None);
        };

        let mut right = self.read_right(pos + 1, end, level + 1, want_decimal)?;
        if let Some(late_begin) = right.as_ref().map(|r| r.begin).filter(|&b| b > pos + 1) {
            right = self.read_right(pos + 1, late_begin, level + 1, want_decimal)?;
        }

        match right {
            Some(right) => {
                if left.has_decimal() {
                    self.diagnose(
                        pos,
                        DiagnosticKind::DecimalBeforeMagnitude {
                            decimal: left.decimal,
                            right: right.value,
                        },
                    );
                    return Ok(None);
                }
                let tail = self.fractional_tail(pos, right.value, scale);
                Ok(self.checked(pos, base.checked_add(tail)).map(|value| Reading {
                    begin: left.begin,
                    end: right.end,
                    value,
                    decimal: right.decimal,
                }))
            }
            None => {
                let (carried, decimal) = self.carry(&left.decimal, scale)?;
                Ok(self.checked(pos, base.checked_add(carried)).map(|value| Reading {
                    begin: left.begin,
                    end: pos + 1,
                    value,
                    decimal,
                }))
            }
        }
    }

    /// A lone digit after a keyword counts in tenths of the keyword's scale
    /// (二百五 is 250) unless a zero separates them (二百零五 is 205).
    fn fractional_tail(&self, pos: usize, value: i64, scale: i64) -> i64 {
        if value < 10 && !is_zero(self.buffer[pos + 1]) {
            value * scale / 10
        } else {
            value
        }
    }

    fn carry(&self, decimal: &str, scale: i64) -> Result<(i64, String), ExtractionError> {
        carry_into_scale(decimal, scale).map_err(|e| ExtractionError::InvalidDecimal {
            decimal: decimal.to_string(),
            scale,
            reason: e.to_string(),
        })
    }

    /// `multiplier * scale + addend`, diagnosed at `pos` on overflow.
    fn scaled_sum(&mut self, pos: usize, multiplier: i64, scale: i64, addend: i64) -> Option<i64> {
        let value = multiplier
            .checked_mul(scale)
            .and_then(|product| product.checked_add(addend));
        self.checked(pos, value)
    }

    fn checked(&mut self, pos: usize, value: Option<i64>) -> Option<i64> {
        if value.is_none() {
            self.diagnose(pos, DiagnosticKind::Overflow);
        }
        value
    }

    fn single(&self, begin: usize, end: usize) -> Option<Reading> {
        single_value(self.buffer[begin]).map(|value| Reading::new(begin, end, value))
    }

    fn right_units(&self, begin: usize, end: usize, want_decimal: bool) -> Option<Reading> {
        let ch = self.buffer[begin];
        if is_decimal_marker(ch) {
            // 一百点二: a bare fraction with no units digit.
            if !want_decimal {
                return None;
            }
            return read_decimal(self.buffer, begin).map(|(decimal, end)| Reading {
                begin,
                end,
                value: 0,
                decimal,
            });
        }

        let value = digit_value(ch)?;
        let mut reading = Reading::new(begin, begin + 1, i64::from(value));
        // 一百零一: the zero and the digit after it form the units.
        if value == 0 && begin + 1 < end {
            if let Some(next) = digit_value(self.buffer[begin + 1]) {
                reading.value = i64::from(next);
                reading.end = begin + 2;
            }
        }
        if want_decimal {
            if let Some((decimal, end)) = read_decimal(self.buffer, reading.end) {
                reading.decimal = decimal;
                reading.end = end;
            }
        }
        Some(reading)
    }

    fn left_units(&self, begin: usize, end: usize, want_decimal: bool) -> Option<Reading> {
        if !want_decimal {
            let index = end - 1;
            return digit_value(self.buffer[index])
                .map(|value| Reading::new(index, end, i64::from(value)));
        }

        let mut reversed = Vec::new();
        let mut start = end;
        let mut seen_marker = false;
        for index in (begin..end).rev() {
            let ch = self.buffer[index];
            if is_decimal_marker(ch) {
                if seen_marker {
                    break;
                }
                seen_marker = true;
                reversed.push('.');
            } else if let Some(value) = digit_value(ch) {
                reversed.push(char::from(b'0' + value));
            } else {
                break;
            }
            start = index;
        }
        let text: String = reversed.into_iter().rev().collect();

        match text.split_once('.') {
            None => {
                let last = text.chars().last()?;
                let value = last.to_digit(10).map(i64::from)?;
                // 一万零二: the zero joins the span without adding value.
                let padded = text.chars().rev().nth(1) == Some('0');
                let begin = if padded { end - 2 } else { end - 1 };
                Some(Reading::new(begin, end, value))
            }
            Some((integer, fraction)) => {
                let value = integer.parse::<i64>().ok()?;
                Some(Reading {
                    begin: start,
                    end,
                    value,
                    decimal: fraction.to_string(),
                })
            }
        }
    }

    /// First keyword of `magnitude` in `begin..limit`, giving up at the first
    /// character that cannot belong to a numeral of that level.
    fn find_forward(&self, begin: usize, limit: usize, magnitude: Magnitude) -> Option<usize> {
        for x in begin..limit {
            let ch = self.buffer[x];
            if magnitude.matches(ch) {
                return Some(x);
            }
            if !self.table.is_companion(magnitude.level(), ch) {
                break;
            }
        }
        None
    }

    fn find_backward(&self, limit: usize, end: usize, magnitude: Magnitude) -> Option<usize> {
        for x in (limit..end).rev() {
            let ch = self.buffer[x];
            if magnitude.matches(ch) {
                return Some(x);
            }
            if !self.table.is_companion(magnitude.level(), ch) {
                break;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeral::glyphs::MAGNITUDES;
    use pretty_assertions::assert_eq;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn read_at(text: &str, pos: usize, magnitude: Magnitude) -> Option<Reading> {
        let buf = chars(text);
        let mut reader = Reader::new(&buf, &MAGNITUDES);
        reader.read_anchored(0, buf.len(), pos, magnitude).unwrap()
    }

    #[test]
    fn test_read_right_nested_levels() {
        let buf = chars("百二十三");
        let mut reader = Reader::new(&buf, &MAGNITUDES);
        let reading = reader.read_right(1, 4, Magnitude::Ten.level(), true).unwrap();
        assert_eq!(reading, Some(Reading::new(1, 4, 23)));
    }

    #[test]
    fn test_read_right_zero_absorbs_next_digit() {
        let buf = chars("百零五");
        let mut reader = Reader::new(&buf, &MAGNITUDES);
        let reading = reader.read_right(1, 3, UNITS, false).unwrap();
        assert_eq!(reading, Some(Reading::new(1, 3, 5)));
    }

    #[test]
    fn test_read_right_bare_fraction() {
        let buf = chars("百点二五");
        let mut reader = Reader::new(&buf, &MAGNITUDES);
        let reading = reader.read_right(1, 4, UNITS, true).unwrap().unwrap();
        assert_eq!(reading.value, 0);
        assert_eq!(reading.decimal, "25");
        assert_eq!(reading.end, 4);
    }

    #[test]
    fn test_read_left_with_fraction() {
        let buf = chars("三点五万");
        let mut reader = Reader::new(&buf, &MAGNITUDES);
        let reading = reader.read_left(0, 3, UNITS, true).unwrap().unwrap();
        assert_eq!(reading.value, 3);
        assert_eq!(reading.decimal, "5");
        assert_eq!(reading.begin, 0);
    }

    #[test]
    fn test_read_left_keeps_padding_zero_in_span() {
        let buf = chars("零二千");
        let mut reader = Reader::new(&buf, &MAGNITUDES);
        let reading = reader.read_left(0, 2, UNITS, true).unwrap();
        assert_eq!(reading, Some(Reading::new(0, 2, 2)));
    }

    #[test]
    fn test_read_left_without_decimal_takes_last_digit() {
        let buf = chars("有三百");
        let mut reader = Reader::new(&buf, &MAGNITUDES);
        let reading = reader.read_left(0, 2, Magnitude::Ten.level(), false).unwrap();
        assert_eq!(reading, Some(Reading::new(1, 2, 3)));
    }

    #[test]
    fn test_read_left_stops_at_foreign_character() {
        let buf = chars("有百");
        let mut reader = Reader::new(&buf, &MAGNITUDES);
        assert_eq!(reader.read_left(0, 1, UNITS, true).unwrap(), None);
    }

    #[test]
    fn test_anchored_hundreds() {
        let reading = read_at("一百二十三", 1, Magnitude::Hundred).unwrap();
        assert_eq!(reading, Reading::new(0, 5, 123));
    }

    #[test]
    fn test_anchored_implied_one_before_ten() {
        let reading = read_at("十一", 0, Magnitude::Ten).unwrap();
        assert_eq!(reading, Reading::new(0, 2, 11));
    }

    #[test]
    fn test_anchored_fractional_tail() {
        assert_eq!(read_at("二百五", 1, Magnitude::Hundred).unwrap().value, 250);
        assert_eq!(read_at("二百零五", 1, Magnitude::Hundred).unwrap().value, 205);
        assert_eq!(read_at("三万五", 1, Magnitude::TenThousand).unwrap().value, 35_000);
    }

    #[test]
    fn test_anchored_fraction_carried_into_scale() {
        let reading = read_at("三点五万", 3, Magnitude::TenThousand).unwrap();
        assert_eq!(reading, Reading::new(0, 4, 35_000));

        let reading = read_at("一点二五十", 4, Magnitude::Ten).unwrap();
        assert_eq!(reading.value, 12);
        assert_eq!(reading.decimal, "5");
    }

    #[test]
    fn test_anchored_lone_keyword_is_its_scale() {
        assert_eq!(read_at("万", 0, Magnitude::TenThousand).unwrap().value, 10_000);
    }

    #[test]
    fn test_anchored_needs_left_side_except_for_ten() {
        assert_eq!(read_at("万一", 0, Magnitude::TenThousand), None);
    }

    #[test]
    fn test_anchored_full_ten_thousands() {
        let text = "九千九百九十九万九千九百九十九";
        let reading = read_at(text, 7, Magnitude::TenThousand).unwrap();
        assert_eq!(reading, Reading::new(0, 15, 99_999_999));
    }

    #[test]
    fn test_read_num_rejects_leading_zero() {
        let buf = chars("零百");
        let mut reader = Reader::new(&buf, &MAGNITUDES);
        let reading = reader
            .read_num(0, 2, 1, Magnitude::Hundred.level(), false)
            .unwrap();
        assert_eq!(reading, None);
        let diagnostics = reader.into_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::LeadingZero);
    }

    #[test]
    fn test_read_num_rejects_fraction_before_remainder() {
        let buf = chars("三点五百二");
        let mut reader = Reader::new(&buf, &MAGNITUDES);
        let reading = reader
            .read_num(0, 5, 3, Magnitude::Hundred.level(), true)
            .unwrap();
        assert_eq!(reading, None);
        assert!(matches!(
            reader.into_diagnostics()[0].kind,
            DiagnosticKind::DecimalBeforeMagnitude { right: 2, .. }
        ));
    }

    #[test]
    fn test_invalid_level_is_diagnosed() {
        let buf = chars("一二三");
        let mut reader = Reader::new(&buf, &MAGNITUDES);
        assert_eq!(reader.read_right(0, 3, UNITS + 1, false).unwrap(), None);
        assert_eq!(reader.read_num(0, 3, 1, UNITS, false).unwrap(), None);
        let diagnostics = reader.into_diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics
            .iter()
            .all(|d| matches!(d.kind, DiagnosticKind::InvalidLevel { .. })));
    }
}
