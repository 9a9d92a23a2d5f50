//! Fraction suffixes such as the "点五" in 三点五 or the "块五" in 七百零三块五.

use std::num::ParseIntError;

use super::glyphs::{digit_value, is_decimal_marker};

/// Read a decimal marker at `position` and the digit glyphs after it.
///
/// Returns the fraction digits and the index one past the last digit, or
/// `None` when `position` is not a marker or no digit follows it.
pub fn read_decimal(buffer: &[char], position: usize) -> Option<(String, usize)> {
    if !buffer.get(position).copied().is_some_and(is_decimal_marker) {
        return None;
    }

    let suffix: String = buffer[position + 1..]
        .iter()
        .map_while(|&ch| digit_value(ch))
        .map(|value| char::from(b'0' + value))
        .collect();

    if suffix.is_empty() {
        None
    } else {
        let end = position + 1 + suffix.len();
        Some((suffix, end))
    }
}

/// Fold a fraction into the zero padding of `scale`.
///
/// `三点五万` is 3 x 10000 with fraction `5`; the first four fraction digits
/// fill the four zeros of 10000, giving 5000 to add and an empty remainder.
/// Returns the amount to add and the fraction digits that did not fit.
pub fn carry_into_scale(decimal: &str, scale: i64) -> Result<(i64, String), ParseIntError> {
    let width = scale.to_string().len() - 1;
    if width == 0 {
        return Ok((0, decimal.to_string()));
    }

    let mut padding: Vec<char> = vec!['0'; width];
    for (slot, digit) in padding.iter_mut().zip(decimal.chars()) {
        *slot = digit;
    }
    let carried: i64 = padding.iter().collect::<String>().parse()?;
    let remainder = decimal.chars().skip(width).collect();

    Ok((carried, remainder))
}
