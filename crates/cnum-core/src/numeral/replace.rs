//! Splicing recognized numerals back into text.

use crate::error::{ExtractionError, Result};
use crate::models::numeral::NumeralMatch;

/// Replace every match span of `text` with the match's Arabic form.
///
/// Spans are character offsets into `text` and must not overlap. They are
/// applied from the highest `begin` down so earlier offsets stay valid.
pub fn splice(text: &str, matches: &[NumeralMatch]) -> Result<String> {
    let mut chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    let mut ordered: Vec<&NumeralMatch> = matches.iter().collect();
    ordered.sort_by(|a, b| b.begin.cmp(&a.begin));

    for numeral in ordered {
        if numeral.begin > numeral.end || numeral.end > len {
            return Err(ExtractionError::SpanOutOfBounds {
                begin: numeral.begin,
                end: numeral.end,
                len,
            }
            .into());
        }
        chars.splice(numeral.begin..numeral.end, numeral.to_string().chars());
    }

    Ok(chars.into_iter().collect())
}
