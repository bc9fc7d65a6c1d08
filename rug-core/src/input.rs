//! Parsing of raw text typed by the user.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::warn;

/// Normalizes a dimension for parsing: trims whitespace and accepts a
/// decimal comma (`2,5`) as well as a decimal point.
fn normalize_dimension_input(s: &str) -> String {
    s.trim().replace(',', ".")
}

/// Parses a length or width typed by the user.
///
/// Empty or non-numeric input becomes zero, which dimension validation
/// then rejects. Sign is kept so negative values are rejected the same way.
/// A plain number too large for `Decimal` saturates, so it is reported as
/// too large rather than invalid.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use rug_core::input::parse_dimension;
///
/// assert_eq!(parse_dimension("2,5"), dec!(2.5));
/// assert_eq!(parse_dimension(" 3 "), dec!(3));
/// assert_eq!(parse_dimension(""), dec!(0));
/// assert_eq!(parse_dimension("abc"), dec!(0));
/// ```
pub fn parse_dimension(s: &str) -> Decimal {
    let normalized = normalize_dimension_input(s);
    if normalized.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(&normalized).unwrap_or_else(|e| {
        if let Some(negative) = out_of_range_literal(&normalized) {
            warn!(input = %s, "dimension out of range, saturating: {}", e);
            return if negative { Decimal::MIN } else { Decimal::MAX };
        }
        warn!(input = %s, "invalid dimension, using zero: {}", e);
        Decimal::ZERO
    })
}

/// Returns the sign of a plain decimal literal whose integer part has more
/// digits than `Decimal` can hold, or `None` for anything else.
fn out_of_range_literal(s: &str) -> Option<bool> {
    let (negative, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let digits_only = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if integer.is_empty() || !digits_only(integer) || !digits_only(fraction) {
        return None;
    }

    let significant = integer.trim_start_matches('0').len();
    (significant > MAX_INTEGER_DIGITS).then_some(negative)
}

/// Digits in `Decimal::MAX` (about 7.9e28).
const MAX_INTEGER_DIGITS: usize = 28;

/// Splits a "length width" line into its two parts.
///
/// Accepts whitespace, `x`, `×` or `*` between the numbers. Missing parts
/// come back empty and so parse as zero.
pub fn split_dimensions(line: &str) -> (&str, &str) {
    let mut parts = line
        .split(|c: char| c.is_whitespace() || matches!(c, 'x' | 'X' | '×' | '*'))
        .filter(|p| !p.is_empty());
    let length = parts.next().unwrap_or("");
    let width = parts.next().unwrap_or("");
    (length, width)
}
