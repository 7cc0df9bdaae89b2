//! Split quantity text into its numeric and unit parts

use gauge_core::{Culture, NAN_SYMBOL, NEGATIVE_INFINITY_SYMBOL, POSITIVE_INFINITY_SYMBOL};

const SPECIAL_LITERALS: [&str; 4] = [
    NEGATIVE_INFINITY_SYMBOL,
    "+Infinity",
    POSITIVE_INFINITY_SYMBOL,
    NAN_SYMBOL,
];

/// Numeric and unit text of a quantity, both trimmed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    pub number: &'a str,
    pub unit: &'a str,
}

/// Split "1 100.5 km/h" into "1 100.5" and "km/h"
///
/// The numeric part is the longest prefix of digits, whitespace, signs and
/// the culture's separators, plus an exponent marker directly followed by a
/// digit or sign. Everything after it is the unit. NaN and the infinity
/// literals are recognized as the numeric part.
pub fn split<'a>(input: &'a str, culture: &Culture) -> Split<'a> {
    let input = input.trim();

    for literal in SPECIAL_LITERALS {
        if input.starts_with(literal) {
            let (number, unit) = input.split_at(literal.len());
            return Split {
                number,
                unit: unit.trim(),
            };
        }
    }

    let mut chars = input.char_indices().peekable();
    let mut end = input.len();
    while let Some((i, c)) = chars.next() {
        if is_numeric_char(c, culture) {
            continue;
        }
        if matches!(c, 'e' | 'E')
            && chars
                .peek()
                .is_some_and(|&(_, next)| next.is_ascii_digit() || next == '+' || next == '-')
        {
            chars.next();
            continue;
        }
        end = i;
        break;
    }

    let (number, unit) = input.split_at(end);
    Split {
        number: number.trim(),
        unit: unit.trim(),
    }
}

fn is_numeric_char(c: char, culture: &Culture) -> bool {
    c.is_ascii_digit()
        || c.is_whitespace()
        || c == '+'
        || c == '-'
        || c == culture.negative_sign
        || c == culture.positive_sign
        || c == culture.decimal_separator
        || c == culture.group_separator
}
