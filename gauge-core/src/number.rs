//! Culture-aware numeric text parsing
//!
//! Accepted: leading sign, group separators (and whitespace) between integer
//! digits, the culture's decimal separator, and an exponent. "NaN",
//! "Infinity" and "-Infinity" are read the same in every culture.

use crate::culture::{NAN_SYMBOL, NEGATIVE_INFINITY_SYMBOL, POSITIVE_INFINITY_SYMBOL};
use crate::{Culture, Error};
use std::iter::Peekable;
use std::str::Chars;

/// Parse `text` as a double under `culture`
///
/// Supports: "123", "-1.5", "1,234.5" (en-US), "1 100", "- 100", "1e2", "1E+2", "1.0e-2"
pub fn parse_number(text: &str, culture: &Culture) -> Result<f64, Error> {
    let s = text.trim();

    match s {
        NAN_SYMBOL => return Ok(f64::NAN),
        POSITIVE_INFINITY_SYMBOL | "+Infinity" => return Ok(f64::INFINITY),
        NEGATIVE_INFINITY_SYMBOL => return Ok(f64::NEG_INFINITY),
        _ => {}
    }

    normalize(s, culture)
        .and_then(|normalized| normalized.parse::<f64>().ok())
        .ok_or_else(|| Error::numeric_format(text, s))
}

/// Rewrite culture-specific text into the form `str::parse::<f64>` accepts
fn normalize(s: &str, culture: &Culture) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    match chars.peek() {
        Some(&c) if c == culture.negative_sign || c == '-' => {
            out.push('-');
            chars.next();
        }
        Some(&c) if c == culture.positive_sign || c == '+' => {
            chars.next();
        }
        _ => {}
    }
    skip_whitespace(&mut chars);

    // Integer part: a group separator is only valid right after a digit
    let mut mantissa_digits = 0usize;
    let mut after_digit = false;
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            out.push(c);
            mantissa_digits += 1;
            after_digit = true;
        } else if c == culture.decimal_separator {
            break;
        } else if after_digit && (c.is_whitespace() || culture.is_group_separator(c)) {
            after_digit = false;
        } else {
            break;
        }
        chars.next();
    }

    if chars.peek() == Some(&culture.decimal_separator) {
        chars.next();
        let mut fraction = String::new();
        while let Some(&c) = chars.peek().filter(|c| c.is_ascii_digit()) {
            fraction.push(c);
            chars.next();
        }
        if !fraction.is_empty() {
            if mantissa_digits == 0 {
                out.push('0');
            }
            mantissa_digits += fraction.len();
            out.push('.');
            out.push_str(&fraction);
        }
    }

    if mantissa_digits == 0 {
        return None;
    }

    if matches!(chars.peek(), Some('e' | 'E')) {
        chars.next();
        out.push('e');
        match chars.peek() {
            Some(&c) if c == '-' || c == culture.negative_sign => {
                out.push('-');
                chars.next();
            }
            Some(&c) if c == '+' || c == culture.positive_sign => {
                chars.next();
            }
            _ => {}
        }
        let mut exponent_digits = 0usize;
        while let Some(&c) = chars.peek().filter(|c| c.is_ascii_digit()) {
            out.push(c);
            exponent_digits += 1;
            chars.next();
        }
        if exponent_digits == 0 {
            return None;
        }
    }

    // Anything left over is not part of a number
    if chars.next().is_some() {
        return None;
    }

    Some(out)
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}
