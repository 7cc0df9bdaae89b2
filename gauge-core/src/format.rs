//! Numeric format mini-language
//!
//! Standard formats: `G[n]`, `R`, `F[n]`, `N[n]`, `E[n]`.
//! Custom formats: `0` and `#` digit placeholders, `.` decimal point, `,`
//! grouping (between integer placeholders) or scaling by 1000 (after the last
//! one), `E0`/`E+0`/`E-0` exponents, `\x` escapes and quoted literals.
//! Any other character is copied to the output where it stands.

use crate::culture::{NAN_SYMBOL, NEGATIVE_INFINITY_SYMBOL, POSITIVE_INFINITY_SYMBOL};
use crate::{Culture, Error};

/// Decimal exponent from which `G` without precision switches to scientific notation
const GENERAL_MAX_FIXED_EXPONENT: i32 = 15;
/// Smallest decimal exponent `G` still writes in fixed notation
const GENERAL_MIN_FIXED_EXPONENT: i32 = -4;
/// Fraction digits needed to write any f64 exactly
const EXACT_FRACTION_DIGITS: usize = 1074;
/// Significant digits needed to write any f64 exactly
const EXACT_SIGNIFICANT_DIGITS: usize = 767;

/// The culture-independent literal for NaN and the infinities, `None` for finite values
pub fn special_literal(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some(NAN_SYMBOL)
    } else if value == f64::INFINITY {
        Some(POSITIVE_INFINITY_SYMBOL)
    } else if value == f64::NEG_INFINITY {
        Some(NEGATIVE_INFINITY_SYMBOL)
    } else {
        None
    }
}

/// Format `value` with a standard or custom numeric format
///
/// An empty format behaves like `G`. NaN and the infinities always render as
/// their literals whatever the format says.
pub fn format_number(value: f64, format: &str, culture: &Culture) -> Result<String, Error> {
    if let Some(literal) = special_literal(value) {
        return Ok(literal.to_string());
    }

    if format.is_empty() {
        return Ok(general(value, None, 'E', culture));
    }

    if let Some((letter, precision)) = standard_specifier(format) {
        return standard(value, letter, precision, culture)
            .ok_or_else(|| Error::malformed(format, "unknown standard numeric format"));
    }

    Ok(custom(value, &tokenize(format), culture))
}

/// A standard specifier is one letter followed by at most two digits
fn standard_specifier(format: &str) -> Option<(char, Option<usize>)> {
    let mut chars = format.chars();
    let letter = chars.next().filter(char::is_ascii_alphabetic)?;
    let digits = chars.as_str();
    if digits.len() > 2 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let precision = if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    };
    Some((letter, precision))
}

fn standard(
    value: f64,
    letter: char,
    precision: Option<usize>,
    culture: &Culture,
) -> Option<String> {
    let text = match letter {
        'G' => general(value, precision, 'E', culture),
        'g' => general(value, precision, 'e', culture),
        'R' | 'r' => general(value, None, 'E', culture),
        'F' | 'f' => fixed(value, precision.unwrap_or(2), false, culture),
        'N' | 'n' => fixed(value, precision.unwrap_or(2), true, culture),
        'E' | 'e' => exponential(value, precision.unwrap_or(6), letter, culture),
        _ => return None,
    };
    Some(text)
}

/// Decimal digits of |value| as `d.ddd × 10^exponent`
struct Scientific {
    digits: String,
    exponent: i32,
}

fn split_scientific(text: &str) -> Scientific {
    let (mantissa, exponent) = text.split_once('e').unwrap_or((text, "0"));
    Scientific {
        digits: mantissa.replace('.', ""),
        exponent: exponent.parse().unwrap_or(0),
    }
}

/// Shortest round-trip digits, or `decimals + 1` significant digits with
/// midpoints rounded away from zero
fn scientific(abs: f64, decimals: Option<usize>) -> Scientific {
    let Some(decimals) = decimals else {
        return split_scientific(&format!("{:e}", abs));
    };
    let rounded = split_scientific(&format!("{:.*e}", decimals, abs));
    if decimals >= EXACT_SIGNIFICANT_DIGITS
        || !split_scientific(&format!("{:.*e}", decimals + 1, abs))
            .digits
            .ends_with('5')
    {
        return rounded;
    }

    let exact = split_scientific(&format!("{:.*e}", EXACT_SIGNIFICANT_DIGITS, abs));
    let (kept, rest) = exact.digits.split_at(decimals + 1);
    if !is_half(rest) {
        return rounded;
    }
    let digits = round_up(kept);
    if digits.len() > kept.len() {
        // 9.99 -> 10.00 moves the point
        Scientific {
            digits: digits[..kept.len()].to_string(),
            exponent: exact.exponent + 1,
        }
    } else {
        Scientific {
            digits,
            exponent: exact.exponent,
        }
    }
}

/// `abs` with `decimals` fraction digits, midpoints rounded away from zero
fn round_fixed(abs: f64, decimals: usize) -> String {
    let rounded = format!("{:.*}", decimals, abs);
    if decimals >= EXACT_FRACTION_DIGITS || !format!("{:.*}", decimals + 1, abs).ends_with('5') {
        return rounded;
    }

    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, abs);
    let point = exact.find('.').unwrap_or(exact.len());
    let kept = if decimals == 0 { point } else { point + 1 + decimals };
    let rest = &exact[kept..];
    if is_half(rest.strip_prefix('.').unwrap_or(rest)) {
        round_up(&exact[..kept])
    } else {
        rounded
    }
}

/// Digits dropped by rounding are exactly one half
fn is_half(rest: &str) -> bool {
    rest.strip_prefix('5')
        .is_some_and(|tail| tail.bytes().all(|b| b == b'0'))
}

/// Add one in the last place of a decimal digit string, "9.99" -> "10.00"
fn round_up(digits: &str) -> String {
    let mut chars: Vec<char> = digits.chars().collect();
    for c in chars.iter_mut().rev() {
        match *c {
            '.' => {}
            '9' => *c = '0',
            d => {
                *c = char::from_digit(d.to_digit(10).unwrap_or(0) + 1, 10).unwrap_or(d);
                return chars.into_iter().collect();
            }
        }
    }
    std::iter::once('1').chain(chars).collect()
}

/// Split `d.ddd × 10^exponent` into integer and fraction digits
fn place(digits: &str, exponent: i32) -> (String, String) {
    if exponent >= 0 {
        let point = exponent as usize + 1;
        if digits.len() <= point {
            (format!("{}{}", digits, "0".repeat(point - digits.len())), String::new())
        } else {
            (digits[..point].to_string(), digits[point..].to_string())
        }
    } else {
        let zeros = "0".repeat(exponent.unsigned_abs() as usize - 1);
        ("0".to_string(), format!("{}{}", zeros, digits))
    }
}

fn has_nonzero_digit(text: &str) -> bool {
    text.bytes().any(|b| (b'1'..=b'9').contains(&b))
}

fn join(int: &str, frac: &str, culture: &Culture) -> String {
    if frac.is_empty() {
        int.to_string()
    } else {
        format!("{}{}{}", int, culture.decimal_separator, frac)
    }
}

fn signed(negative: bool, body: String, culture: &Culture) -> String {
    if negative {
        format!("{}{}", culture.negative_sign, body)
    } else {
        body
    }
}

fn group(int: &str, separator: char) -> String {
    let len = int.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in int.chars().enumerate() {
        out.push(c);
        let remaining = len - 1 - i;
        if remaining > 0 && remaining % 3 == 0 {
            out.push(separator);
        }
    }
    out
}

fn exponent_suffix(
    symbol: char,
    exponent: i32,
    always_sign: bool,
    min_digits: usize,
    culture: &Culture,
) -> String {
    let mut out = String::new();
    out.push(symbol);
    if exponent < 0 {
        out.push(culture.negative_sign);
    } else if always_sign {
        out.push(culture.positive_sign);
    }
    out.push_str(&format!("{:0width$}", exponent.unsigned_abs(), width = min_digits));
    out
}

/// `G`: shortest round-trip digits, or `precision` significant digits
fn general(value: f64, precision: Option<usize>, symbol: char, culture: &Culture) -> String {
    let abs = value.abs();
    let (sci, max_fixed_exponent) = match precision.filter(|&p| p > 0) {
        Some(p) => (scientific(abs, Some(p - 1)), p as i32),
        None => (scientific(abs, None), GENERAL_MAX_FIXED_EXPONENT),
    };

    let digits = match sci.digits.trim_end_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    let negative = value < 0.0 && has_nonzero_digit(digits);

    let body = if abs != 0.0
        && (sci.exponent >= max_fixed_exponent || sci.exponent < GENERAL_MIN_FIXED_EXPONENT)
    {
        let mantissa = join(&digits[..1], &digits[1..], culture);
        format!(
            "{}{}",
            mantissa,
            exponent_suffix(symbol, sci.exponent, true, 2, culture)
        )
    } else {
        let (int, frac) = place(digits, sci.exponent);
        join(&int, &frac, culture)
    };

    signed(negative, body, culture)
}

/// `F` and `N`: fixed number of decimals, optionally grouped
fn fixed(value: f64, decimals: usize, grouping: bool, culture: &Culture) -> String {
    let text = round_fixed(value.abs(), decimals);
    let (int, frac) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let negative = value < 0.0 && has_nonzero_digit(&text);
    let int = if grouping {
        group(int, culture.group_separator)
    } else {
        int.to_string()
    };
    signed(negative, join(&int, frac, culture), culture)
}

/// `E`: one integer digit, `decimals` fraction digits, three exponent digits
fn exponential(value: f64, decimals: usize, symbol: char, culture: &Culture) -> String {
    let sci = scientific(value.abs(), Some(decimals));
    let negative = value < 0.0 && has_nonzero_digit(&sci.digits);
    let exponent = if value == 0.0 { 0 } else { sci.exponent };
    let body = format!(
        "{}{}",
        join(&sci.digits[..1], &sci.digits[1..], culture),
        exponent_suffix(symbol, exponent, true, 3, culture)
    );
    signed(negative, body, culture)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Digit { zero: bool },
    Point,
    Comma,
    Exponent(ExponentSpec),
    Literal(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ExponentSpec {
    symbol: char,
    always_sign: bool,
    min_digits: usize,
}

fn push_literal(tokens: &mut Vec<Token>, c: char) {
    if let Some(Token::Literal(text)) = tokens.last_mut() {
        text.push(c);
    } else {
        tokens.push(Token::Literal(c.to_string()));
    }
}

fn tokenize(format: &str) -> Vec<Token> {
    let chars: Vec<char> = format.chars().collect();
    let mut tokens = Vec::new();
    let mut seen_point = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '0' | '#' => tokens.push(Token::Digit { zero: c == '0' }),
            '.' => {
                // Only the first '.' is the decimal point, later ones are ignored
                if !seen_point {
                    seen_point = true;
                    tokens.push(Token::Point);
                }
            }
            ',' => tokens.push(Token::Comma),
            'E' | 'e' => {
                let mut j = i + 1;
                let mut always_sign = false;
                if let Some(&sign) = chars.get(j).filter(|&&s| s == '+' || s == '-') {
                    always_sign = sign == '+';
                    j += 1;
                }
                let zeros = chars[j..].iter().take_while(|&&z| z == '0').count();
                if zeros > 0 {
                    tokens.push(Token::Exponent(ExponentSpec {
                        symbol: c,
                        always_sign,
                        min_digits: zeros,
                    }));
                    i = j + zeros;
                    continue;
                }
                push_literal(&mut tokens, c);
            }
            '\\' => {
                if let Some(&escaped) = chars.get(i + 1) {
                    push_literal(&mut tokens, escaped);
                    i += 1;
                }
            }
            '\'' | '"' => {
                let end = chars[i + 1..]
                    .iter()
                    .position(|&q| q == c)
                    .map_or(chars.len(), |p| i + 1 + p);
                for &quoted in &chars[i + 1..end] {
                    push_literal(&mut tokens, quoted);
                }
                i = end;
            }
            _ => push_literal(&mut tokens, c),
        }
        i += 1;
    }

    tokens
}

fn custom(value: f64, tokens: &[Token], culture: &Culture) -> String {
    let exponent_at = tokens
        .iter()
        .position(|t| matches!(t, Token::Exponent(_)))
        .unwrap_or(tokens.len());
    let mantissa = &tokens[..exponent_at];
    let (integer, fraction) = match mantissa.iter().position(|t| *t == Token::Point) {
        Some(point) => (&mantissa[..point], &mantissa[point + 1..]),
        None => (mantissa, &[][..]),
    };
    let (exponent_spec, tail) = match tokens.get(exponent_at) {
        Some(Token::Exponent(spec)) => (Some(*spec), &tokens[exponent_at + 1..]),
        _ => (None, &[][..]),
    };

    // Integer placeholders
    let placeholders: Vec<usize> = integer
        .iter()
        .enumerate()
        .filter(|(_, t)| matches!(t, Token::Digit { .. }))
        .map(|(i, _)| i)
        .collect();
    let int_count = placeholders.len();
    let int_min = integer
        .iter()
        .filter(|t| matches!(t, Token::Digit { .. }))
        .position(|t| *t == Token::Digit { zero: true })
        .map_or(0, |first_zero| int_count - first_zero);
    let (grouping, scale_commas) = match (placeholders.first(), placeholders.last()) {
        (Some(&first), Some(&last)) => {
            let grouping = integer[first..last].contains(&Token::Comma);
            let scale = integer[last..]
                .iter()
                .filter(|t| **t == Token::Comma)
                .count();
            (grouping, scale)
        }
        _ => (false, 0),
    };

    // Fraction placeholders
    let frac_tokens: Vec<&Token> = fraction
        .iter()
        .filter(|t| matches!(t, Token::Digit { .. }))
        .collect();
    let frac_max = frac_tokens.len();
    let frac_min = frac_tokens
        .iter()
        .rposition(|t| **t == Token::Digit { zero: true })
        .map_or(0, |last_zero| last_zero + 1);

    let abs = value.abs();
    let (int_digits, mut frac_digits, exponent) = match exponent_spec {
        Some(spec) => {
            let significant_int = int_count.max(1);
            let sci = scientific(abs, Some(significant_int + frac_max - 1));
            let exponent = if abs == 0.0 {
                0
            } else {
                sci.exponent - (significant_int as i32 - 1)
            };
            let (int, frac) = sci.digits.split_at(significant_int.min(sci.digits.len()));
            (int.to_string(), frac.to_string(), Some((spec, exponent)))
        }
        None => {
            let scaled = abs / 1000f64.powi(scale_commas as i32);
            let text = round_fixed(scaled, frac_max);
            let (int, frac) = text.split_once('.').unwrap_or((text.as_str(), ""));
            (int.to_string(), frac.to_string(), None)
        }
    };

    let significant = int_digits.trim_start_matches('0');
    let int_digits = format!(
        "{}{}",
        "0".repeat(int_min.saturating_sub(significant.len())),
        significant
    );
    while frac_digits.len() > frac_min && frac_digits.ends_with('0') {
        frac_digits.pop();
    }

    let mut out = String::new();
    if value < 0.0 && (has_nonzero_digit(&int_digits) || has_nonzero_digit(&frac_digits)) {
        out.push(culture.negative_sign);
    }

    // Digits are right-aligned to the placeholders; surplus goes to the first one
    let digits: Vec<char> = int_digits.chars().collect();
    let len = digits.len();
    let offset = len as isize - int_count as isize;
    let mut next = 0usize;
    let push_digit = |out: &mut String, j: usize| {
        out.push(digits[j]);
        let remaining = len - 1 - j;
        if grouping && remaining > 0 && remaining % 3 == 0 {
            out.push(culture.group_separator);
        }
    };

    let mut placeholder = 0isize;
    for token in integer {
        match token {
            Token::Digit { .. } => {
                let due = (placeholder + offset + 1).clamp(0, len as isize) as usize;
                while next < due {
                    push_digit(&mut out, next);
                    next += 1;
                }
                placeholder += 1;
            }
            Token::Literal(text) => out.push_str(text),
            Token::Comma | Token::Point | Token::Exponent(_) => {}
        }
    }
    while next < len {
        push_digit(&mut out, next);
        next += 1;
    }

    if !frac_digits.is_empty() {
        out.push(culture.decimal_separator);
    }
    let frac_chars: Vec<char> = frac_digits.chars().collect();
    let mut k = 0usize;
    for token in fraction {
        match token {
            Token::Digit { .. } => {
                if let Some(&c) = frac_chars.get(k) {
                    out.push(c);
                }
                k += 1;
            }
            Token::Literal(text) => out.push_str(text),
            Token::Comma | Token::Point | Token::Exponent(_) => {}
        }
    }

    if let Some((spec, exponent)) = exponent {
        out.push_str(&exponent_suffix(
            spec.symbol,
            exponent,
            spec.always_sign,
            spec.min_digits,
            culture,
        ));
        for token in tail {
            if let Token::Literal(text) = token {
                out.push_str(text);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inv(value: f64, format: &str) -> String {
        format_number(value, format, &Culture::invariant()).unwrap()
    }

    #[test]
    fn test_general_shortest() {
        assert_eq!(inv(2000.0, ""), "2000");
        assert_eq!(inv(1.5, "G"), "1.5");
        assert_eq!(inv(-0.25, "G"), "-0.25");
        assert_eq!(inv(0.0, "G"), "0");
        assert_eq!(inv(0.1 + 0.2, "R"), "0.30000000000000004");
        assert_eq!(inv(1e15, "G"), "1E+15");
        assert_eq!(inv(1e-5, "G"), "1E-05");
        assert_eq!(inv(1.5e-7, "G"), "1.5E-07");
        assert_eq!(inv(0.0001, "G"), "0.0001");
    }

    #[test]
    fn test_general_precision() {
        assert_eq!(inv(1234.5678, "G3"), "1.23E+03");
        assert_eq!(inv(1234.5678, "G6"), "1234.57");
        assert_eq!(inv(0.5, "G2"), "0.5");
    }

    #[test]
    fn test_fixed_and_number() {
        assert_eq!(inv(1234.5678, "F2"), "1234.57");
        assert_eq!(inv(1.0, "F"), "1.00");
        assert_eq!(inv(1234567.891, "N2"), "1,234,567.89");
        assert_eq!(inv(-0.001, "F2"), "0.00");
        let de = Culture::from_name("de-DE").unwrap();
        assert_eq!(format_number(1234.5, "N1", &de).unwrap(), "1.234,5");
    }

    #[test]
    fn test_exponential() {
        assert_eq!(inv(1234.5678, "E2"), "1.23E+003");
        assert_eq!(inv(0.00012, "e1"), "1.2e-004");
        assert_eq!(inv(0.0, "E1"), "0.0E+000");
    }

    #[test]
    fn test_custom_digits() {
        assert_eq!(inv(1234.5678, "0.00"), "1234.57");
        assert_eq!(inv(100.0, "0.0"), "100.0");
        assert_eq!(inv(0.5, "#.##"), ".5");
        assert_eq!(inv(1.0, "0.##"), "1");
        assert_eq!(inv(5.0, "00"), "05");
        assert_eq!(inv(-3.14159, "0.000"), "-3.142");
    }

    #[test]
    fn test_custom_grouping_and_literals() {
        assert_eq!(inv(1234567.891, "#,##0.00"), "1,234,567.89");
        assert_eq!(inv(12345.0, "# ###"), "12 345");
        assert_eq!(inv(1234567.0, "# ###"), "1234 567");
        assert_eq!(inv(1234567.0, "0,,"), "1");
        assert_eq!(inv(100.0, "0.0 kmph"), "100.0 kmph");
        assert_eq!(inv(3.0, "'#'0"), "#3");
        assert_eq!(inv(3.0, "\\00"), "03");
    }

    #[test]
    fn test_custom_exponent() {
        assert_eq!(inv(12345.0, "0.0E-0"), "1.2E4");
        assert_eq!(inv(0.00123, "0.0E-0"), "1.2E-3");
        assert_eq!(inv(1234.0, "0.00E+00"), "1.23E+03");
        assert_eq!(inv(0.0, "0.0E+0"), "0.0E+0");
    }

    #[test]
    fn test_culture_decimal() {
        let sv = Culture::from_name("sv-SE").unwrap();
        assert_eq!(format_number(1.5, "", &sv).unwrap(), "1,5");
        assert_eq!(format_number(1.25, "0.0", &sv).unwrap(), "1,3");
    }

    #[test]
    fn test_midpoints_round_away_from_zero() {
        assert_eq!(inv(2.5, "0"), "3");
        assert_eq!(inv(-2.5, "0"), "-3");
        assert_eq!(inv(0.125, "0.00"), "0.13");
        assert_eq!(inv(0.5, "F0"), "1");
        assert_eq!(inv(99.5, "0"), "100");
        assert_eq!(inv(1.25, "E1"), "1.3E+000");
        assert_eq!(inv(9.5, "E0"), "1E+001");
        assert_eq!(inv(2500.0, "0,"), "3");
        // 2.675 is stored just below the midpoint
        assert_eq!(inv(2.675, "F2"), "2.67");
        assert_eq!(inv(1.5, "F0"), "2");
    }

    #[test]
    fn test_round_up_digits() {
        assert_eq!(round_up("0.12"), "0.13");
        assert_eq!(round_up("9.99"), "10.00");
        assert_eq!(round_up("2"), "3");
        assert!(is_half("5000"));
        assert!(!is_half("5001"));
        assert!(!is_half("49"));
    }

    #[test]
    fn test_special_values() {
        assert_eq!(inv(f64::NAN, "0.00"), "NaN");
        assert_eq!(inv(f64::INFINITY, "E2"), "Infinity");
        assert_eq!(inv(f64::NEG_INFINITY, ""), "-Infinity");
    }

    #[test]
    fn test_unknown_standard_format() {
        let err = format_number(1.0, "Q", &Culture::invariant()).unwrap_err();
        assert!(matches!(err, Error::MalformedFormatString { .. }));
    }
}
