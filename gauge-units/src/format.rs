//! Quantity formatting with an embedded unit directive
//!
//! A format string is a numeric format optionally followed by one bracketed
//! unit directive and trailing literal text:
//!
//! - `"0.00"` formats the value in the default unit, then a space and its symbol
//! - `"0.00 [km]"` converts to km and prints the symbol after the same spacing
//! - `"0.0[!km/h] kmph"` converts to km/h but prints the trailing text instead
//! - `"0.0 []"` prints the value in the base unit without a symbol

use crate::{Dimension, Unit, UnitRegistry};
use gauge_core::{format_number, special_literal, Culture, Error, Result};

/// Unit part of a format string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitDirective<'a> {
    /// No brackets: the current default unit, symbol printed
    Default,
    /// `[]`: the base unit, symbol omitted
    Base,
    /// `[sym]`: convert to `sym` and print it
    Show(&'a str),
    /// `[!sym]`: convert to `sym`, print the trailing text instead
    Convert(&'a str),
}

/// A parsed quantity format string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityFormat<'a> {
    /// Numeric format applied to the converted magnitude
    pub number: &'a str,
    /// Whitespace written between the number and the bracket, `None` when
    /// nothing precedes the bracket
    pub separator: Option<&'a str>,
    pub unit: UnitDirective<'a>,
    /// Literal text after the closing bracket
    pub trailing: &'a str,
}

impl<'a> QuantityFormat<'a> {
    pub fn parse(format: &'a str) -> Result<Self> {
        let open = format.find('[');
        let close = format.find(']');

        let (open, close) = match (open, close) {
            (None, None) => {
                return Ok(QuantityFormat {
                    number: format.trim(),
                    separator: None,
                    unit: UnitDirective::Default,
                    trailing: "",
                })
            }
            (Some(open), Some(close)) if open < close => (open, close),
            (Some(_), None) => return Err(Error::malformed(format, "unterminated '['")),
            _ => return Err(Error::malformed(format, "']' without a matching '['")),
        };

        let inner = &format[open + 1..close];
        let trailing = &format[close + 1..];
        if inner.contains('[') || trailing.contains('[') || trailing.contains(']') {
            return Err(Error::malformed(format, "more than one unit directive"));
        }

        let prefix = &format[..open];
        let number = prefix.trim_end();
        let separator = (!prefix.is_empty()).then(|| &prefix[number.len()..]);

        let unit = match inner.trim() {
            "" | "!" => UnitDirective::Base,
            directive => match directive.strip_prefix('!') {
                Some(symbol) => UnitDirective::Convert(symbol.trim()),
                None => UnitDirective::Show(directive),
            },
        };

        Ok(QuantityFormat {
            number: number.trim_start(),
            separator,
            unit,
            trailing,
        })
    }

    /// Write `value`, given in base units, using the unit `resolve` picks
    /// for this format's directive
    pub fn render(
        &self,
        value: f64,
        culture: &Culture,
        resolve: impl FnOnce(UnitDirective<'a>) -> Result<Unit>,
    ) -> Result<String> {
        let unit = resolve(self.unit)?;
        let mut out = format_number(unit.from_base(value), self.number, culture)?;

        match self.unit {
            UnitDirective::Default | UnitDirective::Show(_) => {
                if !unit.symbol.is_empty() {
                    out.push_str(self.separator.unwrap_or(" "));
                    out.push_str(&unit.symbol);
                }
            }
            UnitDirective::Base | UnitDirective::Convert(_) => {
                if !self.trailing.is_empty() {
                    out.push_str(self.separator.unwrap_or(""));
                }
            }
        }
        out.push_str(self.trailing);

        Ok(out)
    }
}

/// Format a base-unit value of `kind`
///
/// NaN and the infinities are written as their literals whatever the
/// format asks for.
#[tracing::instrument(level = "trace", skip(registry, culture), fields(culture = %culture.name))]
pub fn format_value(
    registry: &UnitRegistry,
    kind: &str,
    value: f64,
    format: Option<&str>,
    culture: &Culture,
) -> Result<String> {
    if let Some(literal) = special_literal(value) {
        return Ok(literal.to_string());
    }
    if !registry.contains_kind(kind) {
        return Err(Error::UnknownKind(kind.to_string()));
    }

    let text = format.unwrap_or("");
    QuantityFormat::parse(text)?.render(value, culture, |directive| {
        let unit = match directive {
            UnitDirective::Default => registry.default_unit(kind),
            UnitDirective::Base => registry.base_unit(kind),
            UnitDirective::Show(symbol) | UnitDirective::Convert(symbol) => {
                registry.try_get_unit(kind, symbol)
            }
        };
        unit.ok_or_else(|| Error::unknown_unit(text, directive_symbol(directive), kind))
    })
}

/// Format a base-unit value of `dimension`, resolving units across all kinds
#[tracing::instrument(level = "trace", skip(registry, culture))]
pub fn format_dynamic(
    registry: &UnitRegistry,
    value: f64,
    dimension: Dimension,
    format: Option<&str>,
    culture: &Culture,
) -> Result<String> {
    if let Some(literal) = special_literal(value) {
        return Ok(literal.to_string());
    }

    let text = format.unwrap_or("");
    QuantityFormat::parse(text)?.render(value, culture, |directive| match directive {
        UnitDirective::Default => Ok(registry.display_unit(dimension)),
        UnitDirective::Base => Ok(Unit::base("", dimension)),
        UnitDirective::Show(symbol) | UnitDirective::Convert(symbol) => {
            let unit = registry
                .resolve_symbol(symbol)
                .map_err(|_| Error::unknown_unit(text, symbol, "any kind"))?;
            if unit.dimension != dimension {
                return Err(Error::IncompatibleDimensions {
                    left: dimension.to_string(),
                    right: format!("{} ({})", unit.symbol, unit.dimension),
                });
            }
            Ok(unit)
        }
    })
}

fn directive_symbol(directive: UnitDirective<'_>) -> &str {
    match directive {
        UnitDirective::Show(symbol) | UnitDirective::Convert(symbol) => symbol,
        UnitDirective::Default | UnitDirective::Base => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> UnitRegistry {
        UnitRegistry::builtin(Culture::invariant())
    }

    fn fmt(kind: &str, value: f64, format: Option<&str>) -> Result<String> {
        format_value(&registry(), kind, value, format, &Culture::invariant())
    }

    #[test]
    fn test_parse_format_string() {
        let f = QuantityFormat::parse("0.00 [km] away").unwrap();
        assert_eq!(f.number, "0.00");
        assert_eq!(f.separator, Some(" "));
        assert_eq!(f.unit, UnitDirective::Show("km"));
        assert_eq!(f.trailing, " away");

        let f = QuantityFormat::parse("[!km/h]kmph").unwrap();
        assert_eq!(f.number, "");
        assert_eq!(f.separator, None);
        assert_eq!(f.unit, UnitDirective::Convert("km/h"));

        assert_eq!(QuantityFormat::parse("0 []").unwrap().unit, UnitDirective::Base);
        assert_eq!(QuantityFormat::parse("F2").unwrap().unit, UnitDirective::Default);
    }

    #[test]
    fn test_malformed_format_strings() {
        for format in ["0.0 [km", "0.0 km]", "0 ]km[", "[m][m]", "0 [[m]"] {
            assert!(
                matches!(
                    fmt("Length", 1.0, Some(format)),
                    Err(Error::MalformedFormatString { .. })
                ),
                "{}",
                format
            );
        }
    }

    #[test]
    fn test_default_format() {
        assert_eq!(fmt("Density", 2000.0, None).unwrap(), "2000 kg/m^3");
        assert_eq!(fmt("Length", 1.5, None).unwrap(), "1.5 m");
        assert_eq!(fmt("Fraction", 0.25, None).unwrap(), "0.25");
    }

    #[test]
    fn test_default_unit_override() {
        let mut r = registry();
        assert!(r.try_set_default_unit("Fraction", "%"));
        let text = format_value(&r, "Fraction", 0.25, None, &Culture::invariant()).unwrap();
        assert_eq!(text, "25 %");
    }

    #[test]
    fn test_numeric_prefix_without_brackets() {
        assert_eq!(fmt("Length", 1.5, Some("0.00")).unwrap(), "1.50 m");
        assert_eq!(fmt("Length", 1234.5, Some("N1")).unwrap(), "1,234.5 m");
    }

    #[test]
    fn test_bracket_unit_spacing() {
        assert_eq!(fmt("Length", 1500.0, Some("0.00 [km]")).unwrap(), "1.50 km");
        assert_eq!(fmt("Length", 1500.0, Some("0.00[km]")).unwrap(), "1.50km");
        assert_eq!(fmt("Length", 1500.0, Some("[km]")).unwrap(), "1.5 km");
        assert_eq!(fmt("Length", 12345.0, Some("# ### [m]")).unwrap(), "12 345 m");
    }

    #[test]
    fn test_bracket_unit_case_insensitive() {
        assert_eq!(fmt("Length", 1500.0, Some("0.0 [KM]")).unwrap(), "1.5 km");
    }

    #[test]
    fn test_suppressed_unit() {
        let value = 100.0 * 1000.0 / 3600.0;
        assert_eq!(
            fmt("Velocity", value, Some("0.0[!km/h] kmph")).unwrap(),
            "100.0 kmph"
        );
        assert_eq!(fmt("Velocity", value, Some("0.0 [!km/h]")).unwrap(), "100.0");
    }

    #[test]
    fn test_base_unit_brackets() {
        let mut r = registry();
        assert!(r.try_set_default_unit("Length", "km"));
        let c = Culture::invariant();
        let text = format_value(&r, "Length", 1500.0, Some("0 []"), &c).unwrap();
        assert_eq!(text, "1500");
        let text = format_value(&r, "Length", 1500.0, Some("0 []metres"), &c).unwrap();
        assert_eq!(text, "1500 metres");
        let text = format_value(&r, "Length", 1500.0, Some("0 [ ! ]m"), &c).unwrap();
        assert_eq!(text, "1500 m");
        let text = format_value(&r, "Length", 1500.0, Some("0 [!]"), &c).unwrap();
        assert_eq!(text, "1500");
    }

    #[test]
    fn test_midpoint_rounding() {
        assert_eq!(fmt("Length", 2500.0, Some("0 [km]")).unwrap(), "3 km");
        assert_eq!(fmt("Length", 0.125, Some("0.00 [m]")).unwrap(), "0.13 m");
        assert_eq!(fmt("Length", 0.5, Some("F0")).unwrap(), "1 m");
        assert_eq!(fmt("Length", -2500.0, Some("0 [km]")).unwrap(), "-3 km");
    }

    #[test]
    fn test_exponent_format() {
        assert_eq!(fmt("Length", 12345.0, Some("0.0E-0 [m]")).unwrap(), "1.2E4 m");
    }

    #[test]
    fn test_special_values_bypass_format() {
        assert_eq!(fmt("Length", f64::NAN, Some("0.0 [km]")).unwrap(), "NaN");
        assert_eq!(fmt("Length", f64::INFINITY, Some("[[")).unwrap(), "Infinity");
        assert_eq!(fmt("Length", f64::NEG_INFINITY, None).unwrap(), "-Infinity");
    }

    #[test]
    fn test_unknown_bracket_unit() {
        match fmt("Length", 1.0, Some("0 [furlong]")) {
            Err(Error::UnknownUnit { unit, kind, .. }) => {
                assert_eq!(unit, "furlong");
                assert_eq!(kind, "Length");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_culture() {
        let de = Culture::from_name("de-DE").unwrap();
        let text = format_value(&registry(), "Length", 1234.5, Some("N2 [m]"), &de).unwrap();
        assert_eq!(text, "1.234,50 m");
    }

    #[test]
    fn test_round_trip_every_unit() {
        let r = registry();
        let culture = Culture::invariant();
        for kind in r.kinds().collect::<Vec<_>>() {
            for unit in r.units(kind).unwrap() {
                if unit.symbol.is_empty() {
                    continue;
                }
                let value = 3.75 * unit.scale;
                let format = format!("R [{}]", unit.symbol);
                let text = format_value(&r, kind, value, Some(&format), &culture).unwrap();
                let back = r.parse_value(kind, &text, &culture).unwrap();
                assert!(
                    (back - value).abs() <= 1e-12 * value.abs(),
                    "{} {}: {} -> {}",
                    kind,
                    unit.symbol,
                    text,
                    back
                );
            }
        }
    }

    #[test]
    fn test_format_dynamic() {
        let r = registry();
        let c = Culture::invariant();
        assert_eq!(format_dynamic(&r, 3.0, Dimension::ENERGY, None, &c).unwrap(), "3 J");
        let jerk = Dimension::new([1, 0, -3, 0, 0, 0, 0]);
        assert_eq!(format_dynamic(&r, 2.0, jerk, None, &c).unwrap(), "2 m/s^3");
        assert_eq!(
            format_dynamic(&r, 3000.0, Dimension::ENERGY, Some("0 [kN*m]"), &c).unwrap(),
            "3 kN*m"
        );
        assert!(matches!(
            format_dynamic(&r, 1.0, Dimension::ENERGY, Some("[m]"), &c),
            Err(Error::IncompatibleDimensions { .. })
        ));
    }
}
