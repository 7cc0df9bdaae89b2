//! Quantity text parsing - "2 kg/dm^3", "1 100 mm", "m", "100,5 km/h"

use crate::split::split;
use crate::{Dimension, Unit, UnitRegistry};
use gauge_core::{parse_number, Culture, Error, Result};

/// Parse `input` as a value of `kind`, returned in the kind's base unit
///
/// An empty numeric part means 1 when a unit is written ("m" is one metre)
/// and 0 when nothing is written at all. An empty unit part means the kind's
/// current default unit.
#[tracing::instrument(level = "trace", skip(registry, culture), fields(culture = %culture.name))]
pub fn parse_value(
    registry: &UnitRegistry,
    kind: &str,
    input: &str,
    culture: &Culture,
) -> Result<f64> {
    if !registry.contains_kind(kind) {
        return Err(Error::UnknownKind(kind.to_string()));
    }

    let parts = split(input, culture);
    let number = read_number(input, parts.number, parts.unit, culture)?;
    let unit = registry
        .try_get_unit(kind, parts.unit)
        .ok_or_else(|| Error::unknown_unit(input, parts.unit, kind))?;

    Ok(unit.to_base(number))
}

/// Value and dimension of free-form quantity text
///
/// The unit part is resolved against every kind of the registry, falling
/// back to the composite grammar of [`parse_unit`].
#[tracing::instrument(level = "trace", skip(registry, culture))]
pub fn parse_dynamic(
    registry: &UnitRegistry,
    input: &str,
    culture: &Culture,
) -> Result<(f64, Dimension)> {
    let parts = split(input, culture);
    let number = read_number(input, parts.number, parts.unit, culture)?;
    let unit = if parts.unit.is_empty() {
        Unit::dimensionless()
    } else {
        parse_unit(registry, parts.unit)
            .map_err(|_| Error::unknown_unit(input, parts.unit, "any kind"))?
    };

    Ok((unit.to_base(number), unit.dimension))
}

fn read_number(input: &str, number: &str, unit: &str, culture: &Culture) -> Result<f64> {
    if number.is_empty() {
        return Ok(if unit.is_empty() { 0.0 } else { 1.0 });
    }
    parse_number(number, culture).map_err(|_| Error::numeric_format(input, number))
}

/// Parse a unit symbol into a Unit
///
/// A symbol registered in any kind is used as is. Otherwise the symbol is
/// read as a unit expression:
/// - Powers: "m^2", "s^-1", "m²"
/// - Products: "kg*m", "N·m", "kg m"
/// - Quotients: "m/s", "kg*m/s^2"
///
/// At most one '/' is accepted and everything after it is the denominator,
/// so kg/(m·s) is written "kg/m*s". Exponents that overflow are reported as
/// an unknown unit.
pub fn parse_unit(registry: &UnitRegistry, s: &str) -> Result<Unit> {
    let s = s.trim();

    if s.is_empty() {
        return Ok(Unit::dimensionless());
    }

    if let Some(unit) = registry.find_symbol(s) {
        return Ok(unit);
    }

    parse_unit_expression(registry, s)
}

/// Parse a complex unit expression like "kg*m/s^2"
fn parse_unit_expression(registry: &UnitRegistry, s: &str) -> Result<Unit> {
    let (numerator, denominator) = match s.split_once('/') {
        Some((_, denominator)) if denominator.contains('/') => return Err(invalid(s)),
        Some((numerator, denominator)) => (numerator, Some(denominator)),
        None => (s, None),
    };

    let numerator = parse_product(registry, numerator)?;
    match denominator {
        Some(denominator) => numerator
            .divide(&parse_product(registry, denominator)?)
            .ok_or_else(|| invalid(s)),
        None => Ok(numerator),
    }
}

/// Parse a product of units like "kg*m" or "m^2*s"
fn parse_product(registry: &UnitRegistry, s: &str) -> Result<Unit> {
    let mut factors = s
        .split(|c: char| c == '*' || c == '·' || c == ' ')
        .filter(|p| !p.is_empty());

    let Some(first) = factors.next() else {
        return Err(invalid(s));
    };

    let mut result = parse_power(registry, first)?;
    for factor in factors {
        result = result
            .multiply(&parse_power(registry, factor)?)
            .ok_or_else(|| invalid(s))?;
    }

    Ok(result)
}

/// Parse a unit with optional power like "m^2", "s^-1" or "m³"
fn parse_power(registry: &UnitRegistry, s: &str) -> Result<Unit> {
    if let Some((base, exponent)) = s.split_once('^') {
        let exponent: i32 = exponent.trim().parse().map_err(|_| invalid(s))?;
        return lookup_base_unit(registry, base)?
            .power(exponent)
            .ok_or_else(|| invalid(s));
    }

    if let Some((base, exponent)) = parse_superscript(s) {
        return lookup_base_unit(registry, base)?
            .power(exponent)
            .ok_or_else(|| invalid(s));
    }

    lookup_base_unit(registry, s)
}

/// Split trailing superscript digits off a symbol: "m²" -> ("m", 2), "s⁻¹" -> ("s", -1)
fn parse_superscript(s: &str) -> Option<(&str, i32)> {
    let digit = |c: char| match c {
        '⁰' => Some(0),
        '¹' => Some(1),
        '²' => Some(2),
        '³' => Some(3),
        '⁴' => Some(4),
        '⁵' => Some(5),
        '⁶' => Some(6),
        '⁷' => Some(7),
        '⁸' => Some(8),
        '⁹' => Some(9),
        _ => None,
    };

    let base = s.trim_end_matches(|c: char| digit(c).is_some());
    if base.len() == s.len() {
        return None;
    }

    let magnitude = s[base.len()..]
        .chars()
        .filter_map(digit)
        .fold(0i32, |acc, d| acc.saturating_mul(10).saturating_add(d));

    match base.strip_suffix('⁻') {
        Some(base) => Some((base, -magnitude)),
        None => Some((base, magnitude)),
    }
}

/// Look up a single unit factor in every kind
fn lookup_base_unit(registry: &UnitRegistry, s: &str) -> Result<Unit> {
    let s = s.trim();

    if s == "1" {
        return Ok(Unit::dimensionless());
    }

    registry.find_symbol(s).ok_or_else(|| invalid(s))
}

fn invalid(s: &str) -> Error {
    Error::unknown_unit(s, s, "any kind")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> UnitRegistry {
        UnitRegistry::builtin(Culture::invariant())
    }

    fn parse(kind: &str, input: &str) -> Result<f64> {
        parse_value(&registry(), kind, input, &Culture::invariant())
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "{} != {}",
            actual,
            expected
        );
    }

    #[test]
    fn test_density_with_composite_symbol() {
        assert_close(parse("Density", "2 kg/dm^3").unwrap(), 2000.0);
    }

    #[test]
    fn test_case_insensitive_fallback() {
        assert_close(parse("Density", "2Kg/M^3").unwrap(), 2.0);
        assert_close(parse("Length", "3 KM").unwrap(), 3000.0);
    }

    #[test]
    fn test_unit_only_means_one() {
        assert_eq!(parse("Length", "m").unwrap(), 1.0);
        assert_eq!(parse("Length", "km").unwrap(), 1000.0);
        assert_eq!(parse("Density", "kg/m^3").unwrap(), 1.0);
    }

    #[test]
    fn test_number_only_uses_default() {
        assert_eq!(parse("Length", "12").unwrap(), 12.0);
        let mut r = registry();
        assert!(r.try_set_default_unit("Length", "mm"));
        assert_close(
            parse_value(&r, "Length", "12", &Culture::invariant()).unwrap(),
            0.012,
        );
    }

    #[test]
    fn test_empty_input_is_zero() {
        assert_eq!(parse("Length", "").unwrap(), 0.0);
        assert_eq!(parse("Length", "   ").unwrap(), 0.0);
    }

    #[test]
    fn test_numeric_forms() {
        assert_eq!(parse("Length", "1 100 m").unwrap(), 1100.0);
        assert_eq!(parse("Length", "100,200 m").unwrap(), 100_200.0);
        assert_eq!(parse("Length", "- 100 m").unwrap(), -100.0);
        assert_eq!(parse("Length", "1e2 m").unwrap(), 100.0);
        assert_eq!(parse("Length", "1E+2 m").unwrap(), 100.0);
        assert_eq!(parse("Length", "1.0e-2m").unwrap(), 0.01);
    }

    #[test]
    fn test_special_values() {
        assert!(parse("Length", "NaN").unwrap().is_nan());
        assert_eq!(parse("Length", "Infinity m").unwrap(), f64::INFINITY);
        assert_eq!(parse("Length", "-Infinity km").unwrap(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_culture() {
        let sv = Culture::from_name("sv-SE").unwrap();
        let value = parse_value(&registry(), "Length", "1\u{a0}234,5 km", &sv).unwrap();
        assert_close(value, 1_234_500.0);
    }

    #[test]
    fn test_unknown_unit() {
        match parse("Length", "100 Metre") {
            Err(Error::UnknownUnit { input, unit, kind }) => {
                assert_eq!(input, "100 Metre");
                assert_eq!(unit, "Metre");
                assert_eq!(kind, "Length");
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(parse("Length", "1x00").is_err());
    }

    #[test]
    fn test_bad_number() {
        assert!(matches!(
            parse("Length", "1.2.3 m"),
            Err(Error::NumericFormat { .. })
        ));
        assert!(matches!(parse("Length", "- m"), Err(Error::NumericFormat { .. })));
    }

    #[test]
    fn test_unknown_kind() {
        assert!(matches!(parse("Jerk", "1"), Err(Error::UnknownKind(_))));
    }

    #[test]
    fn test_parse_unit_registered() {
        let r = registry();
        let unit = parse_unit(&r, "km/h").unwrap();
        assert_eq!(unit.kind, "Velocity");
        assert_eq!(unit.symbol, "km/h");
    }

    #[test]
    fn test_parse_unit_composite() {
        let r = registry();
        let force = parse_unit(&r, "kg*m/s^2").unwrap();
        assert_eq!(force.dimension, Dimension::FORCE);
        assert_close(force.scale, 1.0);

        let pressure = parse_unit(&r, "kN/mm^2").unwrap();
        assert_eq!(pressure.dimension, Dimension::PRESSURE);
        assert_close(pressure.scale, 1e9);

        let torque = parse_unit(&r, "kN m").unwrap();
        assert_eq!(torque.dimension, Dimension::ENERGY);
    }

    #[test]
    fn test_parse_unit_superscripts() {
        let r = registry();
        assert_eq!(parse_unit(&r, "m²").unwrap().dimension, Dimension::AREA);
        assert_eq!(parse_unit(&r, "s⁻¹").unwrap().dimension, Dimension::FREQUENCY);
        assert_eq!(parse_superscript("m¹²"), Some(("m", 12)));
        assert_eq!(parse_superscript("m"), None);
    }

    #[test]
    fn test_parse_unit_unknown() {
        let r = registry();
        assert!(parse_unit(&r, "furlong/fortnight").is_err());
        assert!(parse_unit(&r, "m^x").is_err());
        assert!(parse_unit(&r, "/s").is_err());
    }

    #[test]
    fn test_parse_unit_single_quotient() {
        let r = registry();
        assert!(parse_unit(&r, "kg/m/s").is_err());
        let unit = parse_unit(&r, "kg/m*s").unwrap();
        assert_eq!(unit.dimension, Dimension::new([-1, 1, -1, 0, 0, 0, 0]));
    }

    #[test]
    fn test_exponent_overflow_is_an_error() {
        let r = registry();
        let c = Culture::invariant();
        assert!(matches!(
            parse_dynamic(&r, "1 ha^2147483647", &c),
            Err(Error::UnknownUnit { .. })
        ));
        assert!(matches!(
            parse_dynamic(&r, "1 m^2147483647*m", &c),
            Err(Error::UnknownUnit { .. })
        ));
        assert!(parse_unit(&r, "m^-2147483648/m").is_err());

        let (_, dimension) = parse_dynamic(&r, "1 kg*m^-2147483648", &c).unwrap();
        assert_eq!(dimension.symbol(), "kg/m^2147483648");
    }

    #[test]
    fn test_parse_dynamic() {
        let r = registry();
        let (value, dimension) = parse_dynamic(&r, "3 kN*m", &Culture::invariant()).unwrap();
        assert_close(value, 3000.0);
        assert_eq!(dimension, Dimension::ENERGY);

        let (value, dimension) = parse_dynamic(&r, "0.5", &Culture::invariant()).unwrap();
        assert_eq!(value, 0.5);
        assert!(dimension.is_dimensionless());

        assert!(matches!(
            parse_dynamic(&r, "2 furlong", &Culture::invariant()),
            Err(Error::UnknownUnit { .. })
        ));
    }
}
