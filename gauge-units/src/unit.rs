//! Unit representation with scale factors

use crate::Dimension;
use gauge_core::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A unit of one quantity kind
///
/// `scale` is the amount of the kind's base unit in one of this unit:
/// `value_base = value * scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// The unit symbol (e.g., "m", "kg/m^3", "N*m")
    pub symbol: String,
    /// Name of the kind this unit belongs to, empty for synthesized composites
    pub kind: String,
    /// The dimensional signature
    pub dimension: Dimension,
    /// Factor to convert to the base unit
    pub scale: f64,
}

impl Unit {
    pub fn new(
        symbol: impl Into<String>,
        kind: impl Into<String>,
        dimension: Dimension,
        scale: f64,
    ) -> Self {
        Unit {
            symbol: symbol.into(),
            kind: kind.into(),
            dimension,
            scale,
        }
    }

    /// The scale-1 unit of a dimension, named by its composite SI symbol
    pub fn base(kind: impl Into<String>, dimension: Dimension) -> Self {
        Unit::new(dimension.symbol(), kind, dimension, 1.0)
    }

    /// Unit of pure numbers
    pub fn dimensionless() -> Self {
        Unit::new("", "", Dimension::DIMENSIONLESS, 1.0)
    }

    /// Check if this is the base unit of its dimension
    pub fn is_base(&self) -> bool {
        self.scale == 1.0
    }

    /// Check if two units are dimensionally compatible (can be converted)
    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.dimension == other.dimension
    }

    /// Convert a value in this unit to the base unit
    pub fn to_base(&self, value: f64) -> f64 {
        value * self.scale
    }

    /// Convert a value in the base unit to this unit
    pub fn from_base(&self, value: f64) -> f64 {
        value / self.scale
    }

    /// Convert a value from this unit to another unit
    pub fn convert_to(&self, value: f64, target: &Unit) -> Result<f64, Error> {
        if !self.is_compatible(target) {
            return Err(Error::IncompatibleDimensions {
                left: format!("{} ({})", self.symbol, self.dimension),
                right: format!("{} ({})", target.symbol, target.dimension),
            });
        }
        Ok(target.from_base(self.to_base(value)))
    }

    /// Multiply two units (e.g., N * m -> N*m), `None` if an exponent overflows
    pub fn multiply(&self, other: &Unit) -> Option<Unit> {
        Some(Unit {
            symbol: format!("{}*{}", self.symbol, other.symbol),
            kind: String::new(),
            dimension: self.dimension.checked_multiply(&other.dimension)?,
            scale: self.scale * other.scale,
        })
    }

    /// Divide two units (e.g., m / s -> m/s), `None` if an exponent overflows
    pub fn divide(&self, other: &Unit) -> Option<Unit> {
        Some(Unit {
            symbol: format!("{}/{}", self.symbol, other.symbol),
            kind: String::new(),
            dimension: self.dimension.checked_divide(&other.dimension)?,
            scale: self.scale / other.scale,
        })
    }

    /// Raise unit to a power (e.g., m^2, s^-1), `None` if an exponent overflows
    pub fn power(&self, exp: i32) -> Option<Unit> {
        let symbol = if exp == 1 {
            self.symbol.clone()
        } else {
            format!("{}^{}", self.symbol, exp)
        };

        Some(Unit {
            symbol,
            kind: String::new(),
            dimension: self.dimension.checked_power(exp)?,
            scale: self.scale.powi(exp),
        })
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// Declarative unit metadata attached to a kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitDef {
    pub symbol: &'static str,
    pub scale: f64,
    /// The unit used when no unit is written or requested
    pub is_default: bool,
}

impl UnitDef {
    pub const fn new(symbol: &'static str, scale: f64) -> Self {
        UnitDef {
            symbol,
            scale,
            is_default: false,
        }
    }

    pub const fn default_unit(symbol: &'static str, scale: f64) -> Self {
        UnitDef {
            symbol,
            scale,
            is_default: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meter() -> Unit {
        Unit::new("m", "Length", Dimension::LENGTH, 1.0)
    }

    fn kilometer() -> Unit {
        Unit::new("km", "Length", Dimension::LENGTH, 1000.0)
    }

    fn second() -> Unit {
        Unit::new("s", "Time", Dimension::TIME, 1.0)
    }

    #[test]
    fn test_base_unit() {
        assert!(meter().is_base());
        assert!(!kilometer().is_base());
        assert_eq!(Unit::base("Force", Dimension::FORCE).symbol, "kg*m/s^2");
    }

    #[test]
    fn test_compatible_units() {
        assert!(meter().is_compatible(&kilometer()));
        assert!(!meter().is_compatible(&second()));
    }

    #[test]
    fn test_to_and_from_base() {
        let km = kilometer();
        assert_eq!(km.to_base(5.0), 5000.0);
        assert_eq!(km.from_base(5000.0), 5.0);
    }

    #[test]
    fn test_unit_conversion() {
        assert_eq!(meter().convert_to(5000.0, &kilometer()).unwrap(), 5.0);
        assert!(matches!(
            meter().convert_to(1.0, &second()),
            Err(Error::IncompatibleDimensions { .. })
        ));
    }

    #[test]
    fn test_unit_power() {
        let m2 = meter().power(2).unwrap();
        assert_eq!(m2.symbol, "m^2");
        assert_eq!(m2.dimension, Dimension::AREA);
        assert_eq!(kilometer().power(2).unwrap().scale, 1e6);
        assert!(meter().power(2).unwrap().power(i32::MAX).is_none());
    }

    #[test]
    fn test_unit_divide_and_multiply() {
        let velocity = kilometer().divide(&second()).unwrap();
        assert_eq!(velocity.symbol, "km/s");
        assert_eq!(velocity.dimension, Dimension::VELOCITY);
        assert_eq!(velocity.scale, 1000.0);

        let area = meter().multiply(&kilometer()).unwrap();
        assert_eq!(area.dimension, Dimension::AREA);
        assert_eq!(area.symbol, "m*km");
    }
}
