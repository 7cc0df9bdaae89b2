//! Quantities whose dimension is only known at runtime

use crate::format::format_dynamic;
use crate::kinds::Kind;
use crate::parse::parse_dynamic;
use crate::registry::with_default_registry;
use crate::{Dimension, Quantity, Unit, UnitRegistry};
use gauge_core::{Culture, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Div, Mul, Neg};

/// A value in SI base units with its dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicQuantity {
    value: f64,
    dimension: Dimension,
}

impl DynamicQuantity {
    pub fn new(value: f64, dimension: Dimension) -> Self {
        DynamicQuantity { value, dimension }
    }

    /// Create a dimensionless quantity (pure number)
    pub fn dimensionless(value: f64) -> Self {
        Self::new(value, Dimension::DIMENSIONLESS)
    }

    /// A value given in `unit`
    pub fn from_unit(value: f64, unit: &Unit) -> Self {
        Self::new(unit.to_base(value), unit.dimension)
    }

    /// Value in SI base units
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dimension.is_dimensionless()
    }

    /// Value expressed in `unit`, which must have the same dimension
    pub fn in_unit(&self, unit: &Unit) -> Result<f64> {
        self.check_dimension(unit.dimension, &unit.symbol)?;
        Ok(unit.from_base(self.value))
    }

    fn check_dimension(&self, other: Dimension, label: &str) -> Result<()> {
        if self.dimension != other {
            return Err(Error::IncompatibleDimensions {
                left: self.dimension.to_string(),
                right: format!("{} ({})", label, other),
            });
        }
        Ok(())
    }

    /// Add two quantities (must have the same dimension)
    pub fn checked_add(&self, other: &DynamicQuantity) -> Result<DynamicQuantity> {
        self.check_dimension(other.dimension, "right operand")?;
        Ok(Self::new(self.value + other.value, self.dimension))
    }

    /// Subtract two quantities (must have the same dimension)
    pub fn checked_sub(&self, other: &DynamicQuantity) -> Result<DynamicQuantity> {
        self.check_dimension(other.dimension, "right operand")?;
        Ok(Self::new(self.value - other.value, self.dimension))
    }

    /// Raise quantity to an integer power
    pub fn powi(&self, exp: i32) -> DynamicQuantity {
        Self::new(self.value.powi(exp), self.dimension.power(exp))
    }

    /// Take the square root (dimension exponents must be even)
    pub fn sqrt(&self) -> Result<DynamicQuantity> {
        let dimension = self
            .dimension
            .sqrt()
            .ok_or_else(|| Error::IncompatibleDimensions {
                left: self.dimension.to_string(),
                right: "square root".to_string(),
            })?;
        Ok(Self::new(self.value.sqrt(), dimension))
    }

    /// Convert to a typed quantity of kind `K`, checking the dimension
    pub fn try_into_kind<K: Kind>(self) -> Result<Quantity<K>> {
        self.check_dimension(K::DIMENSION, K::NAME)?;
        Ok(Quantity::new(self.value))
    }

    /// Parse "3 kg*m/s^2", resolving the unit against every kind of `registry`
    pub fn parse(input: &str, registry: &UnitRegistry, culture: &Culture) -> Result<Self> {
        let (value, dimension) = parse_dynamic(registry, input, culture)?;
        Ok(Self::new(value, dimension))
    }

    /// Format in the display unit of the dimension, or a `[unit]` directive
    pub fn format(
        &self,
        format: Option<&str>,
        registry: &UnitRegistry,
        culture: &Culture,
    ) -> Result<String> {
        format_dynamic(registry, self.value, self.dimension, format, culture)
    }

    /// Unit used to display this quantity when no unit is requested
    pub fn display_unit(&self, registry: &UnitRegistry) -> Unit {
        registry.display_unit(self.dimension)
    }
}

impl<K: Kind> From<Quantity<K>> for DynamicQuantity {
    fn from(quantity: Quantity<K>) -> Self {
        quantity.to_dynamic()
    }
}

impl Mul for DynamicQuantity {
    type Output = DynamicQuantity;

    fn mul(self, rhs: DynamicQuantity) -> DynamicQuantity {
        Self::new(self.value * rhs.value, self.dimension.multiply(&rhs.dimension))
    }
}

impl Div for DynamicQuantity {
    type Output = DynamicQuantity;

    fn div(self, rhs: DynamicQuantity) -> DynamicQuantity {
        Self::new(self.value / rhs.value, self.dimension.divide(&rhs.dimension))
    }
}

impl Mul<f64> for DynamicQuantity {
    type Output = DynamicQuantity;

    fn mul(self, rhs: f64) -> DynamicQuantity {
        Self::new(self.value * rhs, self.dimension)
    }
}

impl Div<f64> for DynamicQuantity {
    type Output = DynamicQuantity;

    fn div(self, rhs: f64) -> DynamicQuantity {
        Self::new(self.value / rhs, self.dimension)
    }
}

impl Neg for DynamicQuantity {
    type Output = DynamicQuantity;

    fn neg(self) -> DynamicQuantity {
        Self::new(-self.value, self.dimension)
    }
}

impl fmt::Display for DynamicQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = with_default_registry(|registry| {
            self.format(None, registry, &Culture::current())
        })
        .map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{Energy, Length, Torque};

    fn registry() -> UnitRegistry {
        UnitRegistry::builtin(Culture::invariant())
    }

    #[test]
    fn test_mul_div() {
        let m = DynamicQuantity::new(2.0, Dimension::MASS);
        let a = DynamicQuantity::new(3.0, Dimension::ACCELERATION);
        let f = m * a;
        assert_eq!(f.value(), 6.0);
        assert_eq!(f.dimension(), Dimension::FORCE);
        assert_eq!((f / a).dimension(), Dimension::MASS);
        assert_eq!((f * 2.0).value(), 12.0);
        assert_eq!((f / 2.0).value(), 3.0);
        assert_eq!((-f).value(), -6.0);
    }

    #[test]
    fn test_checked_add() {
        let a = DynamicQuantity::new(1.0, Dimension::LENGTH);
        let b = DynamicQuantity::new(2.0, Dimension::LENGTH);
        assert_eq!(a.checked_add(&b).unwrap().value(), 3.0);
        assert_eq!(a.checked_sub(&b).unwrap().value(), -1.0);
        let t = DynamicQuantity::new(1.0, Dimension::TIME);
        assert!(matches!(
            a.checked_add(&t),
            Err(Error::IncompatibleDimensions { .. })
        ));
    }

    #[test]
    fn test_pow_and_sqrt() {
        let l = DynamicQuantity::new(3.0, Dimension::LENGTH);
        let area = l.powi(2);
        assert_eq!(area.value(), 9.0);
        assert_eq!(area.dimension(), Dimension::AREA);
        assert_eq!(area.sqrt().unwrap(), l);
        assert!(l.sqrt().is_err());
        assert!(l.powi(0).is_dimensionless());
    }

    #[test]
    fn test_try_into_kind() {
        let e = DynamicQuantity::new(5.0, Dimension::ENERGY);
        assert_eq!(e.try_into_kind::<Energy>().unwrap().value(), 5.0);
        // Torque shares the dimension
        assert_eq!(e.try_into_kind::<Torque>().unwrap().value(), 5.0);
        assert!(e.try_into_kind::<Length>().is_err());
    }

    #[test]
    fn test_parse_and_format() {
        let r = registry();
        let c = Culture::invariant();
        let f = DynamicQuantity::parse("10 kg*m/s^2", &r, &c).unwrap();
        assert_eq!(f.dimension(), Dimension::FORCE);
        assert_eq!(f.format(None, &r, &c).unwrap(), "10 N");

        let inverse = DynamicQuantity::new(4.0, Dimension::FREQUENCY);
        assert_eq!(inverse.format(Some("0 [s^-1]"), &r, &c).unwrap(), "4 s^-1");

        let jerk = DynamicQuantity::new(1.5, Dimension::new([1, 0, -3, 0, 0, 0, 0]));
        assert_eq!(jerk.format(None, &r, &c).unwrap(), "1.5 m/s^3");
        assert_eq!(jerk.display_unit(&r).symbol, "m/s^3");
    }

    #[test]
    fn test_display_dimensionless() {
        assert_eq!(DynamicQuantity::dimensionless(0.5).to_string(), "0.5");
    }

    #[test]
    fn test_serde() {
        let q = DynamicQuantity::new(2.0, Dimension::VELOCITY);
        let json = serde_json::to_string(&q).unwrap();
        assert_eq!(json, r#"{"value":2.0,"dimension":[1,0,-1,0,0,0,0]}"#);
        let back: DynamicQuantity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
    }
}
