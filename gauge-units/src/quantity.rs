//! Typed quantities - a value of one kind, stored in the kind's base unit

use crate::kinds::Kind;
use crate::registry::{with_default_registry, with_default_registry_mut, UnitRegistry};
use crate::{DynamicQuantity, Unit};
use gauge_core::{Culture, Error, Result};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::str::FromStr;
use tracing::warn;

/// A value of kind `K` in the kind's base unit
///
/// Text conversion (`Display`, `FromStr`, serde) goes through the
/// process-wide registry. Serde always uses the invariant culture.
pub struct Quantity<K: Kind> {
    value: f64,
    kind: PhantomData<K>,
}

/// Run `f` against the process-wide registry, registering `K` first if needed
fn with_kind<K: Kind, R>(f: impl FnOnce(&UnitRegistry) -> R) -> R {
    if !with_default_registry(|registry| registry.contains_kind(K::NAME)) {
        with_default_registry_mut(|registry| {
            if let Err(err) = registry.register::<K>() {
                warn!(kind = K::NAME, error = %err, "could not register kind");
            }
        });
    }
    with_default_registry(f)
}

impl<K: Kind> Quantity<K> {
    pub const ZERO: Self = Self::new(0.0);

    /// Quantity from a value in the base unit
    pub const fn new(value: f64) -> Self {
        Quantity {
            value,
            kind: PhantomData,
        }
    }

    /// Value in the base unit
    pub fn value(self) -> f64 {
        self.value
    }

    /// Quantity from a value in `unit`, which must have this kind's dimension
    pub fn from_unit(value: f64, unit: &Unit) -> Result<Self> {
        check_dimension::<K>(unit)?;
        Ok(Self::new(unit.to_base(value)))
    }

    /// Quantity from a value in the unit registered as `symbol`
    pub fn from_symbol(value: f64, symbol: &str) -> Result<Self> {
        let unit = Self::unit(symbol)?;
        Ok(Self::new(unit.to_base(value)))
    }

    /// Value expressed in the unit registered as `symbol`
    pub fn as_unit(self, symbol: &str) -> Result<f64> {
        Ok(Self::unit(symbol)?.from_base(self.value))
    }

    /// Value expressed in `unit`, which must have this kind's dimension
    pub fn in_unit(self, unit: &Unit) -> Result<f64> {
        check_dimension::<K>(unit)?;
        Ok(unit.from_base(self.value))
    }

    fn unit(symbol: &str) -> Result<Unit> {
        with_kind::<K, _>(|registry| registry.try_get_unit(K::NAME, symbol))
            .ok_or_else(|| Error::unknown_unit(symbol, symbol, K::NAME))
    }

    pub fn abs(self) -> Self {
        Self::new(self.value.abs())
    }

    pub fn min(self, other: Self) -> Self {
        Self::new(self.value.min(other.value))
    }

    pub fn max(self, other: Self) -> Self {
        Self::new(self.value.max(other.value))
    }

    pub fn is_nan(self) -> bool {
        self.value.is_nan()
    }

    pub fn is_finite(self) -> bool {
        self.value.is_finite()
    }

    /// Parse with the current culture
    pub fn parse(input: &str) -> Result<Self> {
        Self::parse_in(input, &Culture::current())
    }

    pub fn parse_in(input: &str, culture: &Culture) -> Result<Self> {
        with_kind::<K, _>(|registry| registry.parse_in(input, culture))
    }

    pub fn try_parse(input: &str) -> Option<Self> {
        Self::parse(input).ok()
    }

    /// Replace the value with `input` parsed in the current culture
    ///
    /// On error the value is left unchanged.
    pub fn set_from_str(&mut self, input: &str) -> Result<()> {
        *self = Self::parse(input)?;
        Ok(())
    }

    /// Format with the current culture; see [`crate::format_value`]
    pub fn format(self, format: Option<&str>) -> Result<String> {
        self.format_in(format, &Culture::current())
    }

    pub fn format_in(self, format: Option<&str>, culture: &Culture) -> Result<String> {
        with_kind::<K, _>(|registry| registry.format_in(self, format, culture))
    }

    pub fn to_dynamic(self) -> DynamicQuantity {
        DynamicQuantity::new(self.value, K::DIMENSION)
    }
}

fn check_dimension<K: Kind>(unit: &Unit) -> Result<()> {
    if unit.dimension != K::DIMENSION {
        return Err(Error::IncompatibleDimensions {
            left: format!("{} ({})", K::NAME, K::DIMENSION),
            right: format!("{} ({})", unit.symbol, unit.dimension),
        });
    }
    Ok(())
}

impl<K: Kind> Clone for Quantity<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: Kind> Copy for Quantity<K> {}

impl<K: Kind> Default for Quantity<K> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<K: Kind> fmt::Debug for Quantity<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", K::NAME, self.value)
    }
}

impl<K: Kind> fmt::Display for Quantity<K> {
    /// Default unit and current culture; a precision (`{:.2}`) selects fixed-point
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numeric = f.precision().map(|p| format!("F{}", p));
        let text = self.format(numeric.as_deref()).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl<K: Kind> FromStr for Quantity<K> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl<K: Kind> PartialEq for Quantity<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<K: Kind> PartialOrd for Quantity<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<K: Kind> Add for Quantity<K> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.value + rhs.value)
    }
}

impl<K: Kind> Sub for Quantity<K> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.value - rhs.value)
    }
}

impl<K: Kind> Neg for Quantity<K> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.value)
    }
}

impl<K: Kind> Mul<f64> for Quantity<K> {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.value * rhs)
    }
}

impl<K: Kind> Mul<Quantity<K>> for f64 {
    type Output = Quantity<K>;

    fn mul(self, rhs: Quantity<K>) -> Quantity<K> {
        Quantity::new(self * rhs.value)
    }
}

impl<K: Kind> Div<f64> for Quantity<K> {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.value / rhs)
    }
}

/// Ratio of two quantities of the same kind
impl<K: Kind> Div for Quantity<K> {
    type Output = f64;

    fn div(self, rhs: Self) -> f64 {
        self.value / rhs.value
    }
}

impl<K: Kind> AddAssign for Quantity<K> {
    fn add_assign(&mut self, rhs: Self) {
        self.value += rhs.value;
    }
}

impl<K: Kind> SubAssign for Quantity<K> {
    fn sub_assign(&mut self, rhs: Self) {
        self.value -= rhs.value;
    }
}

impl<K: Kind> MulAssign<f64> for Quantity<K> {
    fn mul_assign(&mut self, rhs: f64) {
        self.value *= rhs;
    }
}

impl<K: Kind> DivAssign<f64> for Quantity<K> {
    fn div_assign(&mut self, rhs: f64) {
        self.value /= rhs;
    }
}

impl<K: Kind> Sum for Quantity<K> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a, K: Kind> Sum<&'a Quantity<K>> for Quantity<K> {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl<K: Kind> Serialize for Quantity<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let text = self
            .format_in(None, &Culture::invariant())
            .map_err(<S::Error as serde::ser::Error>::custom)?;
        serializer.serialize_str(&text)
    }
}

impl<'de, K: Kind> Deserialize<'de> for Quantity<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct QuantityVisitor<K>(PhantomData<K>);

        impl<K: Kind> Visitor<'_> for QuantityVisitor<K> {
            type Value = Quantity<K>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a {} quantity such as \"1.5 m\", or a number in the base unit", K::NAME)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
                Quantity::parse_in(v, &Culture::invariant()).map_err(E::custom)
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
                Ok(Quantity::new(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
                Ok(Quantity::new(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
                Ok(Quantity::new(v as f64))
            }
        }

        deserializer.deserialize_any(QuantityVisitor(PhantomData))
    }
}
