//! Dimensional analysis types
//!
//! Each physical quantity has dimensions represented as a 7-element vector:
//! [length, mass, time, current, temperature, amount, luminosity]

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dimension indices for the 7 SI base quantities
pub const LENGTH: usize = 0;
pub const MASS: usize = 1;
pub const TIME: usize = 2;
pub const CURRENT: usize = 3;
pub const TEMPERATURE: usize = 4;
pub const AMOUNT: usize = 5;
pub const LUMINOSITY: usize = 6;

/// Base dimensions in the order composite symbols list them, with their SI symbols
const SYMBOL_ORDER: [(usize, &str); 7] = [
    (MASS, "kg"),
    (LENGTH, "m"),
    (TIME, "s"),
    (CURRENT, "A"),
    (TEMPERATURE, "K"),
    (AMOUNT, "mol"),
    (LUMINOSITY, "cd"),
];

/// Represents the dimensions of a physical quantity
/// as exponents of the 7 SI base dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dimension {
    /// [length, mass, time, current, temperature, amount, luminosity]
    pub exponents: [i32; 7],
}

impl Dimension {
    /// Dimensionless quantity (all exponents zero)
    pub const DIMENSIONLESS: Dimension = Dimension::new([0, 0, 0, 0, 0, 0, 0]);

    /// Length dimension [L]
    pub const LENGTH: Dimension = Dimension::new([1, 0, 0, 0, 0, 0, 0]);

    /// Mass dimension [M]
    pub const MASS: Dimension = Dimension::new([0, 1, 0, 0, 0, 0, 0]);

    /// Time dimension [T]
    pub const TIME: Dimension = Dimension::new([0, 0, 1, 0, 0, 0, 0]);

    /// Electric current dimension [I]
    pub const CURRENT: Dimension = Dimension::new([0, 0, 0, 1, 0, 0, 0]);

    /// Temperature dimension [Θ]
    pub const TEMPERATURE: Dimension = Dimension::new([0, 0, 0, 0, 1, 0, 0]);

    /// Amount of substance dimension [N]
    pub const AMOUNT: Dimension = Dimension::new([0, 0, 0, 0, 0, 1, 0]);

    /// Luminous intensity dimension [J]
    pub const LUMINOSITY: Dimension = Dimension::new([0, 0, 0, 0, 0, 0, 1]);

    /// Velocity [L T^-1]
    pub const VELOCITY: Dimension = Dimension::new([1, 0, -1, 0, 0, 0, 0]);

    /// Acceleration [L T^-2]
    pub const ACCELERATION: Dimension = Dimension::new([1, 0, -2, 0, 0, 0, 0]);

    /// Force [M L T^-2]
    pub const FORCE: Dimension = Dimension::new([1, 1, -2, 0, 0, 0, 0]);

    /// Energy and torque [M L^2 T^-2]
    pub const ENERGY: Dimension = Dimension::new([2, 1, -2, 0, 0, 0, 0]);

    /// Power [M L^2 T^-3]
    pub const POWER: Dimension = Dimension::new([2, 1, -3, 0, 0, 0, 0]);

    /// Pressure [M L^-1 T^-2]
    pub const PRESSURE: Dimension = Dimension::new([-1, 1, -2, 0, 0, 0, 0]);

    /// Density [M L^-3]
    pub const DENSITY: Dimension = Dimension::new([-3, 1, 0, 0, 0, 0, 0]);

    /// Area [L^2]
    pub const AREA: Dimension = Dimension::new([2, 0, 0, 0, 0, 0, 0]);

    /// Volume [L^3]
    pub const VOLUME: Dimension = Dimension::new([3, 0, 0, 0, 0, 0, 0]);

    /// Frequency [T^-1]
    pub const FREQUENCY: Dimension = Dimension::new([0, 0, -1, 0, 0, 0, 0]);

    /// Electric charge [I T]
    pub const CHARGE: Dimension = Dimension::new([0, 0, 1, 1, 0, 0, 0]);

    /// Voltage [M L^2 T^-3 I^-1]
    pub const VOLTAGE: Dimension = Dimension::new([2, 1, -3, -1, 0, 0, 0]);

    /// Resistance [M L^2 T^-3 I^-2]
    pub const RESISTANCE: Dimension = Dimension::new([2, 1, -3, -2, 0, 0, 0]);

    /// Create a new dimension from exponents
    pub const fn new(exponents: [i32; 7]) -> Self {
        Dimension { exponents }
    }

    /// Check if this is a dimensionless quantity
    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(|&e| e == 0)
    }

    /// Multiply dimensions (add exponents), saturating on overflow
    pub fn multiply(&self, other: &Dimension) -> Dimension {
        self.zip(other, i32::saturating_add)
    }

    /// Divide dimensions (subtract exponents), saturating on overflow
    pub fn divide(&self, other: &Dimension) -> Dimension {
        self.zip(other, i32::saturating_sub)
    }

    /// Raise to integer power (multiply exponents), saturating on overflow
    pub fn power(&self, exp: i32) -> Dimension {
        Dimension {
            exponents: self.exponents.map(|e| e.saturating_mul(exp)),
        }
    }

    /// Multiply dimensions, `None` if an exponent overflows
    pub fn checked_multiply(&self, other: &Dimension) -> Option<Dimension> {
        self.try_zip(other, i32::checked_add)
    }

    /// Divide dimensions, `None` if an exponent overflows
    pub fn checked_divide(&self, other: &Dimension) -> Option<Dimension> {
        self.try_zip(other, i32::checked_sub)
    }

    /// Raise to integer power, `None` if an exponent overflows
    pub fn checked_power(&self, exp: i32) -> Option<Dimension> {
        let mut exponents = [0i32; 7];
        for (slot, e) in exponents.iter_mut().zip(self.exponents) {
            *slot = e.checked_mul(exp)?;
        }
        Some(Dimension { exponents })
    }

    fn zip(&self, other: &Dimension, op: impl Fn(i32, i32) -> i32) -> Dimension {
        let mut exponents = [0i32; 7];
        for (i, slot) in exponents.iter_mut().enumerate() {
            *slot = op(self.exponents[i], other.exponents[i]);
        }
        Dimension { exponents }
    }

    fn try_zip(
        &self,
        other: &Dimension,
        op: impl Fn(i32, i32) -> Option<i32>,
    ) -> Option<Dimension> {
        let mut exponents = [0i32; 7];
        for (i, slot) in exponents.iter_mut().enumerate() {
            *slot = op(self.exponents[i], other.exponents[i])?;
        }
        Some(Dimension { exponents })
    }

    /// Invert dimensions (negate exponents)
    pub fn invert(&self) -> Dimension {
        self.power(-1)
    }

    /// Halve every exponent, `None` if any of them is odd
    pub fn sqrt(&self) -> Option<Dimension> {
        if self.exponents.iter().any(|e| e % 2 != 0) {
            return None;
        }
        Some(Dimension {
            exponents: self.exponents.map(|e| e / 2),
        })
    }

    /// SI composite symbol, e.g. "kg*m/s^2" for force
    ///
    /// Factors are listed mass, length, time, current, temperature, amount,
    /// luminosity. Everything after the single '/' is the denominator. A
    /// dimension with only negative exponents uses negative powers ("s^-1"),
    /// and a dimensionless one gives the empty string.
    pub fn symbol(&self) -> String {
        let factor = |symbol: &str, exp: i64| {
            if exp == 1 {
                symbol.to_string()
            } else {
                format!("{}^{}", symbol, exp)
            }
        };

        let numerator: Vec<String> = SYMBOL_ORDER
            .iter()
            .filter(|(i, _)| self.exponents[*i] > 0)
            .map(|(i, s)| factor(s, i64::from(self.exponents[*i])))
            .collect();

        if numerator.is_empty() {
            let inverse: Vec<String> = SYMBOL_ORDER
                .iter()
                .filter(|(i, _)| self.exponents[*i] < 0)
                .map(|(i, s)| factor(s, i64::from(self.exponents[*i])))
                .collect();
            return inverse.join("*");
        }

        let denominator: Vec<String> = SYMBOL_ORDER
            .iter()
            .filter(|(i, _)| self.exponents[*i] < 0)
            .map(|(i, s)| factor(s, -i64::from(self.exponents[*i])))
            .collect();

        if denominator.is_empty() {
            numerator.join("*")
        } else {
            format!("{}/{}", numerator.join("*"), denominator.join("*"))
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = ["L", "M", "T", "I", "Θ", "N", "J"];
        let mut parts = Vec::new();

        for (i, &exp) in self.exponents.iter().enumerate() {
            if exp != 0 {
                if exp == 1 {
                    parts.push(names[i].to_string());
                } else {
                    parts.push(format!("{}^{}", names[i], exp));
                }
            }
        }

        if parts.is_empty() {
            write!(f, "1")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::DIMENSIONLESS
    }
}
