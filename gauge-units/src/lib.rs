//! Gauge Units - Typed physical quantities
//!
//! Every kind of quantity (Length, Velocity, Density, ...) is a marker type
//! with a table of units. Values are stored in the kind's base unit.
//! Text goes through a [`UnitRegistry`]:
//!
//! - parsing splits "1 100,5 km/h" into number and unit, reads the number
//!   with the active [`Culture`] and scales it by the unit
//! - formatting takes a numeric format with an optional unit directive:
//!   `"0.00 [km]"`, `"0.0[!km/h] kmph"`, `"# ### []"`
//!
//! Kinds:
//! - Fraction (%, ‰, ppm), Angle (rad, °)
//! - Length (m, km, in, mi), Mass (kg, g, lb), Time (s, min, h)
//! - Area (m^2, ha), Volume (m^3, L), Velocity (m/s, km/h), Acceleration
//! - Density (kg/m^3, kg/dm^3), Force (N), Pressure (Pa, bar, psi)
//! - Energy (J, kWh, cal), Torque (N*m), Power (W, hp), Frequency (Hz, rpm)
//! - Temperature (K), Current (A), Voltage (V), Resistance (Ω), Charge (C, mAh)
//! - AmountOfSubstance (mol), LuminousIntensity (cd)
//!
//! [`DynamicQuantity`] carries its dimension at runtime and resolves
//! composite symbols such as "kg*m/s^2".

mod config;
mod dimension;
mod dynamic;
mod format;
pub mod kinds;
mod parse;
mod quantity;
mod registry;
pub mod relations;
mod split;
mod unit;

pub use config::{KindConfig, UnitConfig, UnitsConfig, CONFIG_ENV, CULTURE_ENV};
pub use dimension::Dimension;
pub use dynamic::DynamicQuantity;
pub use format::{format_dynamic, format_value, QuantityFormat, UnitDirective};
pub use kinds::{builtin_kinds, Kind, KindDescriptor};
pub use parse::{parse_dynamic, parse_unit, parse_value};
pub use quantity::Quantity;
pub use registry::{
    scoped_global_default_unit, with_default_registry, with_default_registry_mut,
    DefaultUnitGuard, GlobalDefaultUnitGuard, UnitRegistry,
};
pub use split::{split, Split};
pub use unit::{Unit, UnitDef};

pub use gauge_core::{Culture, CultureGuard, Error, Result};
