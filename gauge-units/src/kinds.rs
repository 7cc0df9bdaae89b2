//! Built-in quantity kinds and their units
//!
//! Every kind is a zero-sized marker type carrying its name, dimension and
//! unit table as associated constants. `builtin_kinds` lists them in
//! registration order: when two kinds share a dimension (Energy and Torque,
//! Fraction and Angle) the earlier one is used for display.

use crate::{Dimension, UnitDef};
use std::f64::consts::PI;
use std::fmt;
use std::hash::Hash;

/// A quantity kind: a named dimension with a table of units
pub trait Kind: Copy + Default + fmt::Debug + Eq + Hash + Send + Sync + 'static {
    /// Registry name of the kind
    const NAME: &'static str;
    const DIMENSION: Dimension;
    const UNITS: &'static [UnitDef];

    fn descriptor() -> KindDescriptor {
        KindDescriptor {
            name: Self::NAME,
            dimension: Self::DIMENSION,
            units: Self::UNITS,
        }
    }
}

/// Unit metadata of one kind, ready to register
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindDescriptor {
    pub name: &'static str,
    pub dimension: Dimension,
    pub units: &'static [UnitDef],
}

macro_rules! kind {
    ($(#[$meta:meta])* $name:ident, $dimension:expr, [$($unit:expr),* $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl Kind for $name {
            const NAME: &'static str = stringify!($name);
            const DIMENSION: Dimension = $dimension;
            const UNITS: &'static [UnitDef] = &[$($unit),*];
        }
    };
}

kind!(
    /// Dimensionless ratio, shown without a symbol by default
    Fraction,
    Dimension::DIMENSIONLESS,
    [
        UnitDef::default_unit("", 1.0),
        UnitDef::new("%", 0.01),
        UnitDef::new("‰", 0.001),
        UnitDef::new("ppm", 1e-6),
    ]
);

kind!(
    /// Plane angle, base unit radian
    Angle,
    Dimension::DIMENSIONLESS,
    [
        UnitDef::default_unit("rad", 1.0),
        UnitDef::new("mrad", 1e-3),
        UnitDef::new("°", PI / 180.0),
        UnitDef::new("deg", PI / 180.0),
        UnitDef::new("rev", 2.0 * PI),
    ]
);

kind!(
    Length,
    Dimension::LENGTH,
    [
        UnitDef::default_unit("m", 1.0),
        UnitDef::new("km", 1000.0),
        UnitDef::new("dm", 0.1),
        UnitDef::new("cm", 0.01),
        UnitDef::new("mm", 0.001),
        UnitDef::new("µm", 1e-6),
        UnitDef::new("nm", 1e-9),
        UnitDef::new("in", 0.0254),
        UnitDef::new("ft", 0.3048),
        UnitDef::new("yd", 0.9144),
        UnitDef::new("mi", 1609.344),
        UnitDef::new("nmi", 1852.0),
    ]
);

kind!(
    Mass,
    Dimension::MASS,
    [
        UnitDef::default_unit("kg", 1.0),
        UnitDef::new("g", 0.001),
        UnitDef::new("mg", 1e-6),
        UnitDef::new("µg", 1e-9),
        UnitDef::new("t", 1000.0),
        UnitDef::new("lb", 0.45359237),
        UnitDef::new("oz", 0.028349523125),
    ]
);

kind!(
    Time,
    Dimension::TIME,
    [
        UnitDef::default_unit("s", 1.0),
        UnitDef::new("ms", 1e-3),
        UnitDef::new("µs", 1e-6),
        UnitDef::new("ns", 1e-9),
        UnitDef::new("min", 60.0),
        UnitDef::new("h", 3600.0),
        UnitDef::new("d", 86400.0),
    ]
);

kind!(
    Area,
    Dimension::AREA,
    [
        UnitDef::default_unit("m^2", 1.0),
        UnitDef::new("mm^2", 1e-6),
        UnitDef::new("cm^2", 1e-4),
        UnitDef::new("dm^2", 1e-2),
        UnitDef::new("km^2", 1e6),
        UnitDef::new("ha", 1e4),
        UnitDef::new("in^2", 0.00064516),
        UnitDef::new("ft^2", 0.09290304),
    ]
);

kind!(
    Volume,
    Dimension::VOLUME,
    [
        UnitDef::default_unit("m^3", 1.0),
        UnitDef::new("mm^3", 1e-9),
        UnitDef::new("cm^3", 1e-6),
        UnitDef::new("dm^3", 1e-3),
        UnitDef::new("L", 1e-3),
        UnitDef::new("l", 1e-3),
        UnitDef::new("ml", 1e-6),
        UnitDef::new("in^3", 1.6387064e-5),
        UnitDef::new("ft^3", 0.028316846592),
    ]
);

kind!(
    Velocity,
    Dimension::VELOCITY,
    [
        UnitDef::default_unit("m/s", 1.0),
        UnitDef::new("km/h", 1000.0 / 3600.0),
        UnitDef::new("mm/s", 1e-3),
        UnitDef::new("km/s", 1000.0),
        UnitDef::new("mi/h", 0.44704),
        UnitDef::new("mph", 0.44704),
        UnitDef::new("ft/s", 0.3048),
        UnitDef::new("kn", 1852.0 / 3600.0),
    ]
);

kind!(
    Acceleration,
    Dimension::ACCELERATION,
    [
        UnitDef::default_unit("m/s^2", 1.0),
        UnitDef::new("mm/s^2", 1e-3),
        UnitDef::new("cm/s^2", 1e-2),
        UnitDef::new("g0", 9.80665),
    ]
);

kind!(
    Density,
    Dimension::DENSITY,
    [
        UnitDef::default_unit("kg/m^3", 1.0),
        UnitDef::new("kg/dm^3", 1000.0),
        UnitDef::new("g/cm^3", 1000.0),
        UnitDef::new("g/m^3", 1e-3),
        UnitDef::new("kg/L", 1000.0),
    ]
);

kind!(
    Force,
    Dimension::FORCE,
    [
        UnitDef::default_unit("N", 1.0),
        UnitDef::new("mN", 1e-3),
        UnitDef::new("kN", 1e3),
        UnitDef::new("MN", 1e6),
        UnitDef::new("lbf", 4.4482216152605),
    ]
);

kind!(
    Pressure,
    Dimension::PRESSURE,
    [
        UnitDef::default_unit("Pa", 1.0),
        UnitDef::new("kPa", 1e3),
        UnitDef::new("MPa", 1e6),
        UnitDef::new("GPa", 1e9),
        UnitDef::new("bar", 1e5),
        UnitDef::new("mbar", 100.0),
        UnitDef::new("psi", 6894.757293168361),
        UnitDef::new("atm", 101325.0),
    ]
);

kind!(
    Energy,
    Dimension::ENERGY,
    [
        UnitDef::default_unit("J", 1.0),
        UnitDef::new("kJ", 1e3),
        UnitDef::new("MJ", 1e6),
        UnitDef::new("GJ", 1e9),
        UnitDef::new("Wh", 3600.0),
        UnitDef::new("kWh", 3.6e6),
        UnitDef::new("cal", 4.184),
        UnitDef::new("kcal", 4184.0),
        UnitDef::new("eV", 1.602176634e-19),
    ]
);

kind!(
    /// Same dimension as energy
    Torque,
    Dimension::ENERGY,
    [
        UnitDef::default_unit("N*m", 1.0),
        UnitDef::new("N·m", 1.0),
        UnitDef::new("kN*m", 1e3),
        UnitDef::new("N*mm", 1e-3),
    ]
);

kind!(
    Power,
    Dimension::POWER,
    [
        UnitDef::default_unit("W", 1.0),
        UnitDef::new("mW", 1e-3),
        UnitDef::new("kW", 1e3),
        UnitDef::new("MW", 1e6),
        UnitDef::new("GW", 1e9),
        UnitDef::new("hp", 745.69987158227022),
    ]
);

kind!(
    Frequency,
    Dimension::FREQUENCY,
    [
        UnitDef::default_unit("Hz", 1.0),
        UnitDef::new("kHz", 1e3),
        UnitDef::new("MHz", 1e6),
        UnitDef::new("GHz", 1e9),
        UnitDef::new("s^-1", 1.0),
        UnitDef::new("rpm", 1.0 / 60.0),
    ]
);

kind!(
    /// Thermodynamic temperature, base unit kelvin
    Temperature,
    Dimension::TEMPERATURE,
    [UnitDef::default_unit("K", 1.0), UnitDef::new("mK", 1e-3)]
);

kind!(
    Current,
    Dimension::CURRENT,
    [
        UnitDef::default_unit("A", 1.0),
        UnitDef::new("mA", 1e-3),
        UnitDef::new("µA", 1e-6),
        UnitDef::new("kA", 1e3),
    ]
);

kind!(
    Voltage,
    Dimension::VOLTAGE,
    [
        UnitDef::default_unit("V", 1.0),
        UnitDef::new("mV", 1e-3),
        UnitDef::new("µV", 1e-6),
        UnitDef::new("kV", 1e3),
    ]
);

kind!(
    Resistance,
    Dimension::RESISTANCE,
    [
        UnitDef::default_unit("Ω", 1.0),
        UnitDef::new("ohm", 1.0),
        UnitDef::new("mΩ", 1e-3),
        UnitDef::new("kΩ", 1e3),
        UnitDef::new("MΩ", 1e6),
    ]
);

kind!(
    Charge,
    Dimension::CHARGE,
    [
        UnitDef::default_unit("C", 1.0),
        UnitDef::new("mC", 1e-3),
        UnitDef::new("A*h", 3600.0),
        UnitDef::new("mAh", 3.6),
    ]
);

kind!(
    AmountOfSubstance,
    Dimension::AMOUNT,
    [
        UnitDef::default_unit("mol", 1.0),
        UnitDef::new("mmol", 1e-3),
        UnitDef::new("kmol", 1e3),
    ]
);

kind!(
    LuminousIntensity,
    Dimension::LUMINOSITY,
    [UnitDef::default_unit("cd", 1.0)]
);

/// Every built-in kind, in registration order
pub fn builtin_kinds() -> Vec<KindDescriptor> {
    vec![
        Fraction::descriptor(),
        Angle::descriptor(),
        Length::descriptor(),
        Mass::descriptor(),
        Time::descriptor(),
        Area::descriptor(),
        Volume::descriptor(),
        Velocity::descriptor(),
        Acceleration::descriptor(),
        Density::descriptor(),
        Force::descriptor(),
        Pressure::descriptor(),
        Energy::descriptor(),
        Torque::descriptor(),
        Power::descriptor(),
        Frequency::descriptor(),
        Temperature::descriptor(),
        Current::descriptor(),
        Voltage::descriptor(),
        Resistance::descriptor(),
        Charge::descriptor(),
        AmountOfSubstance::descriptor(),
        LuminousIntensity::descriptor(),
    ]
}
