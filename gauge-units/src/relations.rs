//! Dimensionally checked products and quotients between kinds

use crate::kinds::{
    Acceleration, Area, Charge, Current, Density, Energy, Force, Frequency, Length, Mass, Power,
    Pressure, Resistance, Time, Torque, Velocity, Voltage, Volume,
};
use crate::Quantity;

pub fn velocity(distance: Quantity<Length>, duration: Quantity<Time>) -> Quantity<Velocity> {
    Quantity::new(distance.value() / duration.value())
}

pub fn acceleration(speed: Quantity<Velocity>, duration: Quantity<Time>) -> Quantity<Acceleration> {
    Quantity::new(speed.value() / duration.value())
}

pub fn area(a: Quantity<Length>, b: Quantity<Length>) -> Quantity<Area> {
    Quantity::new(a.value() * b.value())
}

pub fn volume(base: Quantity<Area>, height: Quantity<Length>) -> Quantity<Volume> {
    Quantity::new(base.value() * height.value())
}

pub fn density(mass: Quantity<Mass>, volume: Quantity<Volume>) -> Quantity<Density> {
    Quantity::new(mass.value() / volume.value())
}

/// Newton's second law
pub fn force(mass: Quantity<Mass>, acceleration: Quantity<Acceleration>) -> Quantity<Force> {
    Quantity::new(mass.value() * acceleration.value())
}

pub fn pressure(force: Quantity<Force>, area: Quantity<Area>) -> Quantity<Pressure> {
    Quantity::new(force.value() / area.value())
}

/// Work done by a force along a distance
pub fn work(force: Quantity<Force>, distance: Quantity<Length>) -> Quantity<Energy> {
    Quantity::new(force.value() * distance.value())
}

/// Torque of a force at a lever arm; same dimension as `work`, different kind
pub fn torque(force: Quantity<Force>, arm: Quantity<Length>) -> Quantity<Torque> {
    Quantity::new(force.value() * arm.value())
}

pub fn power(energy: Quantity<Energy>, duration: Quantity<Time>) -> Quantity<Power> {
    Quantity::new(energy.value() / duration.value())
}

pub fn frequency(period: Quantity<Time>) -> Quantity<Frequency> {
    Quantity::new(1.0 / period.value())
}

pub fn charge(current: Quantity<Current>, duration: Quantity<Time>) -> Quantity<Charge> {
    Quantity::new(current.value() * duration.value())
}

/// Ohm's law
pub fn voltage(current: Quantity<Current>, resistance: Quantity<Resistance>) -> Quantity<Voltage> {
    Quantity::new(current.value() * resistance.value())
}

pub fn electric_power(voltage: Quantity<Voltage>, current: Quantity<Current>) -> Quantity<Power> {
    Quantity::new(voltage.value() * current.value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::Kind;

    #[test]
    fn test_mechanics_chain() {
        let v = velocity(Quantity::new(100.0), Quantity::new(20.0));
        assert_eq!(v.value(), 5.0);
        let a = acceleration(v, Quantity::new(2.5));
        let f = force(Quantity::new(4.0), a);
        assert_eq!(f.value(), 8.0);
        let p = pressure(f, area(Quantity::new(2.0), Quantity::new(2.0)));
        assert_eq!(p.value(), 2.0);
        let e = work(f, Quantity::new(3.0));
        assert_eq!(power(e, Quantity::new(6.0)).value(), 4.0);
        assert_eq!(torque(f, Quantity::new(0.5)).value(), 4.0);
    }

    #[test]
    fn test_dimensions_agree_with_dynamic_arithmetic() {
        let l = Quantity::<Length>::new(2.0).to_dynamic();
        let t = Quantity::<Time>::new(4.0).to_dynamic();
        let v = velocity(Quantity::new(2.0), Quantity::new(4.0));
        assert_eq!((l / t).dimension(), Velocity::DIMENSION);
        assert_eq!(v.to_dynamic(), l / t);
    }

    #[test]
    fn test_electrical() {
        let i = Quantity::<Current>::new(2.0);
        let u = voltage(i, Quantity::new(5.0));
        assert_eq!(u.value(), 10.0);
        assert_eq!(electric_power(u, i).value(), 20.0);
        assert_eq!(charge(i, Quantity::new(3.0)).value(), 6.0);
        assert_eq!(frequency(Quantity::new(0.5)).value(), 2.0);
    }

    #[test]
    fn test_density_and_volume() {
        let v = volume(Quantity::new(0.5), Quantity::new(2.0));
        assert_eq!(density(Quantity::new(3.0), v).value(), 3.0);
    }
}
