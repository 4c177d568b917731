//! Physical parameters of the cart-pole rig.

use crate::error::PlantResult;
use cp_core::units::{Accel, Length, Mass, MomentOfInertia};
use cp_core::{ensure_non_negative, ensure_positive};
use serde::{Deserialize, Serialize};
use uom::si::acceleration::meter_per_second_squared;
use uom::si::length::meter;
use uom::si::mass::kilogram;
use uom::si::moment_of_inertia::kilogram_square_meter;

/// Immutable, validated plant parameters in SI base units.
///
/// Masses, pole length and gravity must be strictly positive. Friction
/// coefficients and the pole inertia may be zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicalParameters {
    cart_mass: f64,
    pole_mass: f64,
    pole_length: f64,
    cart_friction: f64,
    pivot_friction: f64,
    pole_inertia: f64,
    gravity: f64,
}

impl PhysicalParameters {
    /// Build and validate a parameter set.
    ///
    /// `cart_friction` is viscous friction on the cart in N·s/m and
    /// `pivot_friction` is viscous friction at the pivot in N·m·s/rad.
    /// `pole_length` is pivot to center of mass; `pole_inertia` is about the
    /// center of mass.
    pub fn new(
        cart_mass: Mass,
        pole_mass: Mass,
        pole_length: Length,
        cart_friction: f64,
        pivot_friction: f64,
        pole_inertia: MomentOfInertia,
        gravity: Accel,
    ) -> PlantResult<Self> {
        Ok(Self {
            cart_mass: ensure_positive(cart_mass.get::<kilogram>(), "cart mass")?,
            pole_mass: ensure_positive(pole_mass.get::<kilogram>(), "pole mass")?,
            pole_length: ensure_positive(pole_length.get::<meter>(), "pole length")?,
            cart_friction: ensure_non_negative(cart_friction, "cart friction")?,
            pivot_friction: ensure_non_negative(pivot_friction, "pivot friction")?,
            pole_inertia: ensure_non_negative(
                pole_inertia.get::<kilogram_square_meter>(),
                "pole inertia",
            )?,
            gravity: ensure_positive(gravity.get::<meter_per_second_squared>(), "gravity")?,
        })
    }

    /// Nominal rig: 0.5 kg cart, 0.2 kg pole at 0.5 m.
    pub fn nominal() -> Self {
        Self {
            cart_mass: 0.5,
            pole_mass: 0.2,
            pole_length: 0.5,
            cart_friction: 0.1,
            pivot_friction: 0.01,
            pole_inertia: 0.006,
            gravity: cp_core::units::constants::G_MPS2,
        }
    }

    /// Same parameters with both friction terms removed.
    pub fn frictionless(self) -> Self {
        Self {
            cart_friction: 0.0,
            pivot_friction: 0.0,
            ..self
        }
    }

    pub fn cart_mass(&self) -> f64 {
        self.cart_mass
    }

    pub fn pole_mass(&self) -> f64 {
        self.pole_mass
    }

    pub fn pole_length(&self) -> f64 {
        self.pole_length
    }

    pub fn cart_friction(&self) -> f64 {
        self.cart_friction
    }

    pub fn pivot_friction(&self) -> f64 {
        self.pivot_friction
    }

    pub fn pole_inertia(&self) -> f64 {
        self.pole_inertia
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Total translating mass `M + m`.
    pub fn total_mass(&self) -> f64 {
        self.cart_mass + self.pole_mass
    }

    /// Pole inertia about the pivot, `I + m l²`.
    pub fn pivot_inertia(&self) -> f64 {
        self.pole_inertia + self.pole_mass * self.pole_length * self.pole_length
    }

    /// Check a deserialized value, which bypasses `new`.
    pub fn validate(&self) -> PlantResult<()> {
        ensure_positive(self.cart_mass, "cart mass")?;
        ensure_positive(self.pole_mass, "pole mass")?;
        ensure_positive(self.pole_length, "pole length")?;
        ensure_non_negative(self.cart_friction, "cart friction")?;
        ensure_non_negative(self.pivot_friction, "pivot friction")?;
        ensure_non_negative(self.pole_inertia, "pole inertia")?;
        ensure_positive(self.gravity, "gravity")?;
        Ok(())
    }
}

impl Default for PhysicalParameters {
    fn default() -> Self {
        Self::nominal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlantError;
    use cp_core::units::{kg, kg_m2, m, mps2};

    fn build(
        cart: f64,
        pole: f64,
        len: f64,
        b: f64,
        bp: f64,
        i: f64,
        g: f64,
    ) -> PlantResult<PhysicalParameters> {
        PhysicalParameters::new(kg(cart), kg(pole), m(len), b, bp, kg_m2(i), mps2(g))
    }

    #[test]
    fn nominal_matches_constructor() {
        let p = build(0.5, 0.2, 0.5, 0.1, 0.01, 0.006, 9.81).unwrap();
        assert_eq!(p, PhysicalParameters::nominal());
        assert!((p.total_mass() - 0.7).abs() < 1e-12);
        assert!((p.pivot_inertia() - 0.056).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_positive_masses_and_length() {
        assert_eq!(
            build(0.0, 0.2, 0.5, 0.1, 0.01, 0.006, 9.81).unwrap_err(),
            PlantError::InvalidArg { what: "cart mass" }
        );
        assert!(build(0.5, -0.2, 0.5, 0.1, 0.01, 0.006, 9.81).is_err());
        assert!(build(0.5, 0.2, 0.0, 0.1, 0.01, 0.006, 9.81).is_err());
        assert!(build(0.5, 0.2, 0.5, 0.1, 0.01, 0.006, 0.0).is_err());
    }

    #[test]
    fn rejects_negative_friction_and_non_finite() {
        assert!(build(0.5, 0.2, 0.5, -0.1, 0.01, 0.006, 9.81).is_err());
        assert!(build(0.5, 0.2, 0.5, 0.1, -0.01, 0.006, 9.81).is_err());
        assert!(matches!(
            build(f64::NAN, 0.2, 0.5, 0.1, 0.01, 0.006, 9.81),
            Err(PlantError::NonFinite { .. })
        ));
    }

    #[test]
    fn zero_inertia_and_friction_allowed() {
        let p = build(1.0, 0.1, 1.0, 0.0, 0.0, 0.0, 9.81).unwrap();
        assert_eq!(p.pole_inertia(), 0.0);
        assert_eq!(p.cart_friction(), 0.0);
    }

    #[test]
    fn frictionless_keeps_masses() {
        let p = PhysicalParameters::nominal().frictionless();
        assert_eq!(p.cart_friction(), 0.0);
        assert_eq!(p.pivot_friction(), 0.0);
        assert_eq!(p.cart_mass(), 0.5);
    }
}
