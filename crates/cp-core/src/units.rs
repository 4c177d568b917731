// cp-core/src/units.rs

use uom::si::f64::{
    Acceleration as UomAcceleration, Angle as UomAngle, Length as UomLength, Mass as UomMass,
    MomentOfInertia as UomMomentOfInertia,
};

// Public canonical unit types (SI, f64)
pub type Accel = UomAcceleration;
pub type Angle = UomAngle;
pub type Length = UomLength;
pub type Mass = UomMass;
pub type MomentOfInertia = UomMomentOfInertia;

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mps2(v: f64) -> Accel {
    use uom::si::acceleration::meter_per_second_squared;
    Accel::new::<meter_per_second_squared>(v)
}

#[inline]
pub fn kg_m2(v: f64) -> MomentOfInertia {
    use uom::si::moment_of_inertia::kilogram_square_meter;
    MomentOfInertia::new::<kilogram_square_meter>(v)
}

#[inline]
pub fn deg(v: f64) -> Angle {
    use uom::si::angle::degree;
    Angle::new::<degree>(v)
}

/// Angle in radians as a plain number.
#[inline]
pub fn to_rad(a: Angle) -> f64 {
    use uom::si::angle::radian;
    a.get::<radian>()
}

pub mod constants {
    /// Gravity used by the plant defaults. The nominal rig uses 9.81, not standard g0.
    pub const G_MPS2: f64 = 9.81;
}
