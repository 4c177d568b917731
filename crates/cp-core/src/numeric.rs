use crate::{CoreError, CoreResult};

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Finite and strictly positive.
pub fn ensure_positive(v: Real, what: &'static str) -> CoreResult<Real> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(CoreError::InvalidArg { what })
    }
}

/// Finite and `>= 0`.
pub fn ensure_non_negative(v: Real, what: &'static str) -> CoreResult<Real> {
    let v = ensure_finite(v, what)?;
    if v >= 0.0 {
        Ok(v)
    } else {
        Err(CoreError::InvalidArg { what })
    }
}

/// Wrap an angle to (-pi, pi].
///
/// Only for display and for consumers that reason about a single turn; the
/// simulated angle itself is never wrapped.
pub fn wrap_angle(angle: Real) -> Real {
    use std::f64::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped == -PI { PI } else { wrapped }
}

/// Symmetric saturation to `[-limit, limit]`.
#[inline]
pub fn saturate(v: Real, limit: Real) -> Real {
    v.clamp(-limit, limit)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn wrapped_angle_in_half_open_turn(angle in -1.0e4_f64..1.0e4_f64) {
            let w = wrap_angle(angle);
            prop_assert!(w > -std::f64::consts::PI - 1e-12);
            prop_assert!(w <= std::f64::consts::PI + 1e-12);
            // Same direction on the circle.
            prop_assert!((w.sin() - angle.sin()).abs() < 1e-6);
            prop_assert!((w.cos() - angle.cos()).abs() < 1e-6);
        }
    }
}
