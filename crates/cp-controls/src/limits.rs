//! Actuation limits shared by the saturating policies and the session.

use crate::error::{ControlError, ControlResult};
use cp_core::{ensure_positive, saturate};
use serde::{Deserialize, Serialize};

/// Force, lean reference and travel limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlLimits {
    /// Maximum force magnitude [N].
    pub force_limit: f64,
    /// Maximum lean reference magnitude [rad].
    pub reference_angle_limit: f64,
    /// Cart travel half-width [m]. `None` means unbounded.
    #[serde(default)]
    pub travel_limit: Option<f64>,
}

impl ControlLimits {
    pub fn new(
        force_limit: f64,
        reference_angle_limit: f64,
        travel_limit: Option<f64>,
    ) -> ControlResult<Self> {
        let limits = Self {
            force_limit,
            reference_angle_limit,
            travel_limit,
        };
        limits.validate()?;
        Ok(limits)
    }

    /// 25 N, 18°, ±3 m.
    pub fn nominal() -> Self {
        Self {
            force_limit: 25.0,
            reference_angle_limit: 18.0_f64.to_radians(),
            travel_limit: Some(3.0),
        }
    }

    pub fn validate(&self) -> ControlResult<()> {
        ensure_positive(self.force_limit, "force limit must be positive")?;
        ensure_positive(
            self.reference_angle_limit,
            "reference angle limit must be positive",
        )?;
        if let Some(l) = self.travel_limit {
            if !(l.is_finite() && l > 0.0) {
                return Err(ControlError::InvalidArg {
                    what: "travel limit must be positive",
                });
            }
        }
        Ok(())
    }

    pub fn saturate_force(&self, force: f64) -> f64 {
        saturate(force, self.force_limit)
    }

    pub fn saturate_reference(&self, theta_ref: f64) -> f64 {
        saturate(theta_ref, self.reference_angle_limit)
    }

    pub fn clamp_travel(&self, x: f64, force: f64) -> f64 {
        clamp_travel(self.travel_limit, x, force)
    }
}

impl Default for ControlLimits {
    fn default() -> Self {
        Self::nominal()
    }
}

/// Zero a force that would push the cart further past a travel bound.
///
/// Forces pointing back toward the track center pass through unchanged. Only
/// the force is affected; the cart position is never clamped.
pub fn clamp_travel(travel_limit: Option<f64>, x: f64, force: f64) -> f64 {
    match travel_limit {
        Some(l) if (x >= l && force > 0.0) || (x <= -l && force < 0.0) => 0.0,
        _ => force,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominal_values() {
        let l = ControlLimits::nominal();
        assert_eq!(l.force_limit, 25.0);
        assert!((l.reference_angle_limit - 0.314_159_265).abs() < 1e-6);
        assert_eq!(l.travel_limit, Some(3.0));
    }

    #[test]
    fn rejects_non_positive_limits() {
        assert!(ControlLimits::new(0.0, 0.3, None).is_err());
        assert!(ControlLimits::new(25.0, -0.3, None).is_err());
        assert!(ControlLimits::new(25.0, 0.3, Some(0.0)).is_err());
        assert!(ControlLimits::new(25.0, 0.3, Some(f64::NAN)).is_err());
        assert!(ControlLimits::new(25.0, 0.3, Some(2.0)).is_ok());
    }

    #[test]
    fn travel_clamp_zeroes_outward_force_only() {
        let l = Some(3.0);
        assert_eq!(clamp_travel(l, 3.0, 10.0), 0.0);
        assert_eq!(clamp_travel(l, 3.5, 0.1), 0.0);
        assert_eq!(clamp_travel(l, 3.0, -10.0), -10.0);
        assert_eq!(clamp_travel(l, -3.0, -10.0), 0.0);
        assert_eq!(clamp_travel(l, -3.0, 10.0), 10.0);
        assert_eq!(clamp_travel(l, 2.9, 10.0), 10.0);
        assert_eq!(clamp_travel(None, 100.0, 10.0), 10.0);
    }

    #[test]
    fn saturation_is_symmetric() {
        let l = ControlLimits::nominal();
        assert_eq!(l.saturate_force(40.0), 25.0);
        assert_eq!(l.saturate_force(-40.0), -25.0);
        assert_eq!(l.saturate_force(7.0), 7.0);
    }
}
