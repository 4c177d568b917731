//! Cascaded position/angle controller.
//!
//! The outer loop is a PD on cart position whose output is a commanded cart
//! acceleration `a_cmd`. The pole balances while the cart accelerates only if
//! it leans into the motion, so `a_cmd` is turned into the lean that produces
//! it, `θ_ref = -atan(a_cmd / g)` (a lean toward `+x` is a negative angle),
//! and clamped to the reference limit. The inner `AngleLoop` then drives the
//! pole to that lean with a saturated PD/PID.

use crate::controller::{AngleLoop, ControllerState, PdGains, PidGains};
use crate::error::ControlResult;
use crate::limits::ControlLimits;
use crate::policy::ControlPolicy;
use cp_core::ensure_positive;
use cp_plant::State;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CascadePd {
    /// Inner loop gains on the pole angle.
    pub angle_gains: PidGains,
    /// Outer loop gains on cart position.
    pub position_gains: PdGains,
    pub limits: ControlLimits,
    #[serde(default = "default_anti_windup")]
    pub anti_windup: bool,
    /// Cart position setpoint [m].
    #[serde(default)]
    pub target_x: f64,
    /// Gravity used to map commanded acceleration to lean [m/s²].
    pub gravity: f64,
}

fn default_anti_windup() -> bool {
    true
}

impl CascadePd {
    pub fn new(
        angle_gains: PidGains,
        position_gains: PdGains,
        limits: ControlLimits,
        gravity: f64,
    ) -> ControlResult<Self> {
        let c = Self {
            angle_gains,
            position_gains,
            limits,
            anti_windup: true,
            target_x: 0.0,
            gravity,
        };
        c.validate()?;
        Ok(c)
    }

    /// Tuned gains for the nominal rig: `Kp_θ=150, Kd_θ=25, Kp_x=2.0, Kd_x=1.2`
    /// with the nominal limits.
    pub fn nominal(gravity: f64) -> ControlResult<Self> {
        Self::new(
            PidGains::pd(150.0, 25.0)?,
            PdGains::new(2.0, 1.2)?,
            ControlLimits::nominal(),
            gravity,
        )
    }

    pub fn with_anti_windup(mut self, enabled: bool) -> Self {
        self.anti_windup = enabled;
        self
    }

    pub fn with_target_x(mut self, target_x: f64) -> Self {
        self.target_x = target_x;
        self
    }

    pub fn validate(&self) -> ControlResult<()> {
        self.angle_gains.validate()?;
        self.position_gains.validate()?;
        self.limits.validate()?;
        ensure_positive(self.gravity, "gravity must be positive")?;
        cp_core::ensure_finite(self.target_x, "target position")?;
        Ok(())
    }

    fn angle_loop(&self) -> AngleLoop {
        AngleLoop {
            gains: self.angle_gains,
            force_limit: self.limits.force_limit,
            anti_windup: self.anti_windup,
        }
    }

    /// Lean reference produced by the outer loop, already clamped.
    pub fn reference_angle(&self, state: &State) -> f64 {
        let g = &self.position_gains;
        let e_x = self.target_x - state.x;
        let a_cmd = g.kp * e_x - g.kd * state.x_dot;
        self.limits.saturate_reference(-(a_cmd / self.gravity).atan())
    }
}

impl ControlPolicy for CascadePd {
    fn compute_force(
        &self,
        state: &State,
        internal: &ControllerState,
        dt: f64,
    ) -> (ControllerState, f64) {
        let theta_ref = self.reference_angle(state);
        let (next, force) =
            self.angle_loop()
                .update(internal, state.theta, state.theta_dot, theta_ref, dt);
        (next, self.limits.clamp_travel(state.x, force))
    }

    fn name(&self) -> &'static str {
        "cascade-pd"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const G: f64 = 9.81;

    #[test]
    fn nominal_gains() {
        let c = CascadePd::nominal(G).unwrap();
        assert_eq!(c.angle_gains.kp, 150.0);
        assert_eq!(c.angle_gains.ki, 0.0);
        assert_eq!(c.angle_gains.kd, 25.0);
        assert_eq!(c.position_gains.kp, 2.0);
        assert_eq!(c.position_gains.kd, 1.2);
        assert!(c.anti_windup);
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(CascadePd::nominal(0.0).is_err());
        let mut limits = ControlLimits::nominal();
        limits.force_limit = -1.0;
        assert!(
            CascadePd::new(
                PidGains::pd(1.0, 1.0).unwrap(),
                PdGains::new(1.0, 1.0).unwrap(),
                limits,
                G
            )
            .is_err()
        );
    }

    #[test]
    fn upright_centered_at_rest_gives_zero_force() {
        let c = CascadePd::nominal(G).unwrap();
        let (next, f) = c.compute_force(&State::default(), &ControllerState::default(), 0.01);
        assert_eq!(f, 0.0);
        assert_eq!(next, ControllerState::default());
    }

    #[test]
    fn cart_right_of_target_leans_pole_left() {
        // Returning left needs a lean toward -x, which is a positive angle.
        let c = CascadePd::nominal(G).unwrap();
        let r = c.reference_angle(&State::new(0.5, 0.0, 0.0, 0.0));
        assert!(r > 0.0);
        assert!((r - (1.0_f64 / G).atan()).abs() < 1e-12);
    }

    #[test]
    fn reference_is_clamped() {
        let c = CascadePd::nominal(G).unwrap();
        let r = c.reference_angle(&State::new(-100.0, 0.0, 0.0, 0.0));
        assert!((r + 18.0_f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn force_is_clamped_to_limit() {
        let c = CascadePd::nominal(G).unwrap();
        let s = State::at_angle(0.5);
        let (_, f) = c.compute_force(&s, &ControllerState::default(), 0.01);
        assert_eq!(f, -25.0);
    }

    #[test]
    fn travel_limit_zeroes_outward_force() {
        // At the right bound the outer loop asks for a lean back to the left,
        // the pole is upright, so the inner loop pushes right: blocked.
        let c = CascadePd::nominal(G).unwrap();
        let s = State::new(3.0, 0.0, 0.0, 0.0);
        let raw = c
            .angle_loop()
            .update(&ControllerState::default(), 0.0, 0.0, c.reference_angle(&s), 0.01)
            .1;
        assert!(raw > 0.0);
        let (_, f) = c.compute_force(&s, &ControllerState::default(), 0.01);
        assert_eq!(f, 0.0);
    }

    #[test]
    fn travel_limit_passes_inward_force() {
        let c = CascadePd::nominal(G).unwrap();
        let s = State::new(3.0, 0.0, 0.5, 0.0);
        let (_, f) = c.compute_force(&s, &ControllerState::default(), 0.01);
        assert!(f < 0.0);
    }

    #[test]
    fn integral_only_moves_when_ki_set() {
        let c = CascadePd::nominal(G).unwrap();
        let s = State::at_angle(0.01);
        let (next, _) = c.compute_force(&s, &ControllerState::default(), 0.01);
        assert_eq!(next.integral, 0.0);

        let mut with_i = c;
        with_i.angle_gains.ki = 1.0;
        let (next, _) = with_i.compute_force(&s, &ControllerState::default(), 0.01);
        assert!((next.integral + 1e-4).abs() < 1e-12);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn force_and_reference_respect_limits(
            x in -5.0_f64..5.0,
            x_dot in -10.0_f64..10.0,
            theta in -4.0_f64..4.0,
            theta_dot in -20.0_f64..20.0,
            integral in -10.0_f64..10.0,
            ki in 0.0_f64..50.0,
        ) {
            let mut c = CascadePd::nominal(9.81).unwrap();
            c.angle_gains.ki = ki;
            let s = State::new(x, x_dot, theta, theta_dot);
            let internal = ControllerState { integral, prev_error: 0.0 };
            let (next, f) = c.compute_force(&s, &internal, 0.01);
            prop_assert!(f.is_finite());
            prop_assert!(f.abs() <= c.limits.force_limit);
            prop_assert!(c.reference_angle(&s).abs() <= c.limits.reference_angle_limit);
            prop_assert!(next.integral.is_finite());
        }
    }
}
