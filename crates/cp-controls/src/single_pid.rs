use crate::controller::{ControllerState, PidGains};
use crate::error::{ControlError, ControlResult};
use crate::policy::ControlPolicy;
use cp_plant::State;
use serde::{Deserialize, Serialize};

/// Single-loop PID on the pole angle.
///
/// No saturation and no anti-windup: the integral always accumulates and the
/// force is passed through unclamped. Cart position is not regulated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SinglePid {
    pub gains: PidGains,
    /// Angle setpoint [rad], upright by default.
    #[serde(default)]
    pub target_angle: f64,
}

impl SinglePid {
    pub fn new(gains: PidGains) -> ControlResult<Self> {
        gains.validate()?;
        Ok(Self {
            gains,
            target_angle: 0.0,
        })
    }

    pub fn with_target_angle(mut self, target: f64) -> Self {
        self.target_angle = target;
        self
    }

    pub fn validate(&self) -> ControlResult<()> {
        self.gains.validate()?;
        if !self.target_angle.is_finite() {
            return Err(ControlError::InvalidArg {
                what: "target angle must be finite",
            });
        }
        Ok(())
    }
}

impl ControlPolicy for SinglePid {
    fn compute_force(
        &self,
        state: &State,
        internal: &ControllerState,
        dt: f64,
    ) -> (ControllerState, f64) {
        let g = &self.gains;
        let error = self.target_angle - state.theta;
        let integral = internal.integral + error * dt;
        let force = g.kp * error + g.ki * integral - g.kd * state.theta_dot;
        (
            ControllerState {
                integral,
                prev_error: error,
            },
            force,
        )
    }

    fn name(&self) -> &'static str {
        "single-pid"
    }
}
