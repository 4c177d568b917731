//! Feedback loop building blocks.
//!
//! `AngleLoop` is the inner loop of the cascade: PD or PID on the pole angle
//! with output clamping and conditional-integration anti-windup. The update is
//! functional: it takes the previous `ControllerState` and returns the next
//! one together with the output.

use crate::error::{ControlError, ControlResult};
use cp_core::saturate;
use serde::{Deserialize, Serialize};

/// Proportional, integral and derivative gains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f64,
    #[serde(default)]
    pub ki: f64,
    pub kd: f64,
}

impl PidGains {
    pub fn new(kp: f64, ki: f64, kd: f64) -> ControlResult<Self> {
        let gains = Self { kp, ki, kd };
        gains.validate()?;
        Ok(gains)
    }

    pub fn pd(kp: f64, kd: f64) -> ControlResult<Self> {
        Self::new(kp, 0.0, kd)
    }

    pub fn validate(&self) -> ControlResult<()> {
        if !(self.kp.is_finite() && self.ki.is_finite() && self.kd.is_finite()) {
            return Err(ControlError::InvalidArg {
                what: "gains must be finite",
            });
        }
        Ok(())
    }
}

/// Proportional and derivative gains for the outer position loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdGains {
    pub kp: f64,
    pub kd: f64,
}

impl PdGains {
    pub fn new(kp: f64, kd: f64) -> ControlResult<Self> {
        let gains = Self { kp, kd };
        gains.validate()?;
        Ok(gains)
    }

    pub fn validate(&self) -> ControlResult<()> {
        if !(self.kp.is_finite() && self.kd.is_finite()) {
            return Err(ControlError::InvalidArg {
                what: "gains must be finite",
            });
        }
        Ok(())
    }
}

/// Controller memory carried between ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    /// Integral accumulator.
    pub integral: f64,
    /// Error seen on the previous tick.
    pub prev_error: f64,
}

/// Saturated angle loop with optional anti-windup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleLoop {
    pub gains: PidGains,
    /// Output clamp [N].
    pub force_limit: f64,
    /// Hold the integral while the output is saturated.
    pub anti_windup: bool,
}

impl AngleLoop {
    pub fn new(gains: PidGains, force_limit: f64) -> ControlResult<Self> {
        gains.validate()?;
        cp_core::ensure_positive(force_limit, "force limit must be positive")?;
        Ok(Self {
            gains,
            force_limit,
            anti_windup: true,
        })
    }

    pub fn with_anti_windup(mut self, enabled: bool) -> Self {
        self.anti_windup = enabled;
        self
    }

    /// Compute the clamped force driving `theta` toward `theta_ref`.
    ///
    /// The derivative acts on the measured rate (`-theta_dot`), not on the
    /// error, so reference steps do not kick the output.
    pub fn update(
        &self,
        state: &ControllerState,
        theta: f64,
        theta_dot: f64,
        theta_ref: f64,
        dt: f64,
    ) -> (ControllerState, f64) {
        let g = &self.gains;
        let error = theta_ref - theta;

        let integrating = g.ki != 0.0;
        let candidate = if integrating {
            state.integral + error * dt
        } else {
            state.integral
        };

        let raw = g.kp * error + g.ki * candidate - g.kd * theta_dot;
        let force = saturate(raw, self.force_limit);

        // Conditional integration: drop this tick's contribution while saturated
        let integral = if integrating && self.anti_windup && raw.abs() > self.force_limit {
            state.integral
        } else {
            candidate
        };

        (
            ControllerState {
                integral,
                prev_error: error,
            },
            force,
        )
    }
}
