//! External force pulses applied to the cart on a schedule.

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};

/// Constant force acting on the cart over `[start, start + duration)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisturbancePulse {
    /// Onset [s].
    pub start: f64,
    /// Length [s].
    pub duration: f64,
    /// Force [N].
    pub force: f64,
}

impl DisturbancePulse {
    pub fn new(start: f64, duration: f64, force: f64) -> SimResult<Self> {
        let p = Self {
            start,
            duration,
            force,
        };
        p.validate()?;
        Ok(p)
    }

    pub fn validate(&self) -> SimResult<()> {
        if !(self.start.is_finite() && self.start >= 0.0) {
            return Err(SimError::InvalidArg {
                what: "disturbance start must be non-negative",
            });
        }
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(SimError::InvalidArg {
                what: "disturbance duration must be positive",
            });
        }
        if !self.force.is_finite() {
            return Err(SimError::InvalidArg {
                what: "disturbance force must be finite",
            });
        }
        Ok(())
    }

    pub fn is_active(&self, t: f64) -> bool {
        t >= self.start && t < self.start + self.duration
    }
}

/// Pulses may overlap; active forces add up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisturbanceSchedule {
    pulses: Vec<DisturbancePulse>,
}

impl DisturbanceSchedule {
    pub fn new(pulses: Vec<DisturbancePulse>) -> SimResult<Self> {
        let s = Self { pulses };
        s.validate()?;
        Ok(s)
    }

    pub fn validate(&self) -> SimResult<()> {
        self.pulses.iter().try_for_each(DisturbancePulse::validate)
    }

    pub fn pulses(&self) -> &[DisturbancePulse] {
        &self.pulses
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    /// Sum of pulse forces active at `t`.
    pub fn force_at(&self, t: f64) -> f64 {
        self.pulses
            .iter()
            .filter(|p| p.is_active(t))
            .map(|p| p.force)
            .sum()
    }
}
