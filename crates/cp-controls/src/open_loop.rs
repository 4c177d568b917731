use crate::controller::ControllerState;
use crate::error::{ControlError, ControlResult};
use crate::policy::ControlPolicy;
use cp_plant::State;
use serde::{Deserialize, Serialize};

/// Constant force regardless of state. Zero by default, which leaves the
/// plant to swing freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenLoop {
    #[serde(default)]
    pub force: f64,
}

impl OpenLoop {
    pub fn new(force: f64) -> ControlResult<Self> {
        let p = Self { force };
        p.validate()?;
        Ok(p)
    }

    pub fn validate(&self) -> ControlResult<()> {
        if !self.force.is_finite() {
            return Err(ControlError::InvalidArg {
                what: "open-loop force must be finite",
            });
        }
        Ok(())
    }
}

impl ControlPolicy for OpenLoop {
    fn compute_force(
        &self,
        _state: &State,
        internal: &ControllerState,
        _dt: f64,
    ) -> (ControllerState, f64) {
        (*internal, self.force)
    }

    fn name(&self) -> &'static str {
        "open-loop"
    }
}
