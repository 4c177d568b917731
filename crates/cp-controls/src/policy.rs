//! The policy interface and the closed set of strategies behind it.

use crate::cascade::CascadePd;
use crate::controller::ControllerState;
use crate::error::ControlResult;
use crate::fuzzy::FuzzyController;
use crate::open_loop::OpenLoop;
use crate::single_pid::SinglePid;
use cp_plant::State;
use serde::{Deserialize, Serialize};

/// A control strategy producing one cart force per tick.
pub trait ControlPolicy {
    /// Force for `state` given the previous internal state. Returns the next
    /// internal state alongside the force. Finite inputs give finite outputs.
    fn compute_force(
        &self,
        state: &State,
        internal: &ControllerState,
        dt: f64,
    ) -> (ControllerState, f64);

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

/// Every strategy the session can run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Policy {
    OpenLoop(OpenLoop),
    SinglePid(SinglePid),
    CascadePd(CascadePd),
    Fuzzy(FuzzyController),
}

impl Policy {
    /// Re-check a policy that did not come through a constructor, e.g. one
    /// deserialized or edited field by field.
    pub fn validate(&self) -> ControlResult<()> {
        match self {
            Policy::OpenLoop(p) => p.validate(),
            Policy::SinglePid(p) => p.validate(),
            Policy::CascadePd(p) => p.validate(),
            Policy::Fuzzy(p) => p.config().validate(),
        }
    }

    fn inner(&self) -> &dyn ControlPolicy {
        match self {
            Policy::OpenLoop(p) => p,
            Policy::SinglePid(p) => p,
            Policy::CascadePd(p) => p,
            Policy::Fuzzy(p) => p,
        }
    }
}

impl Default for Policy {
    fn default() -> Self {
        Policy::OpenLoop(OpenLoop::default())
    }
}

impl ControlPolicy for Policy {
    fn compute_force(
        &self,
        state: &State,
        internal: &ControllerState,
        dt: f64,
    ) -> (ControllerState, f64) {
        self.inner().compute_force(state, internal, dt)
    }

    fn name(&self) -> &'static str {
        self.inner().name()
    }
}

impl From<OpenLoop> for Policy {
    fn from(p: OpenLoop) -> Self {
        Policy::OpenLoop(p)
    }
}

impl From<SinglePid> for Policy {
    fn from(p: SinglePid) -> Self {
        Policy::SinglePid(p)
    }
}

impl From<CascadePd> for Policy {
    fn from(p: CascadePd) -> Self {
        Policy::CascadePd(p)
    }
}

impl From<FuzzyController> for Policy {
    fn from(p: FuzzyController) -> Self {
        Policy::Fuzzy(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::PidGains;

    #[test]
    fn dispatch_matches_inner_policy() {
        let cascade = CascadePd::nominal(9.81).unwrap();
        let policy = Policy::from(cascade);
        let s = State::new(0.1, 0.0, 0.05, -0.2);
        let internal = ControllerState::default();
        assert_eq!(
            policy.compute_force(&s, &internal, 0.01),
            cascade.compute_force(&s, &internal, 0.01)
        );
        assert_eq!(policy.name(), "cascade-pd");
    }

    #[test]
    fn names() {
        assert_eq!(Policy::default().name(), "open-loop");
        let pid = SinglePid::new(PidGains::new(1.0, 0.0, 0.0).unwrap()).unwrap();
        assert_eq!(Policy::from(pid).name(), "single-pid");
        assert_eq!(Policy::from(FuzzyController::default()).name(), "fuzzy");
    }

    #[test]
    fn json_is_tagged_by_type() {
        let policy = Policy::from(CascadePd::nominal(9.81).unwrap());
        let json = serde_json::to_string(&policy).unwrap();
        assert!(json.contains("\"type\":\"CascadePd\""));
        let back: Policy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, policy);
    }

    #[test]
    fn fuzzy_deserializes_through_validation() {
        let json = r#"{"type":"Fuzzy","universe_min":-50.0,"universe_max":50.0,"universe_points":0}"#;
        assert!(serde_json::from_str::<Policy>(json).is_err());
        let ok = r#"{"type":"Fuzzy","universe_min":-50.0,"universe_max":50.0,"universe_points":200}"#;
        let p: Policy = serde_json::from_str(ok).unwrap();
        assert_eq!(p, Policy::from(FuzzyController::default()));
    }

    #[test]
    fn validate_catches_edited_fields() {
        let mut cascade = CascadePd::nominal(9.81).unwrap();
        cascade.limits.force_limit = 0.0;
        assert!(Policy::from(cascade).validate().is_err());
    }
}
