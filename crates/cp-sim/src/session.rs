//! The simulation loop a host drives one tick at a time.
//!
//! A tick reads the state, asks the active policy for a force, adds any
//! external disturbance, zeroes the total if it would push the cart past the
//! travel limit, advances the plant one integrator step and replaces the
//! state. Hosts only ever see copies through `snapshot()`.
//!
//! Single writer: a multi-threaded host wraps the session in one lock held
//! across each `tick`/`reset`.

use crate::disturbance::DisturbanceSchedule;
use crate::error::{SimError, SimResult};
use crate::integrator::IntegratorType;
use cp_controls::{ControlPolicy, ControllerState, Policy, clamp_travel};
use cp_core::timing::{Timer, tick_timing};
use cp_plant::{CartPole, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Fixed step [s].
    pub dt: f64,
    pub integrator: IntegratorType,
    /// State restored on reset.
    pub initial_state: State,
    /// Travel half-width applied to the total force [m].
    pub travel_limit: Option<f64>,
    pub disturbances: DisturbanceSchedule,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            integrator: IntegratorType::default(),
            initial_state: State::at_angle(8.0_f64.to_radians()),
            travel_limit: None,
            disturbances: DisturbanceSchedule::default(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !self.initial_state.is_finite() {
            return Err(SimError::InvalidArg {
                what: "initial state must be finite",
            });
        }
        if let Some(l) = self.travel_limit {
            if !(l.is_finite() && l > 0.0) {
                return Err(SimError::InvalidArg {
                    what: "travel limit must be positive",
                });
            }
        }
        self.disturbances.validate()
    }
}

/// Read-only copy of the session handed to hosts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Elapsed simulated time [s].
    pub time: f64,
    pub state: State,
    /// Force requested by the policy on the last tick [N].
    pub control_force: f64,
    /// Force actually applied to the cart on the last tick [N].
    pub applied_force: f64,
    pub running: bool,
    pub ticks: u64,
}

pub struct Session {
    plant: CartPole,
    policy: Policy,
    config: SessionConfig,
    state: State,
    internal: ControllerState,
    running: bool,
    time: f64,
    ticks: u64,
    control_force: f64,
    applied_force: f64,
    host_disturbance: f64,
}

impl Session {
    /// Build a running session at the configured initial state.
    pub fn new(plant: CartPole, policy: Policy, config: SessionConfig) -> SimResult<Self> {
        config.validate()?;
        policy.validate()?;
        debug!(
            policy = policy.name(),
            integrator = config.integrator.as_str(),
            dt = config.dt,
            "session created"
        );
        Ok(Self {
            plant,
            policy,
            state: config.initial_state,
            config,
            internal: ControllerState::default(),
            running: true,
            time: 0.0,
            ticks: 0,
            control_force: 0.0,
            applied_force: 0.0,
            host_disturbance: 0.0,
        })
    }

    /// Advance one step. Returns `false` and holds everything while paused.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        let dt = self.config.dt;

        let timer = Timer::start("policy");
        let (internal, control_force) = self.policy.compute_force(&self.state, &self.internal, dt);
        timer.stop_into(&tick_timing::POLICY);

        let disturbance = self.host_disturbance + self.config.disturbances.force_at(self.time);
        let applied_force = clamp_travel(
            self.config.travel_limit,
            self.state.x,
            control_force + disturbance,
        );

        let timer = Timer::start("integrator");
        let next = self
            .config
            .integrator
            .step(&self.plant, &self.state, applied_force, dt);
        timer.stop_into(&tick_timing::INTEGRATOR);

        self.state = next;
        self.internal = internal;
        self.control_force = control_force;
        self.applied_force = applied_force;
        self.ticks += 1;
        // t = ticks * dt rather than a running sum
        self.time = self.ticks as f64 * dt;
        true
    }

    /// Back to the initial state with cleared controller memory, time, forces
    /// and host disturbance. Parameters and the running flag are kept.
    pub fn reset(&mut self) {
        self.state = self.config.initial_state;
        self.internal = ControllerState::default();
        self.time = 0.0;
        self.ticks = 0;
        self.control_force = 0.0;
        self.applied_force = 0.0;
        self.host_disturbance = 0.0;
        debug!(policy = self.policy.name(), "session reset");
    }

    pub fn set_running(&mut self, running: bool) {
        if running != self.running {
            debug!(running, t = self.time, "run flag changed");
        }
        self.running = running;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Host-supplied force added to the control force each tick until
    /// changed or reset, e.g. a mouse drag on the cart.
    pub fn set_disturbance(&mut self, force: f64) {
        self.host_disturbance = if force.is_finite() { force } else { 0.0 };
    }

    /// Swap controller parameters. The session is reset so the new policy
    /// starts from clean internal state.
    pub fn replace_policy(&mut self, policy: Policy) -> SimResult<()> {
        policy.validate()?;
        debug!(from = self.policy.name(), to = policy.name(), "policy replaced");
        self.policy = policy;
        self.reset();
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.time,
            state: self.state,
            control_force: self.control_force,
            applied_force: self.applied_force,
            running: self.running,
            ticks: self.ticks,
        }
    }

    pub fn plant(&self) -> &CartPole {
        &self.plant
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn internal(&self) -> &ControllerState {
        &self.internal
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn dt(&self) -> f64 {
        self.config.dt
    }

    /// Mechanical energy of the current state [J].
    pub fn energy(&self) -> f64 {
        self.plant.energy(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disturbance::DisturbancePulse;
    use cp_controls::{CascadePd, OpenLoop};
    use cp_plant::PhysicalParameters;

    fn plant() -> CartPole {
        CartPole::new(PhysicalParameters::nominal())
    }

    fn cascade_session() -> Session {
        let policy = CascadePd::nominal(9.81).unwrap().into();
        Session::new(plant(), policy, SessionConfig::default()).unwrap()
    }

    #[test]
    fn rejects_bad_config() {
        let bad_dt = SessionConfig {
            dt: 0.0,
            ..SessionConfig::default()
        };
        assert!(Session::new(plant(), Policy::default(), bad_dt).is_err());

        let bad_state = SessionConfig {
            initial_state: State::new(f64::NAN, 0.0, 0.0, 0.0),
            ..SessionConfig::default()
        };
        assert!(Session::new(plant(), Policy::default(), bad_state).is_err());

        let mut cascade = CascadePd::nominal(9.81).unwrap();
        cascade.limits.force_limit = -1.0;
        assert!(matches!(
            Session::new(plant(), cascade.into(), SessionConfig::default()),
            Err(SimError::Control(_))
        ));
    }

    #[test]
    fn tick_advances_time_and_count() {
        let mut s = cascade_session();
        assert!(s.tick());
        assert!(s.tick());
        let snap = s.snapshot();
        assert_eq!(snap.ticks, 2);
        assert!((snap.time - 0.02).abs() < 1e-12);
        assert!(snap.state.is_finite());
        assert!(snap.control_force != 0.0);
    }

    #[test]
    fn paused_tick_holds_state() {
        let mut s = cascade_session();
        s.tick();
        let before = s.snapshot();
        s.set_running(false);
        assert!(!s.tick());
        let after = s.snapshot();
        assert_eq!(before.state, after.state);
        assert_eq!(before.time, after.time);
        assert_eq!(before.ticks, after.ticks);
        assert!(!after.running);
    }

    #[test]
    fn reset_restores_initial_conditions() {
        let mut s = cascade_session();
        s.set_disturbance(3.0);
        for _ in 0..50 {
            s.tick();
        }
        s.set_running(false);
        s.reset();
        let snap = s.snapshot();
        assert_eq!(snap.state, SessionConfig::default().initial_state);
        assert_eq!(snap.time, 0.0);
        assert_eq!(snap.ticks, 0);
        assert_eq!(snap.control_force, 0.0);
        assert_eq!(snap.applied_force, 0.0);
        assert_eq!(*s.internal(), ControllerState::default());
        // Running flag is left alone.
        assert!(!snap.running);
    }

    #[test]
    fn reset_clears_integral() {
        let mut cascade = CascadePd::nominal(9.81).unwrap();
        cascade.angle_gains.ki = 5.0;
        let mut s = Session::new(plant(), cascade.into(), SessionConfig::default()).unwrap();
        for _ in 0..10 {
            s.tick();
        }
        assert!(s.internal().integral != 0.0);
        s.reset();
        assert_eq!(s.internal().integral, 0.0);
    }

    #[test]
    fn host_disturbance_adds_to_control_force() {
        let config = SessionConfig {
            initial_state: State::default(),
            ..SessionConfig::default()
        };
        let mut s = Session::new(plant(), OpenLoop::new(1.0).unwrap().into(), config).unwrap();
        s.set_disturbance(2.5);
        s.tick();
        let snap = s.snapshot();
        assert_eq!(snap.control_force, 1.0);
        assert_eq!(snap.applied_force, 3.5);
        assert!(snap.state.x_dot > 0.0);
    }

    #[test]
    fn scheduled_pulse_only_acts_while_active() {
        let config = SessionConfig {
            initial_state: State::default(),
            disturbances: DisturbanceSchedule::new(vec![
                DisturbancePulse::new(0.105, 0.05, 5.0).unwrap(),
            ])
            .unwrap(),
            ..SessionConfig::default()
        };
        let mut s = Session::new(plant(), Policy::default(), config).unwrap();
        let mut applied = Vec::new();
        for _ in 0..20 {
            s.tick();
            applied.push(s.snapshot().applied_force);
        }
        // Tick k starts at t = k * 0.01; the pulse covers ticks 11..=15.
        assert!(applied[..11].iter().all(|&f| f == 0.0));
        assert!(applied[11..16].iter().all(|&f| f == 5.0));
        assert!(applied[16..].iter().all(|&f| f == 0.0));
    }

    #[test]
    fn session_travel_clamp_blocks_total_force() {
        let config = SessionConfig {
            initial_state: State::new(1.0, 0.0, 0.0, 0.0),
            travel_limit: Some(1.0),
            ..SessionConfig::default()
        };
        let mut s = Session::new(plant(), OpenLoop::new(2.0).unwrap().into(), config).unwrap();
        s.tick();
        let snap = s.snapshot();
        assert_eq!(snap.control_force, 2.0);
        assert_eq!(snap.applied_force, 0.0);
    }

    #[test]
    fn replace_policy_resets() {
        let mut s = cascade_session();
        for _ in 0..5 {
            s.tick();
        }
        s.replace_policy(OpenLoop::default().into()).unwrap();
        let snap = s.snapshot();
        assert_eq!(snap.ticks, 0);
        assert_eq!(snap.state, SessionConfig::default().initial_state);
        assert_eq!(s.policy().name(), "open-loop");
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut s = cascade_session();
        let snap = s.snapshot();
        s.tick();
        assert_ne!(snap.state, s.snapshot().state);
        assert_eq!(snap.ticks, 0);
    }

    #[test]
    fn non_finite_host_disturbance_is_ignored() {
        let mut s = cascade_session();
        s.set_disturbance(f64::NAN);
        s.tick();
        assert!(s.snapshot().applied_force.is_finite());
    }
}
