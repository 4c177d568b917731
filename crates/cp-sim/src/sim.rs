//! Batch runner and result recording.

use crate::error::{SimError, SimResult};
use crate::session::Session;
use cp_controls::ControlPolicy;
use cp_plant::State;
use tracing::{info, trace, warn};

/// Options for batch runs. Step size and integrator come from the session.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Final simulation time (seconds)
    pub t_end: f64,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            t_end: 5.0,
            max_steps: 1_000_000,
            record_every: 1,
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.t_end.is_finite() && self.t_end >= 0.0) {
            return Err(SimError::InvalidArg {
                what: "t_end must be non-negative",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        if self.record_every == 0 {
            return Err(SimError::InvalidArg {
                what: "record_every must be positive",
            });
        }
        Ok(())
    }
}

/// Recorded trajectory. `force[i]` is the force applied over the step that
/// ended at `t[i]`; the initial sample carries zero.
#[derive(Clone, Debug, Default)]
pub struct SimRecord {
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// State snapshots
    pub x: Vec<State>,
    /// Applied force (N)
    pub force: Vec<f64>,
    /// Ticks taken
    pub steps: usize,
}

impl SimRecord {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn final_state(&self) -> Option<&State> {
        self.x.last()
    }

    fn push(&mut self, t: f64, x: State, force: f64) {
        self.t.push(t);
        self.x.push(x);
        self.force.push(force);
    }
}

/// Progress report handed to `run_sim_with_progress` callbacks.
#[derive(Clone, Copy, Debug)]
pub struct SimProgress {
    pub step: usize,
    pub sim_time: f64,
    pub t_end: f64,
    pub fraction_complete: f64,
}

/// Run `session` from its current state until `t_end` (relative to now) or
/// `max_steps`.
pub fn run_sim(session: &mut Session, opts: &SimOptions) -> SimResult<SimRecord> {
    run_sim_with_progress(session, opts, None)
}

/// Same as `run_sim`, reporting progress at every recorded step.
pub fn run_sim_with_progress(
    session: &mut Session,
    opts: &SimOptions,
    mut progress: Option<&mut dyn FnMut(SimProgress)>,
) -> SimResult<SimRecord> {
    opts.validate()?;

    let dt = session.dt();
    // Tolerance keeps t_end = n * dt from rounding up to n + 1 steps.
    let target_steps = (opts.t_end / dt - 1e-9).ceil().max(0.0) as usize;
    let steps = target_steps.min(opts.max_steps);
    if steps < target_steps {
        warn!(
            max_steps = opts.max_steps,
            target_steps,
            "max_steps reached before t_end"
        );
    }

    info!(
        policy = session.policy().name(),
        dt,
        t_end = opts.t_end,
        steps,
        "run started"
    );

    session.set_running(true);
    let start = session.snapshot();
    let mut record = SimRecord::default();
    record.push(0.0, start.state, 0.0);

    let progress_at = |step: usize| SimProgress {
        step,
        sim_time: step as f64 * dt,
        t_end: opts.t_end,
        fraction_complete: if steps == 0 {
            1.0
        } else {
            step as f64 / steps as f64
        },
    };
    if let Some(cb) = progress.as_mut() {
        cb(progress_at(0));
    }

    for step in 1..=steps {
        session.tick();
        if step % opts.record_every == 0 || step == steps {
            let snap = session.snapshot();
            let t = snap.time - start.time;
            trace!(step, t, theta = snap.state.theta, x = snap.state.x, "record");
            record.push(t, snap.state, snap.applied_force);
            if let Some(cb) = progress.as_mut() {
                cb(progress_at(step));
            }
        }
    }
    record.steps = steps;

    if let Some(last) = record.final_state() {
        info!(steps, theta = last.theta, x = last.x, "run finished");
    }
    Ok(record)
}
