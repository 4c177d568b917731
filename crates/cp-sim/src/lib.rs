//! Fixed-step simulation of the cart-pole under closed-loop control.
//!
//! Provides:
//! - `DynamicModel`, the integrator-facing view of a plant
//! - Forward Euler and RK4 integrators
//! - `Session`, the tick/reset/pause loop a host drives once per frame
//! - Scheduled disturbance pulses
//! - A batch runner with decimated recording and progress callbacks

pub mod disturbance;
pub mod error;
pub mod integrator;
pub mod model;
pub mod session;
pub mod sim;

pub use disturbance::{DisturbancePulse, DisturbanceSchedule};
pub use error::{SimError, SimResult};
pub use integrator::{ForwardEuler, Integrator, IntegratorType, RK4};
pub use model::DynamicModel;
pub use session::{Session, SessionConfig, Snapshot};
pub use sim::{SimOptions, SimProgress, SimRecord, run_sim, run_sim_with_progress};
