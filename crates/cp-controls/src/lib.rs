//! Control policies for the cart-pole.
//!
//! Every strategy maps the current plant state and its own internal state to a
//! scalar cart force. Policies are pure: `compute_force` takes the previous
//! `ControllerState` and hands back the next one alongside the force, so the
//! caller owns all mutable state.
//!
//! # Strategies
//!
//! - `OpenLoop`: constant force
//! - `SinglePid`: unsaturated PID on the pole angle
//! - `CascadePd`: outer position PD producing a lean reference, inner angle
//!   PD/PID with force saturation, anti-windup and a travel-limit clamp
//! - `FuzzyController`: Mamdani rule base on angle and angular rate

pub mod cascade;
pub mod controller;
pub mod error;
pub mod fuzzy;
pub mod limits;
pub mod open_loop;
pub mod policy;
pub mod single_pid;

pub use cascade::CascadePd;
pub use controller::{AngleLoop, ControllerState, PdGains, PidGains};
pub use error::{ControlError, ControlResult};
pub use fuzzy::{FuzzyConfig, FuzzyController, Trapezoid};
pub use limits::{ControlLimits, clamp_travel};
pub use open_loop::OpenLoop;
pub use policy::{ControlPolicy, Policy};
pub use single_pid::SinglePid;
