//! cp-plant: inverted pendulum on a cart.
//!
//! Provides:
//! - `PhysicalParameters` (validated, immutable)
//! - `State` (cart position/velocity, pole angle/rate)
//! - `CartPole`, the nonlinear state-derivative function plus energy and
//!   momentum diagnostics
//!
//! Angle convention: `theta` is measured from upright, counter-clockwise
//! positive with `x` to the right. The pole's center of mass sits at
//! `(x - l sin θ, l cos θ)`, so `theta = π` is hanging straight down.

pub mod cartpole;
pub mod error;
pub mod params;
pub mod state;

pub use cartpole::{CartPole, DEN_FLOOR};
pub use error::{PlantError, PlantResult};
pub use params::PhysicalParameters;
pub use state::State;
