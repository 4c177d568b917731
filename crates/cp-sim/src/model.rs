//! Integrator-facing model trait.

use cp_plant::{CartPole, State};

/// A dynamic system `ẋ = f(x, u)` with a held input `u`.
///
/// Implementors supply the right-hand side plus the vector-space operations
/// the integrators need on their state type.
pub trait DynamicModel {
    type State: Clone;
    type Input: Copy;

    /// State derivative under input `u`.
    fn rhs(&self, x: &Self::State, u: Self::Input) -> Self::State;

    /// Element-wise `a + b`.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// Element-wise `k * a`.
    fn scale(&self, a: &Self::State, k: f64) -> Self::State;
}

impl DynamicModel for CartPole {
    type State = State;
    /// Horizontal cart force [N].
    type Input = f64;

    fn rhs(&self, x: &State, u: f64) -> State {
        self.derivative(x, u)
    }

    fn add(&self, a: &State, b: &State) -> State {
        a.add(b)
    }

    fn scale(&self, a: &State, k: f64) -> State {
        a.scale(k)
    }
}
