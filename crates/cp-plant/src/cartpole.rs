//! Nonlinear cart-pole equations of motion.

use crate::params::PhysicalParameters;
use crate::state::State;

/// Smallest magnitude allowed for the mass-matrix determinant.
pub const DEN_FLOOR: f64 = 1e-9;

/// The plant: parameters plus the derivative function.
///
/// With `a = M + m`, `J = I + m l²` and `c = m l cos θ` the equations are
///
/// ```text
/// a·ẍ − c·θ̈ = F − b·ẋ − m·l·θ̇²·sin θ      (Fx)
/// −c·ẍ + J·θ̈ = m·g·l·sin θ − b_p·θ̇       (T)
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CartPole {
    params: PhysicalParameters,
}

impl CartPole {
    pub fn new(params: PhysicalParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PhysicalParameters {
        &self.params
    }

    /// Time derivative of `state` under a horizontal cart force `force` [N].
    ///
    /// Pure; finite for every finite input.
    pub fn derivative(&self, state: &State, force: f64) -> State {
        let p = &self.params;
        let m = p.pole_mass();
        let l = p.pole_length();
        let (sin, cos) = state.theta.sin_cos();

        let a = p.total_mass();
        let j = p.pivot_inertia();
        let c = m * l * cos;

        let fx = force - p.cart_friction() * state.x_dot
            - m * l * state.theta_dot * state.theta_dot * sin;
        let t = m * p.gravity() * l * sin - p.pivot_friction() * state.theta_dot;

        let mut den = a * j - c * c;
        if den.abs() < DEN_FLOOR {
            den = DEN_FLOOR.copysign(den);
        }

        State {
            x: state.x_dot,
            x_dot: (j * fx + c * t) / den,
            theta: state.theta_dot,
            theta_dot: (a * t + c * fx) / den,
        }
    }

    /// Total mechanical energy [J]; potential is zero at pivot height.
    pub fn energy(&self, state: &State) -> f64 {
        let p = &self.params;
        let ml = p.pole_mass() * p.pole_length();
        let c = ml * state.theta.cos();
        0.5 * p.total_mass() * state.x_dot * state.x_dot - c * state.x_dot * state.theta_dot
            + 0.5 * p.pivot_inertia() * state.theta_dot * state.theta_dot
            + ml * p.gravity() * state.theta.cos()
    }

    /// Horizontal momentum of cart plus pole [kg·m/s].
    pub fn horizontal_momentum(&self, state: &State) -> f64 {
        let p = &self.params;
        let c = p.pole_mass() * p.pole_length() * state.theta.cos();
        p.total_mass() * state.x_dot - c * state.theta_dot
    }

    /// Pole center of mass in world coordinates `(x, y)` [m].
    pub fn pole_com(&self, state: &State) -> (f64, f64) {
        let l = self.params.pole_length();
        (state.x - l * state.theta.sin(), l * state.theta.cos())
    }
}
