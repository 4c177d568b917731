//! Fixed-step time integrators.
//!
//! The input is held constant across all stages of a step.

use crate::model::DynamicModel;
use serde::{Deserialize, Serialize};

pub trait Integrator {
    /// Advance `x` by one step of length `dt` under input `u`.
    fn step<M: DynamicModel>(&self, model: &M, x: &M::State, u: M::Input, dt: f64) -> M::State;
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
#[derive(Clone, Copy, Debug)]
pub struct RK4;

impl Integrator for RK4 {
    fn step<M: DynamicModel>(&self, model: &M, x: &M::State, u: M::Input, dt: f64) -> M::State {
        let k1 = model.rhs(x, u);

        let x2 = model.add(x, &model.scale(&k1, 0.5 * dt));
        let k2 = model.rhs(&x2, u);

        let x3 = model.add(x, &model.scale(&k2, 0.5 * dt));
        let k3 = model.rhs(&x3, u);

        let x4 = model.add(x, &model.scale(&k3, dt));
        let k4 = model.rhs(&x4, u);

        // x_new = x + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
        let k_sum = model.add(
            &model.add(&k1, &model.scale(&k2, 2.0)),
            &model.add(&model.scale(&k3, 2.0), &k4),
        );

        model.add(x, &model.scale(&k_sum, dt / 6.0))
    }
}

/// Forward Euler (explicit, 1st order). One rhs call per step.
#[derive(Clone, Copy, Debug)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<M: DynamicModel>(&self, model: &M, x: &M::State, u: M::Input, dt: f64) -> M::State {
        let xdot = model.rhs(x, u);
        model.add(x, &model.scale(&xdot, dt))
    }
}

/// Integrator selection, fixed when a session is built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegratorType {
    /// 4th-order Runge-Kutta, four rhs calls per step.
    #[default]
    Rk4,
    /// 1st-order explicit Euler, one rhs call per step.
    ForwardEuler,
}

impl IntegratorType {
    pub fn step<M: DynamicModel>(self, model: &M, x: &M::State, u: M::Input, dt: f64) -> M::State {
        match self {
            IntegratorType::Rk4 => RK4.step(model, x, u, dt),
            IntegratorType::ForwardEuler => ForwardEuler.step(model, x, u, dt),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IntegratorType::Rk4 => "rk4",
            IntegratorType::ForwardEuler => "forward-euler",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scalar decay `ẋ = -k x + u`.
    struct Decay {
        k: f64,
    }

    impl DynamicModel for Decay {
        type State = f64;
        type Input = f64;

        fn rhs(&self, x: &f64, u: f64) -> f64 {
            -self.k * x + u
        }

        fn add(&self, a: &f64, b: &f64) -> f64 {
            a + b
        }

        fn scale(&self, a: &f64, k: f64) -> f64 {
            a * k
        }
    }

    #[test]
    fn euler_single_step() {
        let m = Decay { k: 2.0 };
        let x1 = ForwardEuler.step(&m, &1.0, 0.0, 0.1);
        assert!((x1 - 0.8).abs() < 1e-15);
    }

    #[test]
    fn rk4_matches_exponential() {
        let m = Decay { k: 1.0 };
        let mut x = 1.0;
        for _ in 0..100 {
            x = RK4.step(&m, &x, 0.0, 0.01);
        }
        assert!((x - (-1.0_f64).exp()).abs() < 1e-10);
    }

    #[test]
    fn rk4_is_fourth_order() {
        let m = Decay { k: 1.0 };
        let err = |n: usize| {
            let dt = 1.0 / n as f64;
            let mut x = 1.0;
            for _ in 0..n {
                x = RK4.step(&m, &x, 0.0, dt);
            }
            (x - (-1.0_f64).exp()).abs()
        };
        let ratio = err(10) / err(20);
        assert!(ratio > 14.0 && ratio < 18.0, "ratio {ratio}");
    }

    #[test]
    fn input_is_held_over_step() {
        // With k = 0 the state integrates u exactly.
        let m = Decay { k: 0.0 };
        assert!((RK4.step(&m, &0.0, 3.0, 0.5) - 1.5).abs() < 1e-15);
        assert!((IntegratorType::ForwardEuler.step(&m, &0.0, 3.0, 0.5) - 1.5).abs() < 1e-15);
    }

    #[test]
    fn default_is_rk4() {
        assert_eq!(IntegratorType::default(), IntegratorType::Rk4);
        assert_eq!(IntegratorType::default().as_str(), "rk4");
    }
}
