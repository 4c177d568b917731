use cp_core::wrap_angle;
use serde::{Deserialize, Serialize};

/// Cart-pole state. Also used for its time derivative, where each field holds
/// the rate of the matching state variable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Cart position [m]
    pub x: f64,
    /// Cart velocity [m/s]
    pub x_dot: f64,
    /// Pole angle from upright, CCW positive [rad]
    pub theta: f64,
    /// Pole angular velocity [rad/s]
    pub theta_dot: f64,
}

impl State {
    pub fn new(x: f64, x_dot: f64, theta: f64, theta_dot: f64) -> Self {
        Self {
            x,
            x_dot,
            theta,
            theta_dot,
        }
    }

    /// Cart at rest at `x = 0` with the pole still at `theta`.
    pub fn at_angle(theta: f64) -> Self {
        Self {
            theta,
            ..Self::default()
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.x_dot.is_finite()
            && self.theta.is_finite()
            && self.theta_dot.is_finite()
    }

    pub fn add(&self, other: &Self) -> Self {
        Self {
            x: self.x + other.x,
            x_dot: self.x_dot + other.x_dot,
            theta: self.theta + other.theta,
            theta_dot: self.theta_dot + other.theta_dot,
        }
    }

    pub fn scale(&self, k: f64) -> Self {
        Self {
            x: self.x * k,
            x_dot: self.x_dot * k,
            theta: self.theta * k,
            theta_dot: self.theta_dot * k,
        }
    }

    /// Angle wrapped to (-π, π].
    pub fn wrapped_theta(&self) -> f64 {
        wrap_angle(self.theta)
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.x, self.x_dot, self.theta, self.theta_dot]
    }
}

impl From<[f64; 4]> for State {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_scale() {
        let a = State::new(1.0, 2.0, 3.0, 4.0);
        let b = State::new(0.5, 0.5, 0.5, 0.5);
        assert_eq!(a.add(&b), State::new(1.5, 2.5, 3.5, 4.5));
        assert_eq!(a.scale(2.0), State::new(2.0, 4.0, 6.0, 8.0));
        assert_eq!(State::from(a.as_array()), a);
    }

    #[test]
    fn finiteness() {
        assert!(State::at_angle(0.1).is_finite());
        assert!(!State::new(0.0, f64::NAN, 0.0, 0.0).is_finite());
        assert!(!State::new(0.0, 0.0, f64::INFINITY, 0.0).is_finite());
    }

    #[test]
    fn theta_is_wrapped_only_on_request() {
        let s = State::at_angle(2.0 * std::f64::consts::PI + 0.1);
        assert!(s.theta > 6.0);
        assert!((s.wrapped_theta() - 0.1).abs() < 1e-12);
    }
}
