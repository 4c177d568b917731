//! Mamdani fuzzy controller on pole angle and angular rate.
//!
//! Inputs are fuzzified with trapezoidal sets, rules fire with min, outputs
//! are clipped and aggregated with max over a discretized force universe, and
//! the crisp force is the centroid of the aggregate. No firing rule gives
//! exactly zero force.

use crate::controller::ControllerState;
use crate::error::{ControlError, ControlResult};
use crate::policy::ControlPolicy;
use cp_core::wrap_angle;
use cp_plant::State;
use serde::{Deserialize, Serialize};

/// Keeps the trapezoid slopes finite when two corners coincide.
pub const MEMBERSHIP_EPS: f64 = 1e-6;

/// Trapezoidal membership function with corners `a <= b <= c <= d`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trapezoid {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Trapezoid {
    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    pub fn membership(&self, x: f64) -> f64 {
        let rise = (x - self.a) / (self.b - self.a + MEMBERSHIP_EPS);
        let fall = (self.d - x) / (self.d - self.c + MEMBERSHIP_EPS);
        rise.min(1.0).min(fall).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AngleTerm {
    NegLarge,
    NegSmall,
    PosSmall,
    PosLarge,
}

impl AngleTerm {
    /// Sets over ±0.5 rad.
    fn set(self) -> Trapezoid {
        match self {
            AngleTerm::NegLarge => Trapezoid::new(-0.5, -0.5, -0.35, -0.25),
            AngleTerm::NegSmall => Trapezoid::new(-0.35, -0.25, -0.15, -0.05),
            AngleTerm::PosSmall => Trapezoid::new(0.05, 0.15, 0.25, 0.35),
            AngleTerm::PosLarge => Trapezoid::new(0.25, 0.35, 0.5, 0.5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RateTerm {
    Neg,
    Pos,
}

impl RateTerm {
    /// Sets over ±2 rad/s.
    fn set(self) -> Trapezoid {
        match self {
            RateTerm::Neg => Trapezoid::new(-2.0, -2.0, -0.5, 0.0),
            RateTerm::Pos => Trapezoid::new(0.0, 0.5, 2.0, 2.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ForceTerm {
    NegLarge,
    Neg,
    Zero,
    Pos,
    PosLarge,
}

impl ForceTerm {
    const ALL: [ForceTerm; 5] = [
        ForceTerm::NegLarge,
        ForceTerm::Neg,
        ForceTerm::Zero,
        ForceTerm::Pos,
        ForceTerm::PosLarge,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn set(self) -> Trapezoid {
        match self {
            ForceTerm::NegLarge => Trapezoid::new(-50.0, -50.0, -35.0, -20.0),
            ForceTerm::Neg => Trapezoid::new(-50.0, -50.0, -20.0, -5.0),
            ForceTerm::Zero => Trapezoid::new(-5.0, -2.0, 2.0, 5.0),
            ForceTerm::Pos => Trapezoid::new(5.0, 20.0, 50.0, 50.0),
            ForceTerm::PosLarge => Trapezoid::new(20.0, 35.0, 50.0, 50.0),
        }
    }
}

/// Rule base: push against the lean, harder when the pole is still falling.
const RULES: [(AngleTerm, RateTerm, ForceTerm); 8] = [
    (AngleTerm::PosSmall, RateTerm::Pos, ForceTerm::Neg),
    (AngleTerm::PosSmall, RateTerm::Neg, ForceTerm::Zero),
    (AngleTerm::NegSmall, RateTerm::Pos, ForceTerm::Zero),
    (AngleTerm::NegSmall, RateTerm::Neg, ForceTerm::Pos),
    (AngleTerm::PosLarge, RateTerm::Pos, ForceTerm::NegLarge),
    (AngleTerm::PosLarge, RateTerm::Neg, ForceTerm::Neg),
    (AngleTerm::NegLarge, RateTerm::Neg, ForceTerm::PosLarge),
    (AngleTerm::NegLarge, RateTerm::Pos, ForceTerm::Pos),
];

/// Discretization of the output force universe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuzzyConfig {
    pub universe_min: f64,
    pub universe_max: f64,
    pub universe_points: usize,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            universe_min: -50.0,
            universe_max: 50.0,
            universe_points: 200,
        }
    }
}

impl FuzzyConfig {
    pub fn validate(&self) -> ControlResult<()> {
        if self.universe_points < 2 {
            return Err(ControlError::InvalidArg {
                what: "fuzzy universe needs at least two points",
            });
        }
        if !(self.universe_min.is_finite()
            && self.universe_max.is_finite()
            && self.universe_min < self.universe_max)
        {
            return Err(ControlError::InvalidArg {
                what: "fuzzy universe bounds must be finite and increasing",
            });
        }
        Ok(())
    }
}

/// Fuzzy controller with output memberships precomputed over the universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FuzzyConfig", into = "FuzzyConfig")]
pub struct FuzzyController {
    config: FuzzyConfig,
    universe: Vec<f64>,
    /// `output_mu[term][i]` is the membership of `universe[i]` in `term`.
    output_mu: Vec<Vec<f64>>,
}

impl FuzzyController {
    pub fn new(config: FuzzyConfig) -> ControlResult<Self> {
        config.validate()?;
        Ok(Self::discretize(config))
    }

    fn discretize(config: FuzzyConfig) -> Self {
        let n = config.universe_points;
        let span = config.universe_max - config.universe_min;
        let universe: Vec<f64> = (0..n)
            .map(|i| config.universe_min + span * i as f64 / (n - 1) as f64)
            .collect();
        let output_mu = ForceTerm::ALL
            .iter()
            .map(|term| {
                let set = term.set();
                universe.iter().map(|&u| set.membership(u)).collect()
            })
            .collect();
        Self {
            config,
            universe,
            output_mu,
        }
    }

    pub fn config(&self) -> &FuzzyConfig {
        &self.config
    }

    /// Crisp force for a (wrapped) angle and angular rate.
    pub fn infer(&self, angle: f64, rate: f64) -> f64 {
        // Clipping one set at several weights and max-aggregating equals
        // clipping it once at the largest weight.
        let mut clip = [0.0_f64; 5];
        for (a, r, out) in RULES {
            let w = a.set().membership(angle).min(r.set().membership(rate));
            let slot = &mut clip[out.index()];
            *slot = slot.max(w);
        }
        if clip.iter().all(|&w| w == 0.0) {
            return 0.0;
        }

        let mut num = 0.0;
        let mut den = 0.0;
        for (i, &u) in self.universe.iter().enumerate() {
            let mu = self
                .output_mu
                .iter()
                .zip(clip)
                .map(|(set, w)| w.min(set[i]))
                .fold(0.0_f64, f64::max);
            num += u * mu;
            den += mu;
        }
        if den == 0.0 { 0.0 } else { num / den }
    }
}

impl Default for FuzzyController {
    fn default() -> Self {
        Self::discretize(FuzzyConfig::default())
    }
}

impl TryFrom<FuzzyConfig> for FuzzyController {
    type Error = ControlError;

    fn try_from(config: FuzzyConfig) -> ControlResult<Self> {
        Self::new(config)
    }
}

impl From<FuzzyController> for FuzzyConfig {
    fn from(c: FuzzyController) -> Self {
        c.config
    }
}

impl ControlPolicy for FuzzyController {
    fn compute_force(
        &self,
        state: &State,
        internal: &ControllerState,
        _dt: f64,
    ) -> (ControllerState, f64) {
        let force = self.infer(wrap_angle(state.theta), state.theta_dot);
        (*internal, force)
    }

    fn name(&self) -> &'static str {
        "fuzzy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trapezoid_membership() {
        let t = Trapezoid::new(0.0, 1.0, 2.0, 3.0);
        assert_eq!(t.membership(-1.0), 0.0);
        assert_eq!(t.membership(1.5), 1.0);
        assert!((t.membership(0.5) - 0.5).abs() < 1e-5);
        assert!((t.membership(2.5) - 0.5).abs() < 1e-5);
        assert_eq!(t.membership(4.0), 0.0);
    }

    #[test]
    fn shoulder_set_with_coincident_corners_is_finite() {
        let t = Trapezoid::new(-2.0, -2.0, -0.5, 0.0);
        assert_eq!(t.membership(-1.0), 1.0);
        assert_eq!(t.membership(0.0), 0.0);
        assert!(t.membership(-2.0).is_finite());
    }

    #[test]
    fn no_firing_rule_gives_exactly_zero() {
        let f = FuzzyController::default();
        assert_eq!(f.infer(0.0, 0.0), 0.0);
        assert_eq!(f.infer(0.0, 1.0), 0.0);
        // Rate exactly zero belongs to neither rate set.
        assert_eq!(f.infer(0.2, 0.0), 0.0);
    }

    #[test]
    fn pushes_against_falling_lean() {
        let f = FuzzyController::default();
        assert!(f.infer(0.2, 1.0) < -5.0);
        assert!(f.infer(-0.2, -1.0) > 5.0);
        assert!(f.infer(0.4, 1.0) < f.infer(0.2, 1.0));
    }

    #[test]
    fn rule_base_is_mirror_symmetric() {
        let f = FuzzyController::default();
        for (angle, rate) in [(0.1, 0.3), (0.3, -1.0), (0.45, 1.5), (0.2, -0.2)] {
            let right = f.infer(angle, rate);
            let left = f.infer(-angle, -rate);
            assert!((right + left).abs() < 1e-6, "{angle},{rate}: {right} vs {left}");
        }
    }

    #[test]
    fn angle_is_wrapped_before_inference() {
        let f = FuzzyController::default();
        let wrapped = State::new(0.0, 0.0, 0.2 + 2.0 * std::f64::consts::PI, 1.0);
        let plain = State::new(0.0, 0.0, 0.2, 1.0);
        let (_, a) = f.compute_force(&wrapped, &ControllerState::default(), 0.02);
        let (_, b) = f.compute_force(&plain, &ControllerState::default(), 0.02);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn output_stays_inside_universe() {
        let f = FuzzyController::default();
        for angle in [-0.45, -0.3, -0.1, 0.1, 0.3, 0.45] {
            for rate in [-1.5, -0.4, 0.4, 1.5] {
                let u = f.infer(angle, rate);
                assert!(u.abs() <= 50.0);
            }
        }
    }

    #[test]
    fn rejects_empty_universe() {
        let bad = FuzzyConfig {
            universe_points: 1,
            ..FuzzyConfig::default()
        };
        assert!(FuzzyController::new(bad).is_err());
        let inverted = FuzzyConfig {
            universe_min: 10.0,
            universe_max: -10.0,
            universe_points: 50,
        };
        assert!(FuzzyController::new(inverted).is_err());
    }

    #[test]
    fn default_matches_new_with_default_config() {
        assert_eq!(
            FuzzyController::default(),
            FuzzyController::new(FuzzyConfig::default()).unwrap()
        );
    }
}
