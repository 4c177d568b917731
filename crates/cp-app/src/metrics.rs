//! Regulation performance metrics.
//!
//! Computes rise time, settling time, overshoot and steady-state error for a
//! signal driven toward a constant setpoint, plus actuator effort statistics.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Smallest settling band half-width, in signal units.
pub const SETTLING_BAND_FLOOR: f64 = 1e-4;

const SATURATION_TOL: f64 = 1e-9;

/// Standard regulation metrics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoopMetrics {
    /// Time to remove 10% of the initial deviation (seconds)
    pub rise_time_10_s: Option<f64>,
    /// Time to remove 90% of the initial deviation (seconds)
    pub rise_time_90_s: Option<f64>,
    /// Time after which the signal stays within ±2% of the initial deviation
    pub settling_time_2pct_s: Option<f64>,
    /// Largest excursion past the setpoint, in percent of the initial deviation
    pub overshoot_pct: Option<f64>,
    /// Final measured value minus setpoint
    pub steady_state_error: Option<f64>,
    /// Largest |output| witnessed
    pub max_abs_output: Option<f64>,
    /// Percentage of time |output| sat at the limit
    pub saturation_pct: Option<f64>,
}

impl LoopMetrics {
    /// Returns true if at least some metrics were computed
    pub fn has_data(&self) -> bool {
        self.rise_time_10_s.is_some()
            || self.rise_time_90_s.is_some()
            || self.settling_time_2pct_s.is_some()
            || self.overshoot_pct.is_some()
            || self.steady_state_error.is_some()
    }
}

/// Compute metrics for `measured` regulated toward `setpoint`.
///
/// `output` is the actuator series; saturation is only reported when an
/// `output_limit` is given. Empty series yield empty metrics.
pub fn compute_loop_metrics(
    measured: &[(f64, f64)],
    setpoint: f64,
    output: Option<&[(f64, f64)]>,
    output_limit: Option<f64>,
) -> AppResult<LoopMetrics> {
    if !setpoint.is_finite() {
        return Err(AppError::InvalidInput("setpoint must be finite".to_string()));
    }
    if let Some(limit) = output_limit {
        if !(limit.is_finite() && limit > 0.0) {
            return Err(AppError::InvalidInput(format!(
                "output limit must be positive, got {limit}"
            )));
        }
    }

    let mut metrics = LoopMetrics::default();

    if let Some(series) = output {
        metrics.max_abs_output = series.iter().map(|(_, u)| u.abs()).reduce(f64::max);
        if let Some(limit) = output_limit {
            metrics.saturation_pct = Some(compute_saturation_pct(series, limit));
        }
    }

    let (Some(&(_, first)), Some(&(_, last))) = (measured.first(), measured.last()) else {
        return Ok(metrics);
    };

    metrics.steady_state_error = Some(last - setpoint);

    let e0 = first - setpoint;
    if e0.abs() < 1e-9 {
        return Ok(metrics);
    }

    // Normalized deviation: 1 at the start, 0 on the setpoint, negative past it.
    let progress: Vec<(f64, f64)> = measured
        .iter()
        .map(|&(t, v)| (t, (v - setpoint) / e0))
        .collect();

    metrics.rise_time_10_s = time_to_reach(&progress, 0.9);
    metrics.rise_time_90_s = time_to_reach(&progress, 0.1);

    let deepest = progress
        .iter()
        .map(|(_, r)| *r)
        .fold(f64::INFINITY, f64::min);
    if deepest < 0.0 {
        metrics.overshoot_pct = Some(-deepest * 100.0);
    }

    let band = (0.02 * e0.abs()).max(SETTLING_BAND_FLOOR);
    metrics.settling_time_2pct_s = compute_settling_time(measured, setpoint, band);

    Ok(metrics)
}

/// First time the normalized deviation drops to `level`, linearly
/// interpolated between samples.
fn time_to_reach(progress: &[(f64, f64)], level: f64) -> Option<f64> {
    for (i, &(t, r)) in progress.iter().enumerate() {
        if r > level {
            continue;
        }
        if i == 0 {
            return Some(t);
        }
        let (t_prev, r_prev) = progress[i - 1];
        let dr = r - r_prev;
        if dr.abs() > 1e-12 {
            return Some(t_prev + (level - r_prev) / dr * (t - t_prev));
        }
        return Some(t);
    }
    None
}

/// Time of the first sample after which the signal never leaves
/// `setpoint ± band`. `None` if the final sample is outside the band.
fn compute_settling_time(series: &[(f64, f64)], setpoint: f64, band: f64) -> Option<f64> {
    let last_outside = series
        .iter()
        .rposition(|(_, v)| (v - setpoint).abs() > band);
    match last_outside {
        None => series.first().map(|(t, _)| *t),
        Some(i) => series.get(i + 1).map(|(t, _)| *t),
    }
}

/// Percentage of time |u| sat at `limit`, with linear sections where a
/// window enters or leaves saturation.
fn compute_saturation_pct(series: &[(f64, f64)], limit: f64) -> f64 {
    let (Some(&(t_first, _)), Some(&(t_last, _))) = (series.first(), series.last()) else {
        return 0.0;
    };
    let total_time = t_last - t_first;
    if series.len() < 2 || total_time <= 0.0 {
        return 0.0;
    }

    let threshold = limit * (1.0 - SATURATION_TOL);
    let mut saturated_time = 0.0;

    for window in series.windows(2) {
        let (t1, v1) = (window[0].0, window[0].1.abs());
        let (t2, v2) = (window[1].0, window[1].1.abs());
        let dt = t2 - t1;
        let (sat1, sat2) = (v1 >= threshold, v2 >= threshold);

        if sat1 && sat2 {
            saturated_time += dt;
        } else if sat1 != sat2 {
            let frac = ((threshold - v1) / (v2 - v1)).clamp(0.0, 1.0);
            saturated_time += if sat1 { frac * dt } else { (1.0 - frac) * dt };
        }
    }

    (saturated_time / total_time) * 100.0
}
