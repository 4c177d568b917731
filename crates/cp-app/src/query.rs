//! Query helpers for extracting data from a finished run.

use std::fmt;
use std::str::FromStr;

use cp_plant::State;
use cp_sim::SimRecord;

use crate::error::{AppError, AppResult};

/// Summary of a run's time range and extremes.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub time_range: (f64, f64),
    pub record_count: usize,
    pub steps: usize,
    pub final_state: State,
    pub max_abs_force: f64,
    pub max_abs_theta: f64,
    pub max_abs_x: f64,
}

/// Get run summary from a recorded trajectory.
pub fn get_run_summary(record: &SimRecord) -> AppResult<RunSummary> {
    let (Some(&t_min), Some(&t_max), Some(&final_state)) =
        (record.t.first(), record.t.last(), record.final_state())
    else {
        return Err(AppError::InvalidInput("No records in run".to_string()));
    };

    Ok(RunSummary {
        time_range: (t_min, t_max),
        record_count: record.len(),
        steps: record.steps,
        final_state,
        max_abs_force: max_abs(record.force.iter().copied()),
        max_abs_theta: max_abs(record.x.iter().map(|s| s.theta)),
        max_abs_x: max_abs(record.x.iter().map(|s| s.x)),
    })
}

fn max_abs(values: impl Iterator<Item = f64>) -> f64 {
    values.map(f64::abs).fold(0.0, f64::max)
}

/// Recorded quantities that can be pulled out as a time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesVariable {
    X,
    XDot,
    Theta,
    ThetaDeg,
    ThetaDot,
    Force,
}

impl SeriesVariable {
    pub const ALL: [SeriesVariable; 6] = [
        SeriesVariable::X,
        SeriesVariable::XDot,
        SeriesVariable::Theta,
        SeriesVariable::ThetaDeg,
        SeriesVariable::ThetaDot,
        SeriesVariable::Force,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SeriesVariable::X => "x",
            SeriesVariable::XDot => "x_dot",
            SeriesVariable::Theta => "theta",
            SeriesVariable::ThetaDeg => "theta_deg",
            SeriesVariable::ThetaDot => "theta_dot",
            SeriesVariable::Force => "force",
        }
    }

    fn value(self, state: &State, force: f64) -> f64 {
        match self {
            SeriesVariable::X => state.x,
            SeriesVariable::XDot => state.x_dot,
            SeriesVariable::Theta => state.theta,
            SeriesVariable::ThetaDeg => state.theta.to_degrees(),
            SeriesVariable::ThetaDot => state.theta_dot,
            SeriesVariable::Force => force,
        }
    }
}

impl fmt::Display for SeriesVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeriesVariable {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" | "position" => Ok(SeriesVariable::X),
            "x_dot" | "velocity" => Ok(SeriesVariable::XDot),
            "theta" | "angle" => Ok(SeriesVariable::Theta),
            "theta_deg" => Ok(SeriesVariable::ThetaDeg),
            "theta_dot" | "angular_velocity" => Ok(SeriesVariable::ThetaDot),
            "force" => Ok(SeriesVariable::Force),
            _ => Err(AppError::InvalidInput(format!(
                "Unknown series variable: {}",
                s
            ))),
        }
    }
}

/// Extract `(t, value)` pairs for one variable.
pub fn extract_series(record: &SimRecord, variable: SeriesVariable) -> Vec<(f64, f64)> {
    record
        .t
        .iter()
        .zip(&record.x)
        .zip(&record.force)
        .map(|((t, state), force)| (*t, variable.value(state, *force)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SimRecord {
        SimRecord {
            t: vec![0.0, 0.5, 1.0],
            x: vec![
                State::new(0.0, 0.0, 0.1, 0.0),
                State::new(-0.4, 0.2, -0.3, 1.0),
                State::new(0.1, 0.0, 0.0, 0.0),
            ],
            force: vec![0.0, -12.0, 3.0],
            steps: 100,
        }
    }

    #[test]
    fn summary_reports_extremes() {
        let summary = get_run_summary(&record()).unwrap();
        assert_eq!(summary.time_range, (0.0, 1.0));
        assert_eq!(summary.record_count, 3);
        assert_eq!(summary.steps, 100);
        assert_eq!(summary.max_abs_force, 12.0);
        assert_eq!(summary.max_abs_theta, 0.3);
        assert_eq!(summary.max_abs_x, 0.4);
        assert_eq!(summary.final_state.x, 0.1);
    }

    #[test]
    fn empty_record_has_no_summary() {
        assert!(matches!(
            get_run_summary(&SimRecord::default()),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn series_follow_record_order() {
        let rec = record();
        let force = extract_series(&rec, SeriesVariable::Force);
        assert_eq!(force, vec![(0.0, 0.0), (0.5, -12.0), (1.0, 3.0)]);

        let deg = extract_series(&rec, SeriesVariable::ThetaDeg);
        assert!((deg[1].1 + 0.3_f64.to_degrees()).abs() < 1e-12);
    }

    #[test]
    fn variable_names_parse() {
        for v in SeriesVariable::ALL {
            assert_eq!(v.as_str().parse::<SeriesVariable>().unwrap(), v);
        }
        assert_eq!("angle".parse::<SeriesVariable>().unwrap(), SeriesVariable::Theta);
        assert!("pressure".parse::<SeriesVariable>().is_err());
    }
}
