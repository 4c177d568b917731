//! Run execution service.

use std::time::Instant;

use cp_controls::ControlPolicy;
use cp_core::timing::tick_timing;
use cp_sim::{SimProgress, SimRecord};
use tracing::info;

use crate::error::AppResult;
use crate::metrics::{LoopMetrics, compute_loop_metrics};
use crate::progress::{RunProgressEvent, RunStage, SimulationProgress};
use crate::query::{RunSummary, SeriesVariable, extract_series, get_run_summary};
use crate::scenario_compile::compile_scenario;
use crate::scenario_service::{ScenarioSource, resolve_scenario};

/// Command-line style overrides of the scenario's run block.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub dt_s: Option<f64>,
    pub t_end_s: Option<f64>,
    pub record_every: Option<usize>,
}

/// Request to execute a run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub source: ScenarioSource,
    pub overrides: RunOverrides,
}

/// Concise timing and execution summary for a run.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub compile_time_s: f64,
    pub run_time_s: f64,
    pub total_time_s: f64,
    pub steps: usize,
    pub avg_tick_us: f64,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub scenario_name: String,
    pub record: SimRecord,
    pub summary: RunSummary,
    /// Pole angle regulated toward upright, force as the actuator.
    pub metrics: LoopMetrics,
    pub timing: RunTimingSummary,
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: Option<String>,
    simulation: Option<SimulationProgress>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent {
            stage,
            elapsed_wall_s: started.elapsed().as_secs_f64(),
            message,
            simulation,
        });
    }
}

/// Resolve, compile and run a scenario to completion, streaming progress.
pub fn run_scenario(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();

    emit_progress(
        &mut progress_cb,
        RunStage::LoadingScenario,
        started,
        Some("Loading scenario".to_string()),
        None,
    );

    let mut scenario = resolve_scenario(&request.source)?;
    let overrides = &request.overrides;
    if let Some(dt) = overrides.dt_s {
        scenario.run.dt_s = dt;
    }
    if let Some(t_end) = overrides.t_end_s {
        scenario.run.t_end_s = t_end;
    }
    if let Some(every) = overrides.record_every {
        scenario.run.record_every = every;
    }

    emit_progress(
        &mut progress_cb,
        RunStage::Compiling,
        started,
        Some(format!("Compiling '{}'", scenario.name)),
        None,
    );

    let compile_start = Instant::now();
    let mut compiled = compile_scenario(&scenario)?;
    timing.compile_time_s = compile_start.elapsed().as_secs_f64();

    emit_progress(
        &mut progress_cb,
        RunStage::Running,
        started,
        Some(format!(
            "Running {} to t = {} s",
            compiled.session.policy().name(),
            compiled.options.t_end
        )),
        None,
    );

    tick_timing::reset_all();
    let run_start = Instant::now();
    let record = {
        let mut on_sim = |p: SimProgress| {
            emit_progress(
                &mut progress_cb,
                RunStage::Running,
                started,
                None,
                Some(SimulationProgress::from(&p)),
            );
        };
        cp_sim::run_sim_with_progress(&mut compiled.session, &compiled.options, Some(&mut on_sim))?
    };
    timing.run_time_s = run_start.elapsed().as_secs_f64();
    timing.steps = record.steps;
    if record.steps > 0 {
        timing.avg_tick_us = timing.run_time_s / record.steps as f64 * 1e6;
    }
    tick_timing::log_summary();

    let summary = get_run_summary(&record)?;
    let metrics = compute_loop_metrics(
        &extract_series(&record, SeriesVariable::Theta),
        0.0,
        Some(&extract_series(&record, SeriesVariable::Force)),
        Some(compiled.limits.force_limit),
    )?;

    timing.total_time_s = started.elapsed().as_secs_f64();
    info!(
        scenario = %compiled.name,
        steps = timing.steps,
        run_time_s = timing.run_time_s,
        "run complete"
    );

    emit_progress(
        &mut progress_cb,
        RunStage::Completed,
        started,
        Some("Run complete".to_string()),
        None,
    );

    Ok(RunResponse {
        scenario_name: compiled.name,
        record,
        summary,
        metrics,
        timing,
    })
}
