//! Integration tests for run progress and timing reporting.

use cp_app::{
    RunOverrides, RunProgressEvent, RunRequest, RunResponse, RunStage, ScenarioSource,
    run_scenario,
};

fn collect_events(request: &RunRequest) -> (RunResponse, Vec<RunProgressEvent>) {
    let mut events = Vec::new();
    let response = run_scenario(request, Some(&mut |event| events.push(event)))
        .expect("run with progress should succeed");
    (response, events)
}

fn preset_request(name: &str, overrides: RunOverrides) -> RunRequest {
    RunRequest {
        source: ScenarioSource::Preset(name.to_string()),
        overrides,
    }
}

#[test]
fn stages_arrive_in_order() {
    let request = preset_request(
        "cascade_nominal",
        RunOverrides {
            t_end_s: Some(1.0),
            record_every: Some(50),
            ..RunOverrides::default()
        },
    );

    let (response, events) = collect_events(&request);

    let first = |stage: RunStage| events.iter().position(|e| e.stage == stage);
    let loading = first(RunStage::LoadingScenario).expect("loading stage");
    let compiling = first(RunStage::Compiling).expect("compile stage");
    let running = first(RunStage::Running).expect("running stage");
    let completed = first(RunStage::Completed).expect("completed stage");
    assert!(loading < compiling && compiling < running && running < completed);
    assert_eq!(completed, events.len() - 1);

    assert!(
        events
            .windows(2)
            .all(|w| w[0].elapsed_wall_s <= w[1].elapsed_wall_s)
    );

    assert_eq!(response.record.len(), 3);
    assert_eq!(response.timing.steps, 100);
    assert!(response.timing.total_time_s >= response.timing.run_time_s);
}

#[test]
fn simulation_progress_reaches_completion() {
    let request = preset_request(
        "cascade_nominal",
        RunOverrides {
            t_end_s: Some(1.0),
            record_every: Some(25),
            ..RunOverrides::default()
        },
    );

    let (_response, events) = collect_events(&request);

    let sim: Vec<_> = events.iter().filter_map(|e| e.simulation.clone()).collect();
    let steps: Vec<usize> = sim.iter().map(|p| p.step).collect();
    assert_eq!(steps, vec![0, 25, 50, 75, 100]);
    assert!(
        sim.windows(2)
            .all(|w| w[0].fraction_complete < w[1].fraction_complete)
    );
    let last = sim.last().unwrap();
    assert_eq!(last.fraction_complete, 1.0);
    assert!((last.sim_time_s - 1.0).abs() < 1e-9);
    assert_eq!(last.t_end_s, 1.0);
}

#[test]
fn dt_override_changes_step_count() {
    let request = preset_request(
        "single_pid",
        RunOverrides {
            dt_s: Some(0.005),
            t_end_s: Some(0.5),
            record_every: None,
        },
    );

    let response = run_scenario(&request, None).unwrap();
    assert_eq!(response.timing.steps, 100);
    assert_eq!(response.record.len(), 101);
    assert!((response.summary.time_range.1 - 0.5).abs() < 1e-9);
}

#[test]
fn invalid_override_fails_validation() {
    let request = preset_request(
        "cascade_nominal",
        RunOverrides {
            dt_s: Some(-0.01),
            ..RunOverrides::default()
        },
    );

    let mut stages = Vec::new();
    let err = run_scenario(&request, Some(&mut |e: RunProgressEvent| stages.push(e.stage)))
        .unwrap_err();
    assert!(matches!(err, cp_app::AppError::Validation(_)), "{err}");
    assert!(!stages.contains(&RunStage::Running));
}
