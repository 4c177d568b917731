//! Shared application service layer for the cart-pole workspace.
//!
//! Frontends resolve a scenario (file or preset), compile it into a live
//! `Session`, run it with progress reporting and query the result. Nothing
//! here writes results to disk.

pub mod error;
pub mod metrics;
pub mod progress;
pub mod query;
pub mod run_service;
pub mod scenario_compile;
pub mod scenario_service;

pub use error::{AppError, AppResult};
pub use metrics::{LoopMetrics, compute_loop_metrics};
pub use progress::{RunProgressEvent, RunStage};
pub use query::{RunSummary, SeriesVariable, extract_series, get_run_summary};
pub use run_service::{RunOverrides, RunRequest, RunResponse, RunTimingSummary, run_scenario};
pub use scenario_compile::{CompiledScenario, compile_policy, compile_scenario};
pub use scenario_service::{
    PresetSummary, ScenarioSource, list_presets, load_scenario, resolve_scenario, save_scenario,
};
