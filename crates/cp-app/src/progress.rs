//! Progress events emitted while a scenario runs.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    LoadingScenario,
    Compiling,
    Running,
    Completed,
}

#[derive(Debug, Clone, Default)]
pub struct SimulationProgress {
    pub sim_time_s: f64,
    pub t_end_s: f64,
    pub fraction_complete: f64,
    pub step: usize,
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub simulation: Option<SimulationProgress>,
}

impl RunStage {
    pub fn label(self) -> &'static str {
        match self {
            RunStage::LoadingScenario => "Loading scenario",
            RunStage::Compiling => "Compiling",
            RunStage::Running => "Running",
            RunStage::Completed => "Completed",
        }
    }
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
            simulation: None,
        }
    }
}

impl From<&cp_sim::SimProgress> for SimulationProgress {
    fn from(p: &cp_sim::SimProgress) -> Self {
        Self {
            sim_time_s: p.sim_time,
            t_end_s: p.t_end,
            fraction_complete: p.fraction_complete,
            step: p.step,
        }
    }
}
