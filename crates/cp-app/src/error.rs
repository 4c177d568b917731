//! Error types for the cp-app service layer.

use std::path::PathBuf;

/// Unified error for CLI frontends. Backend errors are carried as strings.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Failed to read scenario file: {path}")]
    ScenarioFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scenario validation failed: {0}")]
    Validation(String),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Scenario compilation failed: {0}")]
    Compile(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cp-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<cp_project::ProjectError> for AppError {
    fn from(err: cp_project::ProjectError) -> Self {
        match err {
            cp_project::ProjectError::Validation(v) => AppError::Validation(v.to_string()),
            cp_project::ProjectError::UnknownPreset { name } => AppError::UnknownPreset(name),
            other => AppError::Scenario(other.to_string()),
        }
    }
}

impl From<cp_project::ValidationError> for AppError {
    fn from(err: cp_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<cp_sim::SimError> for AppError {
    fn from(err: cp_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<cp_plant::PlantError> for AppError {
    fn from(err: cp_plant::PlantError) -> Self {
        AppError::Compile(err.to_string())
    }
}

impl From<cp_controls::ControlError> for AppError {
    fn from(err: cp_controls::ControlError) -> Self {
        AppError::Compile(err.to_string())
    }
}
