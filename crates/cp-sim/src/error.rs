//! Error types for simulation setup.

use cp_controls::ControlError;
use cp_plant::PlantError;
use thiserror::Error;

/// Configuration errors surfaced when a session or run is set up. Ticks
/// themselves never fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Plant error: {0}")]
    Plant(#[from] PlantError),

    #[error("Control error: {0}")]
    Control(#[from] ControlError),
}

pub type SimResult<T> = Result<T, SimError>;
