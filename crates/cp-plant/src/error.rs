//! Error types for plant construction.

use cp_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlantError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}

pub type PlantResult<T> = Result<T, PlantError>;

impl From<CoreError> for PlantError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NonFinite { what, value } => PlantError::NonFinite { what, value },
            CoreError::InvalidArg { what } => PlantError::InvalidArg { what },
        }
    }
}
