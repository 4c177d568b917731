//! Error types for control policy construction.

use cp_core::CoreError;
use thiserror::Error;

pub type ControlResult<T> = Result<T, ControlError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided when building a policy.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl From<CoreError> for ControlError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NonFinite { what, .. } | CoreError::InvalidArg { what } => {
                ControlError::InvalidArg { what }
            }
        }
    }
}
