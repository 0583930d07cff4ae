use thiserror::Error;

use super::StoreError;

/// Failures of the user-facing record operations.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ActionError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type ActionResult<T> = Result<T, ActionError>;
