use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GameError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("precondition not met: {0}")]
    Precondition(String),
}

impl GameError {
    pub fn validation(msg: impl Into<String>) -> Self {
        GameError::Validation(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        GameError::Precondition(msg.into())
    }
}
