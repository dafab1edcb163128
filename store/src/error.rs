use thiserror::Error;
use types::GameError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store connection error: {0}")]
    Connection(String),

    #[error("query execution error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // handled by the retry loop, callers normally never see it
    #[error("write conflict on room {0}")]
    Conflict(String),

    #[error("retry exhausted after {attempts} attempts on room {room_id}")]
    RetryExhausted { room_id: String, attempts: usize },

    #[error("room not found: {0}")]
    RoomNotFound(String),

    // operation rejections surface unchanged and are never retried
    #[error(transparent)]
    Game(#[from] GameError),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}
