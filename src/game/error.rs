use thiserror::Error;

/// Per-message failures. None of these are fatal: the room logs them and moves on.
#[derive(Debug, Error)]
pub enum RoomError {
    #[error("session {0} has no registered player")]
    StaleSession(String),

    #[error("player {0} is not registered")]
    UnknownPlayer(String),

    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("non-finite position ({x}, {y})")]
    InvalidPosition { x: f64, y: f64 },
}

impl RoomError {
    /// Stale references are an expected race with disconnects, not worth a warning.
    pub fn is_expected(&self) -> bool {
        matches!(self, RoomError::StaleSession(_) | RoomError::UnknownPlayer(_))
    }
}
