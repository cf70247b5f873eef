use thiserror::Error;

/// Failures surfaced by the discovery engine and its session.
///
/// None of these leave the store half-updated: validation happens before any
/// mutation, and persistence failures never roll back in-memory state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The caller offered an element the player has not discovered.
    #[error("element `{id}` has not been discovered")]
    InvalidInput { id: String },
    /// The persisted blob could not be parsed into a store.
    #[error("saved game is corrupt: {0}")]
    CorruptState(String),
    /// Writing or clearing the save slot failed.
    #[error("could not write saved game: {0}")]
    PersistenceWriteFailure(String),
    /// Reading the save slot failed.
    #[error("could not read saved game: {0}")]
    PersistenceReadFailure(String),
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        Self::CorruptState(err.to_string())
    }
}
