//! File-backed stores for profiles and high scores

pub mod profiles;
pub mod scores;

pub use profiles::ProfileStore;
pub use scores::{HighScoreBoard, HighScoreRecord, ScoreStore};

/// Store persistence errors. Loads never surface these; saves do.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
