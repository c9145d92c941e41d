//! Per-map high score persistence and promotion

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::StoreError;
use crate::sim::run::{MapKind, RunSummary};

/// Best finished run recorded for one map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub score: f32,
    pub shots: u32,
    pub hits: u32,
    pub accuracy: f32,
    /// Display name of the game profile the run was played with
    pub game: String,
    pub duration_secs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achieved_at: Option<DateTime<Utc>>,
}

impl Default for HighScoreRecord {
    fn default() -> Self {
        Self {
            score: 0.0,
            shots: 0,
            hits: 0,
            accuracy: 0.0,
            game: "-".to_string(),
            duration_secs: 0,
            achieved_at: None,
        }
    }
}

/// Partial record as persisted: absent fields fall back to the zeroed default
#[derive(Debug, Default, Deserialize)]
struct RecordPatch {
    score: Option<f32>,
    shots: Option<u32>,
    hits: Option<u32>,
    accuracy: Option<f32>,
    game: Option<String>,
    duration_secs: Option<u32>,
    achieved_at: Option<DateTime<Utc>>,
}

impl RecordPatch {
    fn apply(self, base: &mut HighScoreRecord) {
        if let Some(score) = self.score {
            base.score = score;
        }
        if let Some(shots) = self.shots {
            base.shots = shots;
        }
        if let Some(hits) = self.hits {
            base.hits = hits;
        }
        if let Some(accuracy) = self.accuracy {
            base.accuracy = accuracy;
        }
        if let Some(game) = self.game {
            base.game = game;
        }
        if let Some(duration) = self.duration_secs {
            base.duration_secs = duration;
        }
        if let Some(achieved_at) = self.achieved_at {
            base.achieved_at = Some(achieved_at);
        }
    }
}

/// High scores for every map, keyed by the map's storage key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScoreBoard {
    records: BTreeMap<String, HighScoreRecord>,
}

impl Default for HighScoreBoard {
    fn default() -> Self {
        let records = MapKind::ALL
            .iter()
            .map(|map| (map.key().to_string(), HighScoreRecord::default()))
            .collect();
        Self { records }
    }
}

impl HighScoreBoard {
    pub fn record(&self, map: MapKind) -> HighScoreRecord {
        self.records.get(map.key()).cloned().unwrap_or_default()
    }

    /// Promote a finished run iff its score strictly exceeds the stored one.
    /// Ties never overwrite. Returns whether a new record was set.
    pub fn try_promote(&mut self, summary: &RunSummary) -> bool {
        let current = self.record(summary.map).score;
        if summary.score <= current {
            return false;
        }

        self.records.insert(
            summary.map.key().to_string(),
            HighScoreRecord {
                score: summary.score,
                shots: summary.shots,
                hits: summary.hits,
                accuracy: summary.accuracy,
                game: summary.game.clone(),
                duration_secs: summary.duration_secs,
                achieved_at: Some(Utc::now()),
            },
        );
        true
    }

    /// Reset every map to a zeroed record
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Loads and saves the high score board
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the board, merging any persisted records field-by-field over the
    /// zeroed defaults, per map. Missing or corrupt storage is never fatal.
    pub fn load(&self) -> HighScoreBoard {
        let mut board = HighScoreBoard::default();

        match fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, RecordPatch>>(&raw) {
                Ok(stored) => {
                    for (key, patch) in stored {
                        if let Some(base) = board.records.get_mut(&key) {
                            patch.apply(base);
                        }
                    }
                }
                Err(err) => {
                    warn!(path = %self.path.display(), %err, "Malformed score file, using zeroed board");
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %self.path.display(), %err, "Failed to read score file, using zeroed board");
            }
        }

        board
    }

    pub fn save(&self, board: &HighScoreBoard) -> Result<(), StoreError> {
        fs::write(&self.path, serde_json::to_string_pretty(board)?)?;
        Ok(())
    }
}
