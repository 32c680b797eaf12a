//! # Board Configuration
//!
//! Tunables for playback and the storage key layout.
//!
//! ## Usage
//! ```rust
//! use tb_core::config::BoardConfig;
//!
//! let config = BoardConfig::default();
//! let review = BoardConfig::fast_review();
//! assert!(review.playback.frame_duration_ms < config.playback.frame_duration_ms);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};
use crate::replay::{DEFAULT_FRAME_DURATION_MS, DEFAULT_SPEED};

/// Speeds a UI offers in its picker
pub const SPEED_OPTIONS: [f64; 4] = [0.5, 1.0, 2.0, 4.0];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BoardConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Base duration of one frame (milliseconds)
    pub frame_duration_ms: u64,
    pub speed_options: Vec<f64>,
    pub default_speed: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            frame_duration_ms: DEFAULT_FRAME_DURATION_MS,
            speed_options: SPEED_OPTIONS.to_vec(),
            default_speed: DEFAULT_SPEED,
        }
    }
}

impl PlaybackConfig {
    pub fn frame_duration(&self) -> Duration {
        Duration::from_millis(self.frame_duration_ms)
    }
}

/// Key names in the key-value store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub home_team_key: String,
    pub away_team_key: String,
    pub ball_position_key: String,
    pub settings_key: String,
    pub plays_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            home_team_key: "homeTeam".to_string(),
            away_team_key: "awayTeam".to_string(),
            ball_position_key: "ballPosition".to_string(),
            settings_key: "fieldSettings".to_string(),
            plays_key: "plays".to_string(),
        }
    }
}

impl BoardConfig {
    /// 40 ms frames, speeds 0.5x to 4x
    pub fn standard() -> Self {
        Self::default()
    }

    /// Twice the frame rate, for skimming long recordings
    pub fn fast_review() -> Self {
        let mut cfg = Self::default();
        cfg.playback.frame_duration_ms = 20;
        cfg
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| BoardError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Config at `path`, or the defaults when no path is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let p = &self.playback;
        if p.frame_duration_ms == 0 {
            return Err(BoardError::Config("playback.frame_duration_ms must be positive".into()));
        }
        if !is_valid_speed(p.default_speed) {
            return Err(BoardError::Config(format!(
                "playback.default_speed must be positive, got {}",
                p.default_speed
            )));
        }
        if let Some(bad) = p.speed_options.iter().find(|s| !is_valid_speed(**s)) {
            return Err(BoardError::Config(format!(
                "playback.speed_options must be positive, got {}",
                bad
            )));
        }

        let s = &self.storage;
        let keys = [
            &s.home_team_key,
            &s.away_team_key,
            &s.ball_position_key,
            &s.settings_key,
            &s.plays_key,
        ];
        if keys.iter().any(|k| k.is_empty()) {
            return Err(BoardError::Config("storage keys must not be empty".into()));
        }
        Ok(())
    }
}

fn is_valid_speed(speed: f64) -> bool {
    speed.is_finite() && speed > 0.0
}
