//! Display settings persisted with the board
//!
//! Piece sizes scale with the rendered field: a piece's diameter is a fixed
//! fraction of the field's shorter side.

use serde::{Deserialize, Serialize};

use crate::models::FieldSize;

/// Size preset for players and the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePreset {
    Small,
    #[default]
    Medium,
    Large,
}

impl SizePreset {
    /// Player diameter as a fraction of `min(field width, field height)`
    pub fn player_fraction(self) -> f64 {
        match self {
            SizePreset::Small => 0.03,
            SizePreset::Medium => 0.04,
            SizePreset::Large => 0.05,
        }
    }

    /// Ball diameter as a fraction of `min(field width, field height)`
    pub fn ball_fraction(self) -> f64 {
        match self {
            SizePreset::Small => 0.02,
            SizePreset::Medium => 0.03,
            SizePreset::Large => 0.04,
        }
    }
}

pub const DEFAULT_HOME_COLOR: &str = "#FF0000";
pub const DEFAULT_AWAY_COLOR: &str = "#0000FF";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub player_size: SizePreset,
    pub ball_size: SizePreset,
    pub home_color: String,
    pub away_color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_size: SizePreset::Medium,
            ball_size: SizePreset::Medium,
            home_color: DEFAULT_HOME_COLOR.to_string(),
            away_color: DEFAULT_AWAY_COLOR.to_string(),
        }
    }
}

impl Settings {
    pub fn player_diameter(&self, field: FieldSize) -> f64 {
        field.min_dimension() * self.player_size.player_fraction()
    }

    pub fn ball_diameter(&self, field: FieldSize) -> f64 {
        field.min_dimension() * self.ball_size.ball_fraction()
    }
}
