//! Recording scripts
//!
//! A script is a JSON list of moves replayed onto the board while recording:
//!
//! ```json
//! {
//!   "moves": [
//!     { "entity": { "home": 0 }, "x": 0.1, "y": 0.1 },
//!     { "entity": "ball", "x": 0.2, "y": 0.0, "after_ms": 250 }
//!   ]
//! }
//! ```
//!
//! `after_ms` is the pause before the move (default one 40 ms frame).

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use tb_core::{Entity, Position};

pub const DEFAULT_STEP_MS: i64 = 40;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    pub moves: Vec<ScriptMove>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptMove {
    pub entity: Entity,
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_step_ms")]
    pub after_ms: i64,
}

fn default_step_ms() -> i64 {
    DEFAULT_STEP_MS
}

impl ScriptMove {
    /// Target position, clamped onto the field.
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

impl Script {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("script is not valid JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::parse(&json).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_moves() {
        let script = Script::parse(
            r#"{"moves":[
                {"entity":{"home":0},"x":0.1,"y":0.1},
                {"entity":"ball","x":0.9,"y":0.0,"after_ms":250}
            ]}"#,
        )
        .unwrap();

        assert_eq!(script.moves.len(), 2);
        assert_eq!(script.moves[0].entity, Entity::Home(0));
        assert_eq!(script.moves[0].after_ms, DEFAULT_STEP_MS);
        assert_eq!(script.moves[1].position(), Position::new(0.5, 0.0));
    }

    #[test]
    fn test_rejects_unknown_entity() {
        let err = Script::parse(r#"{"moves":[{"entity":"referee","x":0,"y":0}]}"#);
        assert!(err.is_err());
    }
}
