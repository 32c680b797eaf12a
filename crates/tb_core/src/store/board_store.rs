//! Typed board persistence over a [`KeyValueStore`]

use serde_json::Value;

use crate::config::StorageConfig;
use crate::models::{default_442, EntitySet, Play, Position};
use crate::settings::Settings;

use super::{KeyValueStore, StoreError};

/// Play collection contract
pub trait PlayStore {
    /// All plays in insertion order
    fn list(&self) -> Vec<Play>;
    fn append(&mut self, play: Play) -> Result<(), StoreError>;
    /// Returns `true` when a play with `id` existed.
    fn remove(&mut self, id: &str) -> Result<bool, StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;

    fn find(&self, id: &str) -> Option<Play> {
        self.list().into_iter().find(|p| p.id == id)
    }

    fn len(&self) -> usize {
        self.list().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Board state and plays under the configured keys
#[derive(Debug, Clone)]
pub struct BoardStore<K: KeyValueStore> {
    kv: K,
    keys: StorageConfig,
}

impl<K: KeyValueStore> BoardStore<K> {
    pub fn new(kv: K, keys: StorageConfig) -> Self {
        Self { kv, keys }
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn into_inner(self) -> K {
        self.kv
    }

    // ========================================
    // Board snapshot
    // ========================================

    /// Saved rosters and ball, each falling back to the default formation.
    pub fn load_entities(&self) -> EntitySet {
        let defaults = default_442();
        let mut set = EntitySet::new(
            self.kv.load(&self.keys.home_team_key, defaults.home_team),
            self.kv.load(&self.keys.away_team_key, defaults.away_team),
            self.kv.load(&self.keys.ball_position_key, defaults.ball_position),
        );
        set.clamp_all();
        set
    }

    pub fn save_entities(&mut self, set: &EntitySet) -> Result<(), StoreError> {
        self.save_home(&set.home_team)?;
        self.save_away(&set.away_team)?;
        self.save_ball(set.ball_position)
    }

    pub fn save_home(&mut self, home: &[Position]) -> Result<(), StoreError> {
        self.kv.save(&self.keys.home_team_key, home)
    }

    pub fn save_away(&mut self, away: &[Position]) -> Result<(), StoreError> {
        self.kv.save(&self.keys.away_team_key, away)
    }

    pub fn save_ball(&mut self, ball: Position) -> Result<(), StoreError> {
        self.kv.save(&self.keys.ball_position_key, &ball)
    }

    // ========================================
    // Settings
    // ========================================

    pub fn load_settings(&self) -> Settings {
        self.kv.load(&self.keys.settings_key, Settings::default())
    }

    pub fn save_settings(&mut self, settings: &Settings) -> Result<(), StoreError> {
        self.kv.save(&self.keys.settings_key, settings)
    }

    // ========================================
    // Plays
    // ========================================

    fn save_plays(&mut self, plays: &[Play]) -> Result<(), StoreError> {
        self.kv.save(&self.keys.plays_key, plays)
    }
}

impl<K: KeyValueStore> PlayStore for BoardStore<K> {
    /// Entries that are not plays are skipped.
    fn list(&self) -> Vec<Play> {
        let entries: Vec<Value> = self.kv.load(&self.keys.plays_key, Vec::new());
        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value::<Play>(entry) {
                Ok(play) => Some(play),
                Err(err) => {
                    tracing::warn!(index, error = %err, "skipping stored entry that is not a play");
                    None
                }
            })
            .collect()
    }

    fn append(&mut self, play: Play) -> Result<(), StoreError> {
        let mut plays = self.list();
        log::info!("Saving play {} ({})", play.id, play.name);
        plays.push(play);
        self.save_plays(&plays)
    }

    fn remove(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut plays = self.list();
        let before = plays.len();
        plays.retain(|p| p.id != id);
        if plays.len() == before {
            return Ok(false);
        }
        self.save_plays(&plays)?;
        log::info!("Deleted play {}", id);
        Ok(true)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.save_plays(&[])?;
        log::info!("Deleted all plays");
        Ok(())
    }
}
