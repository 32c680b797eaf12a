//! Persistence
//!
//! ## Layers
//! - [`KeyValueStore`]: string values under string keys (the host's local storage)
//! - [`BoardStore`]: typed access on top of it: rosters, ball, settings, plays
//! - [`PlayStore`]: the play collection contract
//!
//! Values are JSON. Reads are forgiving: a key that is missing or does not parse
//! yields the caller's default. Writes report failures.

mod board_store;
mod error;
mod file_store;
mod memory;

pub use board_store::{BoardStore, PlayStore};
pub use error::StoreError;
pub use file_store::JsonFileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Persisted key-value storage
pub trait KeyValueStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_raw(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_raw(&mut self, key: &str) -> Result<(), StoreError>;

    /// Decode `key`, falling back to `default` when it is missing, unreadable or
    /// malformed.
    fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T
    where
        Self: Sized,
    {
        let raw = match self.get_raw(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(err) => {
                log::warn!("Failed to read {}: {}", key, err);
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("Stored {} is malformed, using default: {}", key, err);
                default
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StoreError>
    where
        Self: Sized,
    {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json)
    }
}
