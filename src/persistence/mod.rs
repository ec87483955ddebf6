//! Save/load persistence
//!
//! Features:
//! - Flat key/value map (number | string | bool) with per-key type checks
//! - Versioned JSON save envelope for continuing a round
//! - Typed errors, defaults on corruption

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::Storage;
use crate::sim::GameState;

/// Current save envelope version
pub const SAVE_VERSION: u32 = 1;

/// Storage key for an in-progress round
pub const SAVE_KEY: &str = "ring_flight_save";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage backend error: {0}")]
    Storage(String),
    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("key '{key}' does not hold a {expected}")]
    InvalidValue { key: String, expected: &'static str },
}

/// A single persisted value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl StoredValue {
    fn type_name(&self) -> &'static str {
        match self {
            StoredValue::Bool(_) => "bool",
            StoredValue::Number(_) => "number",
            StoredValue::Text(_) => "string",
        }
    }
}

/// Flat key → value map, persisted as one JSON object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KvStore {
    entries: BTreeMap<String, StoredValue>,
}

impl KvStore {
    pub fn set(&mut self, key: &str, value: StoredValue) {
        self.entries.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&StoredValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Strict numeric lookup
    pub fn number(&self, key: &str) -> Result<Option<f64>, PersistenceError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(StoredValue::Number(n)) if n.is_finite() => Ok(Some(*n)),
            Some(_) => Err(PersistenceError::InvalidValue {
                key: key.to_string(),
                expected: "number",
            }),
        }
    }

    /// Strict string lookup
    pub fn text(&self, key: &str) -> Result<Option<&str>, PersistenceError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(StoredValue::Text(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(PersistenceError::InvalidValue {
                key: key.to_string(),
                expected: "string",
            }),
        }
    }

    /// Strict bool lookup
    pub fn boolean(&self, key: &str) -> Result<Option<bool>, PersistenceError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(StoredValue::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(PersistenceError::InvalidValue {
                key: key.to_string(),
                expected: "bool",
            }),
        }
    }

    /// Lenient lookups: a mistyped value is logged and treated as missing
    pub fn number_or_default(&self, key: &str) -> Option<f64> {
        self.number(key).unwrap_or_else(|e| self.warn_mistyped(e))
    }

    pub fn text_or_default(&self, key: &str) -> Option<&str> {
        self.text(key).unwrap_or_else(|e| self.warn_mistyped(e))
    }

    pub fn bool_or_default(&self, key: &str) -> Option<bool> {
        self.boolean(key).unwrap_or_else(|e| self.warn_mistyped(e))
    }

    fn warn_mistyped<T>(&self, err: PersistenceError) -> Option<T> {
        if let PersistenceError::InvalidValue { key, .. } = &err {
            let found = self.entries.get(key).map(|v| v.type_name()).unwrap_or("nothing");
            log::warn!("Ignoring stored value ({}, found {})", err, found);
        }
        None
    }

    /// Load the map stored under `key`; `Ok(None)` when absent
    pub fn load(storage: &dyn Storage, key: &str) -> Result<Option<Self>, PersistenceError> {
        match storage.get(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn save(&self, storage: &mut dyn Storage, key: &str) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(self)?;
        storage.set(key, &json)
    }
}

/// Versioned envelope around a resumable round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveGame {
    pub version: u32,
    pub state: GameState,
}

impl SaveGame {
    pub fn capture(state: &GameState) -> Self {
        Self {
            version: SAVE_VERSION,
            state: state.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        let save: SaveGame = serde_json::from_str(json)?;
        if save.version != SAVE_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: save.version,
                expected: SAVE_VERSION,
            });
        }
        Ok(save)
    }

    /// Restore the saved round with its ordering normalized
    pub fn into_state(self) -> GameState {
        let mut state = self.state;
        state.normalize_order();
        state
    }

    pub fn store(&self, storage: &mut dyn Storage) -> Result<(), PersistenceError> {
        storage.set(SAVE_KEY, &self.to_json()?)?;
        log::info!(
            "Game saved (score {}, {} rings)",
            self.state.player.score,
            self.state.player.rings_cleared
        );
        Ok(())
    }

    pub fn fetch(storage: &dyn Storage) -> Result<Option<Self>, PersistenceError> {
        match storage.get(SAVE_KEY)? {
            Some(json) => Self::from_json(&json).map(Some),
            None => Ok(None),
        }
    }

    pub fn clear(storage: &mut dyn Storage) -> Result<(), PersistenceError> {
        storage.remove(SAVE_KEY)?;
        log::info!("Saved game cleared");
        Ok(())
    }
}
