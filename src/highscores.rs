//! Per-tier high scores
//!
//! Persisted as flat `high_score.<tier>` / `best_rings.<tier>` number keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::persistence::{KvStore, PersistenceError, StoredValue};
use crate::platform::Storage;
use crate::settings::DifficultyTier;

/// Best result for one tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Rings passed (the score)
    pub score: u64,
    /// Rings cleared in that run
    pub rings: u32,
}

/// Best score per difficulty tier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighScores {
    pub best: BTreeMap<DifficultyTier, HighScoreEntry>,
}

impl HighScores {
    /// Storage key (separate from settings so a settings reset keeps bests)
    pub const STORAGE_KEY: &'static str = "ring_flight_highscores";

    /// Create empty table
    pub fn new() -> Self {
        Self {
            best: BTreeMap::new(),
        }
    }

    /// Best score for a tier (0 if none yet)
    pub fn best_score(&self, tier: DifficultyTier) -> u64 {
        self.best.get(&tier).map(|e| e.score).unwrap_or(0)
    }

    /// Check if a score beats the tier's best
    pub fn qualifies(&self, tier: DifficultyTier, score: u64) -> bool {
        score > 0 && score > self.best_score(tier)
    }

    /// Record a finished run. Returns true if it became the new best
    pub fn record(&mut self, tier: DifficultyTier, score: u64, rings: u32) -> bool {
        if !self.qualifies(tier, score) {
            return false;
        }
        self.best.insert(tier, HighScoreEntry { score, rings });
        true
    }

    /// Follow a live round: record `score` and write through as soon as it
    /// beats the stored best. Returns true if anything was written.
    pub fn track(
        &mut self,
        tier: DifficultyTier,
        score: u64,
        rings: u32,
        storage: &mut dyn Storage,
    ) -> Result<bool, PersistenceError> {
        if !self.record(tier, score, rings) {
            return Ok(false);
        }
        self.save(storage)?;
        Ok(true)
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }

    fn score_key(tier: DifficultyTier) -> String {
        format!("high_score.{}", tier.as_str())
    }

    fn rings_key(tier: DifficultyTier) -> String {
        format!("best_rings.{}", tier.as_str())
    }

    pub fn to_store(&self, store: &mut KvStore) {
        for (tier, entry) in &self.best {
            store.set(&Self::score_key(*tier), StoredValue::Number(entry.score as f64));
            store.set(&Self::rings_key(*tier), StoredValue::Number(entry.rings as f64));
        }
    }

    pub fn from_store(store: &KvStore) -> Self {
        let mut scores = Self::new();
        for tier in DifficultyTier::ALL {
            let Some(score) = store.number_or_default(&Self::score_key(tier)) else {
                continue;
            };
            if score < 1.0 {
                continue;
            }
            let rings = store.number_or_default(&Self::rings_key(tier)).unwrap_or(0.0);
            scores.best.insert(
                tier,
                HighScoreEntry {
                    score: score as u64,
                    rings: rings.max(0.0) as u32,
                },
            );
        }
        scores
    }

    /// Load high scores from a storage backend
    pub fn load(storage: &dyn Storage) -> Self {
        match KvStore::load(storage, Self::STORAGE_KEY) {
            Ok(Some(store)) => {
                let scores = Self::from_store(&store);
                log::info!("Loaded high scores for {} tiers", scores.best.len());
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("High scores unreadable ({}), starting fresh", e);
                Self::new()
            }
        }
    }

    /// Save high scores to a storage backend
    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), PersistenceError> {
        let mut store = KvStore::default();
        self.to_store(&mut store);
        store.save(storage, Self::STORAGE_KEY)?;
        log::info!("High scores saved ({} tiers)", self.best.len());
        Ok(())
    }
}
