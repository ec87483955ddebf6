//! Game settings and preferences
//!
//! Persisted separately from game saves as a flat key/value map.

use serde::{Deserialize, Serialize};

use crate::persistence::{KvStore, StoredValue};

/// Difficulty tier presets
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum DifficultyTier {
    Easy,
    #[default]
    Normal,
    Hard,
    Expert,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 4] = [
        DifficultyTier::Easy,
        DifficultyTier::Normal,
        DifficultyTier::Hard,
        DifficultyTier::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Easy => "easy",
            DifficultyTier::Normal => "normal",
            DifficultyTier::Hard => "hard",
            DifficultyTier::Expert => "expert",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(DifficultyTier::Easy),
            "normal" | "med" | "medium" => Some(DifficultyTier::Normal),
            "hard" => Some(DifficultyTier::Hard),
            "expert" | "pro" => Some(DifficultyTier::Expert),
            _ => None,
        }
    }

    /// Hard tier plays in themed sections instead of free pattern picks
    pub fn uses_sections(&self) -> bool {
        matches!(self, DifficultyTier::Hard)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Selected difficulty tier
    pub tier: DifficultyTier,
    /// Collapse movement to the horizontal axis (no gravity, no vertical lanes)
    pub single_axis: bool,
    /// Lives lost when a ring clips the tube edge (0 = forgiving)
    pub edge_miss_penalty: u8,

    // === Audio (consumed by the audio collaborator) ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tier: DifficultyTier::Normal,
            single_axis: false,
            edge_miss_penalty: 0,

            master_volume: 0.8,
            sfx_volume: 1.0,
            mute_on_blur: true,
        }
    }
}

impl Settings {
    /// Storage key the settings map is persisted under
    pub const STORAGE_KEY: &'static str = "ring_flight_settings";

    const KEY_TIER: &'static str = "tier";
    const KEY_SINGLE_AXIS: &'static str = "single_axis";
    const KEY_EDGE_PENALTY: &'static str = "edge_miss_penalty";
    const KEY_MASTER_VOLUME: &'static str = "master_volume";
    const KEY_SFX_VOLUME: &'static str = "sfx_volume";
    const KEY_MUTE_ON_BLUR: &'static str = "mute_on_blur";

    /// Create settings for a tier (other fields default)
    pub fn for_tier(tier: DifficultyTier) -> Self {
        Self {
            tier,
            ..Self::default()
        }
    }

    /// Flatten into the persisted key/value shape
    pub fn to_store(&self, store: &mut KvStore) {
        store.set(Self::KEY_TIER, StoredValue::Text(self.tier.as_str().to_string()));
        store.set(Self::KEY_SINGLE_AXIS, StoredValue::Bool(self.single_axis));
        store.set(
            Self::KEY_EDGE_PENALTY,
            StoredValue::Number(self.edge_miss_penalty as f64),
        );
        store.set(
            Self::KEY_MASTER_VOLUME,
            StoredValue::Number(self.master_volume as f64),
        );
        store.set(Self::KEY_SFX_VOLUME, StoredValue::Number(self.sfx_volume as f64));
        store.set(Self::KEY_MUTE_ON_BLUR, StoredValue::Bool(self.mute_on_blur));
    }

    /// Rebuild from a key/value map; missing or mistyped keys keep defaults
    pub fn from_store(store: &KvStore) -> Self {
        let defaults = Self::default();

        let tier = match store.text_or_default(Self::KEY_TIER) {
            Some(name) => DifficultyTier::from_str(name).unwrap_or_else(|| {
                log::warn!("Unknown tier '{}', using {}", name, defaults.tier.as_str());
                defaults.tier
            }),
            None => defaults.tier,
        };

        let edge_miss_penalty = store
            .number_or_default(Self::KEY_EDGE_PENALTY)
            .map(|n| n.clamp(0.0, crate::consts::MAX_LIVES as f64) as u8)
            .unwrap_or(defaults.edge_miss_penalty);

        let volume = |key: &str, fallback: f32| {
            store
                .number_or_default(key)
                .map(|n| (n as f32).clamp(0.0, 1.0))
                .unwrap_or(fallback)
        };

        Self {
            tier,
            single_axis: store
                .bool_or_default(Self::KEY_SINGLE_AXIS)
                .unwrap_or(defaults.single_axis),
            edge_miss_penalty,
            master_volume: volume(Self::KEY_MASTER_VOLUME, defaults.master_volume),
            sfx_volume: volume(Self::KEY_SFX_VOLUME, defaults.sfx_volume),
            mute_on_blur: store
                .bool_or_default(Self::KEY_MUTE_ON_BLUR)
                .unwrap_or(defaults.mute_on_blur),
        }
    }

    /// Load settings from a storage backend, falling back to defaults
    pub fn load(storage: &dyn crate::platform::Storage) -> Self {
        match KvStore::load(storage, Self::STORAGE_KEY) {
            Ok(Some(store)) => {
                log::info!("Loaded settings");
                Self::from_store(&store)
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unreadable ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to a storage backend
    pub fn save(
        &self,
        storage: &mut dyn crate::platform::Storage,
    ) -> Result<(), crate::persistence::PersistenceError> {
        let mut store = KvStore::load(storage, Self::STORAGE_KEY)
            .ok()
            .flatten()
            .unwrap_or_default();
        self.to_store(&mut store);
        store.save(storage, Self::STORAGE_KEY)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;

    #[test]
    fn test_tier_names_round_trip() {
        for tier in DifficultyTier::ALL {
            assert_eq!(DifficultyTier::from_str(tier.as_str()), Some(tier));
        }
        assert_eq!(DifficultyTier::from_str("EXPERT"), Some(DifficultyTier::Expert));
        assert_eq!(DifficultyTier::from_str("nightmare"), None);
    }

    #[test]
    fn test_settings_save_load() {
        let mut storage = MemoryStorage::default();
        let settings = Settings {
            tier: DifficultyTier::Hard,
            single_axis: true,
            edge_miss_penalty: 1,
            ..Settings::default()
        };
        settings.save(&mut storage).unwrap();
        assert_eq!(Settings::load(&storage), settings);
    }

    #[test]
    fn test_mistyped_keys_fall_back() {
        let mut store = KvStore::default();
        store.set("tier", StoredValue::Number(3.0));
        store.set("single_axis", StoredValue::Text("yes".into()));
        store.set("master_volume", StoredValue::Number(4.0));

        let settings = Settings::from_store(&store);
        assert_eq!(settings.tier, DifficultyTier::Normal);
        assert!(!settings.single_axis);
        assert_eq!(settings.master_volume, 1.0);
    }

    #[test]
    fn test_missing_storage_uses_defaults() {
        let storage = MemoryStorage::default();
        assert_eq!(Settings::load(&storage), Settings::default());
    }
}
