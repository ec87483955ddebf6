//! Data-driven game balance
//!
//! Every per-tier number the simulation reads lives in this table.

use crate::consts::PATTERN_AMPLITUDE_MAX;
use crate::settings::DifficultyTier;

/// Balance constants for one difficulty tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierTuning {
    /// Assumed player efficiency at the start of a round
    pub efficiency_floor: f32,
    /// Assumed player efficiency after the progression window
    pub efficiency_ceiling: f32,
    /// Travel-time buffer at the start of a round
    pub buffer_start: f32,
    /// Travel-time buffer after the progression window
    pub buffer_floor: f32,
    /// Reaction time added to every reach estimate (seconds)
    pub reaction_time: f32,
    /// Ring diameter multiplier
    pub size_multiplier: f32,
    /// Seconds between spawn attempts
    pub spawn_interval: f32,
    /// Multiplier on physics-derived approach speed
    pub speed_multiplier: f32,
    /// Minimum gap between any two pending plane arrivals (seconds)
    pub min_separation: f32,
    /// Momentum safeguard arrival gap (seconds)
    pub momentum_gap: f32,
    /// Lanes further than this fraction of the tier's widest pattern are bonus rings
    pub bonus_distance_ratio: f32,
    /// Chance a bonus ring grants a life
    pub life_chance: f32,
    /// Pattern amplitude multiplier
    pub amplitude_scale: f32,
}

const EASY: TierTuning = TierTuning {
    efficiency_floor: 0.45,
    efficiency_ceiling: 0.70,
    buffer_start: 2.0,
    buffer_floor: 1.45,
    reaction_time: 0.45,
    size_multiplier: 1.25,
    spawn_interval: 1.6,
    speed_multiplier: 0.85,
    min_separation: 0.45,
    momentum_gap: 1.8,
    bonus_distance_ratio: 0.60,
    life_chance: 0.5,
    amplitude_scale: 0.7,
};

const NORMAL: TierTuning = TierTuning {
    efficiency_floor: 0.55,
    efficiency_ceiling: 0.80,
    buffer_start: 1.8,
    buffer_floor: 1.3,
    reaction_time: 0.35,
    size_multiplier: 1.0,
    spawn_interval: 1.35,
    speed_multiplier: 1.0,
    min_separation: 0.55,
    momentum_gap: 1.6,
    bonus_distance_ratio: 0.70,
    life_chance: 0.35,
    amplitude_scale: 0.85,
};

const HARD: TierTuning = TierTuning {
    efficiency_floor: 0.70,
    efficiency_ceiling: 0.90,
    buffer_start: 1.5,
    buffer_floor: 1.15,
    reaction_time: 0.28,
    size_multiplier: 0.9,
    spawn_interval: 1.15,
    speed_multiplier: 1.1,
    min_separation: 0.65,
    momentum_gap: 1.3,
    bonus_distance_ratio: 0.80,
    life_chance: 0.2,
    amplitude_scale: 1.0,
};

const EXPERT: TierTuning = TierTuning {
    efficiency_floor: 0.85,
    efficiency_ceiling: 0.97,
    buffer_start: 1.3,
    buffer_floor: 1.05,
    reaction_time: 0.22,
    size_multiplier: 0.8,
    spawn_interval: 0.95,
    speed_multiplier: 1.2,
    min_separation: 0.75,
    momentum_gap: 1.1,
    bonus_distance_ratio: 0.90,
    life_chance: 0.1,
    amplitude_scale: 1.1,
};

impl TierTuning {
    /// Player-to-lane distance beyond which a new ring is a bonus ring
    pub fn bonus_distance(&self) -> f32 {
        self.bonus_distance_ratio * self.amplitude_scale * PATTERN_AMPLITUDE_MAX
    }
}

impl DifficultyTier {
    /// Balance table for this tier
    pub fn tuning(&self) -> &'static TierTuning {
        match self {
            DifficultyTier::Easy => &EASY,
            DifficultyTier::Normal => &NORMAL,
            DifficultyTier::Hard => &HARD,
            DifficultyTier::Expert => &EXPERT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harder_tiers_are_stricter() {
        for pair in DifficultyTier::ALL.windows(2) {
            let (easier, harder) = (pair[0].tuning(), pair[1].tuning());
            assert!(harder.reaction_time < easier.reaction_time);
            assert!(harder.min_separation > easier.min_separation);
            assert!(harder.life_chance < easier.life_chance);
            assert!(harder.spawn_interval < easier.spawn_interval);
            assert!(harder.bonus_distance() > easier.bonus_distance());
        }
    }

    #[test]
    fn test_tables_are_consistent() {
        for tier in DifficultyTier::ALL {
            let t = tier.tuning();
            assert!(t.efficiency_floor <= t.efficiency_ceiling);
            assert!(t.efficiency_ceiling <= 1.0);
            assert!(t.buffer_floor <= t.buffer_start);
            assert!(t.buffer_floor >= 1.0);
            // Momentum check only bites above the separation floor
            assert!(t.momentum_gap > t.min_separation);
            assert!((0.0..=1.0).contains(&t.life_chance));
            // Every tier's patterns can reach past the bonus line
            assert!(t.bonus_distance() < t.amplitude_scale * PATTERN_AMPLITUDE_MAX);
        }
    }
}
