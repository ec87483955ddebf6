//! Difficulty progression
//!
//! Pure functions of (tier, rings cleared). Queried fresh on every spawn.

use crate::consts::*;
use crate::settings::DifficultyTier;

/// 0 at the start of a round, 1 once the progression window is cleared
#[inline]
fn progression_t(rings_cleared: u32) -> f32 {
    (rings_cleared as f32 / PROGRESSION_WINDOW as f32).clamp(0.0, 1.0)
}

/// Assumed skill of the hypothetical player, scaling usable acceleration.
/// Rises linearly from the tier floor to the tier ceiling.
pub fn efficiency_factor(tier: DifficultyTier, rings_cleared: u32) -> f32 {
    let t = tier.tuning();
    t.efficiency_floor + (t.efficiency_ceiling - t.efficiency_floor) * progression_t(rings_cleared)
}

/// Slack applied to travel time; generous early, tighter later
pub fn buffer_multiplier(tier: DifficultyTier, rings_cleared: u32) -> f32 {
    let t = tier.tuning();
    t.buffer_start - (t.buffer_start - t.buffer_floor) * progression_t(rings_cleared)
}

/// Size level: one step per `SIZE_STEP_RINGS` rings
#[inline]
pub fn progression_level(rings_cleared: u32) -> u32 {
    rings_cleared / SIZE_STEP_RINGS
}

/// Ring diameter. Never below half the base size.
pub fn ring_size(tier: DifficultyTier, rings_cleared: u32) -> f32 {
    let reduction = (0.05 * progression_level(rings_cleared) as f32).min(0.5);
    let size = BASE_RING_SIZE * (1.0 - reduction) * tier.tuning().size_multiplier;
    size.max(BASE_RING_SIZE * 0.5)
}

/// Spawn pacing after tier and section multipliers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacing {
    /// Seconds between spawn attempts
    pub spawn_interval: f32,
    /// Multiplier on the physics-derived approach speed
    pub speed_multiplier: f32,
}

pub fn pacing(tier: DifficultyTier, interval_scale: f32, speed_scale: f32) -> Pacing {
    let t = tier.tuning();
    Pacing {
        spawn_interval: t.spawn_interval * interval_scale,
        speed_multiplier: t.speed_multiplier * speed_scale,
    }
}

/// Convert a reach time into an approach speed for a ring starting at `distance`
pub fn approach_speed(distance: f32, reach_time: f32, speed_multiplier: f32) -> f32 {
    let speed = distance / reach_time * speed_multiplier;
    if !speed.is_finite() || speed <= 0.0 {
        log::warn!(
            "Degenerate approach speed (distance {}, time {}), using minimum",
            distance,
            reach_time
        );
        return MIN_APPROACH_SPEED;
    }
    speed.clamp(MIN_APPROACH_SPEED, MAX_APPROACH_SPEED)
}
