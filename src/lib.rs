//! Ring Flight - an arcade ring-gate flight game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, ring spawning, scoring)
//! - `tuning`: Data-driven per-tier game balance
//! - `settings` / `highscores`: Player preferences and per-tier bests
//! - `persistence`: Flat key/value store and save envelopes
//! - `platform`: Frame clock and storage backends

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::HighScores;
pub use settings::{DifficultyTier, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Half-extent of the square play region; touching it is a boundary exit
    pub const PLAY_BOUND: f32 = 2000.0;
    /// Half-extent that ring lanes are kept inside
    pub const TARGET_BOUND: f32 = 1700.0;

    /// Thrust acceleration (units/s²)
    pub const THRUST_ACCEL: f32 = 991.67;
    /// Downward gravity once the player has started (units/s²)
    pub const GRAVITY: f32 = 650.0;
    /// Player speed cap (units/s)
    pub const MAX_SPEED: f32 = 2300.0;

    /// Ring diameter before progression and tier scaling
    pub const BASE_RING_SIZE: f32 = 640.0;
    /// Ring tube radius (the edge-miss band is ±this around the rim)
    pub const RING_TUBE_RADIUS: f32 = 8.0;

    /// Depth a ring starts at before it reaches the play plane
    pub const SPAWN_DEPTH: f32 = 6000.0;
    /// Depth past the plane at which rings are evicted
    pub const REMOVAL_MARGIN: f32 = 200.0;
    /// Minimum depth gap between a new ring and any pending ring
    pub const MIN_DEPTH_SPACING: f32 = 900.0;

    /// Approach speed clamp (units/s)
    pub const MIN_APPROACH_SPEED: f32 = 1200.0;
    pub const MAX_APPROACH_SPEED: f32 = 5000.0;

    /// Furthest a new lane may be from the player's current position
    pub const MAX_REACH_RADIUS: f32 = 1400.0;
    /// Pattern amplitude range before the tier's amplitude scale
    pub const PATTERN_AMPLITUDE_MIN: f32 = 300.0;
    pub const PATTERN_AMPLITUDE_MAX: f32 = 700.0;

    /// Lives
    pub const START_LIVES: u8 = 3;
    pub const MAX_LIVES: u8 = 5;

    /// Reach-time model
    pub const SMALL_DISTANCE: f32 = 40.0;
    pub const SHORT_TRAVEL_TIME: f32 = 0.12;
    pub const ORIENTATION_TIME: f32 = 0.25;
    pub const STABILIZATION_TIME: f32 = 0.2;

    /// Rings over which efficiency and buffer ramp between their endpoints
    pub const PROGRESSION_WINDOW: u32 = 60;
    /// Rings cleared per size-progression level
    pub const SIZE_STEP_RINGS: u32 = 5;

    /// Momentum safeguard: how soon a ring must arrive to count as committed
    pub const COMMITMENT_WINDOW: f32 = 1.0;
    /// Momentum safeguard: direction dot product below which rings oppose
    pub const OPPOSITION_DOT: f32 = -0.3;
}

/// Direction from `from` to `to`, or `None` when the points coincide
#[inline]
pub fn direction_between(from: Vec2, to: Vec2) -> Option<Vec2> {
    (to - from).try_normalize()
}

/// Rescale `point` toward `origin` so it lies within `radius` of it
#[inline]
pub fn clamp_within_radius(point: Vec2, origin: Vec2, radius: f32) -> Vec2 {
    origin + (point - origin).clamp_length_max(radius)
}

/// Clamp each component to `[-bound, bound]`
#[inline]
pub fn clamp_to_square(point: Vec2, bound: f32) -> Vec2 {
    point.clamp(Vec2::splat(-bound), Vec2::splat(bound))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_within_radius_keeps_direction() {
        let origin = Vec2::new(100.0, 0.0);
        let clamped = clamp_within_radius(Vec2::new(1100.0, 0.0), origin, 500.0);
        assert!((clamped - Vec2::new(600.0, 0.0)).length() < 0.001);

        let inside = clamp_within_radius(Vec2::new(200.0, 50.0), origin, 500.0);
        assert_eq!(inside, Vec2::new(200.0, 50.0));
    }

    #[test]
    fn test_direction_between_degenerate() {
        assert!(direction_between(Vec2::ONE, Vec2::ONE).is_none());
        let dir = direction_between(Vec2::ZERO, Vec2::new(0.0, 3.0)).unwrap();
        assert!((dir - Vec2::Y).length() < 0.0001);
    }
}
