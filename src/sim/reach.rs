//! Minimum reach-time estimates
//!
//! How long a competent player needs to get from their current state to a
//! lane. Axes are solved independently (decoupled kinematics) and the slower
//! one wins, since both must line up at once. The result only sizes a ring's
//! approach speed; it never constrains input.

use glam::Vec2;

use super::difficulty::{buffer_multiplier, efficiency_factor};
use crate::consts::*;
use crate::settings::DifficultyTier;

/// Breakdown of one reach estimate (seconds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReachEstimate {
    pub travel_x: f32,
    pub travel_y: f32,
    /// Slower axis times the buffer multiplier
    pub buffered_travel: f32,
    /// Reaction + orientation + buffered travel + stabilization
    pub total: f32,
}

/// Horizontal acceleration while holding altitude: part of the thrust has to
/// cancel gravity, leaving `sqrt(T² - g²)` sideways.
pub fn horizontal_accel(single_axis: bool) -> f32 {
    if single_axis {
        THRUST_ACCEL
    } else {
        let tilt = (GRAVITY / THRUST_ACCEL).asin();
        THRUST_ACCEL * tilt.cos()
    }
}

/// Vertical acceleration: gravity fights climbing and helps diving
pub fn vertical_accel(upward: bool) -> f32 {
    if upward {
        THRUST_ACCEL - GRAVITY
    } else {
        THRUST_ACCEL + GRAVITY
    }
}

/// Time to cover `distance` starting at `speed` (toward the target) under
/// constant `accel`, respecting the speed cap.
fn time_from(distance: f32, speed: f32, accel: f32) -> f32 {
    let v0 = speed.clamp(0.0, MAX_SPEED);
    // 0.5·a·t² + v0·t − d = 0
    let t = (-v0 + (v0 * v0 + 2.0 * accel * distance).sqrt()) / accel;
    if v0 + accel * t <= MAX_SPEED {
        return t;
    }
    // Hit the cap first: accelerate, then cruise
    let t_accel = (MAX_SPEED - v0) / accel;
    let d_accel = v0 * t_accel + 0.5 * accel * t_accel * t_accel;
    t_accel + (distance - d_accel).max(0.0) / MAX_SPEED
}

/// Minimum time along one axis.
///
/// `closing_speed` is the velocity component toward the target (negative when
/// moving away); `accel` is the usable acceleration toward the target.
pub fn axis_travel_time(distance: f32, closing_speed: f32, accel: f32) -> f32 {
    if distance < SMALL_DISTANCE {
        return SHORT_TRAVEL_TIME;
    }
    let accel = accel.max(1.0);
    if closing_speed < 0.0 {
        // Brake to a stop first, then cover the overshoot as well
        let away = -closing_speed;
        let stop_time = away / accel;
        let overshoot = away * away / (2.0 * accel);
        stop_time + time_from(distance + overshoot, 0.0, accel)
    } else {
        time_from(distance, closing_speed, accel)
    }
}

/// Estimate the minimum time to reach `target` from the given state
pub fn estimate_reach_time(
    target: Vec2,
    pos: Vec2,
    vel: Vec2,
    rings_cleared: u32,
    tier: DifficultyTier,
    single_axis: bool,
) -> ReachEstimate {
    let tuning = tier.tuning();
    let efficiency = efficiency_factor(tier, rings_cleared);
    let buffer = buffer_multiplier(tier, rings_cleared);
    let delta = target - pos;

    let travel_x = axis_travel_time(
        delta.x.abs(),
        vel.x * delta.x.signum(),
        horizontal_accel(single_axis) * efficiency,
    );
    let travel_y = if single_axis {
        0.0
    } else {
        axis_travel_time(
            delta.y.abs(),
            vel.y * delta.y.signum(),
            vertical_accel(delta.y > 0.0) * efficiency,
        )
    };

    let buffered_travel = travel_x.max(travel_y) * buffer;
    ReachEstimate {
        travel_x,
        travel_y,
        buffered_travel,
        total: tuning.reaction_time + ORIENTATION_TIME + buffered_travel + STABILIZATION_TIME,
    }
}

/// Fixed overhead every estimate includes for a tier
pub fn fixed_overhead(tier: DifficultyTier) -> f32 {
    tier.tuning().reaction_time + ORIENTATION_TIME + STABILIZATION_TIME
}
