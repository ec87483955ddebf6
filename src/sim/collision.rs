//! Plane-crossing classification
//!
//! A ring is a torus: the opening is everything closer to the lane than the
//! inner rim, the tube occupies `r ± tube`, and everything beyond is outside.

use glam::Vec2;

use super::state::{Obstacle, ObstacleState};
use crate::consts::RING_TUBE_RADIUS;

/// Classify a crossing by the player's distance from the ring center.
///
/// Exactly one of three outcomes: `distance ≤ r − tube` passes,
/// `r − tube < distance < r + tube` clips the edge, anything else misses.
pub fn classify_pass(distance: f32, size: f32, tube_radius: f32) -> ObstacleState {
    let radius = size / 2.0;
    if distance <= radius - tube_radius {
        ObstacleState::Passed
    } else if distance < radius + tube_radius {
        ObstacleState::EdgeMiss
    } else {
        // NaN distances land here as well
        ObstacleState::FullMiss
    }
}

/// Classify the player at `player_pos` against a ring
pub fn classify_obstacle(obstacle: &Obstacle, player_pos: Vec2) -> ObstacleState {
    classify_pass(player_pos.distance(obstacle.target), obstacle.size, RING_TUBE_RADIUS)
}

/// Whether the player is currently inside the ring's opening
#[inline]
pub fn inside_opening(obstacle: &Obstacle, player_pos: Vec2) -> bool {
    player_pos.distance(obstacle.target) <= obstacle.inner_radius()
}
