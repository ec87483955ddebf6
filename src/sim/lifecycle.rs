//! Ring advancement, plane crossing and eviction

use glam::Vec2;

use super::collision::{classify_obstacle, inside_opening};
use super::state::{Obstacle, ObstacleState};
use crate::consts::REMOVAL_MARGIN;

/// A ring that changed state this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub spawn_index: u32,
    pub outcome: ObstacleState,
    pub grants_life: bool,
    /// Resolved at the removal margin instead of at the plane
    pub forced: bool,
}

/// Advance every ring by `dt` and resolve those crossing the plane.
///
/// Resolutions come back in spawn order.
pub fn advance_obstacles(
    obstacles: &mut Vec<Obstacle>,
    player_pos: Vec2,
    clock: f32,
    dt: f32,
) -> Vec<Resolution> {
    let mut resolved = Vec::new();

    for obstacle in obstacles.iter_mut() {
        if !obstacle.depth.is_finite() {
            continue;
        }

        if !obstacle.is_pending() {
            obstacle.depth += obstacle.approach_speed * dt;
            continue;
        }

        if obstacle.player_reached_time.is_none() && inside_opening(obstacle, player_pos) {
            obstacle.player_reached_time = Some(clock);
        }

        let previous = obstacle.depth;
        obstacle.depth += obstacle.approach_speed * dt;

        if previous < 0.0 && obstacle.depth >= 0.0 {
            obstacle.plane_cross_time = Some(clock);
            obstacle.state = classify_obstacle(obstacle, player_pos);
            resolved.push(Resolution {
                spawn_index: obstacle.spawn_index,
                outcome: obstacle.state,
                grants_life: obstacle.grants_life,
                forced: false,
            });
            if let Some(margin) = obstacle.reach_margin() {
                log::debug!(
                    "Ring #{} {:?} (reach margin {:.2}s)",
                    obstacle.spawn_index,
                    obstacle.state,
                    margin
                );
            }
        } else if obstacle.depth > REMOVAL_MARGIN {
            log::warn!(
                "Ring #{} skipped the plane, counting as a miss",
                obstacle.spawn_index
            );
            obstacle.state = ObstacleState::FullMiss;
            resolved.push(Resolution {
                spawn_index: obstacle.spawn_index,
                outcome: ObstacleState::FullMiss,
                grants_life: false,
                forced: true,
            });
        }
    }

    obstacles.retain(|o| {
        if !o.depth.is_finite() {
            log::warn!("Ring #{} has non-finite depth, dropping it", o.spawn_index);
            return false;
        }
        o.is_pending() || o.depth <= REMOVAL_MARGIN
    });

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn ring(spawn_index: u32, target: Vec2, depth: f32) -> Obstacle {
        Obstacle {
            spawn_index,
            target,
            approach_distance: SPAWN_DEPTH,
            depth,
            size: 600.0,
            approach_speed: 1200.0,
            state: ObstacleState::Pending,
            is_bonus: false,
            grants_life: false,
            spawn_time: 0.0,
            player_reached_time: None,
            plane_cross_time: None,
        }
    }

    #[test]
    fn test_crossing_classifies_once() {
        let mut rings = vec![ring(0, Vec2::ZERO, -5.0)];
        let out = advance_obstacles(&mut rings, Vec2::new(100.0, 0.0), 3.0, SIM_DT);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].outcome, ObstacleState::Passed);
        assert_eq!(rings[0].plane_cross_time, Some(3.0));
        assert_eq!(rings[0].player_reached_time, Some(3.0));

        // Keeps moving but never resolves again
        for _ in 0..10 {
            assert!(advance_obstacles(&mut rings, Vec2::new(1000.0, 0.0), 3.1, SIM_DT).is_empty());
        }
        assert_eq!(rings[0].state, ObstacleState::Passed);
    }

    #[test]
    fn test_classification_by_distance() {
        let mut rings = vec![
            ring(0, Vec2::new(-295.0, 0.0), -1.0),
            ring(1, Vec2::new(0.0, 310.0), -1.0),
        ];
        let out = advance_obstacles(&mut rings, Vec2::ZERO, 0.0, SIM_DT);
        assert_eq!(out[0].outcome, ObstacleState::EdgeMiss);
        assert_eq!(out[1].outcome, ObstacleState::FullMiss);
    }

    #[test]
    fn test_resolved_rings_are_evicted_past_margin() {
        let mut rings = vec![ring(0, Vec2::ZERO, -1.0)];
        advance_obstacles(&mut rings, Vec2::ZERO, 0.0, SIM_DT);
        // 1200 u/s covers the 200 margin in well under a second
        for _ in 0..120 {
            advance_obstacles(&mut rings, Vec2::ZERO, 0.0, SIM_DT);
        }
        assert!(rings.is_empty());
    }

    #[test]
    fn test_pending_past_margin_is_forced_miss() {
        let mut rings = vec![ring(0, Vec2::ZERO, REMOVAL_MARGIN + 50.0)];
        let out = advance_obstacles(&mut rings, Vec2::ZERO, 0.0, SIM_DT);
        assert_eq!(out.len(), 1);
        assert!(out[0].forced);
        assert_eq!(out[0].outcome, ObstacleState::FullMiss);
        assert!(rings.is_empty());
    }

    #[test]
    fn test_non_finite_depth_dropped_without_resolution() {
        let mut rings = vec![ring(0, Vec2::ZERO, f32::NAN), ring(1, Vec2::ZERO, -4000.0)];
        let out = advance_obstacles(&mut rings, Vec2::ZERO, 0.0, SIM_DT);
        assert!(out.is_empty());
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].spawn_index, 1);
    }

    #[test]
    fn test_reach_time_recorded_on_first_entry() {
        let mut rings = vec![ring(0, Vec2::new(500.0, 0.0), -3000.0)];
        advance_obstacles(&mut rings, Vec2::ZERO, 1.0, SIM_DT);
        assert_eq!(rings[0].player_reached_time, None);
        advance_obstacles(&mut rings, Vec2::new(450.0, 0.0), 1.5, SIM_DT);
        advance_obstacles(&mut rings, Vec2::new(500.0, 0.0), 1.6, SIM_DT);
        assert_eq!(rings[0].player_reached_time, Some(1.5));
    }
}
