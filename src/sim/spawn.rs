//! Ring spawning
//!
//! A fixed-interval timer fires spawn attempts. Each attempt builds a
//! candidate ring from the pattern generator and the reach estimate, then
//! runs it through three safeguards before committing it:
//!
//! 1. Depth spacing: no pending ring may still sit near the spawn depth
//! 2. Arrival separation: plane arrivals keep a per-tier minimum gap
//! 3. Momentum conflict: no ring in the opposite direction right after a
//!    ring the player is already committed to
//!
//! A rejected attempt waits for the next interval.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::{approach_speed, pacing, ring_size};
use super::reach::estimate_reach_time;
use super::state::{GameEvent, GameState, Obstacle, ObstacleState};
use crate::consts::*;
use crate::direction_between;

/// Why an attempt was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnRejection {
    DepthSpacing,
    ArrivalSeparation,
    MomentumConflict,
}

/// Result of one spawn attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnDecision {
    /// Committed with this spawn index
    Spawned(u32),
    Rejected(SpawnRejection),
}

/// Per-round spawn counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnStats {
    pub attempts: u32,
    pub spawned: u32,
    pub bonus: u32,
    pub depth_spacing: u32,
    pub arrival_separation: u32,
    pub momentum_conflict: u32,
}

impl SpawnStats {
    pub fn rejected(&self) -> u32 {
        self.depth_spacing + self.arrival_separation + self.momentum_conflict
    }

    fn record(&mut self, decision: SpawnDecision) {
        self.attempts += 1;
        match decision {
            SpawnDecision::Spawned(_) => self.spawned += 1,
            SpawnDecision::Rejected(SpawnRejection::DepthSpacing) => self.depth_spacing += 1,
            SpawnDecision::Rejected(SpawnRejection::ArrivalSeparation) => {
                self.arrival_separation += 1
            }
            SpawnDecision::Rejected(SpawnRejection::MomentumConflict) => {
                self.momentum_conflict += 1
            }
        }
    }
}

/// Spawn timer and id allocator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnScheduler {
    /// Seconds until the next attempt (starts at 0: the first attempt is immediate)
    pub timer: f32,
    pub next_spawn_index: u32,
    pub stats: SpawnStats,
}

impl SpawnScheduler {
    /// Count down by `dt`; true when an attempt is due
    pub fn advance_timer(&mut self, dt: f32, interval: f32) -> bool {
        self.timer -= dt;
        if self.timer > 0.0 {
            return false;
        }
        // Never queue more than one attempt per tick
        self.timer = (self.timer + interval).max(0.0);
        true
    }
}

/// Safeguard 1: false while any pending ring is still within
/// `MIN_DEPTH_SPACING` of the spawn depth
pub fn depth_spacing_clear(obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .filter(|o| o.is_pending())
        .all(|o| (o.remaining_distance() - SPAWN_DEPTH).abs() >= MIN_DEPTH_SPACING)
}

/// Safeguard 2: false if any pending arrival is closer than `min_separation`
/// to `arrival` (seconds from now)
pub fn arrival_separation_clear(obstacles: &[Obstacle], arrival: f32, min_separation: f32) -> bool {
    obstacles
        .iter()
        .filter(|o| o.is_pending())
        .all(|o| (o.arrival_in() - arrival).abs() >= min_separation)
}

/// Safeguard 3: true if the candidate pulls the player the opposite way
/// from the ring they are about to fly through
pub fn momentum_conflict(
    obstacles: &[Obstacle],
    player_pos: Vec2,
    target: Vec2,
    arrival: f32,
    momentum_gap: f32,
) -> bool {
    let Some(soonest) = obstacles
        .iter()
        .filter(|o| o.is_pending())
        .min_by(|a, b| a.arrival_in().total_cmp(&b.arrival_in()))
    else {
        return false;
    };

    let committed_arrival = soonest.arrival_in();
    if committed_arrival > COMMITMENT_WINDOW {
        return false;
    }
    let (Some(committed_dir), Some(candidate_dir)) = (
        direction_between(player_pos, soonest.target),
        direction_between(player_pos, target),
    ) else {
        return false;
    };

    committed_dir.dot(candidate_dir) < OPPOSITION_DOT
        && (arrival - committed_arrival).abs() < momentum_gap
}

/// Run the spawn timer for one tick; returns the decision if an attempt fired
pub fn update_spawner(state: &mut GameState, dt: f32) -> Option<SpawnDecision> {
    let (interval_scale, speed_scale) = state.pattern.pacing_scales();
    let interval = pacing(state.config.tier, interval_scale, speed_scale).spawn_interval;
    if !state.spawner.advance_timer(dt, interval) {
        return None;
    }
    Some(attempt_spawn(state))
}

/// One spawn attempt through all safeguards
pub fn attempt_spawn(state: &mut GameState) -> SpawnDecision {
    let decision = build_and_commit(state);
    state.spawner.stats.record(decision);
    match decision {
        SpawnDecision::Spawned(index) => {
            state.events.push(GameEvent::ObstacleSpawned { spawn_index: index });
        }
        SpawnDecision::Rejected(reason) => {
            log::debug!("Spawn rejected: {:?}", reason);
        }
    }
    decision
}

fn build_and_commit(state: &mut GameState) -> SpawnDecision {
    if !depth_spacing_clear(&state.obstacles) {
        return SpawnDecision::Rejected(SpawnRejection::DepthSpacing);
    }

    let config = state.config;
    let tuning = config.tier.tuning();
    let rings = state.player.rings_cleared;
    let player_pos = state.player.pos;

    let target = state.pattern.next_target(
        player_pos,
        rings,
        config.tier,
        config.single_axis,
        &mut state.rng,
    );
    let size = ring_size(config.tier, rings);
    let reach = estimate_reach_time(
        target,
        player_pos,
        state.player.vel,
        rings,
        config.tier,
        config.single_axis,
    );
    let (interval_scale, speed_scale) = state.pattern.pacing_scales();
    let pace = pacing(config.tier, interval_scale, speed_scale);
    let speed = approach_speed(SPAWN_DEPTH, reach.total, pace.speed_multiplier);
    let arrival = SPAWN_DEPTH / speed;

    if !arrival_separation_clear(&state.obstacles, arrival, tuning.min_separation) {
        return SpawnDecision::Rejected(SpawnRejection::ArrivalSeparation);
    }
    if momentum_conflict(&state.obstacles, player_pos, target, arrival, tuning.momentum_gap) {
        return SpawnDecision::Rejected(SpawnRejection::MomentumConflict);
    }

    let is_bonus = target.distance(player_pos) > tuning.bonus_distance();
    let grants_life =
        is_bonus && state.rng.random_bool(tuning.life_chance.clamp(0.0, 1.0) as f64);

    let spawn_index = state.spawner.next_spawn_index;
    state.spawner.next_spawn_index += 1;
    if is_bonus {
        state.spawner.stats.bonus += 1;
    }

    log::debug!(
        "Spawn #{} at ({:.0}, {:.0}) size {:.0} speed {:.0} (reach {:.2}s{})",
        spawn_index,
        target.x,
        target.y,
        size,
        speed,
        reach.total,
        if is_bonus { ", bonus" } else { "" }
    );

    state.obstacles.push(Obstacle {
        spawn_index,
        target,
        approach_distance: SPAWN_DEPTH,
        depth: -SPAWN_DEPTH,
        size,
        approach_speed: speed,
        state: ObstacleState::Pending,
        is_bonus,
        grants_life,
        spawn_time: state.clock,
        player_reached_time: None,
        plane_cross_time: None,
    });
    SpawnDecision::Spawned(spawn_index)
}
