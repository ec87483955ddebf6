//! Game state and core simulation types
//!
//! All state that must be persisted for Continue/determinism lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pattern::PatternGenerator;
use super::rng::TrackedRng;
use super::spawn::SpawnScheduler;
use crate::consts::*;
use crate::settings::{DifficultyTier, Settings};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start signal
    Idle,
    /// Rings spawning, player parked until the first thrust
    Armed,
    /// Gravity on, rings advancing
    Active,
    /// Frozen; resumes to `GameState::resume_phase`
    Paused,
    /// Lives exhausted; waiting for retry
    GameOver,
}

/// Player kinematics and round counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub pos: Vec2,
    pub vel: Vec2,
    /// True once thrust has been applied this life (gravity active)
    pub started: bool,
    pub lives: u8,
    pub score: u64,
    /// Rings passed this round (never decreases)
    pub rings_cleared: u32,
    pub tier: DifficultyTier,
    /// Thrust is ignored until released after a boundary exit
    pub thrust_latched: bool,
}

impl PlayerState {
    pub fn new(tier: DifficultyTier) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            started: false,
            lives: START_LIVES,
            score: 0,
            rings_cleared: 0,
            tier,
            thrust_latched: false,
        }
    }
}

/// Resolution of a ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleState {
    Pending,
    /// Player went through the opening
    Passed,
    /// Player clipped the tube
    EdgeMiss,
    /// Player was outside the ring
    FullMiss,
}

/// A ring approaching the play plane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub spawn_index: u32,
    /// Lane position on the play plane
    pub target: Vec2,
    /// Depth the ring started at
    pub approach_distance: f32,
    /// Signed depth: negative before the plane, crosses at 0
    pub depth: f32,
    /// Diameter
    pub size: f32,
    /// Units per second toward the plane
    pub approach_speed: f32,
    pub state: ObstacleState,
    pub is_bonus: bool,
    pub grants_life: bool,
    pub spawn_time: f32,
    /// When the player first got inside the opening
    pub player_reached_time: Option<f32>,
    /// When the ring crossed the plane
    pub plane_cross_time: Option<f32>,
}

impl Obstacle {
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.state == ObstacleState::Pending
    }

    /// Seconds until the ring reaches the plane at its current speed
    #[inline]
    pub fn arrival_in(&self) -> f32 {
        (-self.depth).max(0.0) / self.approach_speed
    }

    /// Distance still to travel before the plane
    #[inline]
    pub fn remaining_distance(&self) -> f32 {
        -self.depth
    }

    /// Radius inside which the player passes cleanly
    #[inline]
    pub fn inner_radius(&self) -> f32 {
        self.size / 2.0 - RING_TUBE_RADIUS
    }

    /// Radius at and beyond which the player misses entirely
    #[inline]
    pub fn outer_radius(&self) -> f32 {
        self.size / 2.0 + RING_TUBE_RADIUS
    }

    /// Seconds of slack between the player arriving and the ring crossing.
    /// Negative or missing means the reach estimate was too tight.
    pub fn reach_margin(&self) -> Option<f32> {
        Some(self.plane_cross_time? - self.player_reached_time?)
    }
}

/// Settings that shape a round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub tier: DifficultyTier,
    pub single_axis: bool,
    pub edge_miss_penalty: u8,
}

impl From<&Settings> for RoundConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            tier: settings.tier,
            single_axis: settings.single_axis,
            edge_miss_penalty: settings.edge_miss_penalty,
        }
    }
}

/// Discrete events for audio/UI collaborators, drained each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted,
    /// First thrust of a life
    Launched,
    ObstacleSpawned { spawn_index: u32 },
    ObstaclePassed { spawn_index: u32, bonus_life: bool },
    ObstacleMissed { spawn_index: u32, edge: bool },
    BoundaryExit { position: Vec2 },
    LifeLost { lives_left: u8 },
    NewHighScore { score: u64 },
    GameOver { score: u64, rings_cleared: u32 },
    Paused,
    Resumed,
}

/// Per-ring data handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObstacleView {
    pub spawn_index: u32,
    pub position: Vec2,
    pub depth: f32,
    pub size: f32,
    pub state: ObstacleState,
    pub is_bonus: bool,
}

/// Everything the renderer reads once per frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub player: Vec2,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub obstacles: Vec<ObstacleView>,
}

/// Complete engine state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: TrackedRng,
    pub config: RoundConfig,
    pub phase: GamePhase,
    /// Phase to return to when unpausing
    pub resume_phase: GamePhase,
    pub player: PlayerState,
    /// Live rings (sorted by spawn index)
    pub obstacles: Vec<Obstacle>,
    pub pattern: PatternGenerator,
    pub spawner: SpawnScheduler,
    /// Seconds of active play this round
    pub clock: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Best score for this tier (seeded from storage)
    pub high_score: u64,
    /// Set once this round's score passes the stored best
    #[serde(default)]
    pub high_score_beaten: bool,
    /// Events since the last drain (not persisted)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle engine for the given seed and settings
    pub fn new(seed: u64, settings: &Settings, high_score: u64) -> Self {
        let config = RoundConfig::from(settings);
        Self {
            seed,
            rng: TrackedRng::new(seed),
            config,
            phase: GamePhase::Idle,
            resume_phase: GamePhase::Idle,
            player: PlayerState::new(config.tier),
            obstacles: Vec::new(),
            pattern: PatternGenerator::default(),
            spawner: SpawnScheduler::default(),
            clock: 0.0,
            time_ticks: 0,
            high_score,
            high_score_beaten: false,
            events: Vec::new(),
        }
    }

    /// Reset everything round-scoped and enter Armed
    pub fn reset_round(&mut self) {
        self.player = PlayerState::new(self.config.tier);
        self.obstacles.clear();
        self.pattern = PatternGenerator::default();
        self.spawner = SpawnScheduler::default();
        self.high_score_beaten = false;
        self.clock = 0.0;
        self.phase = GamePhase::Armed;
        self.resume_phase = GamePhase::Armed;
        self.events.push(GameEvent::RoundStarted);
        log::info!(
            "Round armed (tier {}, high score {})",
            self.config.tier.as_str(),
            self.high_score
        );
    }

    /// The oldest pending ring: the one the player should be flying at
    pub fn target_obstacle(&self) -> Option<&Obstacle> {
        self.obstacles
            .iter()
            .filter(|o| o.is_pending())
            .min_by_key(|o| o.spawn_index)
    }

    pub fn pending_obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(|o| o.is_pending())
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Render-facing view of the current frame
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            player: self.player.pos,
            phase: self.phase,
            score: self.player.score,
            lives: self.player.lives,
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    spawn_index: o.spawn_index,
                    position: o.target,
                    depth: o.depth,
                    size: o.size,
                    state: o.state,
                    is_bonus: o.is_bonus,
                })
                .collect(),
        }
    }

    /// Ensure rings are sorted by spawn index for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.obstacles.sort_by_key(|o| o.spawn_index);
    }
}
