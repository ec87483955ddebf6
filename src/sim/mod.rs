//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by spawn index)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod events;
pub mod kinematics;
pub mod lifecycle;
pub mod pattern;
pub mod reach;
pub mod rng;
pub mod score;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use collision::classify_pass;
pub use events::{EventTally, GameObserver, dispatch};
pub use kinematics::{KinematicOutcome, integrate};
pub use lifecycle::{Resolution, advance_obstacles};
pub use pattern::{PatternContext, PatternGenerator, PatternKind, SectionContext, SectionKind};
pub use reach::{ReachEstimate, estimate_reach_time};
pub use rng::TrackedRng;
pub use score::{Outcome, apply_outcome};
pub use spawn::{SpawnDecision, SpawnRejection, SpawnScheduler, SpawnStats};
pub use state::{
    FrameSnapshot, GameEvent, GamePhase, GameState, Obstacle, ObstacleState, ObstacleView,
    PlayerState, RoundConfig,
};
pub use tick::{TickInput, tick};
