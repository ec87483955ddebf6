//! Observer hooks for audio and UI collaborators
//!
//! The simulation only queues `GameEvent`s. Front ends drain the queue once
//! per frame and hand it to `dispatch`, which fans each event out to the
//! matching `GameObserver` method.

use glam::Vec2;

use super::state::GameEvent;

/// Receives simulation events. Every method defaults to doing nothing.
pub trait GameObserver {
    fn on_round_started(&mut self) {}
    fn on_launched(&mut self) {}
    fn on_obstacle_spawned(&mut self, _spawn_index: u32) {}
    fn on_obstacle_passed(&mut self, _spawn_index: u32, _bonus_life: bool) {}
    fn on_obstacle_missed(&mut self, _spawn_index: u32, _edge: bool) {}
    fn on_boundary_exit(&mut self, _position: Vec2) {}
    fn on_life_lost(&mut self, _lives_left: u8) {}
    fn on_new_high_score(&mut self, _score: u64) {}
    fn on_game_over(&mut self, _score: u64, _rings_cleared: u32) {}
    fn on_paused(&mut self, _paused: bool) {}
}

impl GameObserver for () {}

/// Deliver events in order
pub fn dispatch<O: GameObserver + ?Sized>(events: &[GameEvent], observer: &mut O) {
    for event in events {
        match *event {
            GameEvent::RoundStarted => observer.on_round_started(),
            GameEvent::Launched => observer.on_launched(),
            GameEvent::ObstacleSpawned { spawn_index } => observer.on_obstacle_spawned(spawn_index),
            GameEvent::ObstaclePassed {
                spawn_index,
                bonus_life,
            } => observer.on_obstacle_passed(spawn_index, bonus_life),
            GameEvent::ObstacleMissed { spawn_index, edge } => {
                observer.on_obstacle_missed(spawn_index, edge)
            }
            GameEvent::BoundaryExit { position } => observer.on_boundary_exit(position),
            GameEvent::LifeLost { lives_left } => observer.on_life_lost(lives_left),
            GameEvent::NewHighScore { score } => observer.on_new_high_score(score),
            GameEvent::GameOver {
                score,
                rings_cleared,
            } => observer.on_game_over(score, rings_cleared),
            GameEvent::Paused => observer.on_paused(true),
            GameEvent::Resumed => observer.on_paused(false),
        }
    }
}

/// Running totals, handy for headless runs and tests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventTally {
    pub spawned: u32,
    pub passed: u32,
    pub edge_misses: u32,
    pub full_misses: u32,
    pub boundary_exits: u32,
    pub lives_lost: u32,
    pub bonus_lives: u32,
    pub games_over: u32,
}

impl GameObserver for EventTally {
    fn on_obstacle_spawned(&mut self, _spawn_index: u32) {
        self.spawned += 1;
    }

    fn on_obstacle_passed(&mut self, _spawn_index: u32, bonus_life: bool) {
        self.passed += 1;
        if bonus_life {
            self.bonus_lives += 1;
        }
    }

    fn on_obstacle_missed(&mut self, _spawn_index: u32, edge: bool) {
        if edge {
            self.edge_misses += 1;
        } else {
            self.full_misses += 1;
        }
    }

    fn on_boundary_exit(&mut self, _position: Vec2) {
        self.boundary_exits += 1;
    }

    fn on_life_lost(&mut self, _lives_left: u8) {
        self.lives_lost += 1;
    }

    fn on_game_over(&mut self, _score: u64, _rings_cleared: u32) {
        self.games_over += 1;
    }
}
