//! Score and lives bookkeeping

use glam::Vec2;

use super::state::{GameEvent, GamePhase, GameState, ObstacleState};
use crate::consts::MAX_LIVES;

/// Something the tracker has to account for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// A ring resolved at (or past) the plane
    Ring {
        spawn_index: u32,
        state: ObstacleState,
        grants_life: bool,
    },
    /// The player left the play region
    BoundaryExit { position: Vec2 },
}

/// Apply one outcome to the round. Returns true if it ended the round.
pub fn apply_outcome(state: &mut GameState, outcome: Outcome) -> bool {
    let lives_lost = match outcome {
        Outcome::Ring {
            spawn_index,
            state: ObstacleState::Passed,
            grants_life,
        } => {
            let player = &mut state.player;
            player.score += 1;
            player.rings_cleared += 1;
            let bonus_life = grants_life && player.lives < MAX_LIVES;
            if bonus_life {
                player.lives += 1;
            }
            state.events.push(GameEvent::ObstaclePassed {
                spawn_index,
                bonus_life,
            });
            record_high_score(state);
            0
        }
        Outcome::Ring {
            spawn_index,
            state: ObstacleState::EdgeMiss,
            ..
        } => {
            state.events.push(GameEvent::ObstacleMissed {
                spawn_index,
                edge: true,
            });
            state.config.edge_miss_penalty
        }
        Outcome::Ring { spawn_index, .. } => {
            state.events.push(GameEvent::ObstacleMissed {
                spawn_index,
                edge: false,
            });
            1
        }
        Outcome::BoundaryExit { position } => {
            state.events.push(GameEvent::BoundaryExit { position });
            1
        }
    };

    if lives_lost == 0 {
        return false;
    }
    lose_lives(state, lives_lost)
}

fn record_high_score(state: &mut GameState) {
    let score = state.player.score;
    if score <= state.high_score {
        return;
    }
    state.high_score = score;
    if !state.high_score_beaten {
        state.high_score_beaten = true;
        state.events.push(GameEvent::NewHighScore { score });
    }
}

fn lose_lives(state: &mut GameState, count: u8) -> bool {
    if state.phase == GamePhase::GameOver {
        return true;
    }
    let player = &mut state.player;
    player.lives = player.lives.saturating_sub(count);
    state.events.push(GameEvent::LifeLost {
        lives_left: player.lives,
    });
    if player.lives > 0 {
        return false;
    }

    state.phase = GamePhase::GameOver;
    state.resume_phase = GamePhase::GameOver;
    state.events.push(GameEvent::GameOver {
        score: player.score,
        rings_cleared: player.rings_cleared,
    });
    log::info!(
        "Game over: score {} after {} rings (tier {})",
        player.score,
        player.rings_cleared,
        player.tier.as_str()
    );
    true
}
