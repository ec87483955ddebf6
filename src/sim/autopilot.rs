//! Demo/attract-mode pilot
//!
//! Flies at the oldest pending lane (or hovers at the origin) with a PD
//! controller on top of gravity compensation. Thrust is all-or-nothing, so it
//! fires whenever the wanted acceleration is large enough to be worth a burst.

use glam::Vec2;

use super::state::{GamePhase, GameState};
use super::tick::TickInput;
use crate::consts::*;

#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    /// Start a new round automatically after game over
    pub auto_retry: bool,
    /// Position gain (1/s²)
    pub gain: f32,
    /// Velocity damping (1/s)
    pub damping: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            auto_retry: true,
            gain: 3.0,
            damping: 3.5,
        }
    }
}

impl Autopilot {
    /// Input for the next tick
    pub fn steer(&self, state: &GameState) -> TickInput {
        match state.phase {
            GamePhase::Idle => {
                return TickInput {
                    start: true,
                    ..Default::default()
                };
            }
            GamePhase::GameOver => {
                return TickInput {
                    retry: self.auto_retry,
                    ..Default::default()
                };
            }
            GamePhase::Paused => {
                return TickInput {
                    resume: true,
                    ..Default::default()
                };
            }
            GamePhase::Armed | GamePhase::Active => {}
        }

        let player = &state.player;
        // Let go so the latch clears
        if player.thrust_latched {
            return TickInput::default();
        }

        let single_axis = state.config.single_axis;
        let aim = state
            .target_obstacle()
            .map(|o| o.target)
            .unwrap_or(Vec2::ZERO);

        let mut wanted = (aim - player.pos) * self.gain - player.vel * self.damping;
        if single_axis {
            wanted.y = 0.0;
        } else if player.started {
            wanted.y += GRAVITY;
        }

        if !player.started {
            // Any press launches; point it where we want to go
            return TickInput::thrusting(wanted.try_normalize().unwrap_or(Vec2::Y));
        }

        if wanted.length() > THRUST_ACCEL * 0.5 {
            TickInput::thrusting(wanted.normalize_or_zero())
        } else {
            TickInput::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{DifficultyTier, Settings};
    use crate::sim::tick;

    #[test]
    fn test_starts_and_launches() {
        let pilot = Autopilot::default();
        let mut state = GameState::new(8, &Settings::default(), 0);
        assert!(pilot.steer(&state).start);

        let input = pilot.steer(&state);
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Armed);
        assert!(pilot.steer(&state).thrust);
    }

    #[test]
    fn test_releases_when_latched() {
        let pilot = Autopilot::default();
        let mut state = GameState::new(8, &Settings::default(), 0);
        state.reset_round();
        state.player.thrust_latched = true;
        assert!(!pilot.steer(&state).thrust);
    }

    #[test]
    fn test_holds_altitude() {
        let pilot = Autopilot::default();
        let mut state = GameState::new(8, &Settings::default(), 0);
        state.reset_round();
        state.phase = GamePhase::Active;
        state.player.started = true;
        for _ in 0..600 {
            let input = pilot.steer(&state);
            crate::sim::kinematics::integrate(
                &mut state.player,
                input.thrust,
                input.thrust_dir,
                SIM_DT,
                None,
                false,
            );
        }
        assert!(state.player.pos.length() < 200.0, "drifted to {:?}", state.player.pos);
    }

    #[test]
    fn test_clears_rings_on_easy() {
        let pilot = Autopilot::default();
        let mut state = GameState::new(21, &Settings::for_tier(DifficultyTier::Easy), 0);
        for _ in 0..(60.0 / SIM_DT) as u32 {
            let input = pilot.steer(&state);
            tick(&mut state, &input, SIM_DT);
        }
        assert!(state.player.rings_cleared > 0 || state.high_score > 0);
    }
}
