//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Per tick:
//! signals, player kinematics, ring advancement and scoring, then spawning.

use glam::Vec2;

use super::kinematics::integrate;
use super::lifecycle::advance_obstacles;
use super::score::{Outcome, apply_outcome};
use super::spawn::update_spawner;
use super::state::{GameEvent, GamePhase, GameState, ObstacleState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Thrust held this tick
    pub thrust: bool,
    /// Thrust direction on the play plane (normalized internally)
    pub thrust_dir: Vec2,
    /// Start a round from the title screen
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Leave pause
    pub resume: bool,
    /// New round after game over
    pub retry: bool,
}

impl TickInput {
    /// Hold thrust toward `dir`
    pub fn thrusting(dir: Vec2) -> Self {
        Self {
            thrust: true,
            thrust_dir: dir,
            ..Default::default()
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if handle_signals(state, input) {
        return;
    }

    // Nothing moves outside a live round
    match state.phase {
        GamePhase::Idle | GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::Armed | GamePhase::Active => {}
    }

    state.time_ticks += 1;

    step_player(state, input, dt);

    if state.phase == GamePhase::Active {
        state.clock += dt;
        let mut resolutions =
            advance_obstacles(&mut state.obstacles, state.player.pos, state.clock, dt);
        // Same-tick crossings are simultaneous: credit passes before charging misses
        resolutions.sort_by_key(|r| r.outcome != ObstacleState::Passed);
        for r in resolutions {
            let outcome = Outcome::Ring {
                spawn_index: r.spawn_index,
                state: r.outcome,
                grants_life: r.grants_life,
            };
            apply_outcome(state, outcome);
        }
    }

    if matches!(state.phase, GamePhase::Armed | GamePhase::Active) {
        update_spawner(state, dt);
    }
}

/// Round and pause transitions. Returns true when the tick is used up.
fn handle_signals(state: &mut GameState, input: &TickInput) -> bool {
    match state.phase {
        GamePhase::Idle if input.start => {
            state.reset_round();
            true
        }
        GamePhase::GameOver if input.retry => {
            state.reset_round();
            true
        }
        GamePhase::Armed | GamePhase::Active if input.pause => {
            state.resume_phase = state.phase;
            state.phase = GamePhase::Paused;
            state.events.push(GameEvent::Paused);
            log::debug!("Paused");
            true
        }
        GamePhase::Paused if input.resume || input.pause => {
            state.phase = state.resume_phase;
            state.events.push(GameEvent::Resumed);
            log::debug!("Resumed to {:?}", state.phase);
            false
        }
        _ => false,
    }
}

fn step_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let snap_to = state.target_obstacle().map(|o| o.target);
    let outcome = integrate(
        &mut state.player,
        input.thrust,
        input.thrust_dir,
        dt,
        snap_to,
        state.config.single_axis,
    );

    if outcome.launched && state.phase == GamePhase::Armed {
        state.phase = GamePhase::Active;
        state.events.push(GameEvent::Launched);
        log::debug!("Launched at tick {}", state.time_ticks);
    }

    if let Some(position) = outcome.boundary_exit {
        log::info!(
            "Boundary exit at ({:.0}, {:.0}), {} lives before penalty",
            position.x,
            position.y,
            state.player.lives
        );
        if !apply_outcome(state, Outcome::BoundaryExit { position }) {
            // Parked on the lane until the next thrust
            state.phase = GamePhase::Armed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::{DifficultyTier, Settings};
    use crate::sim::autopilot::Autopilot;
    use crate::sim::difficulty::ring_size;
    use crate::sim::state::Obstacle;

    fn start() -> TickInput {
        TickInput {
            start: true,
            ..Default::default()
        }
    }

    fn active_state(tier: DifficultyTier) -> GameState {
        let mut state = GameState::new(12345, &Settings::for_tier(tier), 0);
        tick(&mut state, &start(), SIM_DT);
        tick(&mut state, &TickInput::thrusting(Vec2::Y), SIM_DT);
        assert_eq!(state.phase, GamePhase::Active);
        state
    }

    #[test]
    fn test_tick_idle_to_active() {
        let mut state = GameState::new(12345, &Settings::default(), 0);
        assert_eq!(state.phase, GamePhase::Idle);

        // Tick without start - stays idle
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.time_ticks, 0);

        tick(&mut state, &start(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Armed);

        // Armed: rings spawn but stay put until launch
        for _ in 0..240 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Armed);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].depth, -SPAWN_DEPTH);
        assert_eq!(state.player.pos, Vec2::ZERO);

        tick(&mut state, &TickInput::thrusting(Vec2::Y), SIM_DT);
        assert_eq!(state.phase, GamePhase::Active);
        assert!(state.obstacles[0].depth > -SPAWN_DEPTH);
        assert!(state.drain_events().contains(&GameEvent::Launched));
    }

    #[test]
    fn test_tick_pause() {
        let mut state = active_state(DifficultyTier::Normal);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        let depths: Vec<f32> = state.obstacles.iter().map(|o| o.depth).collect();
        let pos = state.player.pos;
        for _ in 0..60 {
            tick(&mut state, &TickInput::thrusting(Vec2::X), SIM_DT);
        }
        assert_eq!(state.obstacles.iter().map(|o| o.depth).collect::<Vec<_>>(), depths);
        assert_eq!(state.player.pos, pos);

        let resume = TickInput {
            resume: true,
            ..Default::default()
        };
        tick(&mut state, &resume, SIM_DT);
        assert_eq!(state.phase, GamePhase::Active);
    }

    #[test]
    fn test_pause_from_armed_resumes_armed() {
        let mut state = GameState::new(1, &Settings::default(), 0);
        tick(&mut state, &start(), SIM_DT);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Armed);
    }

    #[test]
    fn test_boundary_exit_costs_one_life() {
        let mut state = active_state(DifficultyTier::Normal);
        state.player.pos = Vec2::new(PLAY_BOUND - 1.0, 0.0);
        state.player.vel = Vec2::new(600.0, 0.0);

        let hold = TickInput::thrusting(Vec2::X);
        tick(&mut state, &hold, SIM_DT);
        assert_eq!(state.player.lives, START_LIVES - 1);
        assert_eq!(state.phase, GamePhase::Armed);
        assert_eq!(state.player.vel, Vec2::ZERO);
        let lane = state.target_obstacle().map(|o| o.target).unwrap_or(Vec2::ZERO);
        assert_eq!(state.player.pos, lane);

        // Holding thrust through the exit does nothing more
        for _ in 0..120 {
            tick(&mut state, &hold, SIM_DT);
        }
        assert_eq!(state.player.lives, START_LIVES - 1);
        assert_eq!(state.phase, GamePhase::Armed);

        let exits = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::BoundaryExit { .. }))
            .count();
        assert_eq!(exits, 1);

        // Release, press: flying again
        tick(&mut state, &TickInput::default(), SIM_DT);
        tick(&mut state, &hold, SIM_DT);
        assert_eq!(state.phase, GamePhase::Active);
    }

    #[test]
    fn test_game_over_and_retry() {
        let mut state = active_state(DifficultyTier::Normal);
        state.player.lives = 1;
        state.player.pos = Vec2::new(0.0, -PLAY_BOUND + 0.5);
        state.player.vel = Vec2::new(0.0, -300.0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        let ticks = state.time_ticks;
        for _ in 0..30 {
            tick(&mut state, &TickInput::thrusting(Vec2::Y), SIM_DT);
        }
        assert_eq!(state.time_ticks, ticks);

        let retry = TickInput {
            retry: true,
            ..Default::default()
        };
        tick(&mut state, &retry, SIM_DT);
        assert_eq!(state.phase, GamePhase::Armed);
        assert_eq!(state.player.lives, START_LIVES);
        assert_eq!(state.player.score, 0);
        assert!(state.obstacles.is_empty());
    }

    fn crossing_ring(spawn_index: u32, target: Vec2) -> Obstacle {
        Obstacle {
            spawn_index,
            target,
            approach_distance: SPAWN_DEPTH,
            depth: -1.0,
            size: 600.0,
            approach_speed: 2000.0,
            state: ObstacleState::Pending,
            is_bonus: false,
            grants_life: false,
            spawn_time: 0.0,
            player_reached_time: None,
            plane_cross_time: None,
        }
    }

    #[test]
    fn test_same_tick_pass_counts_at_game_over() {
        let mut state = active_state(DifficultyTier::Normal);
        state.player.lives = 1;
        state.player.pos = Vec2::ZERO;
        state.player.vel = Vec2::ZERO;
        state.obstacles = vec![
            crossing_ring(100, Vec2::new(1200.0, 0.0)),
            crossing_ring(101, Vec2::ZERO),
        ];
        state.drain_events();

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.score, 1);
        assert_eq!(state.player.lives, 0);
        let states: Vec<_> = state.obstacles.iter().map(|o| o.state).collect();
        assert_eq!(states, vec![ObstacleState::FullMiss, ObstacleState::Passed]);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::GameOver {
            score: 1,
            rings_cleared: 1
        }));
        let overs = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_later_misses_do_not_repeat_game_over() {
        let mut state = active_state(DifficultyTier::Normal);
        state.player.lives = 1;
        state.player.pos = Vec2::ZERO;
        state.player.vel = Vec2::ZERO;
        state.obstacles = vec![
            crossing_ring(100, Vec2::new(1200.0, 0.0)),
            crossing_ring(101, Vec2::new(-1200.0, 0.0)),
        ];
        state.drain_events();

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.phase, GamePhase::GameOver);
        let events = state.drain_events();
        let overs = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
        assert!(events.contains(&GameEvent::ObstacleMissed {
            spawn_index: 101,
            edge: false
        }));
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let pilot = Autopilot::default();
        let mut state1 = GameState::new(99999, &Settings::for_tier(DifficultyTier::Hard), 0);
        let mut state2 = GameState::new(99999, &Settings::for_tier(DifficultyTier::Hard), 0);

        for _ in 0..2400 {
            let input = pilot.steer(&state1);
            tick(&mut state1, &input, SIM_DT);
            tick(&mut state2, &input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.player.pos, state2.player.pos);
        assert_eq!(state1.player.score, state2.player.score);
        assert_eq!(state1.spawner.stats, state2.spawner.stats);
        let targets = |s: &GameState| s.obstacles.iter().map(|o| o.target).collect::<Vec<_>>();
        assert_eq!(targets(&state1), targets(&state2));
    }

    fn check_invariants(state: &GameState) {
        let tier = state.config.tier;
        let min_sep = tier.tuning().min_separation;
        let pending: Vec<_> = state.pending_obstacles().collect();
        for (i, a) in pending.iter().enumerate() {
            for b in &pending[i + 1..] {
                let gap = (a.arrival_in() - b.arrival_in()).abs();
                assert!(gap >= min_sep - 1e-3, "arrivals {} apart", gap);
            }
        }
        for pair in state.obstacles.windows(2) {
            assert!(pair[0].spawn_index < pair[1].spawn_index);
        }
        for o in &state.obstacles {
            assert!(o.size >= 0.5 * BASE_RING_SIZE);
            assert!(o.size <= ring_size(tier, 0));
            assert!((MIN_APPROACH_SPEED..=MAX_APPROACH_SPEED).contains(&o.approach_speed));
            assert!(o.target.x.abs() <= TARGET_BOUND && o.target.y.abs() <= TARGET_BOUND);
        }
        assert!(state.player.vel.length() <= MAX_SPEED + 0.01);
        assert!(state.player.pos.x.abs() < PLAY_BOUND && state.player.pos.y.abs() < PLAY_BOUND);
        assert!(state.player.lives <= MAX_LIVES);
    }

    #[test]
    fn test_long_run_invariants() {
        for tier in DifficultyTier::ALL {
            let pilot = Autopilot::default();
            let mut state = GameState::new(tier as u64 + 7, &Settings::for_tier(tier), 0);
            let mut spawned = 0;
            for _ in 0..(90.0 / SIM_DT) as u32 {
                let input = pilot.steer(&state);
                tick(&mut state, &input, SIM_DT);
                check_invariants(&state);
                spawned += state
                    .drain_events()
                    .iter()
                    .filter(|e| matches!(e, GameEvent::ObstacleSpawned { .. }))
                    .count();
            }
            assert!(spawned > 10, "only {} rings in 90s on {}", spawned, tier.as_str());
        }
    }

    #[test]
    fn test_single_axis_round() {
        let mut settings = Settings::for_tier(DifficultyTier::Expert);
        settings.single_axis = true;
        let pilot = Autopilot::default();
        let mut state = GameState::new(5, &settings, 0);
        for _ in 0..3600 {
            let input = pilot.steer(&state);
            tick(&mut state, &input, SIM_DT);
            assert_eq!(state.player.pos.y, 0.0);
            assert!(state.obstacles.iter().all(|o| o.target.y == 0.0));
        }
    }
}
