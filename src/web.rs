//! Browser bridge
//!
//! JS owns the canvas, input listeners and `requestAnimationFrame`; it feeds
//! frame deltas and input into a `WebGame` and reads back JSON snapshots.

use wasm_bindgen::prelude::*;

use crate::highscores::HighScores;
use crate::persistence::SaveGame;
use crate::platform::{FrameClock, LocalStorage};
use crate::settings::{DifficultyTier, Settings};
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Already initialised by an earlier module instance
        return;
    }
    log::info!("Ring Flight starting...");
}

/// Game instance holding all state
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    clock: FrameClock,
    input: TickInput,
    settings: Settings,
    highscores: HighScores,
    storage: Option<LocalStorage>,
    /// Events since JS last asked for them
    events: Vec<GameEvent>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64) -> WebGame {
        let storage = LocalStorage::open();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable, progress will not be kept");
        }
        let settings = storage
            .as_ref()
            .map(|s| Settings::load(s))
            .unwrap_or_default();
        let highscores = storage
            .as_ref()
            .map(|s| HighScores::load(s))
            .unwrap_or_default();
        let state = GameState::new(seed as u64, &settings, highscores.best_score(settings.tier));
        log::info!("Game initialized with seed: {}", seed as u64);

        WebGame {
            state,
            clock: FrameClock::default(),
            input: TickInput::default(),
            settings,
            highscores,
            storage,
            events: Vec::new(),
        }
    }

    /// True if a saved round exists
    pub fn has_save(&self) -> bool {
        match self.storage.as_ref().map(|s| SaveGame::fetch(s)) {
            Some(Ok(Some(_))) => true,
            Some(Err(e)) => {
                log::warn!("Saved round unreadable: {}", e);
                false
            }
            _ => false,
        }
    }

    /// Replace the current state with the saved round. Returns false if none.
    pub fn continue_saved(&mut self) -> bool {
        let Some(storage) = self.storage.as_ref() else {
            return false;
        };
        match SaveGame::fetch(storage) {
            Ok(Some(save)) => {
                self.state = save.into_state();
                self.settings.tier = self.state.config.tier;
                self.clock.reset();
                self.input = TickInput::default();
                log::info!("Continuing saved round (score {})", self.state.player.score);
                true
            }
            Ok(None) => false,
            Err(e) => {
                log::warn!("Could not restore saved round: {}", e);
                false
            }
        }
    }

    /// Select a tier for the next round; ignored mid-round
    pub fn set_tier(&mut self, name: &str) -> bool {
        let Some(tier) = DifficultyTier::from_str(name) else {
            return false;
        };
        if !matches!(self.state.phase, GamePhase::Idle | GamePhase::GameOver) {
            return false;
        }
        self.settings.tier = tier;
        self.state = GameState::new(
            self.state.seed.wrapping_add(1),
            &self.settings,
            self.highscores.best_score(tier),
        );
        if let Some(storage) = self.storage.as_mut()
            && let Err(e) = self.settings.save(storage)
        {
            log::warn!("Could not save settings: {}", e);
        }
        true
    }

    pub fn set_thrust(&mut self, held: bool, dir_x: f32, dir_y: f32) {
        self.input.thrust = held;
        self.input.thrust_dir = glam::Vec2::new(dir_x, dir_y);
    }

    pub fn press_start(&mut self) {
        self.input.start = true;
    }

    pub fn press_pause(&mut self) {
        self.input.pause = true;
    }

    pub fn press_resume(&mut self) {
        self.input.resume = true;
    }

    pub fn press_retry(&mut self) {
        self.input.retry = true;
    }

    /// Run fixed steps for one animation frame (seconds). Returns steps run.
    pub fn frame(&mut self, frame_dt: f32) -> u32 {
        let steps = self.clock.advance(frame_dt);
        for _ in 0..steps {
            let input = self.input.clone();
            tick(&mut self.state, &input, self.clock.dt());

            // Clear one-shot inputs after processing
            self.input.start = false;
            self.input.pause = false;
            self.input.resume = false;
            self.input.retry = false;
        }

        let events = self.state.drain_events();
        for event in &events {
            match event {
                GameEvent::NewHighScore { .. } | GameEvent::ObstaclePassed { .. }
                    if self.state.high_score_beaten =>
                {
                    self.keep_high_score()
                }
                GameEvent::Paused => self.save_round(),
                GameEvent::GameOver {
                    score,
                    rings_cleared,
                } => self.finish_round(*score, *rings_cleared),
                _ => {}
            }
        }
        self.events.extend(events);
        steps
    }

    /// Current frame as JSON (`FrameSnapshot`)
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.state.snapshot()).unwrap_or_default()
    }

    /// Events since the last call, as a JSON array
    pub fn take_events_json(&mut self) -> String {
        let events = std::mem::take(&mut self.events);
        serde_json::to_string(&events).unwrap_or_default()
    }

    pub fn score(&self) -> f64 {
        self.state.player.score as f64
    }

    pub fn lives(&self) -> u8 {
        self.state.player.lives
    }

    pub fn high_score(&self) -> f64 {
        self.state.high_score as f64
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.state.phase)
    }
}

impl WebGame {
    fn save_round(&mut self) {
        let Some(storage) = self.storage.as_mut() else {
            return;
        };
        if let Err(e) = SaveGame::capture(&self.state).store(storage) {
            log::warn!("Could not save round: {}", e);
        }
    }

    fn keep_high_score(&mut self) {
        let player = &self.state.player;
        let (score, rings) = (player.score, player.rings_cleared);
        let Some(storage) = self.storage.as_mut() else {
            self.highscores.record(self.settings.tier, score, rings);
            return;
        };
        if let Err(e) = self.highscores.track(self.settings.tier, score, rings, storage) {
            log::warn!("Could not save high scores: {}", e);
        }
    }

    fn finish_round(&mut self, score: u64, rings: u32) {
        let is_best = self.highscores.record(self.settings.tier, score, rings);
        let Some(storage) = self.storage.as_mut() else {
            return;
        };
        if let Err(e) = SaveGame::clear(storage) {
            log::warn!("Could not clear saved round: {}", e);
        }
        if is_best && let Err(e) = self.highscores.save(storage) {
            log::warn!("Could not save high scores: {}", e);
        }
    }
}
