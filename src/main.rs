//! Ring Flight entry point
//!
//! Natively this runs a headless autopilot session and prints a summary:
//!
//! ```text
//! ring-flight [seed] [tier] [seconds]
//! ```
//!
//! The browser build is driven from JS through `ring_flight::web::WebGame`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use ring_flight::platform::{FileStorage, FrameClock};
    use ring_flight::sim::{Autopilot, EventTally, GamePhase, GameState, dispatch, tick};
    use ring_flight::{DifficultyTier, HighScores, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = args
        .first()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(clock_seed);
    let seconds = args
        .get(2)
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(60.0);

    let data_dir = std::env::var("RING_FLIGHT_DATA").unwrap_or_else(|_| ".ring-flight".into());
    let mut storage = FileStorage::new(data_dir);

    let mut settings = Settings::load(&storage);
    if let Some(name) = args.get(1) {
        match DifficultyTier::from_str(name) {
            Some(tier) => settings.tier = tier,
            None => log::warn!("Unknown tier '{}', keeping {}", name, settings.tier.as_str()),
        }
    }
    let mut highscores = HighScores::load(&storage);

    log::info!(
        "Ring Flight (native) starting: seed {}, tier {}, {}s",
        seed,
        settings.tier.as_str(),
        seconds
    );

    let mut state = GameState::new(seed, &settings, highscores.best_score(settings.tier));
    let pilot = Autopilot {
        auto_retry: false,
        ..Default::default()
    };
    let mut clock = FrameClock::default();
    let mut tally = EventTally::default();

    // Pretend to be a 60 Hz display
    let frame_dt = 1.0 / 60.0;
    let mut elapsed = 0.0;
    while elapsed < seconds && state.phase != GamePhase::GameOver {
        for _ in 0..clock.advance(frame_dt) {
            let input = pilot.steer(&state);
            tick(&mut state, &input, clock.dt());
        }
        dispatch(&state.drain_events(), &mut tally);
        if state.high_score_beaten
            && let Err(e) = highscores.track(
                settings.tier,
                state.player.score,
                state.player.rings_cleared,
                &mut storage,
            )
        {
            log::warn!("Could not save high scores: {}", e);
        }
        elapsed += frame_dt;
    }

    let player = &state.player;
    let stats = state.spawner.stats;
    println!("seed          {}", seed);
    println!("tier          {}", settings.tier.as_str());
    println!("time          {:.1}s", state.clock);
    println!("score         {}", player.score);
    println!("lives left    {}", player.lives);
    println!(
        "rings         {} passed, {} edge, {} missed",
        tally.passed, tally.edge_misses, tally.full_misses
    );
    println!("boundary      {}", tally.boundary_exits);
    println!(
        "spawner       {} spawned / {} attempts ({} depth, {} separation, {} momentum)",
        stats.spawned,
        stats.attempts,
        stats.depth_spacing,
        stats.arrival_separation,
        stats.momentum_conflict
    );

    if state.high_score_beaten {
        log::info!("New best for {}: {}", settings.tier.as_str(), player.score);
    }
    if let Err(e) = settings.save(&mut storage) {
        log::warn!("Could not save settings: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}
