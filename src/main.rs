//! Grid Serpent entry point
//!
//! Native builds run a headless demo: the autopilot plays one session on a
//! simulated 60 Hz frame clock and every event goes to the log.
//!
//! Usage: `grid-serpent [settings.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use grid_serpent::adapters::LogAdapter;
    use grid_serpent::audio::{CueAdapter, LogCuePlayer};
    use grid_serpent::autopilot::choose_direction;
    use grid_serpent::{Session, SessionState, Settings};

    /// Simulated frame length (60 Hz)
    const FRAME: Duration = Duration::from_micros(16_667);
    /// Ten simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Grid Serpent (headless demo) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        });

    let audio = CueAdapter::from_settings(LogCuePlayer, &settings);
    let mut session = match Session::new(settings, seed) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Invalid settings: {}", e);
            std::process::exit(2);
        }
    };
    session.subscribe(Box::new(LogAdapter::new()));
    session.subscribe(Box::new(audio));

    session.start();
    let mut frames = 0;
    while session.state() == SessionState::Running && frames < MAX_FRAMES {
        if let Some(dir) = choose_direction(session.game()) {
            session.directional_input(dir);
        }
        session.update(FRAME);
        frames += 1;
    }

    if !session.state().is_ended() {
        log::warn!("Frame limit reached before the run ended");
    }

    let game = session.game();
    log::info!(
        "Finished {:?} after {} ticks: score {}, length {}",
        session.state(),
        game.time_ticks,
        game.score,
        game.snake.len()
    );
    if session.adapter_failures() > 0 {
        log::warn!("{} adapter failures were contained", session.adapter_failures());
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive the library directly; nothing to run here
}
