//! Session lifecycle and host command surface
//!
//! A [`Session`] owns the one game state, the tick timer and the event bus.
//! It decides which commands are allowed in which [`SessionState`]:
//!
//! ```text
//! Idle --start--> Running <--pause/resume--> Paused
//!                    |
//!                    +--tick--> Lost | Won --start--> Running
//! ```
//!
//! Commands that do not apply in the current state are ignored.

use std::time::Duration;

use glam::Vec2;

use crate::events::{Adapter, EventBus, GameEvent};
use crate::input::{
    Gesture, GestureConfig, GestureRecognizer, KeyCommand, admits_direction, classify_swipe,
    map_key,
};
use crate::schedule::{FixedStepClock, Scheduler, TimerHandle};
use crate::settings::{Settings, SettingsError};
use crate::sim::{self, Direction, GameState, SessionState, Snapshot, TickOutcome};

/// One game, its timer, and the adapters watching it
pub struct Session<S: Scheduler = FixedStepClock> {
    settings: Settings,
    state: GameState,
    scheduler: S,
    timer: Option<TimerHandle>,
    gestures: GestureRecognizer,
    bus: EventBus,
    /// Best score across runs of this session (not persisted)
    best_score: u32,
}

impl Session<FixedStepClock> {
    /// Build an idle session driven by the fixed-step clock
    pub fn new(settings: Settings, seed: u64) -> Result<Self, SettingsError> {
        Self::with_scheduler(settings, seed, FixedStepClock::new())
    }
}

impl<S: Scheduler> Session<S> {
    pub fn with_scheduler(settings: Settings, seed: u64, scheduler: S) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            state: GameState::new(&settings, seed),
            gestures: GestureRecognizer::new(GestureConfig::from_settings(&settings)),
            settings,
            scheduler,
            timer: None,
            bus: EventBus::new(),
            best_score: 0,
        })
    }

    pub fn subscribe(&mut self, adapter: Box<dyn Adapter>) {
        self.bus.subscribe(adapter);
    }

    pub fn state(&self) -> SessionState {
        self.state.phase
    }

    /// Read-only view of the full game state
    pub fn game(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Adapter errors and panics contained so far
    pub fn adapter_failures(&self) -> u64 {
        self.bus.failures()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    // === Lifecycle commands ===

    /// Begin a fresh run (from Idle, Lost or Won)
    pub fn start(&mut self) {
        if !(self.state.phase == SessionState::Idle || self.state.phase.is_ended()) {
            log::debug!("start ignored while {:?}", self.state.phase);
            return;
        }

        self.state.reset();
        self.state.phase = SessionState::Running;
        self.arm_timer();
        log::info!(
            "Session started: {0}x{0} grid, {1} edges, seed {2}",
            self.state.grid.dimension,
            self.state.grid.policy.as_str(),
            self.state.seed
        );
        self.transition_event(GameEvent::SessionStarted);
    }

    pub fn pause(&mut self) {
        if self.state.phase != SessionState::Running {
            log::debug!("pause ignored while {:?}", self.state.phase);
            return;
        }
        self.state.phase = SessionState::Paused;
        self.disarm_timer();
        log::info!("Paused at tick {}", self.state.time_ticks);
        self.transition_event(GameEvent::SessionPaused);
    }

    pub fn resume(&mut self) {
        if self.state.phase != SessionState::Paused {
            log::debug!("resume ignored while {:?}", self.state.phase);
            return;
        }
        self.state.phase = SessionState::Running;
        self.arm_timer();
        log::info!("Resumed at tick {}", self.state.time_ticks);
        self.transition_event(GameEvent::SessionResumed);
    }

    pub fn toggle_pause(&mut self) {
        match self.state.phase {
            SessionState::Running => self.pause(),
            SessionState::Paused => self.resume(),
            other => log::debug!("pause toggle ignored while {:?}", other),
        }
    }

    // === Input ===

    /// Record a movement request as the pending intent.
    ///
    /// Accepted while Running or Paused (applied on the next tick). A
    /// reversal of the committed direction is refused.
    pub fn directional_input(&mut self, requested: Direction) {
        if !matches!(
            self.state.phase,
            SessionState::Running | SessionState::Paused
        ) {
            log::debug!("{:?} ignored while {:?}", requested, self.state.phase);
            return;
        }
        let snake = &self.state.snake;
        if !admits_direction(requested, snake.direction, snake.len()) {
            log::debug!("Rejected reversal {:?} -> {:?}", snake.direction, requested);
            return;
        }
        self.state.pending_intent = Some(requested);
    }

    /// Classify a raw swipe delta; sub-threshold deltas are dropped
    pub fn swipe_gesture(&mut self, dx: f32, dy: f32) {
        let threshold = self.gestures.config().swipe_threshold;
        if let Some(dir) = classify_swipe(Vec2::new(dx, dy), threshold) {
            self.directional_input(dir);
        }
    }

    pub fn double_tap(&mut self) {
        self.toggle_pause();
    }

    pub fn key_down(&mut self, key: &str) {
        match map_key(key) {
            Some(KeyCommand::Move(dir)) => self.directional_input(dir),
            Some(KeyCommand::TogglePause) => self.toggle_pause(),
            Some(KeyCommand::Start) => self.start(),
            None => {}
        }
    }

    pub fn pointer_down(&mut self, pos: Vec2, time_ms: f64) {
        self.gestures.pointer_down(pos, time_ms);
    }

    pub fn pointer_cancel(&mut self) {
        self.gestures.pointer_cancel();
    }

    /// Finish a pointer press and act on the recognized gesture
    pub fn pointer_up(&mut self, pos: Vec2, time_ms: f64) -> Option<Gesture> {
        let gesture = self.gestures.pointer_up(pos, time_ms);
        match gesture {
            Some(Gesture::Swipe(dir)) => self.directional_input(dir),
            Some(Gesture::DoubleTap) => self.toggle_pause(),
            Some(Gesture::Tap) | None => {}
        }
        gesture
    }

    // === Simulation ===

    /// Run one simulation step (no-op unless Running)
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = sim::tick(&mut self.state);
        match outcome {
            TickOutcome::Lost(cause) => {
                log::info!("Lost ({:?}) with score {}", cause, self.state.score);
                self.finish(
                    SessionState::Lost,
                    GameEvent::SessionLost {
                        cause,
                        score: self.state.score,
                    },
                );
            }
            TickOutcome::Won => {
                log::info!("Won with score {}", self.state.score);
                self.finish(
                    SessionState::Won,
                    GameEvent::SessionWon {
                        score: self.state.score,
                    },
                );
            }
            TickOutcome::Skipped | TickOutcome::Moved | TickOutcome::Consumed => self.flush(),
        }
        outcome
    }

    /// Report elapsed host time; runs every tick that fell due.
    ///
    /// Returns the number of ticks executed. Stops early if a tick ends
    /// the run.
    pub fn update(&mut self, elapsed: Duration) -> u32 {
        let due = self.scheduler.advance(elapsed);
        let mut ran = 0;
        for _ in 0..due {
            if self.state.phase != SessionState::Running {
                break;
            }
            self.tick();
            ran += 1;
        }
        ran
    }

    fn finish(&mut self, phase: SessionState, event: GameEvent) {
        self.state.phase = phase;
        self.disarm_timer();
        self.best_score = self.best_score.max(self.state.score);
        self.transition_event(event);
    }

    fn arm_timer(&mut self) {
        self.timer = Some(
            self.scheduler
                .schedule_repeating(self.settings.tick_period()),
        );
    }

    fn disarm_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// Queue a transition event plus a fresh snapshot, then deliver
    fn transition_event(&mut self, event: GameEvent) {
        self.state.events.push(event);
        let snapshot = self.state.snapshot();
        self.state.events.push(GameEvent::Snapshot(snapshot));
        self.flush();
    }

    fn flush(&mut self) {
        let events = self.state.drain_events();
        self.bus.dispatch_all(events);
    }
}

impl<S: Scheduler + std::fmt::Debug> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.state.phase)
            .field("score", &self.state.score)
            .field("scheduler", &self.scheduler)
            .field("bus", &self.bus)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::tests::Recorder;
    use crate::settings::BoundaryPolicy;
    use crate::sim::{Cell, LossCause};

    fn started() -> Session {
        let mut session = Session::new(Settings::default(), 1).unwrap();
        session.start();
        // Park the target out of the way
        session.state.target = Cell::new(0, 0);
        session
    }

    fn discrete(events: &[GameEvent]) -> Vec<GameEvent> {
        events.iter().filter(|e| e.is_discrete()).cloned().collect()
    }

    #[test]
    fn test_new_session_is_idle_and_ignores_input() {
        let mut session = Session::new(Settings::default(), 1).unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        session.directional_input(Direction::Up);
        session.pause();
        session.resume();
        assert_eq!(session.game().pending_intent, None);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.tick(), TickOutcome::Skipped);
        assert!(!session.scheduler().is_active());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = Settings {
            grid_dimension: 2,
            ..Default::default()
        };
        assert!(Session::new(settings, 1).is_err());

        let settings = Settings {
            grid_dimension: 0,
            ..Default::default()
        };
        assert!(matches!(
            Session::new(settings, 1),
            Err(SettingsError::GridDimension(0))
        ));
    }

    #[test]
    fn test_start_resets_and_arms_timer() {
        let session = started();
        assert_eq!(session.state(), SessionState::Running);
        assert!(session.scheduler().is_active());
        assert_eq!(
            session.snapshot().body,
            vec![Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)]
        );
        assert_eq!(session.snapshot().score, 0);
    }

    #[test]
    fn test_start_while_running_or_paused_is_noop() {
        let mut session = started();
        session.tick();
        session.start();
        assert_eq!(session.game().time_ticks, 1);
        session.pause();
        session.start();
        assert_eq!(session.state(), SessionState::Paused);
        assert_eq!(session.game().time_ticks, 1);
    }

    #[test]
    fn test_scenario_eat_after_five_ticks() {
        let mut session = started();
        session.state.target = Cell::new(15, 10);
        for _ in 0..5 {
            session.tick();
        }
        let snap = session.snapshot();
        assert_eq!(snap.body[0], Cell::new(15, 10));
        assert_eq!(snap.score, 1);
        assert_eq!(snap.body.len(), 4);
    }

    #[test]
    fn test_reversal_is_rejected() {
        let mut session = started();
        session.directional_input(Direction::Left);
        assert_eq!(session.game().pending_intent, None);
        session.tick();
        assert_eq!(session.game().snake.direction, Direction::Right);
        assert_eq!(session.snapshot().body[0], Cell::new(11, 10));
    }

    #[test]
    fn test_reversal_checked_against_committed_not_pending() {
        let mut session = started();
        // Up is pending but Right is still committed, so Left stays illegal
        session.directional_input(Direction::Up);
        session.directional_input(Direction::Left);
        assert_eq!(session.game().pending_intent, Some(Direction::Up));
        session.tick();
        assert_eq!(session.snapshot().body[0], Cell::new(10, 9));
    }

    #[test]
    fn test_last_intent_wins() {
        let mut session = started();
        session.directional_input(Direction::Up);
        session.directional_input(Direction::Down);
        session.tick();
        assert_eq!(session.snapshot().body[0], Cell::new(10, 11));
    }

    #[test]
    fn test_resume_while_running_is_noop() {
        let mut session = Session::new(Settings::default(), 1).unwrap();
        let (recorder, seen) = Recorder::new();
        session.subscribe(Box::new(recorder));
        session.start();
        session.state.target = Cell::new(0, 0);

        // Leave the clock partly filled
        assert_eq!(session.update(Duration::from_millis(60)), 0);
        session.resume();

        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.game().time_ticks, 0);
        assert_eq!(discrete(&seen.borrow()), vec![GameEvent::SessionStarted]);

        // Same timer, same accumulator: 60 + 40 completes one period
        assert_eq!(session.update(Duration::from_millis(40)), 1);
        assert_eq!(session.game().time_ticks, 1);
    }

    #[test]
    fn test_pause_resume_preserves_snapshot() {
        let mut session = started();
        session.tick();
        session.directional_input(Direction::Down);
        let before = session.snapshot();

        session.pause();
        assert_eq!(session.state(), SessionState::Paused);
        assert!(!session.scheduler().is_active());
        assert_eq!(session.tick(), TickOutcome::Skipped);
        assert_eq!(session.update(Duration::from_secs(3)), 0);
        session.pause();

        session.resume();
        assert_eq!(session.snapshot(), before);
        assert_eq!(session.game().pending_intent, Some(Direction::Down));
        assert!(session.scheduler().is_active());
    }

    #[test]
    fn test_intent_recorded_while_paused_applies_after_resume() {
        let mut session = started();
        session.pause();
        session.directional_input(Direction::Up);
        session.resume();
        session.tick();
        assert_eq!(session.snapshot().body[0], Cell::new(10, 9));
    }

    #[test]
    fn test_double_tap_toggles_once_without_turning() {
        let mut session = started();
        let at = Vec2::new(120.0, 300.0);

        session.pointer_down(at, 1000.0);
        assert_eq!(session.pointer_up(at, 1030.0), Some(Gesture::Tap));
        session.pointer_down(at, 1150.0);
        assert_eq!(session.pointer_up(at, 1180.0), Some(Gesture::DoubleTap));

        assert_eq!(session.state(), SessionState::Paused);
        assert_eq!(session.game().pending_intent, None);
        assert_eq!(session.game().snake.direction, Direction::Right);

        // A third quick tap is just a tap
        session.pointer_down(at, 1250.0);
        assert_eq!(session.pointer_up(at, 1270.0), Some(Gesture::Tap));
        assert_eq!(session.state(), SessionState::Paused);
    }

    #[test]
    fn test_swipe_and_keys_drive_direction() {
        let mut session = started();
        session.swipe_gesture(4.0, 12.0);
        assert_eq!(session.game().pending_intent, None);
        session.swipe_gesture(4.0, 80.0);
        assert_eq!(session.game().pending_intent, Some(Direction::Down));
        session.key_down("w");
        assert_eq!(session.game().pending_intent, Some(Direction::Up));
        session.key_down("ArrowLeft");
        assert_eq!(session.game().pending_intent, Some(Direction::Up));

        session.key_down(" ");
        assert_eq!(session.state(), SessionState::Paused);
        session.double_tap();
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn test_wall_loss_stops_timer_and_allows_restart() {
        let settings = Settings {
            boundary: BoundaryPolicy::Bounded,
            ..Default::default()
        };
        let mut session = Session::new(settings, 9).unwrap();
        session.start();

        let mut ran = 0;
        for _ in 0..5 {
            ran += session.update(Duration::from_millis(800));
        }
        // Head starts at x = 10: 19 moves to x = 29, the 20th hits the wall
        assert_eq!(ran, 20);
        assert_eq!(session.state(), SessionState::Lost);
        assert!(!session.scheduler().is_active());
        assert_eq!(session.update(Duration::from_secs(1)), 0);

        // Input after the end is ignored
        session.directional_input(Direction::Up);
        assert_eq!(session.game().pending_intent, None);

        session.key_down("Enter");
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.game().time_ticks, 0);
        assert_eq!(session.snapshot().score, 0);
    }

    #[test]
    fn test_events_reach_adapters() {
        let mut session = Session::new(Settings::default(), 1).unwrap();
        let (recorder, seen) = Recorder::new();
        session.subscribe(Box::new(recorder));

        session.start();
        session.state.target = Cell::new(11, 10);
        session.tick();
        session.state.target = Cell::new(0, 0);
        session.pause();
        session.resume();
        // Up, Left, Down curls the head back into the body
        session.directional_input(Direction::Up);
        session.tick();
        session.directional_input(Direction::Left);
        session.tick();
        session.directional_input(Direction::Down);
        session.tick();

        let events = seen.borrow();
        assert_eq!(
            discrete(&events),
            vec![
                GameEvent::SessionStarted,
                GameEvent::Consumed {
                    score: 1,
                    cell: Cell::new(11, 10)
                },
                GameEvent::SessionPaused,
                GameEvent::SessionResumed,
                GameEvent::SessionLost {
                    cause: LossCause::SelfCollision,
                    score: 1
                },
            ]
        );
        match events.last() {
            Some(GameEvent::Snapshot(snap)) => assert_eq!(snap.state, SessionState::Lost),
            other => panic!("expected final snapshot, got {other:?}"),
        }
        drop(events);
        assert_eq!(session.best_score(), 1);
    }

    #[test]
    fn test_failing_adapter_does_not_stop_play() {
        struct Broken;
        impl Adapter for Broken {
            fn name(&self) -> &str {
                "broken"
            }
            fn handle(&mut self, _event: &GameEvent) -> anyhow::Result<()> {
                anyhow::bail!("canvas gone")
            }
        }

        let mut session = Session::new(Settings::default(), 1).unwrap();
        session.subscribe(Box::new(Broken));
        session.start();
        session.state.target = Cell::new(0, 0);
        for _ in 0..3 {
            assert_eq!(session.tick(), TickOutcome::Moved);
        }
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.snapshot().body[0], Cell::new(13, 10));
        assert!(session.adapter_failures() >= 4);
    }

    #[test]
    fn test_reaching_win_length() {
        let settings = Settings {
            win_length: Some(4),
            ..Default::default()
        };
        let mut session = Session::new(settings, 1).unwrap();
        session.start();
        session.state.target = Cell::new(11, 10);
        assert_eq!(session.tick(), TickOutcome::Won);
        assert_eq!(session.state(), SessionState::Won);
        assert!(!session.scheduler().is_active());
        session.toggle_pause();
        assert_eq!(session.state(), SessionState::Won);
    }
}
