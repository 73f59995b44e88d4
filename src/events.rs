//! Typed event stream for host adapters
//!
//! The session pushes every event through an [`EventBus`]. Adapters observe
//! and never mutate simulation state, and a failing adapter must not stop
//! the game: errors and panics are logged at the bus and delivery continues.
//!
//! Panic containment relies on unwinding, so it only holds on native
//! builds. On `wasm32` a panic aborts the module; web adapters must report
//! failures through their `Result` instead of panicking.

use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::{Deserialize, Serialize};

use crate::sim::{Cell, LossCause, Snapshot};

/// Everything the core announces to the outside world
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted,
    SessionPaused,
    SessionResumed,
    /// The head reached the target
    Consumed { score: u32, cell: Cell },
    SessionLost { cause: LossCause, score: u32 },
    SessionWon { score: u32 },
    /// Emitted after every tick and state transition
    Snapshot(Snapshot),
}

impl GameEvent {
    /// Discrete events (everything except snapshots)
    pub fn is_discrete(&self) -> bool {
        !matches!(self, GameEvent::Snapshot(_))
    }
}

/// A host-side consumer of game events (renderer, audio, telemetry)
pub trait Adapter {
    /// Short name used in failure logs
    fn name(&self) -> &str;

    fn handle(&mut self, event: &GameEvent) -> anyhow::Result<()>;
}

/// Fan-out of events to subscribed adapters
#[derive(Default)]
pub struct EventBus {
    adapters: Vec<Box<dyn Adapter>>,
    failures: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, adapter: Box<dyn Adapter>) {
        log::debug!("Adapter subscribed: {}", adapter.name());
        self.adapters.push(adapter);
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Adapter failures seen so far (errors and panics)
    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Deliver one event to every adapter, in subscription order
    pub fn dispatch(&mut self, event: &GameEvent) {
        for adapter in &mut self.adapters {
            match catch_unwind(AssertUnwindSafe(|| adapter.handle(event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    self.failures += 1;
                    log::error!("Adapter '{}' failed on {:?}: {:#}", adapter.name(), event, e);
                }
                Err(_) => {
                    self.failures += 1;
                    log::error!("Adapter '{}' panicked on {:?}", adapter.name(), event);
                }
            }
        }
    }

    pub fn dispatch_all(&mut self, events: impl IntoIterator<Item = GameEvent>) {
        for event in events {
            self.dispatch(&event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.adapters.iter().map(|a| a.name()).collect();
        f.debug_struct("EventBus")
            .field("adapters", &names)
            .field("failures", &self.failures)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every event it sees; shared handle lets tests inspect it
    pub(crate) struct Recorder {
        pub seen: Rc<RefCell<Vec<GameEvent>>>,
    }

    impl Recorder {
        pub(crate) fn new() -> (Self, Rc<RefCell<Vec<GameEvent>>>) {
            let seen = Rc::new(RefCell::new(Vec::new()));
            (Self { seen: seen.clone() }, seen)
        }
    }

    impl Adapter for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn handle(&mut self, event: &GameEvent) -> anyhow::Result<()> {
            self.seen.borrow_mut().push(event.clone());
            Ok(())
        }
    }

    struct Failing;

    impl Adapter for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn handle(&mut self, _event: &GameEvent) -> anyhow::Result<()> {
            anyhow::bail!("surface lost")
        }
    }

    struct Panicking;

    impl Adapter for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }

        fn handle(&mut self, _event: &GameEvent) -> anyhow::Result<()> {
            panic!("renderer exploded");
        }
    }

    #[test]
    fn test_dispatch_reaches_all_in_order() {
        let mut bus = EventBus::new();
        let (recorder, seen) = Recorder::new();
        bus.subscribe(Box::new(recorder));
        bus.dispatch_all([GameEvent::SessionStarted, GameEvent::SessionPaused]);
        assert_eq!(
            *seen.borrow(),
            vec![GameEvent::SessionStarted, GameEvent::SessionPaused]
        );
    }

    #[test]
    fn test_failures_are_contained() {
        let mut bus = EventBus::new();
        let (recorder, seen) = Recorder::new();
        bus.subscribe(Box::new(Failing));
        bus.subscribe(Box::new(Panicking));
        bus.subscribe(Box::new(recorder));

        bus.dispatch(&GameEvent::SessionStarted);
        bus.dispatch(&GameEvent::SessionWon { score: 3 });

        assert_eq!(bus.failures(), 4);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_discrete_classification() {
        assert!(GameEvent::SessionStarted.is_discrete());
        assert!(
            !GameEvent::Snapshot(Snapshot {
                body: vec![Cell::new(0, 0)],
                target: Cell::new(1, 1),
                score: 0,
                state: crate::sim::SessionState::Running,
            })
            .is_discrete()
        );
    }
}
