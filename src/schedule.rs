//! Repeating timer abstraction
//!
//! The session never reads a clock. It asks a [`Scheduler`] to start or
//! cancel a repeating timer and, when the host reports elapsed time, how
//! many periods fired. Tests skip all of this and call `tick()` directly.

use std::time::Duration;

use crate::consts::MAX_TICKS_PER_UPDATE;

/// Identifies one scheduled timer; stale handles are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

pub trait Scheduler {
    /// Start a repeating timer, replacing any active one
    fn schedule_repeating(&mut self, period: Duration) -> TimerHandle;

    /// Stop the timer if `handle` is still the active one
    fn cancel(&mut self, handle: TimerHandle);

    fn is_active(&self) -> bool;

    /// Report elapsed host time; returns how many periods fired
    fn advance(&mut self, elapsed: Duration) -> u32;
}

/// Accumulator-driven fixed-step clock.
///
/// Fires at most [`MAX_TICKS_PER_UPDATE`] ticks per `advance` call and drops
/// the backlog beyond that, so a long host stall cannot trigger a burst.
#[derive(Debug, Clone, Default)]
pub struct FixedStepClock {
    active: Option<(TimerHandle, Duration)>,
    accumulator: Duration,
    next_id: u64,
}

impl FixedStepClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Period of the active timer
    pub fn period(&self) -> Option<Duration> {
        self.active.map(|(_, period)| period)
    }
}

impl Scheduler for FixedStepClock {
    fn schedule_repeating(&mut self, period: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.active = Some((handle, period));
        // A new timer starts a full period from now
        self.accumulator = Duration::ZERO;
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if matches!(self.active, Some((active, _)) if active == handle) {
            self.active = None;
            self.accumulator = Duration::ZERO;
        }
    }

    fn is_active(&self) -> bool {
        self.active.is_some()
    }

    fn advance(&mut self, elapsed: Duration) -> u32 {
        let Some((_, period)) = self.active else {
            return 0;
        };
        if period.is_zero() {
            return 0;
        }
        self.accumulator += elapsed;

        let mut fired = 0;
        while self.accumulator >= period && fired < MAX_TICKS_PER_UPDATE {
            self.accumulator -= period;
            fired += 1;
        }
        if fired == MAX_TICKS_PER_UPDATE && self.accumulator >= period {
            log::debug!("Dropping {:?} of tick backlog", self.accumulator);
            self.accumulator = Duration::ZERO;
        }
        fired
    }
}
