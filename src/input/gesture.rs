//! Pointer gesture recognition: swipes, taps and double-taps
//!
//! Positions are in screen pixels with y growing downward, which matches
//! the grid's row order, so a downward swipe means `Direction::Down`.

use glam::Vec2;

use crate::settings::Settings;
use crate::sim::Direction;

/// Recognizer thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Minimum travel on the dominant axis for a swipe
    pub swipe_threshold: f32,
    /// Max milliseconds between two taps of a double-tap (inclusive)
    pub double_tap_window_ms: f64,
    /// Max pixels between two taps of a double-tap (inclusive)
    pub double_tap_distance: f32,
}

impl GestureConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            swipe_threshold: settings.swipe_threshold_px,
            double_tap_window_ms: settings.double_tap_window_ms,
            double_tap_distance: settings.double_tap_distance_px,
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// A recognized pointer gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Swipe(Direction),
    /// A lone tap (may become half of a double-tap)
    Tap,
    DoubleTap,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PointerSample {
    pos: Vec2,
    time_ms: f64,
}

/// Classify a pointer delta as a swipe direction.
///
/// Returns `None` when the dominant axis travelled less than `threshold`.
/// Ties go to the horizontal axis.
pub fn classify_swipe(delta: Vec2, threshold: f32) -> Option<Direction> {
    let (ax, ay) = (delta.x.abs(), delta.y.abs());
    if ax.max(ay) < threshold {
        return None;
    }
    let dir = if ax >= ay {
        if delta.x > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if delta.y > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };
    Some(dir)
}

/// Turns pointer down/up pairs into gestures
#[derive(Debug, Clone, Default)]
pub struct GestureRecognizer {
    config: GestureConfig,
    press: Option<PointerSample>,
    last_tap: Option<PointerSample>,
}

impl GestureRecognizer {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            press: None,
            last_tap: None,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn pointer_down(&mut self, pos: Vec2, time_ms: f64) {
        self.press = Some(PointerSample { pos, time_ms });
    }

    /// Drop an in-progress press (pointer left the surface, touch cancelled)
    pub fn pointer_cancel(&mut self) {
        self.press = None;
    }

    /// Finish a press; `None` if no press was in progress
    pub fn pointer_up(&mut self, pos: Vec2, time_ms: f64) -> Option<Gesture> {
        let press = self.press.take()?;

        if let Some(dir) = classify_swipe(pos - press.pos, self.config.swipe_threshold) {
            self.last_tap = None;
            return Some(Gesture::Swipe(dir));
        }

        let tap = PointerSample { pos, time_ms };
        match self.last_tap.take() {
            Some(prev) if self.is_second_tap(prev, tap) => Some(Gesture::DoubleTap),
            _ => {
                self.last_tap = Some(tap);
                Some(Gesture::Tap)
            }
        }
    }

    fn is_second_tap(&self, prev: PointerSample, tap: PointerSample) -> bool {
        let gap = tap.time_ms - prev.time_ms;
        (0.0..=self.config.double_tap_window_ms).contains(&gap)
            && prev.pos.distance(tap.pos) <= self.config.double_tap_distance
    }
}
