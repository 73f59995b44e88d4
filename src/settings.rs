//! Game settings and configuration
//!
//! Loaded from JSON by the host; validated before a session is built.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Edge behavior of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Toroidal: leaving one edge re-enters from the opposite edge
    #[default]
    Wrap,
    /// Hard walls: leaving the grid ends the run
    Bounded,
}

impl BoundaryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryPolicy::Wrap => "wrap",
            BoundaryPolicy::Bounded => "bounded",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "wrap" | "toroidal" => Some(BoundaryPolicy::Wrap),
            "bounded" | "walls" => Some(BoundaryPolicy::Bounded),
            _ => None,
        }
    }
}

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read or write settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("grid dimension {0} outside {min}..={max}", min = MIN_GRID_DIMENSION, max = MAX_GRID_DIMENSION)]
    GridDimension(u32),
    #[error("tick period must be non-zero")]
    TickPeriod,
    #[error("{name} must be positive, got {value}")]
    Threshold { name: &'static str, value: f64 },
    #[error("win length {length} outside {min}..={max}", min = MIN_WIN_LENGTH)]
    WinLength { length: usize, max: usize },
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Simulation ===
    /// Cells per grid side
    pub grid_dimension: u32,
    /// Milliseconds between ticks
    pub tick_period_ms: u64,
    /// Wraparound or hard walls
    pub boundary: BoundaryPolicy,
    /// Body length that wins the run (None = fill the grid)
    pub win_length: Option<usize>,

    // === Touch ===
    /// Minimum pointer travel (px) for a swipe
    pub swipe_threshold_px: f32,
    /// Max gap between taps (ms) for a double-tap
    pub double_tap_window_ms: f64,
    /// Max distance between taps (px) for a double-tap
    pub double_tap_distance_px: f32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_dimension: DEFAULT_GRID_DIMENSION,
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            boundary: BoundaryPolicy::Wrap,
            win_length: None,

            swipe_threshold_px: SWIPE_THRESHOLD_PX,
            double_tap_window_ms: DOUBLE_TAP_WINDOW_MS,
            double_tap_distance_px: DOUBLE_TAP_DISTANCE_PX,

            master_volume: 0.8,
            muted: false,
        }
    }
}

impl Settings {
    /// Tick period as a duration
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// Total cells on the grid
    pub fn cell_count(&self) -> usize {
        let n = self.grid_dimension as usize;
        n * n
    }

    /// Body length that ends the run in a win
    pub fn effective_win_length(&self) -> usize {
        self.win_length.unwrap_or_else(|| self.cell_count())
    }

    /// Check every field is usable by the simulation
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(MIN_GRID_DIMENSION..=MAX_GRID_DIMENSION).contains(&self.grid_dimension) {
            return Err(SettingsError::GridDimension(self.grid_dimension));
        }
        if self.tick_period_ms == 0 {
            return Err(SettingsError::TickPeriod);
        }
        // Written as negations so NaN is rejected too
        if !(self.swipe_threshold_px > 0.0) {
            return Err(SettingsError::Threshold {
                name: "swipe_threshold_px",
                value: self.swipe_threshold_px as f64,
            });
        }
        if !(self.double_tap_window_ms > 0.0) {
            return Err(SettingsError::Threshold {
                name: "double_tap_window_ms",
                value: self.double_tap_window_ms,
            });
        }
        if !(self.double_tap_distance_px > 0.0) {
            return Err(SettingsError::Threshold {
                name: "double_tap_distance_px",
                value: self.double_tap_distance_px as f64,
            });
        }
        if let Some(length) = self.win_length {
            let max = self.cell_count();
            if !(MIN_WIN_LENGTH..=max).contains(&length) {
                return Err(SettingsError::WinLength { length, max });
            }
        }
        Ok(())
    }

    /// Parse settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved");
        Ok(())
    }
}
