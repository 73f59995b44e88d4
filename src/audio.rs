//! Audio cue mapping
//!
//! Turns game events into sound cues. Tone generation belongs to the host,
//! which implements [`CuePlayer`] on top of its audio backend.

use crate::events::{Adapter, GameEvent};
use crate::settings::Settings;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Start the looping engine hum (run started or resumed)
    EngineHumStart,
    /// Stop the engine hum (paused or run over)
    EngineHumStop,
    /// Target consumed
    Chime,
    /// Run won
    VictoryJingle,
}

/// Host-side sound output
pub trait CuePlayer {
    fn play(&mut self, cue: SoundCue, volume: f32) -> anyhow::Result<()>;
}

/// Cues for one event, in play order
pub fn cues_for(event: &GameEvent) -> &'static [SoundCue] {
    match event {
        GameEvent::SessionStarted | GameEvent::SessionResumed => &[SoundCue::EngineHumStart],
        GameEvent::SessionPaused | GameEvent::SessionLost { .. } => &[SoundCue::EngineHumStop],
        GameEvent::SessionWon { .. } => &[SoundCue::EngineHumStop, SoundCue::VictoryJingle],
        GameEvent::Consumed { .. } => &[SoundCue::Chime],
        GameEvent::Snapshot(_) => &[],
    }
}

/// Adapter forwarding cues to a [`CuePlayer`]
pub struct CueAdapter<P: CuePlayer> {
    player: P,
    master_volume: f32,
    muted: bool,
}

impl<P: CuePlayer> CueAdapter<P> {
    pub fn new(player: P) -> Self {
        Self {
            player,
            master_volume: 0.8,
            muted: false,
        }
    }

    pub fn from_settings(player: P, settings: &Settings) -> Self {
        let mut adapter = Self::new(player);
        adapter.set_master_volume(settings.master_volume);
        adapter.set_muted(settings.muted);
        adapter
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }
}

impl<P: CuePlayer> Adapter for CueAdapter<P> {
    fn name(&self) -> &str {
        "audio"
    }

    fn handle(&mut self, event: &GameEvent) -> anyhow::Result<()> {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return Ok(());
        }
        for &cue in cues_for(event) {
            self.player.play(cue, vol)?;
        }
        Ok(())
    }
}

/// Player that only logs cues (headless hosts)
#[derive(Debug, Default)]
pub struct LogCuePlayer;

impl CuePlayer for LogCuePlayer {
    fn play(&mut self, cue: SoundCue, volume: f32) -> anyhow::Result<()> {
        log::debug!("cue {:?} at volume {:.2}", cue, volume);
        Ok(())
    }
}
