//! Reference presentation adapter for headless hosts

use crate::events::{Adapter, GameEvent};

/// Logs discrete events at `info` and snapshots as JSON at `trace`
#[derive(Debug, Default)]
pub struct LogAdapter {
    snapshots: u64,
}

impl LogAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots received so far
    pub fn snapshots(&self) -> u64 {
        self.snapshots
    }
}

impl Adapter for LogAdapter {
    fn name(&self) -> &str {
        "log"
    }

    fn handle(&mut self, event: &GameEvent) -> anyhow::Result<()> {
        match event {
            GameEvent::Snapshot(snapshot) => {
                self.snapshots += 1;
                if log::log_enabled!(log::Level::Trace) {
                    log::trace!("snapshot {}", serde_json::to_string(snapshot)?);
                }
            }
            GameEvent::Consumed { score, cell } => {
                log::info!("Consumed target at ({}, {}), score {}", cell.x, cell.y, score);
            }
            other => log::info!("{:?}", other),
        }
        Ok(())
    }
}
