//! In-memory backend, for tests and embedding.

use px_engine::{Event, Snapshot};

use crate::writer::MonitorWriter;
use crate::OutputResult;

/// A [`MonitorWriter`] that keeps everything in memory.
///
/// Stores every event and only the most recent snapshot, mirroring what the
/// file backend persists.
#[derive(Default)]
pub struct MemoryMonitor {
    pub events: Vec<Event>,
    pub last_snapshot: Option<Snapshot>,
}

impl MemoryMonitor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MonitorWriter for MemoryMonitor {
    fn write_snapshot(&mut self, snapshot: &Snapshot) -> OutputResult<()> {
        self.last_snapshot = Some(snapshot.clone());
        Ok(())
    }

    fn write_event(&mut self, event: &Event) -> OutputResult<()> {
        self.events.push(event.clone());
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}
