//! `MonitorObserver<W>` — bridges `EngineObserver` to a `MonitorWriter`.

use px_engine::{Event, EngineObserver, Snapshot};

use crate::writer::MonitorWriter;
use crate::{OutputError, OutputResult};

/// An [`EngineObserver`] that forwards events and snapshots to any
/// [`MonitorWriter`] backend.
///
/// Errors from the writer are stored internally because observer callbacks
/// have no return value and must not stall the tick loop.  Check for errors
/// with [`take_error`][Self::take_error] after the engine stops.
pub struct MonitorObserver<W: MonitorWriter> {
    writer: W,
    last_error: Option<OutputError>,
}

impl<W: MonitorWriter> MonitorObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after a run).
    pub fn into_writer(mut self) -> (W, Option<OutputError>) {
        let error = self.last_error.take();
        (self.writer, error)
    }

    /// Flush and close the underlying writer.
    pub fn finish(&mut self) {
        let result = self.writer.finish();
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: MonitorWriter> EngineObserver for MonitorObserver<W> {
    fn on_event(&mut self, event: &Event) {
        let result = self.writer.write_event(event);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        let result = self.writer.write_snapshot(snapshot);
        self.store_err(result);
    }
}
