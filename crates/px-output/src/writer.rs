//! The `MonitorWriter` trait implemented by all backend writers.

use px_engine::{Event, Snapshot};

use crate::OutputResult;

/// Trait implemented by the file backend and the in-memory test backend.
///
/// All methods are infallible from the observer's perspective — errors are
/// stored internally and retrieved with
/// [`MonitorObserver::take_error`][crate::MonitorObserver::take_error].
pub trait MonitorWriter {
    /// Publish the per-tick state snapshot, replacing the previous one.
    fn write_snapshot(&mut self, snapshot: &Snapshot) -> OutputResult<()>;

    /// Append one event to the notification log.
    fn write_event(&mut self, event: &Event) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
