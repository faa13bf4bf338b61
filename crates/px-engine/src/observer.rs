//! Engine observer trait for event and snapshot consumers.

use std::sync::{Arc, Mutex, PoisonError};

use crate::events::Event;
use crate::snapshot::Snapshot;

/// Callbacks invoked by the engine as it runs.
///
/// Both methods have default no-op implementations so implementors only need
/// to override what they care about.  The engine calls them while holding its
/// state lock, so implementations must stay fast and must not call back into
/// the engine.
///
/// # Example — event counter
///
/// ```rust,ignore
/// struct EventCounter(usize);
///
/// impl EngineObserver for EventCounter {
///     fn on_event(&mut self, _event: &Event) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait EngineObserver {
    /// Called once per emitted event, in emission order.
    fn on_event(&mut self, _event: &Event) {}

    /// Called at the end of every tick with a consistent point-in-time
    /// snapshot of engine state.
    fn on_snapshot(&mut self, _snapshot: &Snapshot) {}
}

/// An [`EngineObserver`] that does nothing.  Use when no monitoring output
/// is needed.
pub struct NoopObserver;

impl EngineObserver for NoopObserver {}

/// Forwarding impl so a caller can hand the engine one handle to an observer
/// and keep another for itself (e.g. to collect buffered write errors after
/// the clock stops).
impl<T: EngineObserver + ?Sized> EngineObserver for Arc<Mutex<T>> {
    fn on_event(&mut self, event: &Event) {
        self.lock().unwrap_or_else(PoisonError::into_inner).on_event(event);
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        self.lock().unwrap_or_else(PoisonError::into_inner).on_snapshot(snapshot);
    }
}
