//! Thread-shared engine handle and the background clock actor.
//!
//! Concurrency model: one exclusive lock around the whole [`Engine`].  The
//! foreground request path (book / track / cancel) and the clock thread both
//! take it for the full duration of their operation.  Critical sections are
//! bounded and allocation-light, so contention is negligible at one tick per
//! second plus interactive request rates.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use px_core::TrackingId;

use crate::engine::{BookingRequest, Engine, ParcelView};
use crate::error::{BookingError, CancelError, EngineError, EngineResult, TrackError};
use crate::snapshot::Snapshot;

/// Cloneable handle to an engine shared between threads.
#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<Engine>>,
}

impl SharedEngine {
    pub fn new(engine: Engine) -> Self {
        Self { inner: Arc::new(Mutex::new(engine)) }
    }

    /// Lock the engine.
    ///
    /// A panic while holding the lock poisons it; engine state is a plain
    /// value with no half-applied invariants across a panic boundary, so the
    /// poison flag is cleared and the guard handed out anyway.
    pub fn lock(&self) -> MutexGuard<'_, Engine> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn book(&self, request: BookingRequest) -> Result<TrackingId, BookingError> {
        self.lock().book(request)
    }

    pub fn cancel(&self, id: TrackingId) -> Result<(), CancelError> {
        self.lock().cancel(id)
    }

    pub fn track(&self, id: TrackingId) -> Result<ParcelView, TrackError> {
        self.lock().track(id)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }
}

/// The background clock actor.
///
/// Drives [`Engine::tick`] once per `period` on its own thread until
/// [`stop`][ClockDriver::stop] is called.  The stop flag is checked once per
/// tick boundary; there is no cancellation of an in-flight tick.
pub struct ClockDriver {
    stop:   Arc<AtomicBool>,
    handle: JoinHandle<EngineResult<()>>,
}

impl ClockDriver {
    /// Spawn the clock thread.  `period` is the real-time length of one
    /// simulated second.
    pub fn spawn(engine: SharedEngine, period: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            while !thread_stop.load(Ordering::Relaxed) {
                thread::sleep(period);
                if thread_stop.load(Ordering::Relaxed) {
                    break;
                }
                engine.lock().tick()?;
            }
            Ok(())
        });
        Self { stop, handle }
    }

    /// Signal the clock thread to stop and wait for it to exit.
    ///
    /// Returns the first error the tick loop hit, if any.
    pub fn stop(self) -> EngineResult<()> {
        self.stop.store(true, Ordering::Relaxed);
        self.handle.join().map_err(|_| EngineError::ClockPanicked)?
    }
}
