//! `px-engine` — the clocked dispatch engine for the parcel exchange network.
//!
//! # Tick loop
//!
//! One tick is one simulated second, driven by [`ClockDriver`]:
//!
//! ```text
//! tick():
//!   ① Clock    — advance the day clock.
//!   ② Rollover — on a day boundary: retire finished trips, refill vehicle
//!                pools, emit a new-day event.
//!   ③ Arrivals — finish due trips; each carried parcel is Delivered or,
//!                with the configured loss probability, Lost.
//!   ④ Dispatch — at the dispatch second: batch booked parcels per
//!                (source, destination) pair and allocate vehicles.
//!   ⑤ Publish  — hand a consistent snapshot to the observer.
//! ```
//!
//! # Cargo features
//!
//! | Feature | Effect                                             |
//! |---------|----------------------------------------------------|
//! | `serde` | Serde derives on events, snapshots, and the model. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use std::time::Duration;
//!
//! use px_engine::{ClockDriver, Engine, SharedEngine};
//! use px_model::NetworkConfig;
//!
//! let engine = SharedEngine::new(Engine::new(NetworkConfig::reference())?);
//! let clock = ClockDriver::spawn(engine.clone(), Duration::from_secs(1));
//! let id = engine.book(request)?;
//! println!("{}", engine.track(id)?.status);
//! clock.stop()?;
//! ```

pub mod engine;
pub mod error;
pub mod events;
pub mod observer;
pub mod shared;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use engine::{BookingRequest, Engine, ParcelView, TransitProgress};
pub use error::{BookingError, CancelError, EngineError, EngineResult, TrackError};
pub use events::{Event, EventKind};
pub use observer::{EngineObserver, NoopObserver};
pub use shared::{ClockDriver, SharedEngine};
pub use snapshot::{Snapshot, TripRow};
