//! Engine error types, one per operation.
//!
//! Every failure mode is an explicit value; nothing is signalled by silently
//! dropping a request.  Routing failures and capacity shortfalls during
//! dispatch are *events*, not errors — the batch stays booked and is retried
//! on a later pass.

use thiserror::Error;

use px_core::{CityId, OfficeId, TrackingId};
use px_model::{ModelError, ParcelStatus};
use px_routing::RoutingError;

/// Errors from [`Engine::book`][crate::Engine::book].
///
/// All are validation failures: nothing is mutated when booking fails.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("source and destination are the same office")]
    SameOffice,

    #[error("city {0} is outside the network")]
    CityOutOfRange(CityId),

    #[error("office {0} does not exist in this city")]
    OfficeOutOfRange(OfficeId),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Errors from [`Engine::cancel`][crate::Engine::cancel].
#[derive(Debug, Error)]
pub enum CancelError {
    #[error("tracking id {0} not found")]
    NotFound(TrackingId),

    /// Only `Booked` parcels can be cancelled; carries the current status so
    /// the caller can report it.
    #[error("parcel is already {0}; only booked parcels can be cancelled")]
    InvalidState(ParcelStatus),
}

/// Errors from [`Engine::track`][crate::Engine::track].
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("tracking id {0} not found")]
    NotFound(TrackingId),
}

/// Construction and tick-loop errors.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error("clock thread panicked")]
    ClockPanicked,
}

pub type EngineResult<T> = Result<T, EngineError>;
