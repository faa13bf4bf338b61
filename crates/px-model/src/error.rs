//! Model-subsystem error type.

use thiserror::Error;

use px_core::TrackingId;

use crate::parcel::ParcelStatus;

/// Errors produced by `px-model`.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("parcel cannot move from {from} to {to}")]
    InvalidTransition {
        from: ParcelStatus,
        to:   ParcelStatus,
    },

    #[error("tracking id {0} is already registered")]
    DuplicateTracking(TrackingId),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
