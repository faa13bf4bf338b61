//! Routing-subsystem error type.

use thiserror::Error;

use px_core::CityId;

/// Errors produced by `px-routing`.
///
/// Note that an *unreachable* destination is not an error: shortest-distance
/// queries answer it with `None` so the dispatch pass can defer the batch and
/// retry later.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("distance matrix row {row} has length {got}, expected {expected}")]
    RaggedMatrix {
        row:      usize,
        got:      usize,
        expected: usize,
    },

    #[error("distance matrix is asymmetric at ({a}, {b})")]
    AsymmetricMatrix { a: CityId, b: CityId },
}

pub type RoutingResult<T> = Result<T, RoutingError>;
