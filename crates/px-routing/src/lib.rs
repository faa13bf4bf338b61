//! `px-routing` — city graph and shortest-distance routing.
//!
//! The dispatch engine asks one question of this crate: *how far is the
//! shortest drivable route between two cities?*  [`CityGraph`] answers it
//! with Dijkstra over an adjacency list built once from the deployment's
//! direct-distance matrix.  Unreachable pairs answer `None`; same-city
//! dispatches never reach the graph (the engine uses its fixed local-loop
//! distance instead).

pub mod error;
pub mod graph;

#[cfg(test)]
mod tests;

pub use error::{RoutingError, RoutingResult};
pub use graph::CityGraph;
