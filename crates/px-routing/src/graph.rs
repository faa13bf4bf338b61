//! City graph and Dijkstra shortest-distance queries.
//!
//! # Construction
//!
//! The graph is built once from the deployment's direct-distance matrix: an
//! edge exists wherever the matrix entry is positive (zero means no direct
//! road).  The matrix is required to be square and symmetric since distances
//! are undirected.  After construction the graph is immutable; the engine
//! serializes all access, so queries need no internal synchronization.
//!
//! # Unreachability
//!
//! `shortest_distance` answers an unreachable destination with `None` rather
//! than an error — the dispatch pass treats it as a routing failure event and
//! leaves the batch booked for a later retry.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use px_core::CityId;

use crate::{RoutingError, RoutingResult};

/// Weighted undirected graph over the fixed city set.
pub struct CityGraph {
    /// Adjacency list: `adj[c]` holds `(neighbor, km)` for every direct road.
    adj: Vec<Vec<(CityId, u32)>>,
    /// The unmodified direct-distance matrix, kept for reroute detection.
    /// `direct[a][b] == 0` means no direct road.
    direct: Vec<Vec<u32>>,
}

impl CityGraph {
    /// Build the graph from a square, symmetric distance matrix.
    pub fn from_matrix(matrix: &[Vec<u32>]) -> RoutingResult<Self> {
        Self::from_matrix_with_blocks(matrix, &[])
    }

    /// Build the graph with some direct roads blocked.
    ///
    /// Blocked pairs are removed from the adjacency (both directions) but the
    /// matrix entry is kept as the direct-distance reference, so dispatches
    /// forced onto a longer multi-hop path show up as reroutes.
    pub fn from_matrix_with_blocks(
        matrix:  &[Vec<u32>],
        blocked: &[(CityId, CityId)],
    ) -> RoutingResult<Self> {
        let n = matrix.len();
        for (row, distances) in matrix.iter().enumerate() {
            if distances.len() != n {
                return Err(RoutingError::RaggedMatrix {
                    row,
                    got: distances.len(),
                    expected: n,
                });
            }
        }
        for a in 0..n {
            for b in (a + 1)..n {
                if matrix[a][b] != matrix[b][a] {
                    return Err(RoutingError::AsymmetricMatrix {
                        a: CityId(a as u16),
                        b: CityId(b as u16),
                    });
                }
            }
        }

        let is_blocked = |a: usize, b: usize| {
            blocked.iter().any(|&(x, y)| {
                (x.index(), y.index()) == (a, b) || (y.index(), x.index()) == (a, b)
            })
        };

        let mut adj: Vec<Vec<(CityId, u32)>> = vec![Vec::new(); n];
        for a in 0..n {
            for b in 0..n {
                if a != b && matrix[a][b] > 0 && !is_blocked(a, b) {
                    adj[a].push((CityId(b as u16), matrix[a][b]));
                }
            }
        }

        Ok(Self {
            adj,
            direct: matrix.to_vec(),
        })
    }

    /// Number of cities in the graph.
    pub fn city_count(&self) -> usize {
        self.adj.len()
    }

    /// Direct matrix entry for `(from, to)`, or `None` when no direct road
    /// exists (or either city is out of range).
    pub fn direct_distance(&self, from: CityId, to: CityId) -> Option<u32> {
        let km = *self.direct.get(from.index())?.get(to.index())?;
        (km > 0).then_some(km)
    }

    /// Shortest distance in km from `from` to `to`, or `None` if `to` is
    /// unreachable.
    ///
    /// Standard Dijkstra over the adjacency list.  A lazy-deletion binary
    /// heap replaces decrease-key: stale entries are skipped when popped.
    /// Tie-breaking on `CityId` keeps results deterministic, though with
    /// positive fixed weights any tie-break yields the same distance.
    pub fn shortest_distance(&self, from: CityId, to: CityId) -> Option<u32> {
        let n = self.city_count();
        if from.index() >= n || to.index() >= n {
            return None;
        }
        if from == to {
            return Some(0);
        }

        // dist[c] = best known distance (km) to reach c.
        let mut dist = vec![u32::MAX; n];
        dist[from.index()] = 0;

        // Min-heap: Reverse makes BinaryHeap (max) behave as min-heap.
        let mut heap: BinaryHeap<Reverse<(u32, CityId)>> = BinaryHeap::new();
        heap.push(Reverse((0, from)));

        while let Some(Reverse((km, city))) = heap.pop() {
            if city == to {
                return Some(km);
            }

            // Skip stale heap entries.
            if km > dist[city.index()] {
                continue;
            }

            for &(neighbor, edge_km) in &self.adj[city.index()] {
                let new_km = km.saturating_add(edge_km);
                if new_km < dist[neighbor.index()] {
                    dist[neighbor.index()] = new_km;
                    heap.push(Reverse((new_km, neighbor)));
                }
            }
        }

        None
    }

    /// `true` when `computed_km` (a shortest-path result) exceeds the direct
    /// matrix distance for the pair.
    ///
    /// Informational only: it flags a dispatch that had to take a longer
    /// multi-hop path than the nominal direct road.  Pairs with no direct
    /// road never count as rerouted.
    pub fn is_reroute(&self, from: CityId, to: CityId, computed_km: u32) -> bool {
        match self.direct_distance(from, to) {
            Some(direct_km) => computed_km > direct_km,
            None => false,
        }
    }
}
