//! Unit tests for the city graph.

use px_core::CityId;

use crate::{CityGraph, RoutingError};

/// 3-city triangle: 0-1 = 10, 1-2 = 10, 0-2 = 5.
fn triangle() -> Vec<Vec<u32>> {
    vec![
        vec![0, 10, 5],
        vec![10, 0, 10],
        vec![5, 10, 0],
    ]
}

#[cfg(test)]
mod construction {
    use super::*;

    #[test]
    fn builds_from_symmetric_matrix() {
        let g = CityGraph::from_matrix(&triangle()).unwrap();
        assert_eq!(g.city_count(), 3);
    }

    #[test]
    fn ragged_matrix_rejected() {
        let m = vec![vec![0, 1], vec![1, 0, 2]];
        assert!(matches!(
            CityGraph::from_matrix(&m),
            Err(RoutingError::RaggedMatrix { row: 1, .. })
        ));
    }

    #[test]
    fn asymmetric_matrix_rejected() {
        let m = vec![vec![0, 3], vec![4, 0]];
        assert!(matches!(
            CityGraph::from_matrix(&m),
            Err(RoutingError::AsymmetricMatrix { .. })
        ));
    }

    #[test]
    fn empty_matrix_is_valid() {
        let g = CityGraph::from_matrix(&[]).unwrap();
        assert_eq!(g.city_count(), 0);
        assert_eq!(g.shortest_distance(CityId(0), CityId(1)), None);
    }
}

#[cfg(test)]
mod shortest_distance {
    use super::*;

    #[test]
    fn direct_edge_wins_when_shorter() {
        let g = CityGraph::from_matrix(&triangle()).unwrap();
        assert_eq!(g.shortest_distance(CityId(0), CityId(2)), Some(5));
    }

    #[test]
    fn multi_hop_beats_long_direct_edge() {
        // 0-1 = 2, 1-2 = 2, 0-2 = 10: going via 1 costs 4.
        let m = vec![
            vec![0, 2, 10],
            vec![2, 0, 2],
            vec![10, 2, 0],
        ];
        let g = CityGraph::from_matrix(&m).unwrap();
        assert_eq!(g.shortest_distance(CityId(0), CityId(2)), Some(4));
    }

    #[test]
    fn disconnected_city_is_unreachable() {
        // City 2 has no roads at all.
        let m = vec![
            vec![0, 7, 0],
            vec![7, 0, 0],
            vec![0, 0, 0],
        ];
        let g = CityGraph::from_matrix(&m).unwrap();
        assert_eq!(g.shortest_distance(CityId(0), CityId(2)), None);
        assert_eq!(g.shortest_distance(CityId(0), CityId(1)), Some(7));
    }

    #[test]
    fn same_city_is_zero() {
        let g = CityGraph::from_matrix(&triangle()).unwrap();
        assert_eq!(g.shortest_distance(CityId(1), CityId(1)), Some(0));
    }

    #[test]
    fn out_of_range_city_is_unreachable() {
        let g = CityGraph::from_matrix(&triangle()).unwrap();
        assert_eq!(g.shortest_distance(CityId(0), CityId(9)), None);
        assert_eq!(g.shortest_distance(CityId(9), CityId(0)), None);
    }

    #[test]
    fn symmetric_queries_agree() {
        let g = CityGraph::from_matrix(&triangle()).unwrap();
        for a in 0..3u16 {
            for b in 0..3u16 {
                assert_eq!(
                    g.shortest_distance(CityId(a), CityId(b)),
                    g.shortest_distance(CityId(b), CityId(a)),
                );
            }
        }
    }
}

#[cfg(test)]
mod reroute {
    use super::*;

    #[test]
    fn blocked_direct_edge_forces_detour() {
        let g = CityGraph::from_matrix_with_blocks(&triangle(), &[(CityId(0), CityId(2))])
            .unwrap();
        // Direct 0-2 (5 km) is blocked; detour via 1 is 20 km.
        assert_eq!(g.shortest_distance(CityId(0), CityId(2)), Some(20));
        // The matrix entry survives as the direct-distance reference.
        assert_eq!(g.direct_distance(CityId(0), CityId(2)), Some(5));
    }

    #[test]
    fn detour_longer_than_direct_reference_flags_reroute() {
        let g = CityGraph::from_matrix_with_blocks(&triangle(), &[(CityId(0), CityId(2))])
            .unwrap();
        let km = g.shortest_distance(CityId(0), CityId(2)).unwrap();
        assert!(g.is_reroute(CityId(0), CityId(2), km));
    }

    #[test]
    fn no_direct_edge_means_no_reroute_flag() {
        // 0-2 has no direct road in the matrix at all; any computed distance
        // is just the normal route, not a reroute.
        let m = vec![
            vec![0, 10, 0],
            vec![10, 0, 10],
            vec![0, 10, 0],
        ];
        let g = CityGraph::from_matrix(&m).unwrap();
        assert_eq!(g.shortest_distance(CityId(0), CityId(2)), Some(20));
        assert!(!g.is_reroute(CityId(0), CityId(2), 20));
    }

    #[test]
    fn shortest_path_at_direct_distance_is_not_a_reroute() {
        let g = CityGraph::from_matrix(&triangle()).unwrap();
        assert!(!g.is_reroute(CityId(0), CityId(2), 5));
    }
}
