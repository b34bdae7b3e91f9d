// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{BinaryHeap, HashMap};

use super::{reconstruct, SearchError};
use crate::{edge_cost, haversine, Graph, Weights};

#[derive(Debug, Clone, Copy)]
struct OpenItem {
    at: i64,
    cost: f64,
    score: f64,
}

impl PartialEq for OpenItem {
    fn eq(&self, other: &Self) -> bool {
        self.score.eq(&other.score)
    }
}

impl Eq for OpenItem {}

impl PartialOrd for OpenItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        // NOTE: We revert the order of comparison,
        // as lower scores are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        other.score.partial_cmp(&self.score)
    }
}

impl Ord for OpenItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.partial_cmp(other).unwrap()
    }
}

/// Uses the [A* algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm)
/// to find the cheapest route between two nodes under the provided cost
/// [Weights], returning the ordered node sequence from `source` to `target`.
///
/// Returns [None] when no route between the two nodes exists, which is a
/// normal outcome, not an error. Unknown node ids are rejected before any
/// search work begins.
///
/// The heuristic is the great-circle distance to the target scaled by
/// `weights.distance`, ignoring the elevation and safety terms. It never
/// overestimates the true remaining cost only while `weights.elevation`
/// and `weights.safety` are zero; with non-zero values the search still
/// returns a route quickly, but its optimality is no longer guaranteed —
/// run [dijkstra](crate::dijkstra) when an exact answer is required in
/// that regime.
pub fn a_star(
    g: &Graph,
    source: i64,
    target: i64,
    weights: &Weights,
) -> Result<Option<Vec<i64>>, SearchError> {
    let source_node = g.get_node(source).ok_or(SearchError::UnknownNode(source))?;
    let target_node = g.get_node(target).ok_or(SearchError::UnknownNode(target))?;

    let mut queue: BinaryHeap<OpenItem> = BinaryHeap::new();
    let mut came_from: HashMap<i64, i64> = HashMap::new();
    let mut known_costs: HashMap<i64, f64> = HashMap::new();

    let initial_estimate = weights.distance
        * haversine(source_node.lat, source_node.lon, target_node.lat, target_node.lon);
    queue.push(OpenItem {
        at: source,
        cost: 0.0,
        score: initial_estimate,
    });
    known_costs.insert(source, 0.0);

    while let Some(item) = queue.pop() {
        if item.at == target {
            return Ok(Some(reconstruct(&came_from, source, target)));
        }

        // Contrary to the textbook definition, we might keep multiple items
        // in the queue for the same node. Discard all but the best one.
        if item.cost > known_costs.get(&item.at).copied().unwrap_or(f64::INFINITY) {
            continue;
        }

        let Some(node) = g.get_node(item.at) else {
            continue;
        };

        for edge in g.incident_edges(item.at) {
            let Some(neighbor_id) = edge.other_endpoint(item.at) else {
                continue;
            };
            let Some(neighbor) = g.get_node(neighbor_id) else {
                continue;
            };

            let candidate = item.cost + edge_cost(edge, node, neighbor, weights);
            if candidate
                < known_costs
                    .get(&neighbor_id)
                    .copied()
                    .unwrap_or(f64::INFINITY)
            {
                came_from.insert(neighbor_id, item.at);
                known_costs.insert(neighbor_id, candidate);
                let estimate = weights.distance
                    * haversine(neighbor.lat, neighbor.lon, target_node.lat, target_node.lon);
                queue.push(OpenItem {
                    at: neighbor_id,
                    cost: candidate,
                    score: candidate + estimate,
                });
            }
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{brute_force_distance, path_cost, square_graph};
    use super::*;
    use crate::{dijkstra, Weights};

    #[test]
    fn routes_around_the_long_side() {
        let g = square_graph();
        let path = a_star(&g, 1, 3, &Weights::default()).unwrap();
        assert_eq!(path, Some(vec![1, 2, 3]));
    }

    #[test]
    fn optimal_when_distance_is_the_only_component() {
        let g = square_graph();
        let weights = Weights::default();

        for source in [1, 2, 3, 4] {
            for target in [1, 2, 3, 4] {
                let path = a_star(&g, source, target, &weights)
                    .unwrap()
                    .expect("the square is connected");
                let exact = dijkstra(&g, source, Some(target), &weights)
                    .unwrap()
                    .distance_to(target)
                    .unwrap();
                let got = path_cost(&g, &path, &weights);
                assert!(
                    (got - exact).abs() < 1e-9,
                    "{source} -> {target}: {got} vs {exact}"
                );
            }
        }
    }

    #[test]
    fn matches_brute_force_on_distance_only_weights() {
        let g = square_graph();
        let weights = Weights::default();

        let path = a_star(&g, 2, 4, &weights).unwrap().unwrap();
        let expected = brute_force_distance(&g, 2, 4, &weights).unwrap();
        assert!((path_cost(&g, &path, &weights) - expected).abs() < 1e-9);
    }

    #[test]
    fn reconstructed_path_is_connected() {
        let g = square_graph();
        let path = a_star(&g, 4, 2, &Weights::default()).unwrap().unwrap();

        assert_eq!(path.first(), Some(&4));
        assert_eq!(path.last(), Some(&2));
        for pair in path.windows(2) {
            assert!(
                g.neighbors(pair[0]).contains(&pair[1]),
                "no edge between {} and {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn no_route_to_a_disconnected_node() {
        let g = square_graph();
        assert_eq!(a_star(&g, 1, 5, &Weights::default()).unwrap(), None);
        assert_eq!(a_star(&g, 5, 1, &Weights::default()).unwrap(), None);
    }

    #[test]
    fn unknown_nodes_are_rejected_before_any_work() {
        let g = square_graph();
        assert_eq!(
            a_star(&g, 42, 1, &Weights::default()).unwrap_err(),
            SearchError::UnknownNode(42)
        );
        assert_eq!(
            a_star(&g, 1, 42, &Weights::default()).unwrap_err(),
            SearchError::UnknownNode(42)
        );
    }

    #[test]
    fn source_equals_target() {
        let g = square_graph();
        assert_eq!(a_star(&g, 2, 2, &Weights::default()).unwrap(), Some(vec![2]));
    }

    #[test]
    fn still_returns_some_route_with_inadmissible_weights() {
        // With non-zero elevation/safety weights the heuristic is no longer
        // admissible; the search must still terminate with a valid route.
        let g = square_graph();
        let weights = Weights {
            distance: 1.0,
            elevation: 5.0,
            safety: 1000.0,
        };

        let path = a_star(&g, 1, 3, &weights).unwrap().unwrap();
        assert_eq!(path.first(), Some(&1));
        assert_eq!(path.last(), Some(&3));
        for pair in path.windows(2) {
            assert!(g.neighbors(pair[0]).contains(&pair[1]));
        }
    }
}
