// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{haversine, Edge, Node};
use serde::{Deserialize, Serialize};

/// Per-query weighting of the three edge cost components.
///
/// The defaults (1, 0, 0) make searches plain shortest-distance queries.
/// All fields default independently when deserialized, so a route request
/// may override any subset of them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    /// Weight of the great-circle distance component, in cost per meter.
    pub distance: f64,
    /// Weight of the positive elevation gain component. Descents are free.
    pub elevation: f64,
    /// Weight of the safety penalty component.
    pub safety: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            distance: 1.0,
            elevation: 0.0,
            safety: 0.0,
        }
    }
}

/// Calculates the cost of traversing `edge` from `from` towards `to`.
///
/// Components:
/// - great-circle distance between the two nodes, in meters;
/// - positive elevation gain (ascents penalized linearly, descents never);
/// - safety: the destination's accident probability, discounted by the
///   edge's importance (clamped to a minimum of 1 so low values never
///   amplify the risk).
///
/// This function is pure: identical inputs always yield identical costs,
/// which search reproducibility and the A* heuristic both rely on.
pub fn edge_cost(edge: &Edge, from: &Node, to: &Node, weights: &Weights) -> f64 {
    let distance = haversine(from.lat, from.lon, to.lat, to.lon);
    let elevation_gain = (to.elevation - from.elevation).max(0.0);
    let safety_penalty = to.accident_probability / edge.importance.max(1.0);

    weights.distance * distance
        + weights.elevation * elevation_gain
        + weights.safety * safety_penalty
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(importance: f64) -> Edge {
        Edge {
            id: 1,
            a: 1,
            b: 2,
            bike_path: false,
            importance,
        }
    }

    #[test]
    fn default_weights_measure_distance_only() {
        let from = Node::new(1, 0.0, 0.0, 100.0, 0.9);
        let to = Node::new(2, 0.001, 0.0, 200.0, 0.9);

        let cost = edge_cost(&edge(1.0), &from, &to, &Weights::default());
        let dist = haversine(0.0, 0.0, 0.001, 0.0);
        assert_eq!(cost, dist);
    }

    #[test]
    fn descents_are_never_penalized() {
        let high = Node::new(1, 0.0, 0.0, 500.0, 0.0);
        let low = Node::new(2, 0.0, 0.0, 100.0, 0.0);
        let w = Weights {
            distance: 0.0,
            elevation: 1.0,
            safety: 0.0,
        };

        assert_eq!(edge_cost(&edge(1.0), &high, &low, &w), 0.0);
        assert_eq!(edge_cost(&edge(1.0), &low, &high, &w), 400.0);
    }

    #[test]
    fn importance_discounts_destination_risk() {
        let from = Node::new(1, 0.0, 0.0, 0.0, 0.0);
        let to = Node::new(2, 0.0, 0.0, 0.0, 0.6);
        let w = Weights {
            distance: 0.0,
            elevation: 0.0,
            safety: 1.0,
        };

        assert_eq!(edge_cost(&edge(1.0), &from, &to, &w), 0.6);
        assert_eq!(edge_cost(&edge(3.0), &from, &to, &w), 0.2);
    }

    #[test]
    fn importance_below_one_is_clamped() {
        let from = Node::new(1, 0.0, 0.0, 0.0, 0.0);
        let to = Node::new(2, 0.0, 0.0, 0.0, 0.5);
        let w = Weights {
            distance: 0.0,
            elevation: 0.0,
            safety: 1.0,
        };

        // importance 0.1 must not amplify the penalty to 5.0
        assert_eq!(edge_cost(&edge(0.1), &from, &to, &w), 0.5);
    }

    #[test]
    fn weights_deserialize_with_partial_overrides() {
        let w: Weights = serde_json::from_str(r#"{"safety": 1000.0}"#).unwrap();
        assert_eq!(w.distance, 1.0);
        assert_eq!(w.elevation, 0.0);
        assert_eq!(w.safety, 1000.0);
    }
}
