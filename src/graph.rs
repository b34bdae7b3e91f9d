// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::haversine;
use log::warn;
use std::collections::btree_map::BTreeMap;
use std::collections::HashMap;

/// Represents a point location in the network, with position and
/// the attributes relevant for route costing.
///
/// Elevation is expressed in meters, and `accident_probability` must stay
/// within `[0, 1]`. The optional `zone` label ties the node to an
/// administrative area for [Graph::apply_zone_safety].
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
    pub elevation: f64,
    pub accident_probability: f64,
    pub zone: Option<String>,
    edges: Vec<i64>,
}

impl Node {
    pub fn new(id: i64, lat: f64, lon: f64, elevation: f64, accident_probability: f64) -> Self {
        Self {
            id,
            lat,
            lon,
            elevation,
            accident_probability,
            zone: None,
            edges: Vec::new(),
        }
    }

    /// Returns the ids of all edges incident to this node, in creation order.
    ///
    /// Invariant: an edge id appears here if and only if that edge names
    /// this node as one of its two endpoints, and it appears exactly once.
    pub fn edges(&self) -> &[i64] {
        &self.edges
    }
}

/// Represents a traversable connection between two nodes.
///
/// The endpoint pair is unordered: the order of `a` and `b` is fixed at
/// creation and only used to resolve [Edge::other_endpoint]. Traversal
/// cost asymmetry is modeled by the builder instantiating two independent
/// edges per segment, never by a direction flag here.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: i64,
    pub a: i64,
    pub b: i64,
    pub bike_path: bool,
    /// Positive corridor significance, default 1. Larger values discount
    /// the destination's accident risk in the cost function.
    pub importance: f64,
}

impl Edge {
    /// Given one endpoint of this edge, returns the other one,
    /// or [None] if `node_id` is not an endpoint at all.
    pub fn other_endpoint(&self, node_id: i64) -> Option<i64> {
        if node_id == self.a {
            Some(self.b)
        } else if node_id == self.b {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Represents a routable network as a set of [Nodes](Node)
/// and [Edges](Edge) between them, both keyed by id.
///
/// All cross-references between nodes and edges are by id, and search
/// algorithms only ever hold ids; the graph exclusively owns both arenas.
/// Once built, a graph backing live queries must be treated as read-only —
/// reloads swap in a freshly built graph instead of mutating this one.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Graph {
    nodes: BTreeMap<i64, Node>,
    edges: BTreeMap<i64, Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns an iterator over all [Nodes](Node), in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Returns an iterator over all [Edges](Edge), in ascending id order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Retrieves a [Node] with the provided id.
    pub fn get_node(&self, id: i64) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Retrieves an [Edge] with the provided id.
    pub fn get_edge(&self, id: i64) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Inserts a [Node], or returns the existing one if `node.id` is
    /// already taken. Construction is idempotent: a reused id never
    /// changes the stored entity.
    pub fn add_node(&mut self, node: Node) -> &Node {
        self.nodes.entry(node.id).or_insert(node)
    }

    /// Creates an [Edge] between two existing nodes and registers it in
    /// both endpoints' incident-edge lists exactly once.
    ///
    /// A reused edge id is a no-op returning the existing entity. An edge
    /// referencing an unknown endpoint is rejected without mutating the
    /// graph — the builder must tolerate partially inconsistent source
    /// data, so this is logged rather than treated as fatal.
    pub fn add_edge(
        &mut self,
        id: i64,
        a: i64,
        b: i64,
        bike_path: bool,
        importance: f64,
    ) -> Option<&Edge> {
        if self.edges.contains_key(&id) {
            return self.edges.get(&id);
        }
        if !self.nodes.contains_key(&a) || !self.nodes.contains_key(&b) {
            warn!("edge {id} references unknown node ({a} or {b}) - skipping");
            return None;
        }

        self.register_incident(a, id);
        self.register_incident(b, id);
        Some(self.edges.entry(id).or_insert(Edge {
            id,
            a,
            b,
            bike_path,
            importance,
        }))
    }

    fn register_incident(&mut self, node_id: i64, edge_id: i64) {
        if let Some(node) = self.nodes.get_mut(&node_id) {
            if !node.edges.contains(&edge_id) {
                node.edges.push(edge_id);
            }
        }
    }

    /// Returns all [Edges](Edge) incident to the node with the given id.
    pub fn incident_edges(&self, node_id: i64) -> impl Iterator<Item = &Edge> {
        self.nodes
            .get(&node_id)
            .map(|n| n.edges.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|edge_id| self.edges.get(edge_id))
    }

    /// Returns the ids of all nodes reachable from `node_id` over a single
    /// edge, deduplicated, in first-encountered order.
    pub fn neighbors(&self, node_id: i64) -> Vec<i64> {
        let mut seen = Vec::new();
        for edge in self.incident_edges(node_id) {
            if let Some(other) = edge.other_endpoint(node_id) {
                if !seen.contains(&other) {
                    seen.push(other);
                }
            }
        }
        seen
    }

    /// Finds the closest [Node] to the given position, but only if it lies
    /// within `max_distance` meters. Returns the node id and its distance.
    ///
    /// This function computes the distance to every node in the graph and
    /// is not suitable for large graphs; prefer [crate::KDTree] there.
    /// Ties resolve to the lowest node id — stable, but callers must not
    /// attach meaning to the tie order.
    pub fn find_nearest_node(&self, lat: f64, lon: f64, max_distance: f64) -> Option<(i64, f64)> {
        let mut best: Option<(i64, f64)> = None;
        for nd in self.nodes.values() {
            let dist = haversine(lat, lon, nd.lat, nd.lon);
            if best.is_none_or(|(_, best_dist)| dist < best_dist) {
                best = Some((nd.id, dist));
            }
        }
        best.filter(|&(_, dist)| dist <= max_distance)
    }

    /// Overrides the accident probability of every node whose `zone` label
    /// matches a key in `scores`. Matching is case-insensitive and ignores
    /// surrounding whitespace; nodes without a label, or with a label that
    /// has no score, are left untouched.
    pub fn apply_zone_safety(&mut self, scores: &HashMap<String, f64>) {
        let normalized: HashMap<String, f64> = scores
            .iter()
            .map(|(k, &v)| (k.trim().to_uppercase(), v))
            .collect();

        for node in self.nodes.values_mut() {
            if let Some(zone) = &node.zone {
                if let Some(&score) = normalized.get(&zone.trim().to_uppercase()) {
                    node.accident_probability = score;
                }
            }
        }
    }
}
