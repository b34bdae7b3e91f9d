// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{BinaryHeap, HashMap};

use super::{reconstruct, SearchError};
use crate::{edge_cost, Graph, Weights};

#[derive(Debug, Clone, Copy)]
struct QueueItem {
    at: i64,
    distance: f64,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.distance.eq(&other.distance)
    }
}

impl Eq for QueueItem {}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        // NOTE: We revert the order of comparison,
        // as lower distances are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        other.distance.partial_cmp(&self.distance)
    }
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.partial_cmp(other).unwrap()
    }
}

/// Result of a [dijkstra] search: best-known costs and predecessors for
/// every node reached from the source.
///
/// Both maps are sparse — a node absent from them was simply never reached,
/// which is the normal outcome for disconnected parts of the network.
#[derive(Debug, Clone, Default)]
pub struct ShortestPaths {
    distances: HashMap<i64, f64>,
    predecessors: HashMap<i64, i64>,
}

impl ShortestPaths {
    /// Returns the total cost of the best path from the source to the
    /// given node, or [None] if the node was never reached.
    pub fn distance_to(&self, node_id: i64) -> Option<f64> {
        self.distances.get(&node_id).copied()
    }

    /// Returns the node immediately preceding `node_id` on the best path
    /// from the source.
    pub fn predecessor(&self, node_id: i64) -> Option<i64> {
        self.predecessors.get(&node_id).copied()
    }

    /// Reconstructs the full path from `source` to `target`, or [None]
    /// if `target` was never reached.
    pub fn path_to(&self, source: i64, target: i64) -> Option<Vec<i64>> {
        let path = reconstruct(&self.predecessors, source, target);
        (path.first() == Some(&source)).then_some(path)
    }
}

/// Uses [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm)
/// to find cheapest paths from `source` to every reachable node, under the
/// provided cost [Weights].
///
/// When a `target` is given, the search stops as soon as that node is
/// settled, leaving all nodes not yet expanded out of the result — a
/// correctness-preserving early exit, since edge costs are non-negative.
///
/// A node may sit in the queue multiple times with different tentative
/// distances; stale entries are discarded when popped, which substitutes
/// for a true decrease-key operation.
pub fn dijkstra(
    g: &Graph,
    source: i64,
    target: Option<i64>,
    weights: &Weights,
) -> Result<ShortestPaths, SearchError> {
    g.get_node(source).ok_or(SearchError::UnknownNode(source))?;
    if let Some(t) = target {
        g.get_node(t).ok_or(SearchError::UnknownNode(t))?;
    }

    let mut distances: HashMap<i64, f64> = HashMap::new();
    let mut predecessors: HashMap<i64, i64> = HashMap::new();
    let mut queue: BinaryHeap<QueueItem> = BinaryHeap::new();

    distances.insert(source, 0.0);
    queue.push(QueueItem {
        at: source,
        distance: 0.0,
    });

    while let Some(item) = queue.pop() {
        // Contrary to the textbook definition, we might keep multiple items
        // in the queue for the same node. Discard all but the best one.
        if item.distance
            > distances
                .get(&item.at)
                .copied()
                .unwrap_or(f64::INFINITY)
        {
            continue;
        }

        if target == Some(item.at) {
            break;
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

            let candidate = item.distance + edge_cost(edge, node, neighbor, weights);
            if candidate
                < distances
                    .get(&neighbor_id)
                    .copied()
                    .unwrap_or(f64::INFINITY)
            {
                distances.insert(neighbor_id, candidate);
                predecessors.insert(neighbor_id, item.at);
                queue.push(QueueItem {
                    at: neighbor_id,
                    distance: candidate,
                });
            }
        }
    }

    Ok(ShortestPaths {
        distances,
        predecessors,
    })
}
