// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::sync::{Arc, RwLock};

use serde::Serialize;
use thiserror::Error;

use crate::{
    a_star, dijkstra, Graph, KDTree, SearchError, Weights, DEFAULT_MAX_SNAP_DISTANCE,
};

/// Caller-visible failures of the [RoutingService] operations.
///
/// "No path between two valid nodes" is deliberately not represented here:
/// it is a normal outcome, reported through empty route collections.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    /// No routable graph is currently loaded; the service is degraded
    /// (ingestion failed, or the loaded network is empty). Maps to a
    /// service-unavailable condition at the transport layer.
    #[error("no graph is currently loaded")]
    Unavailable,

    /// A caller-supplied node id doesn't exist in the current graph.
    /// Maps to a bad-request condition at the transport layer.
    #[error("unknown node: {0}")]
    UnknownNode(i64),
}

impl From<SearchError> for ServiceError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::UnknownNode(id) => Self::UnknownNode(id),
        }
    }
}

/// A complete, immutable graph together with its spatial index,
/// as served to queries between two (re)loads.
#[derive(Debug)]
pub struct LoadedGraph {
    graph: Graph,
    index: Option<KDTree>,
}

impl LoadedGraph {
    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}

/// Response of the nearest-node query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NearestNode {
    pub node_id: i64,
    pub lat: f64,
    pub lon: f64,
}

/// Response of the route query: the routes found by both algorithms, as
/// node id sequences and as `[lat, lon]` coordinate sequences. All four
/// collections are empty when no path exists.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RouteResponse {
    pub dijkstra_ids: Vec<i64>,
    pub dijkstra_coords: Vec<[f64; 2]>,
    pub astar_ids: Vec<i64>,
    pub astar_coords: Vec<[f64; 2]>,
}

/// Holds the currently served [Graph] and answers the query operations of
/// the routing surface.
///
/// The graph reference is swapped atomically on [RoutingService::install]:
/// queries clone an [Arc] snapshot under a read lock and then run entirely
/// on that snapshot, so a concurrent reload can never expose a partially
/// built graph. The search calls themselves are bounded synchronous
/// computations over the snapshot plus per-call state, safe to issue from
/// any number of threads.
#[derive(Debug, Default)]
pub struct RoutingService {
    current: RwLock<Option<Arc<LoadedGraph>>>,
}

impl RoutingService {
    /// Creates a service with no graph loaded: every query fails with
    /// [ServiceError::Unavailable] until [RoutingService::install] is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `graph` the served network, building its spatial index and
    /// atomically replacing the previous graph. In-flight queries keep
    /// operating on the snapshot they started with.
    pub fn install(&self, graph: Graph) {
        let loaded = Arc::new(LoadedGraph {
            index: KDTree::from_graph(&graph),
            graph,
        });
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(loaded);
    }

    /// Returns the current graph snapshot, or [ServiceError::Unavailable]
    /// when no graph (or an empty one) is loaded.
    pub fn snapshot(&self) -> Result<Arc<LoadedGraph>, ServiceError> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        guard
            .clone()
            .filter(|loaded| !loaded.graph.is_empty())
            .ok_or(ServiceError::Unavailable)
    }

    /// Finds the network node closest to the given position, within
    /// `max_distance` meters ([DEFAULT_MAX_SNAP_DISTANCE] when [None]).
    /// No node within the bound is a normal not-found outcome.
    pub fn nearest_node(
        &self,
        lat: f64,
        lon: f64,
        max_distance: Option<f64>,
    ) -> Result<Option<NearestNode>, ServiceError> {
        let loaded = self.snapshot()?;
        let bound = max_distance.unwrap_or(DEFAULT_MAX_SNAP_DISTANCE);

        Ok(loaded
            .index
            .as_ref()
            .and_then(|index| index.nearest_within(lat, lon, bound))
            .and_then(|(id, _)| loaded.graph.get_node(id))
            .map(|node| NearestNode {
                node_id: node.id,
                lat: node.lat,
                lon: node.lon,
            }))
    }

    /// Looks up the `[lat, lon]` position of a node.
    pub fn node_coordinates(&self, node_id: i64) -> Result<Option<[f64; 2]>, ServiceError> {
        let loaded = self.snapshot()?;
        Ok(loaded.graph.get_node(node_id).map(|n| [n.lat, n.lon]))
    }

    /// Computes the route between two nodes with both algorithms, under
    /// the provided cost weights (shortest-distance by default).
    ///
    /// Unknown node ids are rejected before any search work begins; a pair
    /// of valid but unconnected nodes yields empty route collections.
    pub fn route(
        &self,
        origin: i64,
        destination: i64,
        weights: Option<Weights>,
    ) -> Result<RouteResponse, ServiceError> {
        let loaded = self.snapshot()?;
        let g = &loaded.graph;
        g.get_node(origin).ok_or(ServiceError::UnknownNode(origin))?;
        g.get_node(destination)
            .ok_or(ServiceError::UnknownNode(destination))?;
        let weights = weights.unwrap_or_default();

        let shortest = dijkstra(g, origin, Some(destination), &weights)?;
        let dijkstra_ids = shortest.path_to(origin, destination).unwrap_or_default();
        let astar_ids = a_star(g, origin, destination, &weights)?.unwrap_or_default();

        Ok(RouteResponse {
            dijkstra_coords: coordinates_of(g, &dijkstra_ids),
            astar_coords: coordinates_of(g, &astar_ids),
            dijkstra_ids,
            astar_ids,
        })
    }
}

fn coordinates_of(g: &Graph, ids: &[i64]) -> Vec<[f64; 2]> {
    ids.iter()
        .filter_map(|&id| g.get_node(id))
        .map(|n| [n.lat, n.lon])
        .collect()
}
