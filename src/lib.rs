// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Safety-aware shortest-path routing over road and bike-path networks.
//!
//! Senda converts point and line features (produced by an external map
//! ingestion step) into a weighted graph, and runs Dijkstra and A* to find
//! cheapest paths between nodes. Path costs combine great-circle distance,
//! positive elevation gain and an accident-risk penalty, weighted per query
//! via [Weights].
//!
//! # Example
//!
//! ```no_run
//! let points = vec![
//!     senda::PointFeature { id: 1, lat: -33.45, lon: -70.66, elevation: None, accident_probability: None, zone: None },
//!     senda::PointFeature { id: 2, lat: -33.46, lon: -70.65, elevation: None, accident_probability: None, zone: None },
//! ];
//! let lines = vec![senda::LineFeature { point_ids: vec![1, 2], bike_path: true, importance: 1.0 }];
//!
//! let g = senda::GraphBuilder::seeded(42).build(points, lines);
//! let route = senda::a_star(&g, 1, 2, &senda::Weights::default())
//!     .expect("both nodes exist")
//!     .expect("the nodes are connected");
//!
//! println!("Route: {route:?}");
//! ```

mod builder;
mod cost;
mod distance;
mod graph;
mod kd;
mod search;
pub mod service;

pub use builder::{AttributeSource, GraphBuilder, LineFeature, PointFeature, SyntheticAttributes};
pub use cost::{edge_cost, Weights};
pub use distance::haversine;
pub use graph::{Edge, Graph, Node};
pub use kd::{KDTree, DEFAULT_MAX_SNAP_DISTANCE};
pub use search::{a_star, dijkstra, reconstruct, SearchError, ShortestPaths};
