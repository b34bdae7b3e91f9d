// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{Graph, Node};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

/// A point location emitted by the ingestion collaborator.
///
/// Elevation and accident probability may be absent, in which case the
/// builder's [AttributeSource] synthesizes them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PointFeature {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub elevation: Option<f64>,
    #[serde(default)]
    pub accident_probability: Option<f64>,
    #[serde(default)]
    pub zone: Option<String>,
}

/// A connected path emitted by the ingestion collaborator, as an ordered
/// list of point ids. Decomposed into consecutive segments by the builder.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LineFeature {
    pub point_ids: Vec<i64>,
    #[serde(default)]
    pub bike_path: bool,
    #[serde(default = "default_importance")]
    pub importance: f64,
}

fn default_importance() -> f64 {
    1.0
}

/// Source of per-node attributes for points which don't carry their own.
///
/// The default implementation ([SyntheticAttributes]) is a placeholder for
/// real elevation and accident data; swapping it out must not touch any
/// other part of the build.
pub trait AttributeSource {
    /// Elevation of the node at the given position, in meters.
    fn elevation(&mut self, lat: f64, lon: f64) -> f64;

    /// Accident probability of the node at the given position, in `[0, 1]`.
    fn accident_probability(&mut self, lat: f64, lon: f64) -> f64;
}

/// Placeholder attribute policy: elevation is a latitude-dependent baseline
/// plus bounded noise, accident probability a bounded random value.
///
/// Build reproducibility requires [SyntheticAttributes::seeded]; the
/// [SyntheticAttributes::new] constructor draws its seed from the OS and
/// every build using it produces different attributes (and thus different
/// costs and routes).
#[derive(Debug, Clone)]
pub struct SyntheticAttributes {
    rng: StdRng,
}

impl SyntheticAttributes {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SyntheticAttributes {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeSource for SyntheticAttributes {
    fn elevation(&mut self, lat: f64, _lon: f64) -> f64 {
        400.0 - 100.0 * lat + self.rng.random_range(0.0..50.0)
    }

    fn accident_probability(&mut self, _lat: f64, _lon: f64) -> f64 {
        self.rng.random_range(0.1..0.9)
    }
}

/// Converts ingested point and line features into a [Graph].
///
/// Each line feature is decomposed into consecutive segments, and each
/// segment with both endpoints known produces two independent edges with
/// fresh sequential ids — one per traversal direction — carrying the same
/// importance and bike-path flag. Segments referencing unknown points are
/// dropped with a count-level diagnostic; the build still succeeds with
/// the well-formed subset.
pub struct GraphBuilder<A = SyntheticAttributes> {
    attributes: A,
    next_edge_id: i64,
}

impl GraphBuilder<SyntheticAttributes> {
    /// Creates a builder with OS-seeded synthetic attributes.
    pub fn new() -> Self {
        Self::with_attributes(SyntheticAttributes::new())
    }

    /// Creates a builder with deterministically seeded synthetic attributes,
    /// so that repeated builds from the same features are identical.
    pub fn seeded(seed: u64) -> Self {
        Self::with_attributes(SyntheticAttributes::seeded(seed))
    }
}

impl Default for GraphBuilder<SyntheticAttributes> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: AttributeSource> GraphBuilder<A> {
    /// Creates a builder with a custom [AttributeSource].
    pub fn with_attributes(attributes: A) -> Self {
        Self {
            attributes,
            next_edge_id: 1,
        }
    }

    /// Builds a fresh [Graph] from the provided feature streams.
    /// Empty inputs produce a valid, empty graph.
    pub fn build(
        mut self,
        points: impl IntoIterator<Item = PointFeature>,
        lines: impl IntoIterator<Item = LineFeature>,
    ) -> Graph {
        let mut g = Graph::new();
        let mut skipped_segments: u64 = 0;

        for point in points {
            let elevation = point
                .elevation
                .unwrap_or_else(|| self.attributes.elevation(point.lat, point.lon));
            let accident_probability = point
                .accident_probability
                .unwrap_or_else(|| self.attributes.accident_probability(point.lat, point.lon));

            let mut node = Node::new(point.id, point.lat, point.lon, elevation, accident_probability);
            node.zone = point.zone;
            g.add_node(node);
        }

        for line in lines {
            for pair in line.point_ids.windows(2) {
                let (u, v) = (pair[0], pair[1]);
                if g.get_node(u).is_none() || g.get_node(v).is_none() {
                    debug!("segment ({u}, {v}) references an unknown point - skipping");
                    skipped_segments += 1;
                    continue;
                }

                // One edge entity per traversal direction.
                g.add_edge(self.next_edge_id, u, v, line.bike_path, line.importance)
                    .expect("segment endpoints were checked above");
                self.next_edge_id += 1;
                g.add_edge(self.next_edge_id, v, u, line.bike_path, line.importance)
                    .expect("segment endpoints were checked above");
                self.next_edge_id += 1;
            }
        }

        if skipped_segments > 0 {
            warn!("{skipped_segments} segment(s) referenced unknown points and were dropped");
        }
        debug!(
            "built graph with {} nodes and {} edges",
            g.node_count(),
            g.edge_count()
        );

        g
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed attributes, for tests that need full control over node data.
    struct Flat;

    impl AttributeSource for Flat {
        fn elevation(&mut self, _lat: f64, _lon: f64) -> f64 {
            0.0
        }

        fn accident_probability(&mut self, _lat: f64, _lon: f64) -> f64 {
            0.0
        }
    }

    fn point(id: i64, lat: f64, lon: f64) -> PointFeature {
        PointFeature {
            id,
            lat,
            lon,
            elevation: None,
            accident_probability: None,
            zone: None,
        }
    }

    fn line(point_ids: Vec<i64>) -> LineFeature {
        LineFeature {
            point_ids,
            bike_path: false,
            importance: 1.0,
        }
    }

    #[test]
    fn every_segment_becomes_two_edges() {
        let points = vec![point(1, 0.0, 0.0), point(2, 0.0, 0.001), point(3, 0.001, 0.001)];
        let lines = vec![line(vec![1, 2, 3])];

        let g = GraphBuilder::with_attributes(Flat).build(points, lines);

        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 4);
        // Both directions of the 1-2 segment are independent entities.
        let first = g.get_edge(1).unwrap();
        let second = g.get_edge(2).unwrap();
        assert_eq!((first.a, first.b), (1, 2));
        assert_eq!((second.a, second.b), (2, 1));
        assert_eq!(g.neighbors(1), vec![2]);
    }

    #[test]
    fn segments_with_unknown_points_are_dropped() {
        let points = vec![point(1, 0.0, 0.0), point(2, 0.0, 0.001)];
        let lines = vec![line(vec![1, 42, 2]), line(vec![1, 2])];

        let g = GraphBuilder::with_attributes(Flat).build(points, lines);

        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn empty_input_produces_an_empty_graph() {
        let g = GraphBuilder::with_attributes(Flat).build(vec![], vec![]);
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn supplied_attributes_take_precedence_over_synthesis() {
        let points = vec![PointFeature {
            id: 1,
            lat: -33.45,
            lon: -70.66,
            elevation: Some(520.0),
            accident_probability: Some(0.25),
            zone: Some("Santiago".to_string()),
        }];

        let g = GraphBuilder::seeded(7).build(points, vec![]);
        let node = g.get_node(1).unwrap();
        assert_eq!(node.elevation, 520.0);
        assert_eq!(node.accident_probability, 0.25);
        assert_eq!(node.zone.as_deref(), Some("Santiago"));
    }

    #[test]
    fn synthesized_attributes_stay_in_range() {
        let points = (1..=50).map(|id| point(id, 0.01 * id as f64, 0.0));
        let g = GraphBuilder::seeded(1).build(points, vec![]);

        for node in g.nodes() {
            assert!(node.accident_probability >= 0.1 && node.accident_probability < 0.9);
            let baseline = 400.0 - 100.0 * node.lat;
            assert!(node.elevation >= baseline && node.elevation < baseline + 50.0);
        }
    }

    #[test]
    fn seeded_builds_are_reproducible() {
        let points = || (1..=10).map(|id| point(id, 0.001 * id as f64, 0.0)).collect::<Vec<_>>();
        let lines = || vec![line((1..=10).collect())];

        let a = GraphBuilder::seeded(42).build(points(), lines());
        let b = GraphBuilder::seeded(42).build(points(), lines());
        assert_eq!(a, b);
    }

    #[test]
    fn line_features_deserialize_with_defaults() {
        let line: LineFeature = serde_json::from_str(r#"{"point_ids": [1, 2, 3]}"#).unwrap();
        assert!(!line.bike_path);
        assert_eq!(line.importance, 1.0);
    }
}
