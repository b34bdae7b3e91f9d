// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{haversine, Graph};

/// Default bound for snapping a query position onto the network, in meters.
/// Positions further than this from every node are reported as not found.
pub const DEFAULT_MAX_SNAP_DISTANCE: f64 = 50.0;

/// Position of a single graph node, as stored by the [KDTree].
#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexedPoint {
    id: i64,
    lat: f64,
    lon: f64,
}

/// KDTree implements the [k-d tree data structure](https://en.wikipedia.org/wiki/K-d_tree),
/// which can be used to speed up nearest-neighbor search for large graphs.
/// [crate::Graph::find_nearest_node] computes the distance to every node
/// and becomes the dominant cost when snapping many query positions;
/// a k-d tree trades memory usage for CPU time.
///
/// This implementation assumes euclidean geometry, even though the distance
/// function used is [haversine]. This results in undefined behavior when
/// points are close to the ante meridian (180°/-180° longitude) or poles
/// (90°/-90° latitude), or when the data spans multiple continents.
#[derive(Debug, Clone)]
pub struct KDTree {
    pivot: IndexedPoint,
    left: Option<Box<KDTree>>,
    right: Option<Box<KDTree>>,
}

impl KDTree {
    /// Builds a k-d tree over all node positions of the provided [Graph].
    /// Returns [None] for an empty graph.
    pub fn from_graph(g: &Graph) -> Option<Self> {
        let mut points = g
            .nodes()
            .map(|n| IndexedPoint {
                id: n.id,
                lat: n.lat,
                lon: n.lon,
            })
            .collect::<Vec<_>>();
        Self::build(points.as_mut_slice(), false)
    }

    /// Finds the node closest to the given position.
    /// Returns its id and the distance in meters.
    pub fn nearest(&self, lat: f64, lon: f64) -> (i64, f64) {
        let (point, dist) = self.nearest_impl(lat, lon, false);
        (point.id, dist)
    }

    /// Finds the node closest to the given position, but only if it lies
    /// within `max_distance` meters. Ties resolve to the first candidate
    /// encountered during traversal — stable, but callers must not attach
    /// meaning to the tie order.
    pub fn nearest_within(&self, lat: f64, lon: f64, max_distance: f64) -> Option<(i64, f64)> {
        let (id, dist) = self.nearest(lat, lon);
        (dist <= max_distance).then_some((id, dist))
    }

    fn nearest_impl(&self, lat: f64, lon: f64, lon_divides: bool) -> (IndexedPoint, f64) {
        // Start by assuming that pivot is the closest
        let mut best = self.pivot;
        let mut best_dist = haversine(lat, lon, best.lat, best.lon);

        // Select which branch to recurse into first
        let first_left = if lon_divides {
            lon < best.lon
        } else {
            lat < best.lat
        };
        let (first, second) = if first_left {
            (&self.left, &self.right)
        } else {
            (&self.right, &self.left)
        };

        // Recurse into the first branch
        if let Some(branch) = first {
            let (alt, alt_dist) = branch.nearest_impl(lat, lon, !lon_divides);
            if alt_dist < best_dist {
                best = alt;
                best_dist = alt_dist;
            }
        }

        // (Optionally) recurse into the second branch
        if let Some(branch) = second {
            // A closer node is possible in the second branch if and only if
            // the splitting axis is closer than the current best candidate.
            let (axis_lat, axis_lon) = if lon_divides {
                (lat, self.pivot.lon)
            } else {
                (self.pivot.lat, lon)
            };
            let dist_to_axis = haversine(lat, lon, axis_lat, axis_lon);

            if dist_to_axis < best_dist {
                let (alt, alt_dist) = branch.nearest_impl(lat, lon, !lon_divides);
                if alt_dist < best_dist {
                    best = alt;
                    best_dist = alt_dist;
                }
            }
        }

        (best, best_dist)
    }

    fn build(points: &mut [IndexedPoint], lon_divides: bool) -> Option<Self> {
        match points.len() {
            0 => None,
            1 => Some(Self {
                pivot: points[0],
                left: None,
                right: None,
            }),
            _ => {
                if lon_divides {
                    points.sort_by(|a, b| a.lon.partial_cmp(&b.lon).unwrap());
                } else {
                    points.sort_by(|a, b| a.lat.partial_cmp(&b.lat).unwrap());
                }
                let median = points.len() / 2;
                let pivot = points[median];
                let (left, right_and_pivot) = points.split_at_mut(median);
                let right = &mut right_and_pivot[1..];
                Some(Self {
                    pivot,
                    left: Self::build(left, !lon_divides).map(Box::new),
                    right: Self::build(right, !lon_divides).map(Box::new),
                })
            }
        }
    }
}
