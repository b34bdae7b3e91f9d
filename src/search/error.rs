// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Error conditions which may occur during [dijkstra](crate::dijkstra)
/// or [a_star](crate::a_star).
///
/// Note that a reachable-but-unconnected target is not an error: both
/// searches report "no path" through their regular return values.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// The source or target node doesn't exist in the graph.
    /// Detected before any search work begins.
    #[error("unknown node: {0}")]
    UnknownNode(i64),
}
