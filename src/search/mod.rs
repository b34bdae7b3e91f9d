// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

mod astar;
mod dijkstra;
mod error;
mod path;

pub use astar::a_star;
pub use dijkstra::{dijkstra, ShortestPaths};
pub use error::SearchError;
pub use path::reconstruct;
