// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

/// Turns a predecessor map into an ordered node sequence from `source`
/// to `target`.
///
/// Walks backward from `target` until reaching `source` (inclusive) or
/// hitting a node with no recorded predecessor, then reverses the
/// accumulated sequence. When the walk stops early, the returned sequence
/// does not start with `source` — callers must treat such a result as
/// "no valid path".
pub fn reconstruct(predecessors: &HashMap<i64, i64>, source: i64, target: i64) -> Vec<i64> {
    let mut path = vec![target];
    let mut current = target;

    while current != source {
        match predecessors.get(&current) {
            Some(&previous) => {
                path.push(previous);
                current = previous;
            }
            None => break,
        }
    }

    path.reverse();
    path
}
