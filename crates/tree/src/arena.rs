// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mutable tree storage, locked behind `CallTree`.

use crate::node::Node;
use profiler_core::{Frame, LocationKey};

/// Flat node storage for a call tree. Index 0 is always the root.
///
/// `generation` increments on every `clear()`; a [`crate::LeafHandle`]
/// captures the generation it was created under so a `decrement_path`
/// issued against a handle from before a `clear()` is recognized as stale
/// and ignored rather than silently corrupting the fresh tree (see
/// DESIGN.md's resolution of this point, left open by spec §9).
#[derive(Debug)]
pub(crate) struct Arena {
    pub(crate) nodes: Vec<Node>,
    pub(crate) generation: u64,
}

impl Arena {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node::root()],
            generation: 0,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.nodes = vec![Node::root()];
        self.generation += 1;
    }

    /// Walk from the root, creating children as needed, to the node for
    /// `frames`. Returns `None` for an empty stack (spec §4.E "Empty stack
    /// → return null").
    pub(crate) fn find_or_create_path(&mut self, frames: &[Frame]) -> Option<usize> {
        if frames.is_empty() {
            return None;
        }
        let mut current = 0usize;
        for frame in frames {
            let key = LocationKey::from(frame);
            current = match self.nodes[current].children.get(&key) {
                Some(&child) => child,
                None => {
                    let child_index = self.nodes.len();
                    self.nodes.push(Node::child(current, key.clone()));
                    self.nodes[current].children.insert(key, child_index);
                    child_index
                }
            };
        }
        Some(current)
    }

    /// Increment both counters on every node from `leaf` to the root
    /// inclusive (spec §4.E `increment_path`).
    pub(crate) fn increment_path(&mut self, leaf: usize) {
        let mut current = Some(leaf);
        while let Some(index) = current {
            self.nodes[index].total_count += 1;
            self.nodes[index].retained_count += 1;
            current = self.nodes[index].parent;
        }
    }

    /// Decrement only `retained_count` on every node from `leaf` to the
    /// root inclusive (spec §4.E `decrement_path`).
    pub(crate) fn decrement_path(&mut self, leaf: usize) {
        let mut current = Some(leaf);
        while let Some(index) = current {
            self.nodes[index].retained_count = self.nodes[index].retained_count.saturating_sub(1);
            current = self.nodes[index].parent;
        }
    }

    pub(crate) fn root(&self) -> &Node {
        &self.nodes[0]
    }
}
