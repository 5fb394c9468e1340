// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Call Tree (spec §4.E): a prefix-compressed tree of allocation stacks
//! with dual (total, retained) counters maintained transactionally along
//! the birth/death path.
//!
//! Allocation stacks share long common prefixes, so storing each one
//! linearly would waste space proportional to `stack_depth × allocations`.
//! The tree makes aggregation `O(stack_depth)` per event and supports both
//! per-path (`top_paths`) and per-frame (`hotspots`) queries from the same
//! structure (spec §4.E "Rationale").

use std::sync::Arc;

use parking_lot::Mutex;
use profiler_core::Frame;

use crate::arena::Arena;
use crate::leaf_handle::LeafHandle;
use crate::query::{self, Hotspot, PathSummary, SortBy};

/// Shared handle to a call tree. Cheap to clone — every clone refers to the
/// same underlying arena.
#[derive(Clone)]
pub struct CallTree {
    arena: Arc<Mutex<Arena>>,
}

impl CallTree {
    pub fn new() -> Self {
        Self {
            arena: Arc::new(Mutex::new(Arena::new())),
        }
    }

    /// Record one observed allocation stack. Returns `None` for an empty
    /// stack; otherwise returns a handle the caller must keep to later
    /// `decrement_path` on FREE.
    pub fn record(&self, frames: &[Frame]) -> Option<LeafHandle> {
        let mut arena = self.arena.lock();
        let leaf = arena.find_or_create_path(frames)?;
        arena.increment_path(leaf);
        Some(LeafHandle {
            tree: Arc::clone(&self.arena),
            node: leaf,
            generation: arena.generation,
        })
    }

    pub fn top_paths(&self, limit: i64, by: SortBy) -> Vec<PathSummary> {
        query::top_paths(&self.arena.lock(), limit, by)
    }

    pub fn hotspots(&self, limit: i64, by: SortBy) -> Vec<Hotspot> {
        query::hotspots(&self.arena.lock(), limit, by)
    }

    pub fn total_allocations(&self) -> u64 {
        self.arena.lock().root().total_count
    }

    pub fn retained_allocations(&self) -> u64 {
        self.arena.lock().root().retained_count
    }

    /// Replace the root with a fresh empty root (spec §4.E `clear`).
    pub fn clear(&self) {
        self.arena.lock().clear();
    }
}

impl Default for CallTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
