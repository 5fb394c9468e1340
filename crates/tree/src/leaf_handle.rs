// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Opaque handle to a recorded stack's leaf node (spec §4.E, §6
//! `leaf_handle.decrement_path()`).

use std::sync::Arc;

use parking_lot::Mutex;

use crate::arena::Arena;

/// Returned by [`crate::CallTree::record`]; held by the capture table entry
/// for an object so its FREE can `decrement_path` without re-walking
/// frames.
pub struct LeafHandle {
    pub(crate) tree: Arc<Mutex<Arena>>,
    pub(crate) node: usize,
    pub(crate) generation: u64,
}

impl LeafHandle {
    /// Decrement `retained_count` on every node from this leaf to the root.
    ///
    /// A no-op if the tree was `clear()`-ed since this handle was created —
    /// the handle's node index would otherwise refer to an unrelated node
    /// in the freshly reset arena (see `Arena::generation`).
    pub fn decrement_path(&self) {
        let mut arena = self.tree.lock();
        if arena.generation != self.generation {
            return;
        }
        arena.decrement_path(self.node);
    }
}

impl std::fmt::Debug for LeafHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeafHandle")
            .field("node", &self.node)
            .field("generation", &self.generation)
            .finish()
    }
}
