// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capture Table (spec §4.C): per-capture live-object map. Keys are
//! inserted on NEW, removed on FREE.

use std::collections::HashMap;

use profiler_core::{ClassRef, ObjectIdentity};
use profiler_tree::LeafHandle;

/// Arbitrary data a user callback attaches to a tracked object, returned by
/// its NEW invocation and handed back on FREE.
pub type UserState = Box<dyn std::any::Any + Send>;

/// One live entry: which class the object belongs to, the state its NEW
/// callback returned, and (if a call tree is bound) the leaf it was
/// recorded under, so FREE can `decrement_path` without re-walking frames.
pub struct TableEntry {
    pub class: ClassRef,
    pub state: Option<UserState>,
    pub leaf: Option<LeafHandle>,
}

/// `ObjectIdentity -> (ClassRef, UserState, Option<LeafHandle>)`.
#[derive(Default)]
pub struct CaptureTable {
    entries: HashMap<ObjectIdentity, TableEntry>,
}

impl CaptureTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, identity: ObjectIdentity) -> bool {
        self.entries.contains_key(&identity)
    }

    /// Insert a new entry. A duplicate NEW for an identity already present
    /// is a no-op (spec §4.C NEW step 3 "treat as a no-op"). Returns `true`
    /// if the entry was actually inserted, `false` if `identity` was
    /// already present — the caller uses this to skip the rest of NEW
    /// handling (counters, call-tree recording, callback) for the spurious
    /// duplicate (spec §7 "Duplicate NEW for same identity: Ignored after
    /// first").
    pub fn insert(&mut self, identity: ObjectIdentity, entry: TableEntry) -> bool {
        match self.entries.entry(identity) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(vacant) => {
                vacant.insert(entry);
                true
            }
        }
    }

    /// Remove and return the entry for `identity`, if present.
    pub fn remove(&mut self, identity: ObjectIdentity) -> Option<TableEntry> {
        self.entries.remove(&identity)
    }

    /// Attach the state a NEW callback returned to an existing entry.
    pub fn set_state(&mut self, identity: ObjectIdentity, state: UserState) {
        if let Some(entry) = self.entries.get_mut(&identity) {
            entry.state = Some(state);
        }
    }

    /// Remove every entry belonging to `class` (spec §4.C `untrack`).
    pub fn remove_class(&mut self, class: ClassRef) {
        self.entries.retain(|_, entry| entry.class != class);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate live entries (spec §6 `each_tracked`).
    pub fn iter(&self) -> impl Iterator<Item = (ObjectIdentity, &TableEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
