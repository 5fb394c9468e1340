// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `top_paths`/`hotspots` queries over a call-tree arena (spec §4.E, §4.F).

use std::collections::HashMap;

use profiler_core::LocationKey;

use crate::arena::Arena;

/// Which counter a query sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Total,
    Retained,
}

/// One root→leaf allocation stack with its aggregated counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSummary {
    pub frames: Vec<LocationKey>,
    pub total_count: u64,
    pub retained_count: u64,
}

/// A single frame's aggregated counts across every stack it appears in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotspot {
    pub location: LocationKey,
    pub total_count: u64,
    pub retained_count: u64,
}

/// Enumerate every root→leaf path (a "leaf" here is a structural tree
/// leaf — a node with no children — not merely a node that was itself once
/// the endpoint of a recording), sorted by `by` descending, first `limit`.
///
/// `limit <= 0` returns the empty sequence (spec §4.F).
pub(crate) fn top_paths(arena: &Arena, limit: i64, by: SortBy) -> Vec<PathSummary> {
    if limit <= 0 {
        return Vec::new();
    }

    let mut results = Vec::new();
    for (index, node) in arena.nodes.iter().enumerate() {
        if index == 0 || !node.is_leaf() {
            // Drop the root (no location) and internal nodes — a path is
            // only reported at the point a stack actually terminated.
            continue;
        }
        results.push(PathSummary {
            frames: reconstruct_path(arena, index),
            total_count: node.total_count,
            retained_count: node.retained_count,
        });
    }

    sort_and_truncate(results, limit as usize, |r| metric(by, r.total_count, r.retained_count))
}

/// Sum every node's counters (except the root) into a map keyed by
/// [`LocationKey`], collapsing the same source point seen at different
/// positions in the tree, sorted by `by` descending, first `limit`.
pub(crate) fn hotspots(arena: &Arena, limit: i64, by: SortBy) -> Vec<Hotspot> {
    if limit <= 0 {
        return Vec::new();
    }

    let mut totals: HashMap<LocationKey, (u64, u64)> = HashMap::new();
    for node in arena.nodes.iter().skip(1) {
        // skip(1): index 0 is always the root, which has no location.
        if let Some(location) = &node.location {
            let entry = totals.entry(location.clone()).or_insert((0, 0));
            entry.0 += node.total_count;
            entry.1 += node.retained_count;
        }
    }

    let results: Vec<Hotspot> = totals
        .into_iter()
        .map(|(location, (total_count, retained_count))| Hotspot {
            location,
            total_count,
            retained_count,
        })
        .collect();

    sort_and_truncate(results, limit as usize, |h| {
        metric(by, h.total_count, h.retained_count)
    })
}

fn metric(by: SortBy, total: u64, retained: u64) -> u64 {
    match by {
        SortBy::Total => total,
        SortBy::Retained => retained,
    }
}

fn sort_and_truncate<T>(mut items: Vec<T>, limit: usize, key: impl Fn(&T) -> u64) -> Vec<T> {
    // Sort stability is not promised (spec §4.F "ties may be returned in
    // any order"), so `sort_unstable_by_key` is appropriate here.
    items.sort_unstable_by_key(|item| std::cmp::Reverse(key(item)));
    items.truncate(limit);
    items
}

fn reconstruct_path(arena: &Arena, leaf: usize) -> Vec<LocationKey> {
    let mut frames = Vec::new();
    let mut current = Some(leaf);
    while let Some(index) = current {
        let node = &arena.nodes[index];
        if let Some(location) = &node.location {
            frames.push(location.clone());
        }
        current = node.parent;
    }
    frames.reverse();
    frames
}
