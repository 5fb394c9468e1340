// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use profiler_core::Frame;

fn frame(label: &str) -> Frame {
    Frame::new("stacks.rb", 1, label)
}

fn stack(labels: &[&str]) -> Vec<Frame> {
    labels.iter().map(|l| frame(l)).collect()
}

#[test]
fn record_on_empty_stack_returns_none() {
    let tree = CallTree::new();
    assert!(tree.record(&[]).is_none());
}

#[test]
fn prefix_sharing_scenario() {
    // spec §8 scenario 1
    let tree = CallTree::new();
    for _ in 0..10 {
        tree.record(&stack(&["A", "B"]));
    }
    for _ in 0..5 {
        tree.record(&stack(&["A", "C"]));
    }

    assert_eq!(tree.total_allocations(), 15);

    let hotspots: std::collections::HashMap<String, (u64, u64)> = tree
        .hotspots(10, SortBy::Total)
        .into_iter()
        .map(|h| (h.location.as_str().to_string(), (h.total_count, h.retained_count)))
        .collect();
    assert_eq!(hotspots["stacks.rb:1:A"], (15, 15));
    assert_eq!(hotspots["stacks.rb:1:B"], (10, 10));
    assert_eq!(hotspots["stacks.rb:1:C"], (5, 5));

    assert_eq!(tree.top_paths(10, SortBy::Total).len(), 2);
}

#[test]
fn free_decrements_retained_only_scenario() {
    // spec §8 scenario 2
    let tree = CallTree::new();
    let mut handles = Vec::new();
    for _ in 0..5 {
        handles.push(tree.record(&stack(&["X"])).unwrap());
    }
    handles[0].decrement_path();
    handles[1].decrement_path();

    assert_eq!(tree.total_allocations(), 5);
    assert_eq!(tree.retained_allocations(), 3);

    let hotspot = tree
        .hotspots(10, SortBy::Total)
        .into_iter()
        .find(|h| h.location.as_str() == "stacks.rb:1:X")
        .unwrap();
    assert_eq!((hotspot.total_count, hotspot.retained_count), (5, 3));
}

#[test]
fn record_then_decrement_restores_pre_record_counts() {
    // P4
    let tree = CallTree::new();
    tree.record(&stack(&["A", "B"]));
    let before_total = tree.total_allocations();
    let before_retained = tree.retained_allocations();

    let handle = tree.record(&stack(&["A", "B"])).unwrap();
    handle.decrement_path();

    assert_eq!(tree.total_allocations(), before_total + 1);
    assert_eq!(tree.retained_allocations(), before_retained);
}

#[test]
fn total_count_of_root_equals_sum_over_leaves() {
    // P2
    let tree = CallTree::new();
    tree.record(&stack(&["A", "B"]));
    tree.record(&stack(&["A", "C"]));
    tree.record(&stack(&["D"]));

    let leaf_total: u64 = tree.top_paths(100, SortBy::Total).iter().map(|p| p.total_count).sum();
    assert_eq!(leaf_total, tree.total_allocations());
}

#[test]
fn limit_le_zero_returns_empty() {
    let tree = CallTree::new();
    tree.record(&stack(&["A"]));
    assert!(tree.top_paths(0, SortBy::Total).is_empty());
    assert!(tree.top_paths(-1, SortBy::Total).is_empty());
    assert!(tree.hotspots(0, SortBy::Total).is_empty());
}

#[test]
fn clear_resets_everything() {
    let tree = CallTree::new();
    tree.record(&stack(&["A"]));
    tree.clear();
    assert_eq!(tree.total_allocations(), 0);
    assert_eq!(tree.retained_allocations(), 0);
    assert!(tree.top_paths(10, SortBy::Total).is_empty());
}

#[test]
fn stale_leaf_handle_after_clear_is_a_no_op() {
    let tree = CallTree::new();
    let handle = tree.record(&stack(&["A"])).unwrap();
    tree.clear();
    tree.record(&stack(&["B"]));

    handle.decrement_path();

    // The handle from before clear() must not touch the new tree's counts.
    assert_eq!(tree.retained_allocations(), 1);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    const LABELS: [&str; 5] = ["A", "B", "C", "D", "E"];

    fn arb_stack() -> impl Strategy<Value = Vec<&'static str>> {
        prop::collection::vec(prop::sample::select(&LABELS[..]), 1..5)
    }

    proptest! {
        /// P2: total_count(root) == sum of total_count over leaves, for any
        /// sequence of recorded stacks (and likewise for retained_count).
        #[test]
        fn root_total_always_equals_sum_over_leaves(stacks in prop::collection::vec(arb_stack(), 0..40)) {
            let tree = CallTree::new();
            for labels in &stacks {
                tree.record(&stack(labels));
            }

            let leaf_total: u64 = tree.top_paths(1_000, SortBy::Total).iter().map(|p| p.total_count).sum();
            prop_assert_eq!(leaf_total, tree.total_allocations());

            let leaf_retained: u64 = tree.top_paths(1_000, SortBy::Retained).iter().map(|p| p.retained_count).sum();
            prop_assert_eq!(leaf_retained, tree.retained_allocations());
        }

        /// P4: record followed by decrement_path returns every traversed
        /// node's retained_count to its pre-record value, regardless of
        /// what else has already been recorded in the tree.
        #[test]
        fn record_then_decrement_restores_pre_record_retained(
            warm_up in prop::collection::vec(arb_stack(), 0..20),
            extra in arb_stack(),
        ) {
            let tree = CallTree::new();
            for labels in &warm_up {
                tree.record(&stack(labels));
            }
            let before_total = tree.total_allocations();
            let before_retained = tree.retained_allocations();

            let handle = tree.record(&stack(&extra)).unwrap();
            handle.decrement_path();

            prop_assert_eq!(tree.total_allocations(), before_total + 1);
            prop_assert_eq!(tree.retained_allocations(), before_retained);
        }
    }
}

#[test]
fn top_paths_sorted_descending_by_selected_metric() {
    let tree = CallTree::new();
    for _ in 0..2 {
        tree.record(&stack(&["A"]));
    }
    for _ in 0..9 {
        tree.record(&stack(&["B"]));
    }
    let paths = tree.top_paths(10, SortBy::Total);
    assert_eq!(paths[0].total_count, 9);
    assert_eq!(paths[1].total_count, 2);
}
