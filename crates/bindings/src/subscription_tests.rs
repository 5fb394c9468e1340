// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn all_matches_every_class() {
    assert!(Subscription::All.matches(Some(ClassRef::new(1))));
    assert!(Subscription::All.matches(None));
}

#[test]
fn classes_matches_only_named_classes() {
    let sub = Subscription::Classes(vec![ClassRef::new(1), ClassRef::new(2)]);
    assert!(sub.matches(Some(ClassRef::new(1))));
    assert!(!sub.matches(Some(ClassRef::new(3))));
    assert!(!sub.matches(None));
}
