// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn default_binds_a_call_tree() {
    assert!(CaptureConfig::new().bind_call_tree);
}

#[test]
fn with_call_tree_overrides_default() {
    assert!(!CaptureConfig::new().with_call_tree(false).bind_call_tree);
}
