// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn counts_drops() {
    let d = Diagnostics::new();
    d.record_drop();
    d.record_drop();
    assert_eq!(d.dropped_events(), 2);
}

#[test]
fn ring_buffer_evicts_oldest_past_capacity() {
    let d = Diagnostics::with_error_capacity(2);
    d.record_callback_error("a".into());
    d.record_callback_error("b".into());
    d.record_callback_error("c".into());
    assert_eq!(d.recent_errors(), vec!["b".to_string(), "c".to_string()]);
}

#[test]
fn starts_empty() {
    let d = Diagnostics::new();
    assert_eq!(d.dropped_events(), 0);
    assert!(d.recent_errors().is_empty());
}
