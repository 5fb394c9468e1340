// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use profiler_core::{CaptureId, ClassRef, ObjectIdentity};

fn sample_event(n: u64) -> Event {
    Event::new(CaptureId::new(1), ClassRef::new(2), ObjectIdentity::new(n))
}

#[test]
fn starts_empty() {
    let buf = SlotBuffer::new();
    assert_eq!(buf.len(), 0);
    assert!(buf.is_empty());
}

#[test]
fn push_then_at_round_trips() {
    let mut buf = SlotBuffer::new();
    let idx = buf.push(sample_event(42)).unwrap();
    assert_eq!(buf.len(), 1);
    assert_eq!(buf.at(idx).unwrap().object_identity, Some(ObjectIdentity::new(42)));
}

#[test]
fn at_out_of_bounds_is_none() {
    let buf = SlotBuffer::new();
    assert!(buf.at(0).is_none());
}

#[test]
fn grows_past_initial_capacity() {
    let mut buf = SlotBuffer::new();
    for i in 0..1000u64 {
        buf.push(sample_event(i)).unwrap();
    }
    assert_eq!(buf.len(), 1000);
    assert_eq!(buf.at(999).unwrap().object_identity, Some(ObjectIdentity::new(999)));
}

#[test]
fn clear_resets_length_but_keeps_capacity() {
    let mut buf = SlotBuffer::new();
    for i in 0..50u64 {
        buf.push(sample_event(i)).unwrap();
    }
    let capacity_before = buf.capacity();
    buf.clear();
    assert_eq!(buf.len(), 0);
    assert_eq!(buf.capacity(), capacity_before);
}

#[test]
fn insertion_order_is_preserved() {
    let mut buf = SlotBuffer::new();
    for i in 0..10u64 {
        buf.push(sample_event(i)).unwrap();
    }
    for i in 0..10u64 {
        assert_eq!(
            buf.at(i as usize).unwrap().object_identity,
            Some(ObjectIdentity::new(i))
        );
    }
}
