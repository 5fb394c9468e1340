// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn default_event_is_tombstone() {
    assert!(Event::default().is_tombstone());
    assert_eq!(Event::default(), Event::NONE);
}

#[test]
fn tombstone_clears_all_references() {
    let mut e = Event::new(CaptureId::new(1), ClassRef::new(2), ObjectIdentity::new(3));
    assert!(!e.is_tombstone());
    e.tombstone();
    assert!(e.is_tombstone());
    assert_eq!(e.capture_ref, None);
    assert_eq!(e.class_ref, None);
    assert_eq!(e.object_identity, None);
}

#[test]
fn new_and_free_carry_the_same_identity_fields() {
    let cap = CaptureId::new(9);
    let class = ClassRef::new(4);
    let obj = ObjectIdentity::new(100);
    let n = Event::new(cap, class, obj);
    let f = Event::free(cap, class, obj);
    assert_eq!(n.capture_ref, f.capture_ref);
    assert_eq!(n.class_ref, f.class_ref);
    assert_eq!(n.object_identity, f.object_identity);
    assert_eq!(n.kind, EventKind::New);
    assert_eq!(f.kind, EventKind::Free);
}
