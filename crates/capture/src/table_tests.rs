// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn entry(class: ClassRef) -> TableEntry {
    TableEntry { class, state: None, leaf: None }
}

#[test]
fn duplicate_new_is_a_no_op() {
    let mut table = CaptureTable::new();
    let id = ObjectIdentity::new(1);
    table.insert(id, entry(ClassRef::new(1)));
    table.insert(id, entry(ClassRef::new(2)));

    assert_eq!(table.len(), 1);
    assert_eq!(table.iter().next().unwrap().1.class, ClassRef::new(1));
}

#[test]
fn remove_returns_and_drops_entry() {
    let mut table = CaptureTable::new();
    let id = ObjectIdentity::new(1);
    table.insert(id, entry(ClassRef::new(1)));

    let removed = table.remove(id).unwrap();
    assert_eq!(removed.class, ClassRef::new(1));
    assert!(!table.contains(id));
}

#[test]
fn remove_class_purges_only_that_class() {
    let mut table = CaptureTable::new();
    table.insert(ObjectIdentity::new(1), entry(ClassRef::new(1)));
    table.insert(ObjectIdentity::new(2), entry(ClassRef::new(2)));

    table.remove_class(ClassRef::new(1));

    assert_eq!(table.len(), 1);
    assert!(table.contains(ObjectIdentity::new(2)));
}

#[test]
fn clear_empties_the_table() {
    let mut table = CaptureTable::new();
    table.insert(ObjectIdentity::new(1), entry(ClassRef::new(1)));
    table.clear();
    assert!(table.is_empty());
}
