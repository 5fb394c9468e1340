// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Allocation/free event types flowing through the deferred queue.

use crate::{ClassRef, ObjectIdentity};

/// Handle identifying which capture a queued event belongs to.
///
/// Assigned by the broker when a capture registers for notifications
/// (spec §4.C "Registers with the event source"); doubles as the
/// `SubscriptionHandle` a capture holds while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaptureId(u64);

impl CaptureId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Kind of notification an event slot carries.
///
/// `None` is the tombstone value a slot is overwritten with once processed
/// (spec §3), distinguishing "not yet processed" from "processed" for a
/// collector scan that might walk the buffer concurrently with a drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventKind {
    #[default]
    None,
    New,
    Free,
}

/// A single allocation or free notification.
///
/// POD by construction: every field is `Copy`, so a slot can be tombstoned
/// (`clear`) without running a destructor or touching the heap, which is
/// required on the hot path (spec §4.A, §5 "Reachability discipline").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Event {
    pub kind: EventKind,
    pub capture_ref: Option<CaptureId>,
    pub class_ref: Option<ClassRef>,
    pub object_identity: Option<ObjectIdentity>,
}

impl Event {
    pub const NONE: Event = Event {
        kind: EventKind::None,
        capture_ref: None,
        class_ref: None,
        object_identity: None,
    };

    pub fn new(capture_ref: CaptureId, class_ref: ClassRef, object_identity: ObjectIdentity) -> Self {
        Self {
            kind: EventKind::New,
            capture_ref: Some(capture_ref),
            class_ref: Some(class_ref),
            object_identity: Some(object_identity),
        }
    }

    pub fn free(capture_ref: CaptureId, class_ref: ClassRef, object_identity: ObjectIdentity) -> Self {
        Self {
            kind: EventKind::Free,
            capture_ref: Some(capture_ref),
            class_ref: Some(class_ref),
            object_identity: Some(object_identity),
        }
    }

    /// Overwrite this slot's kind and references so a collector pass
    /// concurrent with a drain never walks a stale reference (spec §4.B
    /// step 4, §5 "Reachability discipline").
    pub fn tombstone(&mut self) {
        *self = Event::NONE;
    }

    pub fn is_tombstone(&self) -> bool {
        self.kind == EventKind::None
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
