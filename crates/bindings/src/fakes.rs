// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test doubles for the trait seams in this crate, gated behind
//! `test-support` so downstream crates can use them in their own tests
//! without duplicating fakes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use profiler_core::{ClassRef, Frame};

use crate::backtrace_source::BacktraceSource;
use crate::class_registry::{ClassName, ClassRegistry};
use crate::event_source::AllocationEventSource;
use crate::subscription::{Subscription, SubscriptionHandle};

/// Records every `subscribe`/`unsubscribe` call; never delivers real events.
#[derive(Default)]
pub struct FakeEventSource {
    next_handle: AtomicU64,
    subscriptions: Mutex<HashMap<String, Subscription>>,
}

impl FakeEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently active subscriptions, keyed by the handle they were issued.
    pub fn active(&self) -> Vec<Subscription> {
        self.subscriptions.lock().values().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.lock().is_empty()
    }
}

impl AllocationEventSource for FakeEventSource {
    fn subscribe(&self, subscription: Subscription) -> SubscriptionHandle {
        let id = self.next_handle.fetch_add(1, Ordering::Relaxed);
        let handle = SubscriptionHandle::new(id.to_string());
        self.subscriptions.lock().insert(handle.as_str().to_string(), subscription);
        handle
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.subscriptions.lock().remove(handle.as_str());
    }
}

/// Returns a fixed stack on every `capture()` call.
pub struct FrameVecSource {
    frames: Vec<Frame>,
}

impl FrameVecSource {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }
}

impl BacktraceSource for FrameVecSource {
    fn capture(&self) -> Vec<Frame> {
        self.frames.clone()
    }
}

/// In-memory `ClassRef` -> `ClassName` table.
#[derive(Default)]
pub struct FakeClassRegistry {
    names: Arc<Mutex<HashMap<ClassRef, ClassName>>>,
}

impl FakeClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, class: ClassRef, name: impl Into<String>) {
        self.names.lock().insert(class, ClassName::new(name));
    }
}

impl ClassRegistry for FakeClassRegistry {
    fn resolve(&self, class: ClassRef) -> Option<ClassName> {
        self.names.lock().get(&class).cloned()
    }
}

#[cfg(test)]
#[path = "fakes_tests.rs"]
mod tests;
