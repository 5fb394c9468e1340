// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capture Controller (spec §4.C): lifecycle, subscription to the event
//! source, and user callback invocation. Owns an `Arc<EventBroker>` passed
//! in at construction rather than reaching a process-wide global (spec §9
//! "Globals re-architecture").

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use profiler_bindings::{AllocationEventSource, BacktraceSource, Subscription, SubscriptionHandle};
use profiler_core::{CaptureId, ClassRef, Event, EventKind, ObjectIdentity};
use profiler_queue::{DrainHandler, EventBroker};
use profiler_tree::CallTree;
use tracing::{debug, info};

use crate::config::CaptureConfig;
use crate::counter::Allocations;
use crate::error::CaptureError;
use crate::table::{CaptureTable, TableEntry, UserState};

/// Which half of the NEW/FREE pair a callback is being invoked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackEvent {
    New,
    Free,
}

/// `cb(class, event, prior_state?) -> new_state?` (spec §6 "User callback
/// contract"). Returned value becomes the new state for NEW; ignored for
/// FREE.
///
/// `Arc`, not `Box`: `handle_new`/`handle_free` clone the callback out of
/// `Inner` and drop the `inner` lock before invoking it, so a callback that
/// calls back into this same `Capture`'s own query methods (`count_for`,
/// `each_tracked`, ...) doesn't deadlock on `parking_lot::Mutex`, which is
/// not re-entrant.
pub type Callback =
    Arc<dyn Fn(ClassRef, CallbackEvent, Option<&UserState>) -> Option<UserState> + Send + Sync>;

struct ClassState {
    callback: Option<Callback>,
    allocations: Allocations,
    call_tree: Option<CallTree>,
}

impl ClassState {
    fn new(bind_call_tree: bool) -> Self {
        Self {
            callback: None,
            allocations: Allocations::new(),
            call_tree: bind_call_tree.then(CallTree::new),
        }
    }
}

struct Inner {
    running: bool,
    /// Claimed for the duration of `Capture::stop`'s flush-then-unregister
    /// sequence, so a second concurrent `stop()` call is rejected
    /// immediately (spec §4.C "stop while stopped: returns false") rather
    /// than racing to unregister twice while `running` is still `true` for
    /// the drain below to see.
    stopping: bool,
    /// Re-entrancy guard for callback invocation (spec §4.C "enabled").
    /// False while a callback for this capture is already executing.
    enabled: bool,
    /// Set for the duration of `Capture::process_all`; a nested call (a
    /// callback invoking `process_all` on the same capture) is a programmer
    /// error, unlike the broker's own benign reentrant-drain no-op.
    processing_all: bool,
    classes: HashMap<ClassRef, ClassState>,
    table: CaptureTable,
}

impl Inner {
    fn new() -> Self {
        Self {
            running: false,
            stopping: false,
            enabled: true,
            processing_all: false,
            classes: HashMap::new(),
            table: CaptureTable::new(),
        }
    }
}

struct CaptureShared {
    broker: Arc<EventBroker>,
    event_source: Arc<dyn AllocationEventSource>,
    backtrace_source: Arc<dyn BacktraceSource>,
    config: CaptureConfig,
    subscription: Mutex<Option<SubscriptionHandle>>,
    /// The id this capture last registered under with the broker, so
    /// `stop()` can unregister exactly that registration. Without this, a
    /// start/stop/start cycle would leave the broker dispatching to the
    /// same capture twice over (see DESIGN.md).
    broker_registration: Mutex<Option<CaptureId>>,
    inner: Mutex<Inner>,
}

impl DrainHandler for CaptureShared {
    fn handle(&self, event: Event) {
        match event.kind {
            EventKind::New => self.handle_new(event),
            EventKind::Free => self.handle_free(event),
            EventKind::None => {}
        }
    }
}

impl CaptureShared {
    fn handle_new(&self, event: Event) {
        let (Some(class), Some(identity)) = (event.class_ref, event.object_identity) else {
            return;
        };

        // Everything that touches `Inner` happens under the lock; the
        // callback itself (if any) is cloned out (`Arc::clone`, cheap) and
        // invoked only after the lock is dropped below, so a callback that
        // calls back into this capture's own methods (`count_for`,
        // `each_tracked`, `tracking`, ...) never deadlocks on the
        // non-reentrant `parking_lot::Mutex` guarding `Inner`.
        let callback = {
            let mut inner = self.inner.lock();
            if !inner.running || !inner.classes.contains_key(&class) {
                return;
            }
            if inner.table.contains(identity) {
                // Spurious duplicate NEW for an identity already tracked: no
                // counter update, no call-tree recording, no callback (spec
                // §7 "Duplicate NEW for same identity: Ignored after
                // first").
                debug!(?class, ?identity, "ignoring duplicate NEW");
                return;
            }

            let wants_tree = inner
                .classes
                .get(&class)
                .map(|state| state.call_tree.is_some())
                .unwrap_or(false);
            let leaf = if wants_tree {
                let frames = self.backtrace_source.capture();
                inner
                    .classes
                    .get(&class)
                    .and_then(|state| state.call_tree.as_ref())
                    .and_then(|tree| tree.record(&frames))
            } else {
                None
            };

            inner.table.insert(identity, TableEntry { class, state: None, leaf });
            if let Some(state) = inner.classes.get_mut(&class) {
                state.allocations.record_new();
            }

            if !inner.enabled {
                debug!(?class, ?identity, "skipping re-entrant NEW callback");
                return;
            }

            let callback = inner.classes.get(&class).and_then(|state| state.callback.clone());
            let Some(callback) = callback else {
                return;
            };
            inner.enabled = false;
            callback
        };

        let new_state = callback(class, CallbackEvent::New, None);

        let mut inner = self.inner.lock();
        inner.enabled = true;
        if let Some(state) = new_state {
            inner.table.set_state(identity, state);
        }
    }

    fn handle_free(&self, event: Event) {
        let Some(identity) = event.object_identity else {
            return;
        };

        // Same lock-drop-before-invoke shape as `handle_new` above.
        let (class, prior_state, callback) = {
            let mut inner = self.inner.lock();
            // Object born before tracking started, or already removed:
            // ignore entirely so retained_count never goes negative (spec
            // §4.C FREE step 1, I3 relaxation).
            let Some(removed) = inner.table.remove(identity) else {
                return;
            };
            let class = removed.class;

            if let Some(state) = inner.classes.get_mut(&class) {
                state.allocations.record_free();
            }
            if let Some(leaf) = &removed.leaf {
                leaf.decrement_path();
            }

            if !inner.enabled {
                debug!(?class, ?identity, "skipping re-entrant FREE callback");
                return;
            }

            let callback = inner.classes.get(&class).and_then(|state| state.callback.clone());
            let Some(callback) = callback else {
                return;
            };
            inner.enabled = false;
            (class, removed.state, callback)
        };

        callback(class, CallbackEvent::Free, prior_state.as_ref());

        self.inner.lock().enabled = true;
    }
}

/// Per-capture bookkeeping: subscribed classes, their counters and optional
/// call trees, and the live-object table. Cheap to clone — every clone
/// shares the same underlying state.
#[derive(Clone)]
pub struct Capture {
    shared: Arc<CaptureShared>,
}

impl Capture {
    pub fn new(
        broker: Arc<EventBroker>,
        event_source: Arc<dyn AllocationEventSource>,
        backtrace_source: Arc<dyn BacktraceSource>,
        config: CaptureConfig,
    ) -> Self {
        Self {
            shared: Arc::new(CaptureShared {
                broker,
                event_source,
                backtrace_source,
                config,
                subscription: Mutex::new(None),
                broker_registration: Mutex::new(None),
                inner: Mutex::new(Inner::new()),
            }),
        }
    }

    /// Registers with the event source for NEW/FREE on the subscribed
    /// classes. Returns `false` if already running.
    pub fn start(&self) -> bool {
        let mut inner = self.shared.inner.lock();
        if inner.running {
            return false;
        }
        inner.running = true;
        let classes: Vec<ClassRef> = inner.classes.keys().copied().collect();
        drop(inner);

        let capture_id = self.shared.broker.register(Arc::clone(&self.shared));
        *self.shared.broker_registration.lock() = Some(capture_id);
        let handle = self
            .shared
            .event_source
            .subscribe(Subscription::Classes(classes));
        *self.shared.subscription.lock() = Some(handle);
        info!(?capture_id, "capture started");
        true
    }

    /// Requests a full drain so pending events are reflected, then
    /// unregisters. Returns `false` if not running.
    pub fn stop(&self) -> bool {
        {
            let mut inner = self.shared.inner.lock();
            if !inner.running || inner.stopping {
                return false;
            }
            inner.stopping = true;
        }
        // `running` is still `true` here, so `handle_new`/`handle_free`
        // process this drain's events normally — counters must reflect
        // every birth/death enqueued before this call (spec §4.C "stop ...
        // requests a full drain of pending events first", §5 "stop returns
        // only after all events enqueued before stop have been fully
        // processed"). Flipping `running` off before draining would make
        // every pending NEW silently vanish instead.
        self.shared.broker.drain();
        {
            let mut inner = self.shared.inner.lock();
            inner.running = false;
            inner.stopping = false;
        }
        if let Some(handle) = self.shared.subscription.lock().take() {
            self.shared.event_source.unsubscribe(handle);
        }
        if let Some(capture_id) = self.shared.broker_registration.lock().take() {
            self.shared.broker.unregister(capture_id);
        }
        info!("capture stopped");
        true
    }

    pub fn running(&self) -> bool {
        self.shared.inner.lock().running
    }

    /// Drives a full drain of the broker on this capture's behalf. Calling
    /// this recursively — from inside a user callback running on the same
    /// capture — fails loudly rather than silently recursing or
    /// deadlocking (spec §7 "Recursive process_all from callback").
    pub fn process_all(&self) -> Result<(), CaptureError> {
        {
            let mut inner = self.shared.inner.lock();
            if inner.processing_all {
                return Err(CaptureError::RecursiveProcessAll);
            }
            inner.processing_all = true;
        }
        self.shared.broker.drain();
        self.shared.inner.lock().processing_all = false;
        Ok(())
    }

    /// Adds `class` to the subscribed set, replacing any existing callback.
    /// If the class was previously tracked then untracked, its prior
    /// counters are already gone (spec §4.C `track`).
    pub fn track(&self, class: ClassRef, callback: Option<Callback>) {
        let mut inner = self.shared.inner.lock();
        let state = inner
            .classes
            .entry(class)
            .or_insert_with(|| ClassState::new(self.shared.config.bind_call_tree));
        state.callback = callback;
    }

    /// Removes subscription and zeros/purges the class's counters and
    /// table entries (spec §4.C `untrack`).
    pub fn untrack(&self, class: ClassRef) {
        let mut inner = self.shared.inner.lock();
        inner.classes.remove(&class);
        inner.table.remove_class(class);
    }

    pub fn tracking(&self, class: ClassRef) -> bool {
        self.shared.inner.lock().classes.contains_key(&class)
    }

    pub fn count_for(&self, class: ClassRef) -> u64 {
        self.shared
            .inner
            .lock()
            .classes
            .get(&class)
            .map(|state| state.allocations.retained_count())
            .unwrap_or(0)
    }

    pub fn allocations_for(&self, class: ClassRef) -> Allocations {
        self.shared
            .inner
            .lock()
            .classes
            .get(&class)
            .map(|state| state.allocations)
            .unwrap_or_default()
    }

    /// Resets all counters, the table, and every bound call tree. Safe
    /// while running (spec §4.C `clear`).
    pub fn clear(&self) {
        let mut inner = self.shared.inner.lock();
        for state in inner.classes.values_mut() {
            state.allocations.clear();
            if let Some(tree) = &state.call_tree {
                tree.clear();
            }
        }
        inner.table.clear();
    }

    /// Iterate live entries for `class`, handing each `(identity, state)`
    /// pair to `f` (spec §6 `each_tracked(class) { |identity_or_object,
    /// state| ... }`). Entries are only ever present once their NEW has
    /// been drained and until their FREE is drained, so the table itself
    /// is the sole liveness oracle — no separate freed-but-undrained state
    /// exists in this core.
    pub fn each_tracked(&self, class: ClassRef, mut f: impl FnMut(ObjectIdentity, Option<&UserState>)) {
        let inner = self.shared.inner.lock();
        for (identity, entry) in inner.table.iter() {
            if entry.class == class {
                f(identity, entry.state.as_ref());
            }
        }
    }
}

#[cfg(test)]
#[path = "capture_tests.rs"]
mod tests;
