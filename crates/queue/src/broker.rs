// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event Broker (spec §4.B): the single global ingress. Enqueues from the
//! hot path; drains under a safe context the host runtime grants.
//!
//! Constructed once per process and threaded explicitly into every
//! `Capture` as an `Arc<EventBroker>` — spec §9 "Globals re-architecture"
//! asks for a process-lifetime object rather than an ambient global, so
//! unlike the original Ruby/C implementation there is no `static`/`OnceLock`
//! singleton here.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use profiler_core::{CaptureId, Event};
use tracing::{debug, warn};

use crate::buffer::SlotBuffer;
use crate::diagnostics::Diagnostics;
use crate::error::QueueError;

/// Registered by a `Capture` to receive events dispatched during drain.
///
/// `handle` runs during drain, never on the hot path, so it may allocate
/// and may itself enqueue further events (re-entrancy, spec §4.B).
pub trait DrainHandler: Send + Sync {
    fn handle(&self, event: Event);
}

/// Signals the host runtime that deferred work is pending (spec §4.B "a
/// single pre-registered deferred-work token"). The broker calls this once
/// per `enqueue`, successful or dropped, because there is always at least
/// one unprocessed event after it runs.
pub trait WorkSignal: Send + Sync {
    fn request_drain(&self);
}

impl<F: Fn() + Send + Sync> WorkSignal for F {
    fn request_drain(&self) {
        self()
    }
}

/// A no-op signal for use where the embedding binary drives `drain()`
/// itself on a fixed schedule rather than reacting to a wakeup.
pub struct NoSignal;

impl WorkSignal for NoSignal {
    fn request_drain(&self) {}
}

/// Double-buffered, single global ingress for allocation/free events.
pub struct EventBroker {
    buffers: [Mutex<SlotBuffer>; 2],
    /// Index (0 or 1) of the buffer `enqueue` currently writes to.
    available: AtomicUsize,
    draining: AtomicBool,
    handlers: Mutex<Vec<(CaptureId, Arc<dyn DrainHandler>)>>,
    next_capture_id: AtomicU64,
    diagnostics: Diagnostics,
    work_signal: Box<dyn WorkSignal>,
}

impl EventBroker {
    pub fn new(work_signal: impl WorkSignal + 'static) -> Arc<Self> {
        Arc::new(Self {
            buffers: [Mutex::new(SlotBuffer::new()), Mutex::new(SlotBuffer::new())],
            available: AtomicUsize::new(0),
            draining: AtomicBool::new(false),
            handlers: Mutex::new(Vec::new()),
            next_capture_id: AtomicU64::new(1),
            diagnostics: Diagnostics::new(),
            work_signal: Box::new(work_signal),
        })
    }

    pub fn new_silent() -> Arc<Self> {
        Self::new(NoSignal)
    }

    /// Register a capture's handler. Returns the `CaptureId` assigned by
    /// the broker (spec §4.C "Registers with the event source").
    pub fn register(&self, handler: Arc<dyn DrainHandler>) -> CaptureId {
        let id = CaptureId::new(self.next_capture_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.lock().push((id, handler));
        id
    }

    /// Unregister a capture's handler (spec §4.C "unregisters").
    pub fn unregister(&self, id: CaptureId) {
        self.handlers.lock().retain(|(registered, _)| *registered != id);
    }

    /// Hot-path enqueue. Never suspends, never enters user code, never
    /// allocates beyond the buffer's own (overflow-safe) growth.
    pub fn enqueue(&self, event: Event) {
        let idx = self.available.load(Ordering::Acquire);
        let result = self.buffers[idx].lock().push(event);
        match result {
            Ok(_) => debug!(?idx, kind = ?event.kind, "enqueued event"),
            Err(ref err) => {
                warn!(?idx, kind = ?event.kind, %err, "dropping event, buffer out of memory");
                self.diagnostics.record_drop();
            }
        }
        self.work_signal.request_drain();
    }

    /// Like `enqueue`, but surfaces the `QueueError` instead of silently
    /// counting the drop — used by callers that want to know immediately
    /// rather than polling `diagnostics()`.
    pub fn try_enqueue(&self, event: Event) -> Result<(), QueueError> {
        let idx = self.available.load(Ordering::Acquire);
        let result = self.buffers[idx].lock().push(event);
        self.work_signal.request_drain();
        if result.is_err() {
            self.diagnostics.record_drop();
        }
        result.map(|_| ())
    }

    /// Drain the processing buffer, dispatching each event to every
    /// registered handler in insertion order (spec §4.B).
    ///
    /// A re-entrant call (drain invoked from inside a user callback running
    /// during another drain) is a no-op — the outer drain's swap already
    /// captured a fixed snapshot, and new events keep landing in
    /// `available` for the *next* drain to pick up.
    pub fn drain(&self) {
        if self
            .draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("drain already in progress, coalescing");
            return;
        }

        let processing_idx = self.available.fetch_xor(1, Ordering::AcqRel);
        let handlers_snapshot: Vec<Arc<dyn DrainHandler>> = self
            .handlers
            .lock()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        {
            let mut processing = self.buffers[processing_idx].lock();
            debug!(?processing_idx, len = processing.len(), handlers = handlers_snapshot.len(), "draining");
            let mut i = 0;
            while i < processing.len() {
                let Some(event) = processing.at(i).copied() else {
                    break;
                };
                if !event.is_tombstone() {
                    for handler in &handlers_snapshot {
                        let outcome =
                            panic::catch_unwind(AssertUnwindSafe(|| handler.handle(event)));
                        if let Err(payload) = outcome {
                            self.diagnostics.record_callback_error(panic_message(&payload));
                        }
                    }
                }
                if let Some(slot) = processing.at_mut(i) {
                    slot.tombstone();
                }
                i += 1;
            }
            processing.clear();
        }

        self.draining.store(false, Ordering::Release);
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    #[cfg(test)]
    pub(crate) fn available_index(&self) -> usize {
        self.available.load(Ordering::Acquire)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "user callback panicked with a non-string payload".to_string()
    }
}

#[cfg(test)]
#[path = "broker_tests.rs"]
mod tests;
