// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Broker diagnostics (spec §6 "Diagnostics"): a drop counter and a sink
//! for user-callback errors, both surfaced off the hot path.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

const DEFAULT_MAX_ERRORS: usize = 64;

/// Drop counter plus a bounded ring of recent user-callback error messages.
///
/// The counter is a lock-free atomic because `record_drop` is called from
/// `EventBroker::enqueue` on the hot path. The error ring is only ever
/// touched during drain (never on the hot path), so a `Mutex` is fine there.
#[derive(Debug)]
pub struct Diagnostics {
    dropped_events: AtomicU64,
    errors: Mutex<VecDeque<String>>,
    max_errors: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::with_error_capacity(DEFAULT_MAX_ERRORS)
    }

    pub fn with_error_capacity(max_errors: usize) -> Self {
        Self {
            dropped_events: AtomicU64::new(0),
            errors: Mutex::new(VecDeque::with_capacity(max_errors)),
            max_errors,
        }
    }

    /// Called from the hot path when `enqueue` drops an event for lack of
    /// room. Never allocates, never blocks.
    pub(crate) fn record_drop(&self) {
        let total = self.dropped_events.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::warn!(total_dropped = total, "deferred queue dropped an event");
    }

    pub fn dropped_events(&self) -> u64 {
        self.dropped_events.load(Ordering::Relaxed)
    }

    /// Called during drain when a user callback's panic was caught.
    pub(crate) fn record_callback_error(&self, message: String) {
        tracing::warn!(error = %message, "user callback error during drain");
        let mut errors = self.errors.lock();
        if errors.len() == self.max_errors {
            errors.pop_front();
        }
        errors.push_back(message);
    }

    /// Snapshot of the most recent callback error messages, oldest first.
    pub fn recent_errors(&self) -> Vec<String> {
        self.errors.lock().iter().cloned().collect()
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "diagnostics_tests.rs"]
mod tests;
