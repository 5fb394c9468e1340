// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors for the deferred queue and event broker.

use thiserror::Error;

/// Failure modes for [`crate::buffer::SlotBuffer`] and [`crate::broker::EventBroker`].
///
/// Per spec §7, the only failure the hot path (`enqueue`) can surface is
/// out-of-memory, and even that is not propagated to the runtime's hook —
/// the broker swallows it and increments a counter instead. This type
/// exists for the (off hot-path) `try_push` call itself and for
/// `EventBroker::new`'s fatal init failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    /// The buffer could not grow to accommodate another event.
    #[error("deferred queue allocation failed while growing to hold another event")]
    OutOfMemory,
}
