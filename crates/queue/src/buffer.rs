// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deferred Queue (spec §4.A): a growable, contiguous buffer of fixed-size
//! event slots.
//!
//! The C/Ruby original returns a writable slot pointer from `push` so the
//! hot-path hook can fill it in place without a second copy. This workspace
//! forbids `unsafe_code` at the lint level, and every `profiler_core::Event`
//! is a small `Copy` struct, so `push` instead takes the event by value —
//! same contract (no allocation failure reaches the caller as a panic, no
//! suspension), one fewer indirection. See DESIGN.md for this redesign
//! decision.

use profiler_core::Event;

use crate::error::QueueError;

const INITIAL_CAPACITY: usize = 16;

/// A growable buffer of [`Event`] slots with doubling growth.
///
/// `len` is the logical length; `clear` resets it to zero without
/// releasing the underlying allocation, so a buffer that has grown to
/// accommodate a burst doesn't repeatedly reallocate across drain cycles.
#[derive(Debug)]
pub struct SlotBuffer {
    slots: Vec<Event>,
    len: usize,
}

impl SlotBuffer {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![Event::NONE; capacity],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn at(&self, index: usize) -> Option<&Event> {
        if index < self.len {
            self.slots.get(index)
        } else {
            None
        }
    }

    pub fn at_mut(&mut self, index: usize) -> Option<&mut Event> {
        if index < self.len {
            self.slots.get_mut(index)
        } else {
            None
        }
    }

    /// Append `event`, growing the buffer (doubling) if it is at capacity.
    ///
    /// Returns the index the event was written to, or
    /// [`QueueError::OutOfMemory`] if growth failed. Never panics on
    /// allocation failure — the hot path depends on that.
    pub fn push(&mut self, event: Event) -> Result<usize, QueueError> {
        if self.len == self.slots.len() {
            self.grow()?;
        }
        let index = self.len;
        self.slots[index] = event;
        self.len += 1;
        Ok(index)
    }

    /// Reset length to zero, keeping the allocated capacity (spec §4.A).
    pub fn clear(&mut self) {
        self.len = 0;
    }

    fn grow(&mut self) -> Result<(), QueueError> {
        let new_capacity = if self.slots.is_empty() {
            INITIAL_CAPACITY
        } else {
            self.slots
                .len()
                .checked_mul(2)
                .ok_or(QueueError::OutOfMemory)?
        };
        let additional = new_capacity - self.slots.len();
        self.slots
            .try_reserve(additional)
            .map_err(|_| QueueError::OutOfMemory)?;
        self.slots.resize(new_capacity, Event::NONE);
        Ok(())
    }
}

impl Default for SlotBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
