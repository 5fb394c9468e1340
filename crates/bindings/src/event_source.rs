// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscribing to raw allocation hook events is host-runtime business —
//! the capture controller only ever calls through this seam (spec §4.C
//! `start`/`stop`).

use crate::subscription::{Subscription, SubscriptionHandle};

pub trait AllocationEventSource: Send + Sync {
    /// Begin receiving NEW/FREE notifications matching `subscription`.
    fn subscribe(&self, subscription: Subscription) -> SubscriptionHandle;

    /// Stop receiving notifications registered under `handle`.
    fn unsubscribe(&self, handle: SubscriptionHandle);
}
