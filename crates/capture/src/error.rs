// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors surfaced upward by a `Capture` — programmer misuse, never a
/// routine per-event failure (those are counted in `Diagnostics` instead).
#[derive(Debug, Error)]
pub enum CaptureError {
    /// A user callback called back into a full drain of its own capture
    /// while already running inside a callback. Spec treats this as a
    /// programmer error that fails loudly rather than deadlocking or
    /// silently recursing.
    #[error("recursive process_all requested from within a capture callback")]
    RecursiveProcessAll,
}
