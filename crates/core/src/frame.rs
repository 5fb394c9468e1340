// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stack frames and their canonical, collapsible key.

use std::fmt;
use std::sync::Arc;

/// A single frame of an allocation-site backtrace.
///
/// `path`/`label` are `Arc<str>` rather than `String`: the whole point of
/// the call-tree's prefix compression is that the same source point is
/// named by thousands of frames across different stacks, so sharing the
/// backing allocation matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub path: Arc<str>,
    pub line: u32,
    pub label: Arc<str>,
}

impl Frame {
    pub fn new(path: impl Into<Arc<str>>, line: u32, label: impl Into<Arc<str>>) -> Self {
        Self {
            path: path.into(),
            line,
            label: label.into(),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.label)
    }
}

/// Canonical printable form of a [`Frame`], used to collapse distinct frame
/// instances that denote the same source point (spec §3 `LocationKey`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationKey(Arc<str>);

impl LocationKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Frame> for LocationKey {
    fn from(frame: &Frame) -> Self {
        Self(frame.to_string().into())
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
