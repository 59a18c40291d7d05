//! Animation-frame throttling for scroll and resize handlers.

use std::cell::Cell;

/// Allows at most one pending frame callback at a time.
///
/// Scroll and resize events arrive far more often than frames render; the
/// host requests a frame only when `try_schedule` returns `true` and calls
/// `complete` from inside that frame.
#[derive(Debug, Default)]
pub struct FrameGate {
    pending: Cell<bool>,
}

impl FrameGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_schedule(&self) -> bool {
        !self.pending.replace(true)
    }

    pub fn complete(&self) {
        self.pending.set(false);
    }
}
