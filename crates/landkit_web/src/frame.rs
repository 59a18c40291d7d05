//! Animation-frame scheduling for scroll and resize handlers.

use gloo::events::{EventListenerOptions, EventListenerPhase};
use gloo::render::{request_animation_frame, AnimationFrame};
use landkit_core::FrameGate;
use std::cell::RefCell;
use std::rc::Rc;

/// Runs at most one piece of work per animation frame.
#[derive(Default)]
pub struct FrameThrottle {
    gate: FrameGate,
    frame: RefCell<Option<AnimationFrame>>,
}

impl FrameThrottle {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Queues `work` for the next frame unless a frame is already pending.
    pub fn schedule(self: &Rc<Self>, work: impl FnOnce() + 'static) {
        if !self.gate.try_schedule() {
            return;
        }
        let throttle = Rc::clone(self);
        let handle = request_animation_frame(move |_| {
            throttle.frame.borrow_mut().take();
            throttle.gate.complete();
            work();
        });
        *self.frame.borrow_mut() = Some(handle);
    }
}

/// Listener options for handlers that may cancel the default action.
pub fn cancelable() -> EventListenerOptions {
    EventListenerOptions {
        phase: EventListenerPhase::Bubble,
        passive: false,
    }
}
