//! Mobile navigation menu controller.
//!
//! # Responsibility
//! - Own the open/closed state of the mobile navigation panel.
//! - Keep ARIA state on the trigger and panel in sync with that state.
//!
//! # Invariants
//! - `open()` and `close()` are idempotent.
//! - The menu closes on outside click, `Escape`, in-menu link activation and
//!   when the viewport grows across the breakpoint.

use crate::dom::{aria_bool, UiElement};
use crate::input::Key;
use log::debug;

/// Default desktop breakpoint in CSS pixels.
pub const DEFAULT_BREAKPOINT_PX: f64 = 768.0;
const BODY_LOCK_CLASS: &str = "menu-open";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Closed,
    Open,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuOptions {
    pub breakpoint_px: f64,
    pub lock_scroll: bool,
    /// Class toggled on trigger and panel while open.
    pub open_class: String,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            breakpoint_px: DEFAULT_BREAKPOINT_PX,
            lock_scroll: true,
            open_class: "active".to_string(),
        }
    }
}

pub struct MenuController<E: UiElement> {
    trigger: E,
    panel: E,
    body: Option<E>,
    options: MenuOptions,
    state: MenuState,
    last_width: Option<f64>,
}

impl<E: UiElement> MenuController<E> {
    /// Binds the controller and renders the closed state.
    pub fn new(trigger: E, panel: E, body: Option<E>, options: MenuOptions) -> Self {
        let controller = Self {
            trigger,
            panel,
            body,
            options,
            state: MenuState::Closed,
            last_width: None,
        };
        controller.render();
        controller
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == MenuState::Open
    }

    pub fn toggle(&mut self) -> MenuState {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
        self.state
    }

    /// Returns whether the state changed.
    pub fn open(&mut self) -> bool {
        self.transition(MenuState::Open)
    }

    /// Returns whether the state changed.
    pub fn close(&mut self) -> bool {
        self.transition(MenuState::Closed)
    }

    /// Closes on clicks outside the menu root.
    pub fn handle_outside_click(&mut self, inside_root: bool) -> bool {
        if inside_root {
            return false;
        }
        self.close()
    }

    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Escape => self.close(),
            _ => false,
        }
    }

    /// Closes when the width crosses the breakpoint upward.
    ///
    /// The first observed width counts as a crossing when it is already at or
    /// above the breakpoint.
    pub fn handle_resize(&mut self, width: f64) -> bool {
        let breakpoint = self.options.breakpoint_px;
        let was_below = self.last_width.map_or(true, |last| last < breakpoint);
        self.last_width = Some(width);
        if was_below && width >= breakpoint {
            return self.close();
        }
        false
    }

    pub fn handle_nav_link(&mut self) -> bool {
        self.close()
    }

    fn transition(&mut self, next: MenuState) -> bool {
        if self.state == next {
            return false;
        }
        self.state = next;
        self.render();
        debug!(
            "event=menu_transition module=menu status=ok state={}",
            if self.is_open() { "open" } else { "closed" }
        );
        true
    }

    fn render(&self) {
        let open = self.is_open();
        self.trigger.set_attribute("aria-expanded", aria_bool(open));
        self.trigger.set_class(&self.options.open_class, open);
        self.panel.set_attribute("aria-hidden", aria_bool(!open));
        self.panel.set_flag("hidden", !open);
        self.panel.set_class(&self.options.open_class, open);

        if self.options.lock_scroll {
            if let Some(body) = &self.body {
                body.set_class(BODY_LOCK_CLASS, open);
                body.set_style("overflow", if open { "hidden" } else { "" });
            }
        }
    }
}
