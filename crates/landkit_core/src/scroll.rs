//! In-page anchor navigation and scroll-driven header effects.
//!
//! # Responsibility
//! - Turn same-page anchor activations into header-aware animated scrolls.
//! - Track the header "scrolled" state and hero parallax offset.
//!
//! # Invariants
//! - The header height is re-read on every navigation, never cached.
//! - An open menu is closed before any layout is measured.
//! - A missing fragment target is a silent no-op.

use crate::dom::UiElement;
use crate::menu::MenuController;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Host viewport contract used by the navigator.
pub trait ScrollViewport {
    /// Current rendered height of the fixed header, in CSS pixels.
    fn header_height(&self) -> f64;
    /// Document-relative top of the element with id `fragment`.
    fn element_top(&self, fragment: &str) -> Option<f64>;
    fn scroll_y(&self) -> f64;
    fn scroll_to(&self, top: f64, behavior: ScrollBehavior);
}

/// Result of one anchor activation.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    /// Not a same-page fragment; the host keeps default navigation.
    NotInPage,
    /// Bare `#` link.
    Ignored,
    /// Fragment does not resolve to an element.
    MissingTarget { fragment: String },
    Scrolled { fragment: String, top: f64 },
}

impl NavigationOutcome {
    /// Whether the host should cancel the default link navigation.
    pub fn should_prevent_default(&self) -> bool {
        !matches!(self, Self::NotInPage)
    }
}

/// Extracts the fragment id of a same-page href (`#pricing` -> `pricing`).
///
/// Returns `Some("")` for a bare `#` and `None` for anything else.
pub fn fragment_of(href: &str) -> Option<&str> {
    href.trim().strip_prefix('#')
}

#[derive(Debug, Clone, Default)]
pub struct ScrollNavigator {
    /// Extra gap kept between header bottom and target top.
    extra_offset: f64,
}

impl ScrollNavigator {
    pub fn new(extra_offset: f64) -> Self {
        Self { extra_offset }
    }

    /// Handles one anchor activation.
    pub fn navigate<E: UiElement>(
        &self,
        href: &str,
        menu: Option<&mut MenuController<E>>,
        viewport: &impl ScrollViewport,
    ) -> NavigationOutcome {
        let Some(fragment) = fragment_of(href) else {
            return NavigationOutcome::NotInPage;
        };
        if fragment.is_empty() {
            return NavigationOutcome::Ignored;
        }

        if let Some(menu) = menu {
            menu.handle_nav_link();
        }

        let Some(element_top) = viewport.element_top(fragment) else {
            debug!(
                "event=scroll_navigate module=scroll status=skipped reason=missing_target fragment={}",
                fragment
            );
            return NavigationOutcome::MissingTarget {
                fragment: fragment.to_string(),
            };
        };

        let top = scroll_target(element_top, viewport.header_height(), self.extra_offset);
        viewport.scroll_to(top, ScrollBehavior::Smooth);
        debug!(
            "event=scroll_navigate module=scroll status=ok fragment={} top={}",
            fragment, top
        );
        NavigationOutcome::Scrolled {
            fragment: fragment.to_string(),
            top,
        }
    }
}

/// `element_top - header_height - extra_offset`, clamped at the page top.
pub fn scroll_target(element_top: f64, header_height: f64, extra_offset: f64) -> f64 {
    (element_top - header_height - extra_offset).max(0.0)
}

/// Default scroll distance after which the header counts as scrolled.
pub const DEFAULT_HEADER_THRESHOLD_PX: f64 = 10.0;

/// Header "scrolled" class tracker.
#[derive(Debug, Clone)]
pub struct HeaderScrollState {
    threshold_px: f64,
    scrolled: bool,
}

impl HeaderScrollState {
    pub fn new(threshold_px: f64) -> Self {
        Self {
            threshold_px,
            scrolled: false,
        }
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    /// Returns the new state only when it changed.
    pub fn update(&mut self, scroll_y: f64) -> Option<bool> {
        let scrolled = scroll_y > self.threshold_px;
        if scrolled == self.scrolled {
            return None;
        }
        self.scrolled = scrolled;
        Some(scrolled)
    }

    /// Updates the state and mirrors a change onto the header element.
    pub fn apply(&mut self, scroll_y: f64, header: &impl UiElement, class: &str) {
        if let Some(scrolled) = self.update(scroll_y) {
            header.set_class(class, scrolled);
        }
    }
}

impl Default for HeaderScrollState {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_THRESHOLD_PX)
    }
}

/// Vertical parallax translation for a background layer.
pub fn parallax_offset(scroll_y: f64, speed: f64) -> f64 {
    scroll_y.max(0.0) * speed
}

/// CSS transform for a parallax offset.
pub fn parallax_transform(scroll_y: f64, speed: f64) -> String {
    format!("translateY({}px)", parallax_offset(scroll_y, speed))
}

#[cfg(test)]
mod tests {
    use super::{
        fragment_of, parallax_offset, parallax_transform, scroll_target, HeaderScrollState,
        NavigationOutcome,
    };

    #[test]
    fn fragment_of_distinguishes_link_kinds() {
        assert_eq!(fragment_of("#pricing"), Some("pricing"));
        assert_eq!(fragment_of("#"), Some(""));
        assert_eq!(fragment_of("/about"), None);
        assert_eq!(fragment_of("https://example.com/#top"), None);
    }

    #[test]
    fn scroll_target_clamps_at_page_top() {
        assert_eq!(scroll_target(900.0, 80.0, 0.0), 820.0);
        assert_eq!(scroll_target(40.0, 80.0, 0.0), 0.0);
        assert_eq!(scroll_target(900.0, 80.0, 20.0), 800.0);
    }

    #[test]
    fn header_state_reports_only_changes() {
        let mut header = HeaderScrollState::default();
        assert_eq!(header.update(5.0), None);
        assert_eq!(header.update(11.0), Some(true));
        assert_eq!(header.update(200.0), None);
        assert_eq!(header.update(0.0), Some(false));
    }

    #[test]
    fn parallax_moves_at_half_speed() {
        assert_eq!(parallax_offset(300.0, 0.5), 150.0);
        assert_eq!(parallax_offset(-20.0, 0.5), 0.0);
        assert_eq!(parallax_transform(100.0, 0.5), "translateY(50px)");
    }

    #[test]
    fn only_external_links_keep_default_navigation() {
        assert!(!NavigationOutcome::NotInPage.should_prevent_default());
        assert!(NavigationOutcome::Ignored.should_prevent_default());
    }
}
