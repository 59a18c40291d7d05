//! `ScrollViewport` over the browser window.

use landkit_core::{ScrollBehavior, ScrollViewport};
use web_sys::{Document, Element, ScrollToOptions, Window};

pub struct WindowViewport {
    window: Window,
    document: Document,
    header: Option<Element>,
}

impl WindowViewport {
    pub fn new(window: Window, document: Document, header: Option<Element>) -> Self {
        Self {
            window,
            document,
            header,
        }
    }

    pub fn inner_width(&self) -> f64 {
        inner_width(&self.window)
    }
}

impl ScrollViewport for WindowViewport {
    fn header_height(&self) -> f64 {
        self.header
            .as_ref()
            .map_or(0.0, |header| header.get_bounding_client_rect().height())
    }

    fn element_top(&self, fragment: &str) -> Option<f64> {
        let target = self.document.get_element_by_id(fragment)?;
        Some(target.get_bounding_client_rect().top() + self.scroll_y())
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(match behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }
}

pub fn inner_width(window: &Window) -> f64 {
    window
        .inner_width()
        .ok()
        .and_then(|width| width.as_f64())
        .unwrap_or(0.0)
}
