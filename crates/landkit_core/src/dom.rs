//! Host element contract consumed by every controller.
//!
//! # Responsibility
//! - Describe the small set of element mutations controllers need.
//! - Provide an in-memory element for native hosts and tests.
//!
//! # Invariants
//! - Mutations are infallible from the controller's point of view. Hosts
//!   log and swallow their own failures.
//! - Handles are cheap to clone and share one underlying element.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

/// Handle to one element of the host document.
pub trait UiElement {
    fn set_attribute(&self, name: &str, value: &str);
    fn remove_attribute(&self, name: &str);
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_class(&self, class: &str, enabled: bool);
    fn has_class(&self, class: &str) -> bool;
    /// Sets one inline style property; an empty value clears it.
    fn set_style(&self, property: &str, value: &str);
    fn set_text(&self, text: &str);
    fn focus(&self);

    /// Toggles a boolean attribute such as `hidden` or `disabled`.
    fn set_flag(&self, name: &str, enabled: bool) {
        if enabled {
            self.set_attribute(name, "");
        } else {
            self.remove_attribute(name);
        }
    }
}

/// Renders a bool as the `"true"|"false"` strings ARIA attributes expect.
pub fn aria_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[derive(Debug, Default)]
struct ElementState {
    attributes: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    styles: BTreeMap<String, String>,
    text: String,
    focus_count: usize,
}

/// In-memory element used by native hosts and tests.
///
/// Clones share state, so a test can keep one handle and hand another to a
/// controller.
#[derive(Debug, Clone, Default)]
pub struct MemoryElement {
    state: Rc<RefCell<ElementState>>,
}

impl MemoryElement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current inline value of one style property.
    pub fn style(&self, property: &str) -> Option<String> {
        self.state.borrow().styles.get(property).cloned()
    }

    pub fn text(&self) -> String {
        self.state.borrow().text.clone()
    }

    /// Number of times `focus()` was called.
    pub fn focus_count(&self) -> usize {
        self.state.borrow().focus_count
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.state.borrow().attributes.contains_key(name)
    }
}

impl UiElement for MemoryElement {
    fn set_attribute(&self, name: &str, value: &str) {
        self.state
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, name: &str) {
        self.state.borrow_mut().attributes.remove(name);
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.state.borrow().attributes.get(name).cloned()
    }

    fn set_class(&self, class: &str, enabled: bool) {
        let mut state = self.state.borrow_mut();
        if enabled {
            state.classes.insert(class.to_string());
        } else {
            state.classes.remove(class);
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.state.borrow().classes.contains(class)
    }

    fn set_style(&self, property: &str, value: &str) {
        let mut state = self.state.borrow_mut();
        if value.is_empty() {
            state.styles.remove(property);
        } else {
            state
                .styles
                .insert(property.to_string(), value.to_string());
        }
    }

    fn set_text(&self, text: &str) {
        self.state.borrow_mut().text = text.to_string();
    }

    fn focus(&self) {
        self.state.borrow_mut().focus_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{aria_bool, MemoryElement, UiElement};

    #[test]
    fn clones_share_state() {
        let element = MemoryElement::new();
        let handle = element.clone();
        handle.set_class("active", true);
        handle.set_attribute("aria-expanded", "true");

        assert!(element.has_class("active"));
        assert_eq!(element.attribute("aria-expanded").as_deref(), Some("true"));
    }

    #[test]
    fn set_flag_adds_and_removes_boolean_attribute() {
        let element = MemoryElement::new();
        element.set_flag("hidden", true);
        assert!(element.has_attribute("hidden"));
        element.set_flag("hidden", false);
        assert!(!element.has_attribute("hidden"));
    }

    #[test]
    fn empty_style_value_clears_property() {
        let element = MemoryElement::new();
        element.set_style("overflow", "hidden");
        element.set_style("overflow", "");
        assert_eq!(element.style("overflow"), None);
    }

    #[test]
    fn aria_bool_renders_strings() {
        assert_eq!(aria_bool(true), "true");
        assert_eq!(aria_bool(false), "false");
    }
}
