//! `UiElement` over live DOM elements plus selector helpers.

use landkit_core::UiElement;
use log::{info, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, NodeList};

/// Handle to one DOM element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomElement {
    element: Element,
}

impl DomElement {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    fn html(&self) -> Option<&HtmlElement> {
        self.element.dyn_ref::<HtmlElement>()
    }
}

impl From<Element> for DomElement {
    fn from(element: Element) -> Self {
        Self::new(element)
    }
}

impl UiElement for DomElement {
    fn set_attribute(&self, name: &str, value: &str) {
        if let Err(err) = self.element.set_attribute(name, value) {
            report("set_attribute", name, &err);
        }
    }

    fn remove_attribute(&self, name: &str) {
        if let Err(err) = self.element.remove_attribute(name) {
            report("remove_attribute", name, &err);
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.element.get_attribute(name)
    }

    fn set_class(&self, class: &str, enabled: bool) {
        if let Err(err) = self.element.class_list().toggle_with_force(class, enabled) {
            report("set_class", class, &err);
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.element.class_list().contains(class)
    }

    fn set_style(&self, property: &str, value: &str) {
        let Some(html) = self.html() else {
            return;
        };
        let style = html.style();
        let result = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
        if let Err(err) = result {
            report("set_style", property, &err);
        }
    }

    fn set_text(&self, text: &str) {
        self.element.set_text_content(Some(text));
    }

    fn focus(&self) {
        if let Some(html) = self.html() {
            if let Err(err) = html.focus() {
                report("focus", "", &err);
            }
        }
    }
}

fn report(op: &str, name: &str, err: &JsValue) {
    warn!(
        "event=dom_mutation module=dom status=error op={} name={} error={:?}",
        op, name, err
    );
}

/// First match for `selector`; invalid selectors are logged and yield `None`.
pub fn query_one(document: &Document, selector: &str) -> Option<Element> {
    match document.query_selector(selector) {
        Ok(element) => element,
        Err(err) => {
            invalid_selector(selector, &err);
            None
        }
    }
}

/// Like `query_one`, scoped to `root`'s subtree.
pub fn query_one_in(root: &Element, selector: &str) -> Option<Element> {
    match root.query_selector(selector) {
        Ok(element) => element,
        Err(err) => {
            invalid_selector(selector, &err);
            None
        }
    }
}

pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    match document.query_selector_all(selector) {
        Ok(list) => elements_of(&list),
        Err(err) => {
            invalid_selector(selector, &err);
            Vec::new()
        }
    }
}

pub fn query_all_in(root: &Element, selector: &str) -> Vec<Element> {
    match root.query_selector_all(selector) {
        Ok(list) => elements_of(&list),
        Err(err) => {
            invalid_selector(selector, &err);
            Vec::new()
        }
    }
}

fn elements_of(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn invalid_selector(selector: &str, err: &JsValue) {
    warn!(
        "event=dom_query module=dom status=error selector={} error={:?}",
        selector, err
    );
}

/// Logs a feature that could not be mounted because markup is missing.
pub fn log_skipped(feature: &str, selector: &str) {
    info!(
        "event=feature_mount module={} status=skipped reason=missing_element selector={}",
        feature,
        selector
    );
}
