//! Theme toggle and system color-scheme tracking.

use crate::dom::{log_skipped, query_one, DomElement};
use crate::storage::LocalStorage;
use gloo::events::EventListener;
use landkit_core::config::ThemeConfig;
use landkit_core::{PreferenceStore, ThemeController};
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Document, MediaQueryList, MediaQueryListEvent, Window};

const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

pub struct ThemeMount {
    _controller: Rc<RefCell<ThemeController<LocalStorage, DomElement>>>,
    _listeners: Vec<EventListener>,
}

pub fn mount(
    window: &Window,
    document: &Document,
    store: Rc<PreferenceStore<LocalStorage>>,
    config: &ThemeConfig,
) -> Option<ThemeMount> {
    let Some(root) = document.document_element() else {
        log_skipped("theme", ":root");
        return None;
    };
    let toggle = query_one(document, &config.toggle).map(DomElement::new);
    if toggle.is_none() {
        log_skipped("theme", &config.toggle);
    }

    let scheme = dark_scheme_query(window);
    let prefers_dark = scheme.as_ref().is_some_and(MediaQueryList::matches);
    let controller = Rc::new(RefCell::new(ThemeController::init(
        store,
        DomElement::new(root),
        toggle.clone(),
        prefers_dark,
    )));

    let mut listeners = Vec::new();
    if let Some(toggle) = toggle {
        let controller = Rc::clone(&controller);
        listeners.push(EventListener::new(toggle.element(), "click", move |_event| {
            controller.borrow_mut().toggle();
        }));
    }
    if let Some(scheme) = scheme {
        let controller = Rc::clone(&controller);
        listeners.push(EventListener::new(&scheme, "change", move |event| {
            let prefers_dark = event
                .dyn_ref::<MediaQueryListEvent>()
                .is_some_and(MediaQueryListEvent::matches);
            let applied = controller.borrow_mut().on_system_change(prefers_dark);
            debug!(
                "event=theme_system_change module=theme status=ok prefers_dark={} applied={}",
                prefers_dark, applied
            );
        }));
    }

    Some(ThemeMount {
        _controller: controller,
        _listeners: listeners,
    })
}

fn dark_scheme_query(window: &Window) -> Option<MediaQueryList> {
    window.match_media(DARK_SCHEME_QUERY).ok().flatten()
}
