//! Mobile menu wiring: trigger, outside clicks, `Escape`, resize and links.

use crate::dom::{log_skipped, query_all, query_one, DomElement};
use crate::frame::FrameThrottle;
use crate::viewport::inner_width;
use gloo::events::EventListener;
use landkit_core::config::MenuConfig;
use landkit_core::{Key, MenuController};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, KeyboardEvent, Node, Window};

pub type SharedMenu = Rc<RefCell<MenuController<DomElement>>>;

pub struct MenuMount {
    controller: SharedMenu,
    _listeners: Vec<EventListener>,
}

impl MenuMount {
    pub fn controller(&self) -> SharedMenu {
        Rc::clone(&self.controller)
    }
}

pub fn mount(window: &Window, document: &Document, config: &MenuConfig) -> Option<MenuMount> {
    let Some(trigger) = query_one(document, &config.trigger) else {
        log_skipped("menu", &config.trigger);
        return None;
    };
    let Some(panel) = query_one(document, &config.panel) else {
        log_skipped("menu", &config.panel);
        return None;
    };
    let body = document.body().map(|body| DomElement::new(body.into()));
    let controller: SharedMenu = Rc::new(RefCell::new(MenuController::new(
        DomElement::new(trigger.clone()),
        DomElement::new(panel.clone()),
        body,
        config.options(),
    )));
    let mut listeners = Vec::new();

    {
        let controller = Rc::clone(&controller);
        listeners.push(EventListener::new(&trigger, "click", move |_event| {
            controller.borrow_mut().toggle();
        }));
    }

    {
        let controller = Rc::clone(&controller);
        let mut inside: Vec<Element> = vec![trigger, panel];
        inside.extend(query_one(document, &config.root));
        listeners.push(EventListener::new(document, "click", move |event| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Node>().ok()) else {
                return;
            };
            let inside_root = inside.iter().any(|el| el.contains(Some(&target)));
            controller.borrow_mut().handle_outside_click(inside_root);
        }));
    }

    {
        let controller = Rc::clone(&controller);
        listeners.push(EventListener::new(document, "keydown", move |event| {
            if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                controller
                    .borrow_mut()
                    .handle_key(Key::from_dom_key(&event.key()));
            }
        }));
    }

    {
        let controller = Rc::clone(&controller);
        let throttle = FrameThrottle::new();
        let resize_window = window.clone();
        controller
            .borrow_mut()
            .handle_resize(inner_width(window));
        listeners.push(EventListener::new(window, "resize", move |_event| {
            let controller = Rc::clone(&controller);
            let window = resize_window.clone();
            throttle.schedule(move || {
                controller.borrow_mut().handle_resize(inner_width(&window));
            });
        }));
    }

    for link in query_all(document, &config.links) {
        let controller = Rc::clone(&controller);
        listeners.push(EventListener::new(&link, "click", move |_event| {
            controller.borrow_mut().handle_nav_link();
        }));
    }

    Some(MenuMount {
        controller,
        _listeners: listeners,
    })
}
