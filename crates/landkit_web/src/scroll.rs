//! Anchor navigation, header scrolled state and hero parallax.

use crate::dom::{log_skipped, query_all, query_one, DomElement};
use crate::frame::{cancelable, FrameThrottle};
use crate::menu::SharedMenu;
use crate::viewport::WindowViewport;
use gloo::events::EventListener;
use landkit_core::config::{HeaderConfig, ParallaxConfig, ScrollConfig};
use landkit_core::scroll::parallax_transform;
use landkit_core::{HeaderScrollState, ScrollNavigator, ScrollViewport, UiElement};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::{Document, Window};

pub struct AnchorMount {
    _listeners: Vec<EventListener>,
}

pub fn mount_anchors(
    window: &Window,
    document: &Document,
    config: &ScrollConfig,
    menu: Option<SharedMenu>,
) -> Option<AnchorMount> {
    let links = query_all(document, &config.links);
    if links.is_empty() {
        log_skipped("scroll", &config.links);
        return None;
    }

    let viewport = Rc::new(WindowViewport::new(
        window.clone(),
        document.clone(),
        query_one(document, &config.header),
    ));
    let navigator = Rc::new(ScrollNavigator::new(config.extra_offset_px));
    let listeners = links
        .into_iter()
        .map(|link| {
            let viewport = Rc::clone(&viewport);
            let navigator = Rc::clone(&navigator);
            let menu = menu.clone();
            let href_source = link.clone();
            EventListener::new_with_options(&link, "click", cancelable(), move |event| {
                let href = href_source.get_attribute("href").unwrap_or_default();
                let outcome = match &menu {
                    Some(menu) => {
                        navigator.navigate(&href, Some(&mut *menu.borrow_mut()), &*viewport)
                    }
                    None => navigator.navigate::<DomElement>(&href, None, &*viewport),
                };
                if outcome.should_prevent_default() {
                    event.prevent_default();
                }
            })
        })
        .collect();

    Some(AnchorMount {
        _listeners: listeners,
    })
}

struct ScrollEffects {
    viewport: WindowViewport,
    header: Option<(DomElement, RefCell<HeaderScrollState>, String)>,
    layers: Vec<DomElement>,
    speed: f64,
}

impl ScrollEffects {
    fn update(&self) {
        let scroll_y = self.viewport.scroll_y();
        if let Some((header, state, class)) = &self.header {
            state.borrow_mut().apply(scroll_y, header, class);
        }
        if !self.layers.is_empty() {
            let transform = parallax_transform(scroll_y, self.speed);
            for layer in &self.layers {
                layer.set_style("transform", &transform);
            }
        }
    }
}

pub struct ScrollEffectsMount {
    _listener: EventListener,
}

pub fn mount_effects(
    window: &Window,
    document: &Document,
    header: &HeaderConfig,
    parallax: &ParallaxConfig,
) -> Option<ScrollEffectsMount> {
    let header_el = query_one(document, &header.selector).map(DomElement::new);
    let layers: Vec<DomElement> = query_all(document, &parallax.selector)
        .into_iter()
        .map(DomElement::new)
        .collect();
    if header_el.is_none() && layers.is_empty() {
        log_skipped("scroll_effects", &header.selector);
        return None;
    }

    let effects = Rc::new(ScrollEffects {
        viewport: WindowViewport::new(window.clone(), document.clone(), None),
        header: header_el.map(|el| {
            (
                el,
                RefCell::new(HeaderScrollState::new(header.threshold_px)),
                header.scrolled_class.clone(),
            )
        }),
        layers,
        speed: parallax.speed,
    });
    effects.update();

    let throttle = FrameThrottle::new();
    let listener = EventListener::new(window, "scroll", move |_event| {
        let effects = Rc::clone(&effects);
        throttle.schedule(move || effects.update());
    });
    Some(ScrollEffectsMount {
        _listener: listener,
    })
}
