//! Cookie-consent banner wiring.

use crate::dom::{log_skipped, query_one, query_one_in, DomElement};
use crate::storage::LocalStorage;
use gloo::events::EventListener;
use landkit_core::config::ConsentConfig;
use landkit_core::{ConsentBanner, ConsentChoice, PreferenceStore};
use std::rc::Rc;
use web_sys::Document;

pub struct ConsentMount {
    _banner: Rc<ConsentBanner<LocalStorage, DomElement>>,
    _listeners: Vec<EventListener>,
}

pub fn mount(
    document: &Document,
    store: Rc<PreferenceStore<LocalStorage>>,
    config: &ConsentConfig,
) -> Option<ConsentMount> {
    let Some(banner_el) = query_one(document, &config.banner) else {
        log_skipped("consent", &config.banner);
        return None;
    };
    let banner = Rc::new(ConsentBanner::init(store, DomElement::new(banner_el.clone())));

    let mut listeners = Vec::new();
    for (selector, choice) in [
        (&config.accept, ConsentChoice::Accepted),
        (&config.decline, ConsentChoice::Declined),
    ] {
        let Some(button) =
            query_one_in(&banner_el, selector).or_else(|| query_one(document, selector))
        else {
            log_skipped("consent", selector);
            continue;
        };
        let banner = Rc::clone(&banner);
        listeners.push(EventListener::new(&button, "click", move |_event| {
            banner.choose(choice);
        }));
    }

    Some(ConsentMount {
        _banner: banner,
        _listeners: listeners,
    })
}
