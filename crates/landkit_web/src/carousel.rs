//! Carousel wiring: buttons, dots, swipe, arrow keys and autoplay.

use crate::dom::{log_skipped, query_all_in, query_one, query_one_in, DomElement};
use crate::frame::FrameThrottle;
use crate::viewport::inner_width;
use gloo::events::EventListener;
use gloo::timers::callback::Interval;
use landkit_core::carousel::move_for_key;
use landkit_core::config::CarouselConfig;
use landkit_core::{Autoplay, Carousel, CarouselMove, CarouselView, Key, SwipeTracker};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, KeyboardEvent, TouchEvent, Window};

struct CarouselState {
    carousel: RefCell<Carousel>,
    config: CarouselConfig,
    view: CarouselView<DomElement>,
    swipe: RefCell<SwipeTracker>,
    autoplay: RefCell<Option<Autoplay>>,
    timer: RefCell<Option<Interval>>,
}

impl CarouselState {
    fn apply(self: &Rc<Self>, movement: CarouselMove) {
        let moved = self.carousel.borrow_mut().apply(movement);
        if moved {
            self.view.render(&self.carousel.borrow());
        }
        // A manual move restarts the autoplay interval.
        self.restart_timer();
    }

    fn tick(&self) {
        let moved = match self.autoplay.borrow().as_ref() {
            Some(autoplay) => autoplay.tick(&mut self.carousel.borrow_mut()),
            None => false,
        };
        if moved {
            self.view.render(&self.carousel.borrow());
        }
    }

    /// Re-resolves items per view for the current window width.
    fn repage(&self, width: f64) {
        let per_view = self.config.per_view_for_width(width);
        let items = self.view.slides.len();
        match self.carousel.borrow_mut().set_per_view(items, per_view) {
            Ok(true) => {}
            Ok(false) => return,
            Err(err) => {
                warn!(
                    "event=carousel_repage module=carousel status=error root={} error={}",
                    self.config.root, err
                );
                return;
            }
        }
        debug!(
            "event=carousel_repage module=carousel status=ok root={} width={} per_view={}",
            self.config.root, width, per_view
        );
        self.view.render(&self.carousel.borrow());
    }

    fn set_paused(&self, paused: bool) {
        if let Some(autoplay) = self.autoplay.borrow_mut().as_mut() {
            if paused {
                autoplay.pause();
            } else {
                autoplay.resume();
            }
        }
    }

    fn restart_timer(self: &Rc<Self>) {
        let Some(interval_ms) = self.autoplay.borrow().as_ref().map(Autoplay::interval_ms) else {
            return;
        };
        let state: Weak<Self> = Rc::downgrade(self);
        let interval = Interval::new(interval_ms, move || {
            if let Some(state) = state.upgrade() {
                state.tick();
            }
        });
        *self.timer.borrow_mut() = Some(interval);
    }
}

pub struct CarouselMount {
    _state: Rc<CarouselState>,
    _listeners: Vec<EventListener>,
}

pub fn mount(
    window: &Window,
    document: &Document,
    index: usize,
    config: &CarouselConfig,
) -> Option<CarouselMount> {
    let Some(root) = query_one(document, &config.root) else {
        log_skipped("carousel", &config.root);
        return None;
    };
    let slides: Vec<DomElement> = query_all_in(&root, &config.slide)
        .into_iter()
        .map(DomElement::new)
        .collect();
    let per_view = config.per_view_for_width(inner_width(window));
    let carousel = match Carousel::paged(slides.len(), per_view, config.policy) {
        Ok(carousel) => carousel,
        Err(err) => {
            warn!(
                "event=feature_mount module=carousel status=skipped index={} reason={}",
                index, err
            );
            return None;
        }
    };

    let track = config
        .track
        .as_deref()
        .and_then(|selector| query_one_in(&root, selector))
        .unwrap_or_else(|| root.clone());
    let optional = |selector: &Option<String>| {
        selector
            .as_deref()
            .and_then(|selector| query_one_in(&root, selector))
    };
    let prev = optional(&config.prev);
    let next = optional(&config.next);
    let dots: Vec<Element> = config
        .dots
        .as_deref()
        .map(|selector| query_all_in(&root, selector))
        .unwrap_or_default();

    let mut view = CarouselView::new(DomElement::new(track), slides);
    view.dots = dots.iter().cloned().map(DomElement::new).collect();
    view.prev = prev.clone().map(DomElement::new);
    view.next = next.clone().map(DomElement::new);
    view.render(&carousel);

    let state = Rc::new(CarouselState {
        carousel: RefCell::new(carousel),
        config: config.clone(),
        view,
        swipe: RefCell::new(SwipeTracker::new(config.swipe_threshold_px)),
        autoplay: RefCell::new(config.autoplay_ms.map(Autoplay::new)),
        timer: RefCell::new(None),
    });
    state.restart_timer();

    let mut listeners = Vec::new();
    let mut on = |target: &Element, event: &'static str, movement: CarouselMove| {
        let state = Rc::clone(&state);
        listeners.push(EventListener::new(target, event, move |_event| {
            state.apply(movement);
        }));
    };
    if let Some(prev) = &prev {
        on(prev, "click", CarouselMove::Previous);
    }
    if let Some(next) = &next {
        on(next, "click", CarouselMove::Next);
    }
    for (dot_index, dot) in dots.iter().enumerate() {
        on(dot, "click", CarouselMove::GoTo(dot_index));
    }

    {
        let state = Rc::clone(&state);
        listeners.push(EventListener::new(&root, "keydown", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if let Some(movement) = move_for_key(Key::from_dom_key(&event.key())) {
                state.apply(movement);
            }
        }));
    }

    {
        let state = Rc::clone(&state);
        listeners.push(EventListener::new(&root, "touchstart", move |event| {
            if let Some(x) = touch_x(event, false) {
                state.swipe.borrow_mut().begin(x);
            }
        }));
    }
    {
        let state = Rc::clone(&state);
        listeners.push(EventListener::new(&root, "touchend", move |event| {
            let movement = touch_x(event, true).and_then(|x| state.swipe.borrow_mut().end(x));
            if let Some(movement) = movement {
                state.apply(movement);
            }
        }));
    }

    if !config.per_view_breakpoints.is_empty() {
        let state = Rc::clone(&state);
        let throttle = FrameThrottle::new();
        let resize_window = window.clone();
        listeners.push(EventListener::new(window, "resize", move |_event| {
            let state = Rc::clone(&state);
            let window = resize_window.clone();
            throttle.schedule(move || state.repage(inner_width(&window)));
        }));
    }

    for (event, paused) in [
        ("mouseenter", true),
        ("focusin", true),
        ("mouseleave", false),
        ("focusout", false),
    ] {
        let state = Rc::clone(&state);
        listeners.push(EventListener::new(&root, event, move |_event| {
            state.set_paused(paused);
        }));
    }

    info!(
        "event=feature_mount module=carousel status=ok index={} pages={} per_view={} policy={}",
        index,
        state.carousel.borrow().len(),
        state.carousel.borrow().per_view(),
        config.policy.as_str()
    );
    Some(CarouselMount {
        _state: state,
        _listeners: listeners,
    })
}

fn touch_x(event: &web_sys::Event, changed: bool) -> Option<f64> {
    let event = event.dyn_ref::<TouchEvent>()?;
    let touches = if changed {
        event.changed_touches()
    } else {
        event.touches()
    };
    touches.get(0).map(|touch| f64::from(touch.client_x()))
}
