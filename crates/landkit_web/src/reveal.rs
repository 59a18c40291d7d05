//! Reveal-on-scroll and count-up counters over `IntersectionObserver`.

use crate::dom::{log_skipped, query_all, DomElement};
use gloo::render::{request_animation_frame, AnimationFrame};
use js_sys::Array;
use landkit_core::config::{CounterConfig, RevealConfig};
use landkit_core::reveal::{apply_reveal, max_ratio};
use landkit_core::{
    CounterAnimation, IntersectionSample, Reveal, RevealAnimator, RevealOptions, UiElement,
};
use log::{info, warn};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
};

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Observer that reports each target at most once, then stops watching it.
pub struct OnceObserver {
    observer: IntersectionObserver,
    _callback: ObserverCallback,
}

impl Drop for OnceObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

fn observe_once<F>(
    targets: Vec<Element>,
    options: RevealOptions,
    mut on_reveal: F,
) -> Result<OnceObserver, JsValue>
where
    F: FnMut(&Element, &Reveal<usize>) + 'static,
{
    let mut animator = RevealAnimator::new(options.clone());
    for index in 0..targets.len() {
        animator.register(index);
    }
    let observed = targets.clone();

    let callback: ObserverCallback = Closure::new(
        move |entries: Array, observer: IntersectionObserver| {
            let samples: Vec<IntersectionSample<usize>> = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .filter_map(|entry| {
                    let target = entry.target();
                    let key = targets.iter().position(|candidate| *candidate == target)?;
                    let root_height = entry.root_bounds().map_or(0.0, |bounds| bounds.height());
                    let reachable = max_ratio(entry.bounding_client_rect().height(), root_height);
                    Some(
                        IntersectionSample::new(
                            key,
                            entry.intersection_ratio(),
                            entry.is_intersecting(),
                        )
                        .with_max_ratio(reachable),
                    )
                })
                .collect();

            for reveal in animator.observe(&samples) {
                let element = &targets[reveal.key];
                observer.unobserve(element);
                on_reveal(element, &reveal);
            }
            if animator.is_done() {
                observer.disconnect();
            }
        },
    );

    let init = IntersectionObserverInit::new();
    let thresholds: Array = options
        .observer_thresholds()
        .into_iter()
        .map(JsValue::from_f64)
        .collect();
    init.set_threshold(&thresholds);
    init.set_root_margin(&options.root_margin());
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    for target in &observed {
        observer.observe(target);
    }
    Ok(OnceObserver {
        observer,
        _callback: callback,
    })
}

pub fn mount_reveal(document: &Document, config: &RevealConfig) -> Option<OnceObserver> {
    let targets = query_all(document, &config.selector);
    if targets.is_empty() {
        log_skipped("reveal", &config.selector);
        return None;
    }
    let count = targets.len();
    let options = config.options();
    let class = options.visible_class.clone();

    match observe_once(targets, options, move |element, reveal| {
        apply_reveal(&DomElement::new(element.clone()), reveal, &class);
    }) {
        Ok(observer) => {
            info!(
                "event=feature_mount module=reveal status=ok targets={}",
                count
            );
            Some(observer)
        }
        Err(err) => {
            warn!(
                "event=feature_mount module=reveal status=error error={:?}",
                err
            );
            None
        }
    }
}

struct CounterRun {
    element: DomElement,
    animation: CounterAnimation,
    started_ms: f64,
    frame: RefCell<Option<AnimationFrame>>,
}

impl CounterRun {
    fn start(element: DomElement, animation: CounterAnimation) {
        let run = Rc::new(Self {
            element,
            animation,
            started_ms: js_sys::Date::now(),
            frame: RefCell::new(None),
        });
        run.step();
    }

    fn step(self: &Rc<Self>) {
        let elapsed = js_sys::Date::now() - self.started_ms;
        self.element.set_text(&self.animation.text_at(elapsed));
        if self.animation.is_finished(elapsed) {
            return;
        }
        let run = Rc::clone(self);
        let handle = request_animation_frame(move |_| {
            run.frame.borrow_mut().take();
            run.step();
        });
        *self.frame.borrow_mut() = Some(handle);
    }
}

pub fn mount_counters(document: &Document, config: &CounterConfig) -> Option<OnceObserver> {
    let targets = query_all(document, &config.selector);
    if targets.is_empty() {
        log_skipped("counters", &config.selector);
        return None;
    }
    let options = RevealOptions {
        threshold: config.threshold,
        margin_px: 0.0,
        stagger_ms: 0,
        visible_class: String::new(),
    };
    let duration_ms = config.duration_ms;

    let mounted = observe_once(targets, options, move |element, _reveal| {
        let raw = element.get_attribute("data-target").unwrap_or_default();
        match CounterAnimation::parse_target(&raw) {
            Some(target) => CounterRun::start(
                DomElement::new(element.clone()),
                CounterAnimation::new(target, duration_ms),
            ),
            None => warn!(
                "event=counter_start module=counters status=skipped reason=invalid_target"
            ),
        }
    });
    match mounted {
        Ok(observer) => Some(observer),
        Err(err) => {
            warn!(
                "event=feature_mount module=counters status=error error={:?}",
                err
            );
            None
        }
    }
}
