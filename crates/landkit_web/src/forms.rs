//! Form validation wiring: blur/change feedback and submit gating.

use crate::dom::{log_skipped, query_one, query_one_in, DomElement};
use crate::frame::cancelable;
use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use landkit_core::config::FormConfig;
use landkit_core::form::FieldSource;
use landkit_core::{FieldBinding, FieldValue, FormController, SubmitMode, SubmitOutcome};
use log::{info, warn};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlFormElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement,
};

/// Reads current control values straight from the DOM.
struct DomFields<'a> {
    controls: &'a BTreeMap<String, Element>,
}

impl FieldSource for DomFields<'_> {
    fn value(&self, name: &str) -> Option<FieldValue> {
        self.controls.get(name).map(read_value)
    }
}

fn read_value(control: &Element) -> FieldValue {
    if let Some(input) = control.dyn_ref::<HtmlInputElement>() {
        return match input.type_().as_str() {
            "checkbox" | "radio" => FieldValue::Checked(input.checked()),
            _ => FieldValue::Text(input.value()),
        };
    }
    if let Some(area) = control.dyn_ref::<HtmlTextAreaElement>() {
        return FieldValue::Text(area.value());
    }
    if let Some(select) = control.dyn_ref::<HtmlSelectElement>() {
        return FieldValue::Text(select.value());
    }
    FieldValue::Text(control.text_content().unwrap_or_default())
}

struct FormState {
    form: HtmlFormElement,
    controller: FormController<DomElement>,
    controls: BTreeMap<String, Element>,
    success_timeout_ms: Option<u32>,
    success_timer: RefCell<Option<Timeout>>,
}

impl FormState {
    fn submit(self: &Rc<Self>) -> SubmitOutcome {
        let outcome = self.controller.submit(&DomFields {
            controls: &self.controls,
        });
        if matches!(
            outcome,
            SubmitOutcome::Accepted {
                mode: SubmitMode::InPage
            }
        ) {
            self.form.reset();
            self.schedule_success_reset();
        }
        outcome
    }

    fn schedule_success_reset(self: &Rc<Self>) {
        let Some(timeout_ms) = self.success_timeout_ms else {
            return;
        };
        let state: Weak<Self> = Rc::downgrade(self);
        let timeout = Timeout::new(timeout_ms, move || {
            if let Some(state) = state.upgrade() {
                state.controller.clear_success();
            }
        });
        *self.success_timer.borrow_mut() = Some(timeout);
    }
}

pub struct FormMount {
    _state: Rc<FormState>,
    _listeners: Vec<EventListener>,
}

pub fn mount(document: &Document, config: &FormConfig) -> Option<FormMount> {
    let Some(form) = query_one(document, &config.selector)
        .and_then(|element| element.dyn_into::<HtmlFormElement>().ok())
    else {
        log_skipped("form", &config.selector);
        return None;
    };
    let validator = match config.validator() {
        Ok(validator) => validator,
        Err(err) => {
            warn!(
                "event=feature_mount module=form status=error selector={} error={}",
                config.selector, err
            );
            return None;
        }
    };

    let mut controls = BTreeMap::new();
    let mut bindings = BTreeMap::new();
    for spec in validator.fields() {
        let selector = format!("[name=\"{}\"]", spec.name);
        let Some(control) = query_one_in(&form, &selector) else {
            log_skipped("form", &selector);
            continue;
        };
        let error = control
            .parent_element()
            .and_then(|parent| query_one_in(&parent, &config.error_selector))
            .map(DomElement::new);
        bindings.insert(
            spec.name.clone(),
            FieldBinding {
                input: DomElement::new(control.clone()),
                error,
            },
        );
        controls.insert(spec.name.clone(), control);
    }

    let success = config
        .success
        .as_deref()
        .and_then(|selector| query_one(document, selector))
        .map(DomElement::new);
    let declared = validator.fields().len();
    let state = Rc::new(FormState {
        form: form.clone(),
        controller: FormController::new(validator, bindings, success, config.submit_mode),
        controls,
        success_timeout_ms: config.success_timeout_ms,
        success_timer: RefCell::new(None),
    });

    let bound = state.controller.validator().fields().len();

    let mut listeners = Vec::new();
    for (name, control) in &state.controls {
        for event in ["blur", "change"] {
            let state = Rc::clone(&state);
            let name = name.clone();
            let source = control.clone();
            listeners.push(EventListener::new(control, event, move |_event| {
                state.controller.on_field_event(&name, &read_value(&source));
            }));
        }
    }

    {
        let state = Rc::clone(&state);
        listeners.push(EventListener::new_with_options(
            &form,
            "submit",
            cancelable(),
            move |event| {
                if state.submit().should_prevent_default() {
                    event.prevent_default();
                }
            },
        ));
    }

    info!(
        "event=feature_mount module=form status=ok selector={} fields={}/{} mode={:?}",
        config.selector, bound, declared, config.submit_mode
    );
    Some(FormMount {
        _state: state,
        _listeners: listeners,
    })
}
