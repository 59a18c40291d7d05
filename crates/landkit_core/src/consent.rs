//! Cookie-consent banner.
//!
//! # Invariants
//! - The banner is shown only while no choice is stored.
//! - A choice hides the banner even when persisting it fails.

use crate::dom::{aria_bool, UiElement};
use crate::prefs::{PreferenceStore, StorageBackend};
use log::info;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentChoice {
    Accepted,
    Declined,
}

impl ConsentChoice {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "accepted" => Some(Self::Accepted),
            "declined" => Some(Self::Declined),
            _ => None,
        }
    }
}

pub struct ConsentBanner<B: StorageBackend, E: UiElement> {
    store: Rc<PreferenceStore<B>>,
    banner: E,
}

impl<B: StorageBackend, E: UiElement> ConsentBanner<B, E> {
    /// Shows the banner unless a choice is already stored.
    pub fn init(store: Rc<PreferenceStore<B>>, banner: E) -> Self {
        let controller = Self { store, banner };
        let stored = controller.choice();
        controller.set_visible(stored.is_none());
        info!(
            "event=consent_init module=consent status=ok visible={}",
            stored.is_none()
        );
        controller
    }

    pub fn choice(&self) -> Option<ConsentChoice> {
        self.store.consent()
    }

    pub fn is_visible(&self) -> bool {
        self.banner.attribute("hidden").is_none()
    }

    pub fn choose(&self, choice: ConsentChoice) {
        self.store.set_consent(choice);
        self.set_visible(false);
        info!(
            "event=consent_choice module=consent status=ok choice={}",
            choice.as_str()
        );
    }

    fn set_visible(&self, visible: bool) {
        self.banner.set_flag("hidden", !visible);
        self.banner.set_attribute("aria-hidden", aria_bool(!visible));
    }
}
