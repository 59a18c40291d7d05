//! Light/dark theme controller.
//!
//! # Responsibility
//! - Resolve the initial theme from the stored choice or the system setting.
//! - Apply the theme to the document root and the toggle button.
//! - Persist explicit user choices through the preference store.
//!
//! # Invariants
//! - A theme derived from the system setting is applied but not persisted.
//! - System changes are ignored once the user made an explicit choice.
//! - Storage failures never block the visual update.

use crate::dom::{aria_bool, UiElement};
use crate::prefs::{PreferenceStore, StorageBackend};
use log::{debug, info};
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Root attribute carrying the active theme.
pub const THEME_ATTRIBUTE: &str = "data-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parses a stored value; unknown strings yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn from_system(prefers_dark: bool) -> Self {
        if prefers_dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Theme controller bound to the document root and an optional toggle.
pub struct ThemeController<B: StorageBackend, E: UiElement> {
    store: Rc<PreferenceStore<B>>,
    root: E,
    toggle: Option<E>,
    current: Theme,
}

impl<B: StorageBackend, E: UiElement> ThemeController<B, E> {
    /// Creates the controller and applies the initial theme.
    pub fn init(
        store: Rc<PreferenceStore<B>>,
        root: E,
        toggle: Option<E>,
        system_prefers_dark: bool,
    ) -> Self {
        let stored = store.theme();
        let current = stored.unwrap_or_else(|| Theme::from_system(system_prefers_dark));

        let controller = Self {
            store,
            root,
            toggle,
            current,
        };
        controller.render();
        info!(
            "event=theme_init module=theme status=ok theme={} source={}",
            current,
            if stored.is_some() { "stored" } else { "system" }
        );
        controller
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Flips the theme and persists the new choice.
    pub fn toggle(&mut self) -> Theme {
        self.set(self.current.toggled());
        self.current
    }

    /// Applies and persists an explicit choice.
    pub fn set(&mut self, theme: Theme) {
        self.current = theme;
        self.render();
        self.store.set_theme(theme);
        debug!("event=theme_set module=theme status=ok theme={}", theme);
    }

    /// Follows a system color-scheme change unless the user chose explicitly.
    ///
    /// Returns whether the theme was applied.
    pub fn on_system_change(&mut self, prefers_dark: bool) -> bool {
        if self.has_explicit_choice() {
            debug!("event=theme_system_change module=theme status=skipped reason=explicit_choice");
            return false;
        }
        self.current = Theme::from_system(prefers_dark);
        self.render();
        true
    }

    pub fn has_explicit_choice(&self) -> bool {
        self.store.theme().is_some()
    }

    fn render(&self) {
        self.root
            .set_attribute(THEME_ATTRIBUTE, self.current.as_str());
        if let Some(toggle) = &self.toggle {
            toggle.set_attribute("aria-pressed", aria_bool(self.current == Theme::Dark));
            toggle.set_attribute("data-theme-current", self.current.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Theme;

    #[test]
    fn parses_and_renders_theme_values() {
        assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse(" light "), Some(Theme::Light));
        assert_eq!(Theme::parse("sepia"), None);
        assert_eq!(Theme::Dark.to_string(), "dark");
    }

    #[test]
    fn toggled_flips() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }
}
