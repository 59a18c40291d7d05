//! Browser bindings for landkit.
//!
//! # Responsibility
//! - Expose stable entry points to page scripts via `wasm-bindgen`.
//! - Bind core controllers to live DOM elements and browser events.
//!
//! # Invariants
//! - Exported functions must not panic across the JS boundary.
//! - At most one site is mounted per page; mounting again replaces it and
//!   detaches the previous listeners.
//! - A feature whose markup is missing is skipped without affecting others.

mod carousel;
mod consent;
mod dom;
mod forms;
mod frame;
mod logging;
mod menu;
mod reveal;
mod scroll;
mod storage;
mod theme;
mod viewport;

use landkit_core::{PreferenceStore, SiteConfig};
use log::{error, info};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::wasm_bindgen;

pub use dom::DomElement;
pub use storage::LocalStorage;
pub use viewport::WindowViewport;

thread_local! {
    static SITE: RefCell<Option<Site>> = const { RefCell::new(None) };
}

/// Everything one mounted page keeps alive. Dropping it detaches listeners,
/// stops timers and disconnects observers.
struct Site {
    _theme: Option<theme::ThemeMount>,
    _menu: Option<menu::MenuMount>,
    _anchors: Option<scroll::AnchorMount>,
    _scroll_effects: Option<scroll::ScrollEffectsMount>,
    _reveal: Option<reveal::OnceObserver>,
    _counters: Option<reveal::OnceObserver>,
    _carousels: Vec<carousel::CarouselMount>,
    _forms: Vec<forms::FormMount>,
    _consent: Option<consent::ConsentMount>,
}

impl Site {
    fn mount(config: &SiteConfig) -> Result<Self, String> {
        let window = web_sys::window().ok_or_else(|| "window is not available".to_string())?;
        let document = window
            .document()
            .ok_or_else(|| "window.document is not available".to_string())?;

        let store = Rc::new(PreferenceStore::new(
            LocalStorage::from_window(&window),
            config.storage_prefix.as_deref(),
        ));

        let theme = theme::mount(&window, &document, Rc::clone(&store), &config.theme);
        let menu = menu::mount(&window, &document, &config.menu);
        let anchors = scroll::mount_anchors(
            &window,
            &document,
            &config.scroll,
            menu.as_ref().map(menu::MenuMount::controller),
        );
        let scroll_effects =
            scroll::mount_effects(&window, &document, &config.header, &config.parallax);
        let reveal = reveal::mount_reveal(&document, &config.reveal);
        let counters = reveal::mount_counters(&document, &config.counters);
        let carousels = config
            .carousels
            .iter()
            .enumerate()
            .filter_map(|(index, carousel)| carousel::mount(&window, &document, index, carousel))
            .collect::<Vec<_>>();
        let forms = config
            .forms
            .iter()
            .filter_map(|form| forms::mount(&document, form))
            .collect::<Vec<_>>();
        let consent = consent::mount(&document, store, &config.consent);

        info!(
            "event=site_mount module=web status=ok carousels={} forms={} menu={}",
            carousels.len(),
            forms.len(),
            menu.is_some()
        );
        Ok(Self {
            _theme: theme,
            _menu: menu,
            _anchors: anchors,
            _scroll_effects: scroll_effects,
            _reveal: reveal,
            _counters: counters,
            _carousels: carousels,
            _forms: forms,
            _consent: consent,
        })
    }
}

/// Mounts every configured feature onto the current page.
///
/// Input semantics:
/// - `config_json`: a `SiteConfig` JSON document; `{}` selects all defaults.
///
/// # JS contract
/// - Sync call; must run after the DOM is parsed.
/// - Replaces a previously mounted site.
/// - Never panics; returns empty string on success and error message on failure.
#[wasm_bindgen]
pub fn mount_site(config_json: &str) -> String {
    match SiteConfig::from_json(config_json) {
        Ok(config) => mount_config(&config),
        Err(err) => {
            error!(
                "event=site_mount module=web status=error reason=invalid_config error={}",
                err
            );
            err.to_string()
        }
    }
}

/// Mounts every feature with default selectors and timings.
///
/// # JS contract
/// - Same as `mount_site("{}")`.
#[wasm_bindgen]
pub fn mount_default() -> String {
    mount_config(&SiteConfig::default())
}

/// Detaches the mounted site, if any. Returns whether one was mounted.
#[wasm_bindgen]
pub fn unmount_site() -> bool {
    SITE.with(|slot| slot.borrow_mut().take()).is_some()
}

/// Initializes console logging once per page.
///
/// # JS contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - Idempotent for the same level; a different level returns an error.
/// - Never panics; returns empty string on success and error message on failure.
#[wasm_bindgen]
pub fn init_logging(level: &str) -> String {
    match logging::init_console_logging(level) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Active console log level, or empty string before `init_logging`.
#[wasm_bindgen]
pub fn logging_level() -> String {
    logging::logging_level().unwrap_or_default().to_string()
}

#[wasm_bindgen]
pub fn landkit_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn mount_config(config: &SiteConfig) -> String {
    // Old listeners must be gone before new ones attach to the same nodes.
    unmount_site();
    match Site::mount(config) {
        Ok(site) => {
            SITE.with(|slot| *slot.borrow_mut() = Some(site));
            String::new()
        }
        Err(err) => {
            error!("event=site_mount module=web status=error error={}", err);
            err
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{landkit_version, mount_site, unmount_site};

    #[test]
    fn version_matches_core() {
        assert_eq!(landkit_version(), landkit_core::core_version());
    }

    #[test]
    fn mount_site_rejects_malformed_json() {
        let error = mount_site("{not json");
        assert!(error.contains("invalid config JSON"), "{error}");
    }

    #[test]
    fn mount_site_rejects_invalid_config_before_touching_dom() {
        let error = mount_site(r#"{"carousels": [{"per_view": 0}]}"#);
        assert!(error.contains("carousels[0]"), "{error}");
        assert!(!unmount_site());
    }
}
