//! Host-agnostic landing-page UI controllers.
//! This crate is the single source of truth for UI invariants; hosts only
//! supply element handles, storage and viewport measurements.

pub mod carousel;
pub mod config;
pub mod consent;
pub mod dom;
pub mod form;
pub mod input;
pub mod logging;
pub mod menu;
pub mod prefs;
pub mod reveal;
pub mod schedule;
pub mod scroll;
pub mod theme;

pub use carousel::{
    Autoplay, BoundaryPolicy, Carousel, CarouselError, CarouselMove, CarouselView, SwipeTracker,
};
pub use config::{ConfigError, SiteConfig};
pub use consent::{ConsentBanner, ConsentChoice};
pub use dom::{MemoryElement, UiElement};
pub use form::{
    FieldBinding, FieldError, FieldRule, FieldSpec, FieldState, FieldValue, FormController,
    FormReport, FormValidator, SubmitMode, SubmitOutcome,
};
pub use input::Key;
pub use logging::{default_log_level, normalize_level, sanitize_message};
#[cfg(not(target_arch = "wasm32"))]
pub use logging::{init_logging, logging_status};
pub use menu::{MenuController, MenuOptions, MenuState};
pub use prefs::{MemoryStorage, PreferenceKey, PreferenceStore, StorageBackend, StorageError};
pub use reveal::{CounterAnimation, IntersectionSample, Reveal, RevealAnimator, RevealOptions};
pub use schedule::FrameGate;
pub use scroll::{
    HeaderScrollState, NavigationOutcome, ScrollBehavior, ScrollNavigator, ScrollViewport,
};
pub use theme::{Theme, ThemeController};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
