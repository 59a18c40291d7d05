use landkit_core::{
    ConsentBanner, ConsentChoice, MemoryElement, MemoryStorage, PreferenceKey, PreferenceStore,
    StorageBackend, StorageError, Theme, ThemeController, UiElement,
};
use std::cell::Cell;
use std::rc::Rc;

/// Backend that rejects every write and optionally every read.
#[derive(Debug, Default)]
struct FailingStorage {
    fail_reads: bool,
    writes_attempted: Cell<usize>,
}

impl StorageBackend for FailingStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Unavailable("private mode".to_string()));
        }
        Ok(None)
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        self.writes_attempted.set(self.writes_attempted.get() + 1);
        Err(StorageError::QuotaExceeded)
    }
}

type SharedStore<B> = Rc<PreferenceStore<Rc<B>>>;

/// Store plus a second handle on its backend for inspecting raw writes.
fn backed_store<B: StorageBackend>(backend: B, prefix: Option<&str>) -> (SharedStore<B>, Rc<B>) {
    let backend = Rc::new(backend);
    let store = Rc::new(PreferenceStore::new(Rc::clone(&backend), prefix));
    (store, backend)
}

fn memory_store(items: &[(&str, &str)]) -> (SharedStore<MemoryStorage>, Rc<MemoryStorage>) {
    backed_store(MemoryStorage::with_items(items.iter().copied()), None)
}

#[test]
fn stored_theme_wins_over_system_preference() {
    let root = MemoryElement::new();
    let (store, _) = memory_store(&[("theme", "light")]);
    let theme = ThemeController::init(store, root.clone(), None, true);
    assert_eq!(theme.current(), Theme::Light);
    assert_eq!(root.attribute("data-theme").as_deref(), Some("light"));
}

#[test]
fn system_preference_applies_without_persisting() {
    let (store, backend) = memory_store(&[]);
    let root = MemoryElement::new();
    let theme = ThemeController::init(store, root.clone(), None, true);

    assert_eq!(theme.current(), Theme::Dark);
    assert_eq!(root.attribute("data-theme").as_deref(), Some("dark"));
    assert_eq!(backend.raw("theme"), None);
    assert!(!theme.has_explicit_choice());
}

#[test]
fn double_toggle_restores_theme_and_persisted_value() {
    let (store, backend) = memory_store(&[("theme", "dark")]);
    let root = MemoryElement::new();
    let toggle = MemoryElement::new();
    let mut theme = ThemeController::init(Rc::clone(&store), root.clone(), Some(toggle.clone()), false);

    assert_eq!(theme.toggle(), Theme::Light);
    assert_eq!(backend.raw("theme").as_deref(), Some("light"));
    assert_eq!(toggle.attribute("aria-pressed").as_deref(), Some("false"));

    assert_eq!(theme.toggle(), Theme::Dark);
    assert_eq!(root.attribute("data-theme").as_deref(), Some("dark"));
    assert_eq!(backend.raw("theme").as_deref(), Some("dark"));
    assert_eq!(toggle.attribute("aria-pressed").as_deref(), Some("true"));
}

#[test]
fn failed_write_still_switches_theme_for_the_session() {
    let (store, backend) = backed_store(FailingStorage::default(), None);
    let root = MemoryElement::new();
    let mut theme = ThemeController::init(Rc::clone(&store), root.clone(), None, false);

    assert_eq!(theme.toggle(), Theme::Dark);
    assert_eq!(root.attribute("data-theme").as_deref(), Some("dark"));
    assert!(store.is_degraded());
    assert_eq!(store.get(PreferenceKey::Theme).as_deref(), Some("dark"));

    theme.toggle();
    assert_eq!(backend.writes_attempted.get(), 1);
    assert_eq!(theme.current(), Theme::Light);
}

#[test]
fn unreadable_storage_falls_back_to_system_theme() {
    let store = Rc::new(PreferenceStore::new(
        FailingStorage {
            fail_reads: true,
            ..FailingStorage::default()
        },
        None,
    ));
    let theme = ThemeController::init(store, MemoryElement::new(), None, true);
    assert_eq!(theme.current(), Theme::Dark);
}

#[test]
fn system_change_is_ignored_after_explicit_choice() {
    let root = MemoryElement::new();
    let (store, _) = memory_store(&[]);
    let mut theme = ThemeController::init(store, root.clone(), None, false);

    assert!(theme.on_system_change(true));
    assert_eq!(theme.current(), Theme::Dark);

    theme.set(Theme::Light);
    assert!(!theme.on_system_change(true));
    assert_eq!(root.attribute("data-theme").as_deref(), Some("light"));
}

#[test]
fn prefix_namespaces_keys_per_site() {
    let (store, backend) = backed_store(MemoryStorage::new(), Some("acme"));
    let mut theme = ThemeController::init(Rc::clone(&store), MemoryElement::new(), None, false);
    theme.set(Theme::Dark);

    assert_eq!(backend.raw("acme-theme").as_deref(), Some("dark"));
    assert_eq!(backend.raw("theme"), None);
}

#[test]
fn consent_banner_shows_until_choice_is_stored() {
    let (store, backend) = memory_store(&[]);
    let banner = MemoryElement::new();
    let consent = ConsentBanner::init(Rc::clone(&store), banner.clone());
    assert!(consent.is_visible());
    assert_eq!(consent.choice(), None);

    consent.choose(ConsentChoice::Declined);
    assert!(!consent.is_visible());
    assert!(banner.has_attribute("hidden"));
    assert_eq!(
        backend.raw("cookie-consent").as_deref(),
        Some("declined")
    );

    let reloaded = ConsentBanner::init(store, MemoryElement::new());
    assert!(!reloaded.is_visible());
    assert_eq!(reloaded.choice(), Some(ConsentChoice::Declined));
}

#[test]
fn consent_choice_hides_banner_when_storage_fails() {
    let store = Rc::new(PreferenceStore::new(FailingStorage::default(), None));
    let consent = ConsentBanner::init(store, MemoryElement::new());
    consent.choose(ConsentChoice::Accepted);
    assert!(!consent.is_visible());
    assert_eq!(consent.choice(), Some(ConsentChoice::Accepted));
}

#[test]
fn theme_and_consent_share_one_store() {
    let (store, backend) = memory_store(&[("cookie-consent", "accepted")]);
    let mut theme = ThemeController::init(Rc::clone(&store), MemoryElement::new(), None, false);
    let consent = ConsentBanner::init(Rc::clone(&store), MemoryElement::new());

    theme.toggle();
    assert!(!consent.is_visible());
    assert_eq!(backend.raw("theme").as_deref(), Some("dark"));
    assert_eq!(
        backend.raw("cookie-consent").as_deref(),
        Some("accepted")
    );
}
