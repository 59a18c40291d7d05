//! Preference store over a persistent key-value backend.
//!
//! # Responsibility
//! - Namespace preference keys per site.
//! - Keep preference reads and writes working when persistent storage is
//!   disabled, full, or throwing.
//!
//! # Invariants
//! - `get`/`set` never surface storage failures to callers.
//! - Every `set` lands in the session overlay first, so reads observe the
//!   last write of this session even when the backend rejected it.
//! - Writes are last-write-wins per key; nothing is deleted programmatically.

use crate::consent::ConsentChoice;
use crate::theme::Theme;
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Failure reported by a persistent storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Storage is disabled or not exposed by the host (private mode, policy).
    Unavailable(String),
    /// The backend refused the write because it is full.
    QuotaExceeded,
    /// Any other host-reported failure.
    Backend(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::QuotaExceeded => write!(f, "storage quota exceeded"),
            Self::Backend(message) => write!(f, "storage backend error: {message}"),
        }
    }
}

impl Error for StorageError {}

/// Persistent key-value backend, e.g. browser `localStorage`.
pub trait StorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Shared backends, e.g. one handle kept by the host for inspection.
impl<B: StorageBackend + ?Sized> StorageBackend for Rc<B> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}

/// In-process backend for native hosts and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-populated with `(key, value)` pairs.
    pub fn with_items<'a>(items: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let storage = Self::new();
        {
            let mut map = storage.items.borrow_mut();
            for (key, value) in items {
                map.insert(key.to_string(), value.to_string());
            }
        }
        storage
    }

    /// Returns the raw persisted value for a fully-qualified key.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Known preference slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreferenceKey {
    Theme,
    CookieConsent,
}

impl PreferenceKey {
    /// Unprefixed key name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Theme => "theme",
            Self::CookieConsent => "cookie-consent",
        }
    }
}

/// Site-scoped preference store with session fallback.
#[derive(Debug)]
pub struct PreferenceStore<B: StorageBackend> {
    backend: B,
    prefix: Option<String>,
    session: RefCell<BTreeMap<String, String>>,
    degraded: Cell<bool>,
}

impl<B: StorageBackend> PreferenceStore<B> {
    /// Creates a store; `prefix` namespaces keys as `<prefix>-<key>`.
    pub fn new(backend: B, prefix: Option<&str>) -> Self {
        let prefix = prefix
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        Self {
            backend,
            prefix,
            session: RefCell::new(BTreeMap::new()),
            degraded: Cell::new(false),
        }
    }

    /// Fully-qualified storage key for one preference slot.
    pub fn storage_key(&self, key: PreferenceKey) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}-{}", key.as_str()),
            None => key.as_str().to_string(),
        }
    }

    /// Reads one preference, preferring this session's writes.
    pub fn get(&self, key: PreferenceKey) -> Option<String> {
        let storage_key = self.storage_key(key);
        if let Some(value) = self.session.borrow().get(&storage_key) {
            return Some(value.clone());
        }
        if self.degraded.get() {
            return None;
        }

        match self.backend.get_item(&storage_key) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=pref_read module=prefs status=degraded key={} error={}",
                    storage_key, err
                );
                self.degraded.set(true);
                None
            }
        }
    }

    /// Writes one preference; backend failures degrade to session-only.
    pub fn set(&self, key: PreferenceKey, value: &str) {
        let storage_key = self.storage_key(key);
        self.session
            .borrow_mut()
            .insert(storage_key.clone(), value.to_string());

        if self.degraded.get() {
            debug!(
                "event=pref_write module=prefs status=session_only key={}",
                storage_key
            );
            return;
        }

        match self.backend.set_item(&storage_key, value) {
            Ok(()) => debug!(
                "event=pref_write module=prefs status=ok key={}",
                storage_key
            ),
            Err(err) => {
                warn!(
                    "event=pref_write module=prefs status=degraded key={} error={}",
                    storage_key, err
                );
                self.degraded.set(true);
            }
        }
    }

    /// Stored explicit theme, ignoring unparseable values.
    pub fn theme(&self) -> Option<Theme> {
        self.get(PreferenceKey::Theme)
            .and_then(|value| Theme::parse(&value))
    }

    pub fn set_theme(&self, theme: Theme) {
        self.set(PreferenceKey::Theme, theme.as_str());
    }

    pub fn consent(&self) -> Option<ConsentChoice> {
        self.get(PreferenceKey::CookieConsent)
            .and_then(|value| ConsentChoice::parse(&value))
    }

    pub fn set_consent(&self, choice: ConsentChoice) {
        self.set(PreferenceKey::CookieConsent, choice.as_str());
    }

    /// Whether the backend failed at least once this session.
    pub fn is_degraded(&self) -> bool {
        self.degraded.get()
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryStorage, PreferenceKey, PreferenceStore};
    use std::rc::Rc;

    #[test]
    fn storage_key_applies_prefix() {
        let store = PreferenceStore::new(MemoryStorage::new(), Some("gfv"));
        assert_eq!(store.storage_key(PreferenceKey::Theme), "gfv-theme");
        assert_eq!(
            store.storage_key(PreferenceKey::CookieConsent),
            "gfv-cookie-consent"
        );
    }

    #[test]
    fn blank_prefix_is_ignored() {
        let store = PreferenceStore::new(MemoryStorage::new(), Some("  "));
        assert_eq!(store.storage_key(PreferenceKey::Theme), "theme");
    }

    #[test]
    fn reads_existing_backend_value() {
        let backend = MemoryStorage::with_items([("theme", "dark")]);
        let store = PreferenceStore::new(backend, None);
        assert_eq!(store.get(PreferenceKey::Theme).as_deref(), Some("dark"));
        assert_eq!(store.get(PreferenceKey::CookieConsent), None);
    }

    #[test]
    fn set_persists_and_overwrites() {
        let backend = Rc::new(MemoryStorage::new());
        let store = PreferenceStore::new(Rc::clone(&backend), Some("site"));
        store.set(PreferenceKey::Theme, "light");
        store.set(PreferenceKey::Theme, "dark");
        assert_eq!(backend.raw("site-theme").as_deref(), Some("dark"));
        assert_eq!(store.get(PreferenceKey::Theme).as_deref(), Some("dark"));
        assert!(!store.is_degraded());
    }
}
