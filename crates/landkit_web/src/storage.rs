//! `StorageBackend` over `window.localStorage`.

use landkit_core::{StorageBackend, StorageError};
use log::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Storage, Window};

const QUOTA_ERROR_NAMES: [&str; 2] = ["QuotaExceededError", "NS_ERROR_DOM_QUOTA_REACHED"];

pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    /// Resolves `localStorage`; access can throw in sandboxed or private
    /// contexts, in which case every call reports `Unavailable`.
    pub fn from_window(window: &Window) -> Self {
        let storage = match window.local_storage() {
            Ok(Some(storage)) => Some(storage),
            Ok(None) => {
                warn!("event=storage_open module=storage status=degraded reason=not_exposed");
                None
            }
            Err(err) => {
                warn!(
                    "event=storage_open module=storage status=degraded error={}",
                    describe(&err)
                );
                None
            }
        };
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StorageError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage is not available".to_string()))
    }
}

impl StorageBackend for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?.get_item(key).map_err(|err| classify(&err))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| classify(&err))
    }
}

fn classify(err: &JsValue) -> StorageError {
    let name = err
        .dyn_ref::<js_sys::Error>()
        .map(|js_err| String::from(js_err.name()));
    match name {
        Some(name) if QUOTA_ERROR_NAMES.contains(&name.as_str()) => StorageError::QuotaExceeded,
        Some(name) if name == "SecurityError" => StorageError::Unavailable(describe(err)),
        _ => StorageError::Backend(describe(err)),
    }
}

fn describe(err: &JsValue) -> String {
    if let Some(js_err) = err.dyn_ref::<js_sys::Error>() {
        return format!("{}: {}", String::from(js_err.name()), String::from(js_err.message()));
    }
    err.as_string()
        .unwrap_or_else(|| "unknown storage error".to_string())
}
