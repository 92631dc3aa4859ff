#![forbid(unsafe_code)]

use sladash_core::storage::StorageResult;
use sladash_core::{KeyValueStorage, StorageError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomException, Storage};

/// `window.localStorage`, or nothing when the browser denies access.
#[derive(Debug, Clone)]
pub(crate) struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub(crate) fn from_window(window: &web_sys::Window) -> Self {
        // Access throws a SecurityError when storage is disabled by policy.
        let storage = window.local_storage().ok().flatten();
        if storage.is_none() {
            tracing::debug!("localStorage unavailable, sidebar preference will not persist");
        }
        Self { storage }
    }

    fn storage(&self) -> StorageResult<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage is not accessible".into()))
    }
}

pub(crate) fn js_error_message(err: &JsValue) -> String {
    if let Some(exc) = err.dyn_ref::<DomException>() {
        return format!("{}: {}", exc.name(), exc.message());
    }
    if let Some(e) = err.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    err.as_string().unwrap_or_else(|| "unknown error".to_owned())
}

fn is_quota_error(err: &JsValue) -> bool {
    err.dyn_ref::<DomException>()
        .is_some_and(|e| e.name() == "QuotaExceededError")
}

impl KeyValueStorage for LocalStorage {
    fn name(&self) -> &str {
        "LocalStorage"
    }

    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StorageError::Backend(js_error_message(&e)))
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.storage()?.set_item(key, value).map_err(|e| {
            if is_quota_error(&e) {
                StorageError::QuotaExceeded { key: key.to_owned() }
            } else {
                StorageError::Backend(js_error_message(&e))
            }
        })
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| StorageError::Backend(js_error_message(&e)))
    }
}
