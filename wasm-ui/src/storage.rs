//! `localStorage` behind the comment store's key-value trait.

use blog_rs::{BlogError, KeyValueStore, Result};
use wasm_bindgen::JsValue;

/// The window's `localStorage`. Looked up on every call, so a page where
/// storage is blocked still renders and reports the failure per operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn local() -> Result<web_sys::Storage> {
        gloo::utils::window()
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| BlogError::StorageUnavailable("localStorage is disabled".into()))
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Self::local()?.get_item(key).map_err(js_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        Self::local()?.set_item(key, value).map_err(js_error)
    }
}

fn js_error(value: JsValue) -> BlogError {
    BlogError::StorageUnavailable(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}
