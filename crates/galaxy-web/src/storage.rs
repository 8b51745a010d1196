//! `localStorage`-backed position store.

use galaxy_engine::{MapError, MapResult, PositionStore, STORAGE_KEY};
use wasm_bindgen::JsValue;
use web_sys::Storage;

pub struct LocalStorageStore {
    key: String,
}

impl LocalStorageStore {
    pub fn new() -> Self {
        Self::with_key(STORAGE_KEY)
    }

    pub fn with_key(key: &str) -> Self {
        Self { key: key.to_owned() }
    }

    fn storage() -> MapResult<Storage> {
        let window = web_sys::window().ok_or_else(|| MapError::Storage("no window".into()))?;
        window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| MapError::Storage("localStorage unavailable".into()))
    }
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionStore for LocalStorageStore {
    fn load(&self) -> MapResult<Option<String>> {
        Self::storage()?.get_item(&self.key).map_err(js_error)
    }

    fn save(&mut self, value: &str) -> MapResult<()> {
        Self::storage()?.set_item(&self.key, value).map_err(js_error)
    }
}

fn js_error(e: JsValue) -> MapError {
    MapError::Storage(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}
