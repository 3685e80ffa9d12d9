use web_sys::Storage;

use crate::error::StoreError;
use crate::persistence::LocalStore;

/// `window.localStorage` adapter.
pub struct BrowserStorage {
    storage: Storage,
}

impl BrowserStorage {
    pub fn open() -> Result<Self, StoreError> {
        let window = web_sys::window().ok_or(StoreError::Unavailable)?;
        match window.local_storage() {
            Ok(Some(storage)) => Ok(Self { storage }),
            Ok(None) => Err(StoreError::Unavailable),
            Err(e) => Err(StoreError::Backend(format!("{e:?}"))),
        }
    }
}

impl LocalStore for BrowserStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage.get_item(key).map_err(|e| StoreError::Backend(format!("{e:?}")))
    }

    fn save(&self, key: &str, blob: &str) -> Result<(), StoreError> {
        self.storage.set_item(key, blob).map_err(|e| StoreError::Backend(format!("{e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.storage.remove_item(key).map_err(|e| StoreError::Backend(format!("{e:?}")))
    }
}
