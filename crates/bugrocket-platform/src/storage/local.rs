//! `window.localStorage` backend.
//! Persistent across page reloads, scoped to the page origin.
//! Values are UTF-8 text; the archive is JSON so that is all it needs.

use async_trait::async_trait;
use bugrocket_core::ports::StoragePort;
use bugrocket_types::{Result, RocketError};

pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Open the origin's localStorage. Fails when storage is disabled,
    /// e.g. by privacy settings or a sandboxed iframe.
    pub fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| RocketError::Storage("No window object".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| RocketError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| RocketError::Storage("localStorage not available".to_string()))?;
        Ok(Self { storage })
    }
}

#[async_trait(?Send)]
impl StoragePort for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.storage
            .get_item(key)
            .map(|value| value.map(String::into_bytes))
            .map_err(|e| RocketError::Storage(format!("{:?}", e)))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(value)
            .map_err(|e| RocketError::Serialization(e.to_string()))?;
        // Throws QuotaExceededError when the origin is out of space
        self.storage
            .set_item(key, text)
            .map_err(|e| RocketError::Storage(format!("write of {} failed: {:?}", key, e)))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| RocketError::Storage(format!("{:?}", e)))
    }

    fn backend_name(&self) -> &str {
        "localstorage"
    }
}
