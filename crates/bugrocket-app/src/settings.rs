//! Persisted client configuration.

use bugrocket_core::ports::StoragePort;
use bugrocket_types::{Result, config::AppConfig};

pub const CONFIG_STORAGE_KEY: &str = "bugrocket:config";

/// Read the saved config, falling back to defaults when it is missing or
/// unreadable.
pub async fn load_config(store: &dyn StoragePort) -> AppConfig {
    match store.get(CONFIG_STORAGE_KEY).await {
        Ok(Some(data)) => decode_config(&data),
        Ok(None) => AppConfig::default(),
        Err(e) => {
            log::warn!("Config could not be read ({}), using defaults", e);
            AppConfig::default()
        }
    }
}

pub fn decode_config(data: &[u8]) -> AppConfig {
    match serde_json::from_slice::<AppConfig>(data) {
        Ok(config) => {
            log::info!("Config restored from storage");
            config
        }
        Err(e) => {
            log::warn!("Stored config is invalid ({}), using defaults", e);
            AppConfig::default()
        }
    }
}

pub async fn save_config(store: &dyn StoragePort, config: &AppConfig) -> Result<()> {
    let json = serde_json::to_vec(config)?;
    store.set(CONFIG_STORAGE_KEY, &json).await?;
    log::info!("Config saved to storage");
    Ok(())
}
