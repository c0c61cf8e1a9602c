//! Pick the storage backend named in the config.
//!
//! Auto priority: localStorage → Memory (fallback)

use std::rc::Rc;
use bugrocket_core::ports::StoragePort;
use bugrocket_types::config::StorageBackendType;
use super::{LocalStorage, MemoryStorage};

/// Open the requested backend, falling back to memory if it is unavailable.
/// Returns a trait object so callers are backend-agnostic.
pub fn auto_detect_storage(backend: &StorageBackendType) -> Rc<dyn StoragePort> {
    match backend {
        StorageBackendType::Memory => {
            log::info!("Storage backend: memory (configured)");
            Rc::new(MemoryStorage::new())
        }
        StorageBackendType::Auto | StorageBackendType::LocalStorage => match LocalStorage::open() {
            Ok(local) => {
                log::info!("Storage backend: localStorage");
                Rc::new(local)
            }
            Err(e) => {
                log::warn!("localStorage unavailable ({}), falling back to memory", e);
                Rc::new(MemoryStorage::new())
            }
        },
    }
}
