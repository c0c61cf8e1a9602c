//! Session archive: the repository over persisted `ArchiveEntry` snapshots.
//!
//! The whole archive lives under a single storage key as a JSON array,
//! most recently touched entry first. The in-memory copy is authoritative;
//! storage is written through on every mutation and a failed write does
//! not roll memory back.

use std::cell::RefCell;
use std::rc::Rc;
use chrono::NaiveDate;
use serde_json::Value;
use bugrocket_types::{
    Result, RocketError,
    archive::{ArchiveEntry, StoredEntry},
};
use crate::ports::StoragePort;

pub struct Archive {
    storage: Rc<dyn StoragePort>,
    key: String,
    entries: RefCell<Vec<ArchiveEntry>>,
}

impl Archive {
    pub fn new(storage: Rc<dyn StoragePort>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            entries: RefCell::new(Vec::new()),
        }
    }

    pub fn backend_name(&self) -> &str {
        self.storage.backend_name()
    }

    /// Read the archive from storage, replacing the in-memory copy.
    /// Returns the number of entries that survived validation.
    pub async fn load(&self, today: NaiveDate) -> Result<usize> {
        let Some(bytes) = self.storage.get(&self.key).await? else {
            self.entries.borrow_mut().clear();
            return Ok(0);
        };
        let entries = decode_entries(&bytes, today)?;
        let count = entries.len();
        *self.entries.borrow_mut() = entries;
        log::info!("Archive loaded: {} entries from {}", count, self.backend_name());
        Ok(count)
    }

    /// Insert or replace the entry with the same id and move it to the front.
    pub async fn upsert(&self, entry: ArchiveEntry) -> Result<()> {
        {
            let mut entries = self.entries.borrow_mut();
            entries.retain(|e| e.id != entry.id);
            entries.insert(0, entry);
        }
        self.persist().await
    }

    /// Delete one entry. Returns false if no entry had that id.
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let removed = {
            let mut entries = self.entries.borrow_mut();
            let before = entries.len();
            entries.retain(|e| e.id != id);
            entries.len() != before
        };
        if removed {
            self.persist().await?;
        }
        Ok(removed)
    }

    pub async fn clear(&self) -> Result<()> {
        self.entries.borrow_mut().clear();
        self.storage.delete(&self.key).await
    }

    pub fn get(&self, id: &str) -> Option<ArchiveEntry> {
        self.entries.borrow().iter().find(|e| e.id == id).cloned()
    }

    pub fn entries(&self) -> Vec<ArchiveEntry> {
        self.entries.borrow().clone()
    }

    /// Borrow the entries without cloning them, e.g. for rendering.
    pub fn with_entries<R>(&self, f: impl FnOnce(&[ArchiveEntry]) -> R) -> R {
        f(&self.entries.borrow())
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    async fn persist(&self) -> Result<()> {
        let bytes = serde_json::to_vec(&*self.entries.borrow())?;
        self.storage.set(&self.key, &bytes).await
    }
}

/// Parse a stored archive, validating entry by entry.
///
/// A blob that is not a JSON array is an error. Individual entries that fail
/// validation are skipped, and a duplicate id keeps its first (newest) entry.
pub fn decode_entries(bytes: &[u8], today: NaiveDate) -> Result<Vec<ArchiveEntry>> {
    let raw: Vec<Value> = serde_json::from_slice(bytes)
        .map_err(|e| RocketError::InvalidArchive(e.to_string()))?;

    let mut entries: Vec<ArchiveEntry> = Vec::with_capacity(raw.len());
    for (index, value) in raw.into_iter().enumerate() {
        let parsed = serde_json::from_value::<StoredEntry>(value)
            .map_err(RocketError::from)
            .and_then(|stored| stored.validate(today));
        match parsed {
            Ok(entry) if entries.iter().any(|e| e.id == entry.id) => {
                log::warn!("Archive entry {} duplicates id {}, skipped", index, entry.id);
            }
            Ok(entry) => entries.push(entry),
            Err(e) => log::warn!("Archive entry {} skipped: {}", index, e),
        }
    }
    Ok(entries)
}
