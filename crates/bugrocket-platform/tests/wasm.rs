//! WASM-target tests for bugrocket-platform (Node.js runtime).
//!
//! Tests MemoryStorage and the archive built on it under
//! wasm32-unknown-unknown via `wasm-pack test --node`.
//!
//! localStorage needs a real browser: `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use bugrocket_core::archive::Archive;
use bugrocket_core::ports::StoragePort;
use bugrocket_platform::storage::{LocalStorage, MemoryStorage, auto_detect_storage};
use bugrocket_types::archive::ArchiveEntry;
use bugrocket_types::code::MirroredCode;
use bugrocket_types::config::StorageBackendType;
use bugrocket_types::message::Message;
use bugrocket_types::persona::Persona;
use chrono::NaiveDate;
use std::rc::Rc;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn entry(id: &str) -> ArchiveEntry {
    ArchiveEntry {
        id: id.to_string(),
        title: "Fix my loop...".to_string(),
        date: today(),
        persona: Persona::Debug,
        messages: vec![Message::user("Fix my loop"), Message::assistant("```js\nfor(;;){}\n```")],
        code: MirroredCode::new("js", "for(;;){}"),
    }
}

// ─── MemoryStorage Tests ─────────────────────────────────

#[wasm_bindgen_test]
fn memory_storage_backend_name() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.backend_name(), "memory");
}

#[wasm_bindgen_test]
async fn memory_storage_set_and_get() {
    let storage = MemoryStorage::new();
    storage.set("key1", b"value1").await.unwrap();
    let result = storage.get("key1").await.unwrap();
    assert_eq!(result, Some(b"value1".to_vec()));
}

#[wasm_bindgen_test]
async fn memory_storage_delete() {
    let storage = MemoryStorage::new();
    storage.set("key", b"val").await.unwrap();
    storage.delete("key").await.unwrap();
    assert!(storage.get("key").await.unwrap().is_none());
}

#[wasm_bindgen_test]
async fn memory_storage_large_archive() {
    let storage = MemoryStorage::new();
    let large = vec![b'x'; 100_000];
    storage.set("large", &large).await.unwrap();
    let result = storage.get("large").await.unwrap().unwrap();
    assert_eq!(result.len(), 100_000);
}

#[wasm_bindgen_test]
fn auto_detect_memory_when_configured() {
    let storage = auto_detect_storage(&StorageBackendType::Memory);
    assert_eq!(storage.backend_name(), "memory");
}

#[wasm_bindgen_test]
fn auto_detect_without_window_falls_back() {
    // Node has no window, so localStorage cannot open
    assert!(LocalStorage::open().is_err());
    let storage = auto_detect_storage(&StorageBackendType::Auto);
    assert_eq!(storage.backend_name(), "memory");
}

// ─── Archive Tests (built on MemoryStorage) ──────────────

#[wasm_bindgen_test]
async fn archive_survives_reload() {
    let storage: Rc<dyn StoragePort> = Rc::new(MemoryStorage::new());
    let archive = Archive::new(storage.clone(), "bugrocket-lite-history");
    archive.upsert(entry("1")).await.unwrap();
    archive.upsert(entry("2")).await.unwrap();

    let reloaded = Archive::new(storage, "bugrocket-lite-history");
    assert_eq!(reloaded.load(today()).await.unwrap(), 2);
    assert_eq!(reloaded.entries()[0].id, "2");
    assert_eq!(reloaded.get("1"), Some(entry("1")));
}

#[wasm_bindgen_test]
async fn archive_reads_legacy_blob() {
    let legacy = br#"[{"id": 1700000000000, "title": "old", "date": "3/14/2024",
        "messages": [{"role": "user", "content": "hi"}], "code": "print(1)"}]"#;
    let storage: Rc<dyn StoragePort> =
        Rc::new(MemoryStorage::with_entry("bugrocket-lite-history", legacy));
    let archive = Archive::new(storage, "bugrocket-lite-history");
    assert_eq!(archive.load(today()).await.unwrap(), 1);

    let restored = &archive.entries()[0];
    assert_eq!(restored.id, "1700000000000");
    assert_eq!(restored.persona, Persona::Chat);
    assert_eq!(restored.date, NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
    assert_eq!(restored.code.content, "print(1)");
}
