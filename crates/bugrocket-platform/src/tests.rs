#[cfg(test)]
mod tests {
    use crate::storage::MemoryStorage;
    use bugrocket_core::ports::StoragePort;
    use futures::executor::block_on;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        block_on(async {
            assert!(storage.get("k").await.unwrap().is_none());
            storage.set("k", b"v1").await.unwrap();
            storage.set("k", b"v2").await.unwrap();
            assert_eq!(storage.get("k").await.unwrap(), Some(b"v2".to_vec()));
            storage.delete("k").await.unwrap();
            assert!(storage.get("k").await.unwrap().is_none());
        });
    }

    #[test]
    fn test_memory_storage_delete_missing_is_ok() {
        let storage = MemoryStorage::new();
        assert!(block_on(storage.delete("nope")).is_ok());
    }

    #[test]
    fn test_memory_storage_keys_are_independent() {
        let storage = MemoryStorage::new();
        block_on(async {
            storage.set("bugrocket:config", b"{}").await.unwrap();
            storage.set("bugrocket-lite-history", b"[]").await.unwrap();
            storage.delete("bugrocket:config").await.unwrap();
            assert_eq!(
                storage.get("bugrocket-lite-history").await.unwrap(),
                Some(b"[]".to_vec())
            );
        });
    }

    #[test]
    fn test_memory_storage_with_entry() {
        let storage = MemoryStorage::with_entry("history", b"[]");
        assert_eq!(block_on(storage.get("history")).unwrap(), Some(b"[]".to_vec()));
    }
}
