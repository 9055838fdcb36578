//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::state::DesignState;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    designs: RwLock<HashMap<String, DesignState>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_error(e: impl std::fmt::Display) -> StorageError {
        StorageError::Other(format!("Lock error: {}", e))
    }
}

impl Storage for MemoryStorage {
    fn save(&self, key: &str, design: &DesignState) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        let design = design.clone();
        Box::pin(async move {
            let mut designs = self.designs.write().map_err(Self::lock_error)?;
            designs.insert(key, design);
            Ok(())
        })
    }

    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<DesignState>> {
        let key = key.to_string();
        Box::pin(async move {
            let designs = self.designs.read().map_err(Self::lock_error)?;
            designs
                .get(&key)
                .cloned()
                .ok_or(StorageError::NotFound(key))
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        Box::pin(async move {
            let mut designs = self.designs.write().map_err(Self::lock_error)?;
            designs.remove(&key);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let designs = self.designs.read().map_err(Self::lock_error)?;
            let mut keys: Vec<String> = designs.keys().cloned().collect();
            keys.sort();
            Ok(keys)
        })
    }

    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let key = key.to_string();
        Box::pin(async move {
            let designs = self.designs.read().map_err(Self::lock_error)?;
            Ok(designs.contains_key(&key))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let mut design = DesignState::new();
        design.name = "Summer tee".into();

        block_on(storage.save("summer", &design)).unwrap();
        let loaded = block_on(storage.load("summer")).unwrap();

        assert_eq!(loaded, design);
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = block_on(storage.load("nonexistent"));

        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_exists_and_delete() {
        let storage = MemoryStorage::new();
        let design = DesignState::new();

        assert!(!block_on(storage.exists("test")).unwrap());
        block_on(storage.save("test", &design)).unwrap();
        assert!(block_on(storage.exists("test")).unwrap());

        block_on(storage.delete("test")).unwrap();
        assert!(!block_on(storage.exists("test")).unwrap());
    }

    #[test]
    fn test_list_sorted() {
        let storage = MemoryStorage::new();
        let design = DesignState::new();

        block_on(storage.save("b", &design)).unwrap();
        block_on(storage.save("a", &design)).unwrap();

        let list = block_on(storage.list()).unwrap();
        assert_eq!(list, vec!["a".to_string(), "b".to_string()]);
    }
}
