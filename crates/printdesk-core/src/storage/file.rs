//! File-based storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::state::DesignState;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each design as a pretty-printed JSON file in a directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Store designs under `base_path`, creating it if missing.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Storage under the platform's local data directory.
    ///
    /// On Linux: `~/.local/share/printdesk/designs/`
    /// On Windows: `%LOCALAPPDATA%\printdesk\designs\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("printdesk").join("designs"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Keys are reduced to `[A-Za-z0-9_-]` before becoming file names, so
    /// keys differing only in other characters (`a/b`, `a_b`) share a file.
    fn design_path(&self, key: &str) -> PathBuf {
        let safe_key: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_path.join(format!("{}.json", safe_key))
    }
}

impl Storage for FileStorage {
    fn save(&self, key: &str, design: &DesignState) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.design_path(key);
        let json = design.to_json();

        Box::pin(async move {
            let json = json.map_err(|e| StorageError::Serialization(e.to_string()))?;
            fs::write(&path, json).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {}", path.display(), e))
            })?;
            log::debug!("Saved design to {}", path.display());
            Ok(())
        })
    }

    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<DesignState>> {
        let path = self.design_path(key);
        let key = key.to_string();

        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(key));
            }

            let json = fs::read_to_string(&path).map_err(|e| {
                StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
            })?;

            DesignState::from_json(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
            })
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.design_path(key);

        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();

        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }

            let entries = fs::read_dir(&base)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

            let mut keys: Vec<String> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|e| e == "json"))
                .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
                .collect();
            keys.sort();
            Ok(keys)
        })
    }

    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.design_path(key);
        Box::pin(async move { Ok(path.exists()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;
    use tempfile::tempdir;

    #[test]
    fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        let mut design = DesignState::new();
        design.name = "Band merch".to_string();
        design.product_type = "hoodie".to_string();

        block_on(storage.save("band-merch", &design)).unwrap();
        let loaded = block_on(storage.load("band-merch")).unwrap();

        assert_eq!(loaded, design);
    }

    #[test]
    fn test_file_storage_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        let result = block_on(storage.load("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        let result = block_on(storage.load("broken"));
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_file_storage_list_and_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let design = DesignState::new();
        block_on(storage.save("one", &design)).unwrap();
        block_on(storage.save("two", &design)).unwrap();
        assert_eq!(
            block_on(storage.list()).unwrap(),
            vec!["one".to_string(), "two".to_string()]
        );

        block_on(storage.delete("one")).unwrap();
        assert!(!block_on(storage.exists("one")).unwrap());
        assert!(block_on(storage.exists("two")).unwrap());
    }

    #[test]
    fn test_file_storage_sanitizes_key() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        let design = DesignState::new();
        block_on(storage.save("team/logo:v2*final", &design)).unwrap();

        assert!(dir.path().join("team_logo_v2_final.json").exists());
        let loaded = block_on(storage.load("team/logo:v2*final")).unwrap();
        assert_eq!(loaded, design);
    }

    #[test]
    fn test_file_storage_key_is_ascii_only() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        block_on(storage.save("café", &DesignState::new())).unwrap();
        assert!(dir.path().join("caf_.json").exists());
        assert_eq!(block_on(storage.list()).unwrap(), vec!["caf_".to_string()]);
    }
}
