//! Editor configuration.

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::reducer::DEFAULT_DUPLICATE_OFFSET;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Maximum number of undo steps kept (0 = unbounded).
    pub history_limit: usize,
    /// Offset applied in both axes to duplicated objects.
    pub duplicate_offset: f64,
    /// Record a whole drag/scale/rotate gesture as one undo step. When off,
    /// every interactive frame is its own step.
    pub coalesce_gestures: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            duplicate_offset: DEFAULT_DUPLICATE_OFFSET,
            coalesce_gestures: true,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r#"{ "historyLimit": 5 }"#).unwrap();
        assert_eq!(config.history_limit, 5);
        assert!((config.duplicate_offset - DEFAULT_DUPLICATE_OFFSET).abs() < f64::EPSILON);
        assert!(config.coalesce_gestures);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            EditorConfig::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");
        std::fs::write(&path, r#"{ "coalesceGestures": false, "duplicateOffset": 8 }"#).unwrap();

        let config = EditorConfig::load(&path).unwrap();
        assert!(!config.coalesce_gestures);
        assert!((config.duplicate_offset - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_file() {
        let err = EditorConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
