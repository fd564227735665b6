//! Storage area abstraction.
//!
//! The host provides the durable key-value substrate (in a browser build,
//! the extension storage APIs). The core talks to it through `StorageArea`
//! so the sync bridge and contexts stay testable without a host.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;

use glint_core::SyncError;

/// A durable key-value area.
#[async_trait]
pub trait StorageArea: Send + Sync {
    /// Read a value by key. Missing keys are `None`, not an error.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, SyncError>;

    /// Write a value under a key.
    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), SyncError>;
}

// =============================================================================
// Memory Area
// =============================================================================

/// In-process area. Backs tests and embedded single-process setups where
/// several contexts share one substrate.
#[derive(Default)]
pub struct MemoryArea {
    entries: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryArea {
    /// Create an empty area.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl StorageArea for MemoryArea {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, SyncError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), SyncError> {
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }
}

// =============================================================================
// JSON File Area
// =============================================================================

/// File-backed area: one JSON object per file, keys at the top level.
///
/// For local development hosts. Reads and rewrites the whole document per
/// operation, which is fine at the single-small-key scale the bridge uses.
pub struct JsonFileArea {
    path: PathBuf,
}

impl JsonFileArea {
    /// Create an area backed by the given file. The file is created on
    /// first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_document(&self) -> Result<serde_json::Map<String, serde_json::Value>, SyncError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => {
                let value: serde_json::Value =
                    serde_json::from_str(&raw).map_err(|e| SyncError::Codec(e.to_string()))?;
                match value {
                    serde_json::Value::Object(map) => Ok(map),
                    _ => Err(SyncError::Codec(format!(
                        "{} does not hold a JSON object",
                        self.path.display()
                    ))),
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(serde_json::Map::new()),
            Err(e) => Err(SyncError::Area(e.to_string())),
        }
    }
}

#[async_trait]
impl StorageArea for JsonFileArea {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, SyncError> {
        let document = self.read_document().await?;
        Ok(document.get(key).cloned())
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), SyncError> {
        let mut document = self.read_document().await?;
        document.insert(key.to_string(), value);
        let raw = serde_json::to_string_pretty(&serde_json::Value::Object(document))
            .map_err(|e| SyncError::Codec(e.to_string()))?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| SyncError::Area(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_area_round_trip() {
        let area = MemoryArea::new();
        assert_eq!(area.get("missing").await.unwrap(), None);

        area.set("k", serde_json::json!({"x": 1})).await.unwrap();
        assert_eq!(area.get("k").await.unwrap(), Some(serde_json::json!({"x": 1})));
        assert_eq!(area.len(), 1);
    }

    #[tokio::test]
    async fn test_json_file_area_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let area = JsonFileArea::new(dir.path().join("area.json"));

        // Missing file reads as empty.
        assert_eq!(area.get("actions").await.unwrap(), None);

        area.set("actions", serde_json::json!([1, 2, 3]))
            .await
            .unwrap();
        area.set("other", serde_json::json!("kept")).await.unwrap();

        assert_eq!(
            area.get("actions").await.unwrap(),
            Some(serde_json::json!([1, 2, 3]))
        );
        assert_eq!(area.get("other").await.unwrap(), Some(serde_json::json!("kept")));
    }

    #[tokio::test]
    async fn test_json_file_area_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("area.json");
        tokio::fs::write(&path, "[1, 2]").await.unwrap();

        let area = JsonFileArea::new(path);
        assert!(matches!(area.get("k").await, Err(SyncError::Codec(_))));
    }
}
