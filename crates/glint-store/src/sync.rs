//! Sync bridge: action snapshots across contexts.
//!
//! The bridge replicates the Action collection through the shared durable
//! area as one whole-collection snapshot under a single key. Push happens
//! after every mutating command, pull once at context start.

use std::sync::Arc;

use glint_core::{ActionRecord, SyncError};

use crate::area::StorageArea;
use crate::store::Store;

/// The single durable key holding the serialized Action collection.
pub const ACTIONS_KEY: &str = "actions";

/// One-way snapshot replication between a `Store` and a `StorageArea`.
#[derive(Clone)]
pub struct SyncBridge {
    area: Arc<dyn StorageArea>,
}

impl SyncBridge {
    /// Create a bridge over the given area.
    pub fn new(area: Arc<dyn StorageArea>) -> Self {
        Self { area }
    }

    /// The underlying area (shared Arc).
    pub fn area(&self) -> Arc<dyn StorageArea> {
        self.area.clone()
    }

    /// Write the store's whole Action list to the durable area.
    ///
    /// Failures are surfaced to the caller and never retried here; the
    /// local mutation that preceded the push is not rolled back.
    pub async fn push(&self, store: &Store) -> Result<(), SyncError> {
        let snapshot = serde_json::to_value(store.actions())?;
        self.area.set(ACTIONS_KEY, snapshot).await?;
        tracing::debug!("Pushed {} actions to the durable area", store.action_count());
        Ok(())
    }

    /// Read the durable Action snapshot without touching a store.
    pub async fn pull_snapshot(&self) -> Result<Option<Vec<ActionRecord>>, SyncError> {
        match self.area.get(ACTIONS_KEY).await? {
            Some(value) => {
                let records: Vec<ActionRecord> = serde_json::from_value(value)?;
                tracing::debug!("Pulled {} actions from the durable area", records.len());
                Ok(Some(records))
            }
            None => Ok(None),
        }
    }

    /// Replace the store's Action collection with the durable snapshot.
    ///
    /// Destructive by design: the local collection is cleared and rebuilt
    /// from the snapshot (last writer wins at whole-collection
    /// granularity), so local edits made since the snapshot are lost. A
    /// missing key is a no-op. Returns `true` when a snapshot was applied.
    pub async fn pull(&self, store: &mut Store) -> Result<bool, SyncError> {
        match self.pull_snapshot().await? {
            Some(records) => {
                store.replace_actions(records);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
