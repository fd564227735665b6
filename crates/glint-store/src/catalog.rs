//! Tool catalog: live capabilities behind persisted metadata.
//!
//! Persisted action records never carry an invocable handler. Each context
//! rebuilds its catalog at startup (registering whatever tools it actually
//! hosts) and re-attaches capabilities to records by id. A record whose id
//! has no registered handler is still listed, just not invocable here.

use futures::future::BoxFuture;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use glint_core::{ActionId, ActionRecord, ToolError};

/// An invocable tool capability.
pub trait ToolHandler: Send + Sync {
    /// Run the tool.
    fn run(&self) -> BoxFuture<'static, Result<(), ToolError>>;
}

/// A persisted record paired with its local invocability.
#[derive(Debug, Clone)]
pub struct ResolvedTool {
    pub record: ActionRecord,

    /// True when this context holds a live handler for the record's id.
    pub invocable: bool,
}

/// Per-context map from action id to live handler. Never serialized.
#[derive(Default)]
pub struct ToolCatalog {
    handlers: RwLock<HashMap<ActionId, Arc<dyn ToolHandler>>>,
}

impl ToolCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an action id. Re-registering replaces.
    pub fn register(&self, id: ActionId, handler: Arc<dyn ToolHandler>) {
        tracing::debug!("Registered tool handler for {}", id.0);
        self.handlers.write().insert(id, handler);
    }

    /// Remove a handler. Returns `true` if one was registered.
    pub fn deregister(&self, id: &ActionId) -> bool {
        let removed = self.handlers.write().remove(id).is_some();
        if removed {
            tracing::debug!("Deregistered tool handler for {}", id.0);
        }
        removed
    }

    /// Get a handler by id (shared Arc).
    pub fn handler(&self, id: &ActionId) -> Option<Arc<dyn ToolHandler>> {
        self.handlers.read().get(id).cloned()
    }

    /// Number of registered handlers.
    pub fn count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Pair pulled records with this context's live handlers.
    pub fn rehydrate(&self, records: &[ActionRecord]) -> Vec<ResolvedTool> {
        let handlers = self.handlers.read();
        records
            .iter()
            .map(|record| ResolvedTool {
                record: record.clone(),
                invocable: handlers.contains_key(&record.id),
            })
            .collect()
    }

    /// Invoke the handler registered for an id.
    pub async fn invoke(&self, id: &ActionId) -> Result<(), ToolError> {
        // Clone out of the lock before awaiting.
        let handler = self
            .handler(id)
            .ok_or_else(|| ToolError::Unregistered(id.0.clone()))?;
        handler.run().await
    }
}
