//! Background message router.
//!
//! One actor task owns the authoritative `Store` and its `SyncBridge`;
//! every other context reaches it through `Router` handles. Single
//! ownership makes the write path race-free without locks, and the
//! envelope's oneshot makes the reply contract structural: exactly one
//! answer per request, on every path, including undecodable input.
//!
//! ## Architecture
//!
//! ```text
//! popup ────┐
//! content ──┼─ Envelope{json, oneshot} ──► router task ──► Store
//! wire ─────┘                                   │            │
//!                                               ▼            ▼
//!                                           TabHost      SyncBridge
//! ```

use std::sync::Arc;

use glint_core::{ActionDraft, ActionId, ActionPatch, ActionRecord, ProtocolError, StoreError};
use glint_store::{Store, SyncBridge};
use tokio::sync::{mpsc, oneshot};

use crate::host::TabHost;
use crate::message::{decode_request, Request, Response};

/// Request queue depth for the router task.
const REQUEST_BUFFER: usize = 32;

/// One in-flight request and its reply slot.
pub struct Envelope {
    pub request: serde_json::Value,
    pub reply: oneshot::Sender<Response>,
}

/// Cloneable handle to the background router task.
#[derive(Clone)]
pub struct Router {
    tx: mpsc::Sender<Envelope>,
}

impl Router {
    /// Start the router task around an initial store.
    pub fn spawn(store: Store, bridge: SyncBridge, tabs: Arc<dyn TabHost>) -> Self {
        let (tx, rx) = mpsc::channel(REQUEST_BUFFER);
        tokio::spawn(run_loop(rx, store, bridge, tabs));
        Self { tx }
    }

    /// Send a typed request and wait for its reply.
    pub async fn request(&self, request: Request) -> Result<Response, ProtocolError> {
        let value = serde_json::to_value(&request)
            .map_err(|e| ProtocolError::Unsupported(e.to_string()))?;
        self.request_value(value).await
    }

    /// Wire entry point: raw JSON straight off the messaging substrate.
    pub async fn request_value(
        &self,
        request: serde_json::Value,
    ) -> Result<Response, ProtocolError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Envelope {
                request,
                reply: reply_tx,
            })
            .await
            .map_err(|_| ProtocolError::RouterUnavailable)?;
        reply_rx.await.map_err(|_| ProtocolError::ReplyDropped)
    }

    // -------------------------------------------------------------------------
    // Typed conveniences
    // -------------------------------------------------------------------------

    /// Fetch the full shortcut collection.
    pub async fn shortcuts(&self) -> Result<Vec<ActionRecord>, ProtocolError> {
        match self.request(Request::GetShortcuts).await? {
            Response::Shortcuts { shortcuts } => Ok(shortcuts),
            Response::Ack { error, .. } => Err(ProtocolError::Rejected(
                error.unwrap_or_else(|| "unexpected reply shape".to_string()),
            )),
        }
    }

    pub async fn create_shortcut(&self, payload: ActionDraft) -> Result<(), ProtocolError> {
        expect_ack(self.request(Request::CreateShortcut { payload }).await?)
    }

    pub async fn update_shortcut(
        &self,
        id: ActionId,
        updates: ActionPatch,
    ) -> Result<(), ProtocolError> {
        expect_ack(self.request(Request::UpdateShortcut { id, updates }).await?)
    }

    pub async fn delete_shortcut(&self, id: ActionId) -> Result<(), ProtocolError> {
        expect_ack(self.request(Request::DeleteShortcut { id }).await?)
    }

    /// Ask the host to open a tab.
    pub async fn open_tab(&self, url: impl Into<String>) -> Result<(), ProtocolError> {
        expect_ack(self.request(Request::OpenTab { url: url.into() }).await?)
    }
}

fn expect_ack(response: Response) -> Result<(), ProtocolError> {
    match response {
        Response::Ack { success: true, .. } => Ok(()),
        Response::Ack { error, .. } => Err(ProtocolError::Rejected(
            error.unwrap_or_else(|| "request failed".to_string()),
        )),
        Response::Shortcuts { .. } => {
            Err(ProtocolError::Rejected("unexpected reply shape".to_string()))
        }
    }
}

// =============================================================================
// Router task
// =============================================================================

async fn run_loop(
    mut requests: mpsc::Receiver<Envelope>,
    mut store: Store,
    bridge: SyncBridge,
    tabs: Arc<dyn TabHost>,
) {
    store.ensure_defaults();
    match bridge.pull(&mut store).await {
        Ok(true) => tracing::debug!("Hydrated {} actions from storage", store.action_count()),
        Ok(false) => tracing::debug!("No stored actions yet"),
        Err(err) => tracing::error!("Initial hydrate failed: {err}"),
    }

    while let Some(Envelope { request, reply }) = requests.recv().await {
        let response = handle(&mut store, &bridge, &tabs, request).await;
        if reply.send(response).is_err() {
            tracing::debug!("Requester went away before the reply");
        }
    }

    tracing::debug!("Router task stopped");
}

async fn handle(
    store: &mut Store,
    bridge: &SyncBridge,
    tabs: &Arc<dyn TabHost>,
    request: serde_json::Value,
) -> Response {
    let request = match decode_request(request) {
        Ok(request) => request,
        // Answer even what we cannot parse, so senders never hang.
        Err(ProtocolError::Unsupported(tag)) => {
            tracing::warn!("Rejected inbound message with tag '{tag}'");
            return Response::failure(format!("unsupported message: {tag}"));
        }
        Err(err) => {
            tracing::warn!("Rejected inbound message: {err}");
            return Response::failure("unsupported message".to_string());
        }
    };

    match request {
        Request::GetShortcuts => Response::shortcuts(store.actions().to_vec()),

        Request::CreateShortcut { payload } => {
            mutate(store, bridge, |s| s.create_action(payload).map(drop)).await
        }

        Request::UpdateShortcut { id, updates } => {
            mutate(store, bridge, |s| s.update_action(&id, updates).map(drop)).await
        }

        Request::DeleteShortcut { id } => {
            // Deleting an absent id still acks; the push keeps storage
            // aligned either way.
            mutate(store, bridge, |s| {
                s.delete_action(&id);
                Ok(())
            })
            .await
        }

        Request::OpenTab { url } => match tabs.open_tab(&url).await {
            Ok(()) => Response::success(),
            Err(err) => {
                tracing::warn!("Open tab failed: {err}");
                Response::failure(err.to_string())
            }
        },
    }
}

/// Apply a store mutation, then push the snapshot. A push failure acks
/// `success:false` but leaves the local mutation in place; the next
/// successful push re-converges storage.
async fn mutate(
    store: &mut Store,
    bridge: &SyncBridge,
    op: impl FnOnce(&mut Store) -> Result<(), StoreError>,
) -> Response {
    if let Err(err) = op(store) {
        return Response::failure(err.to_string());
    }

    match bridge.push(store).await {
        Ok(()) => Response::success(),
        Err(err) => {
            tracing::error!("Sync push failed: {err}");
            Response::failure(err.to_string())
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
