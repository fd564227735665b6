//! Host substrate traits.
//!
//! The routing layer stays portable by talking to the embedder through
//! these seams: tab management, global commands, and the UI surface a
//! palette renders into. Production embedders bind them to the real
//! host; tests use the fakes at the bottom of this file.

use async_trait::async_trait;
use glint_core::ProtocolError;
use serde::{Deserialize, Serialize};

/// Host-assigned identifier for a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(pub u64);

/// Tab operations the background context needs from the host.
#[async_trait]
pub trait TabHost: Send + Sync {
    /// Open a new tab at `url`.
    async fn open_tab(&self, url: &str) -> Result<(), ProtocolError>;

    /// The currently focused tab, if any.
    async fn active_tab(&self) -> Option<TabId>;
}

/// Global command activations (host-level keyboard shortcuts that work
/// even when no page script runs).
#[async_trait]
pub trait CommandHost: Send + Sync {
    /// The next activated command name, or `None` when the stream ends.
    async fn next_command(&self) -> Option<String>;
}

/// UI callbacks a palette surface must provide.
pub trait SurfaceHost: Send + Sync {
    /// Move keyboard focus to the palette input element.
    fn focus_input(&self);

    /// The palette closed; remove the surface.
    fn dismissed(&self);
}

// =============================================================================
// Test fakes
// =============================================================================
