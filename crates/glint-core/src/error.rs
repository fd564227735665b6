//! Error types for the Glint palette.

use thiserror::Error;

/// Store errors - invalid input or missing records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input rejected before touching a collection.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No record with the given id.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Sync bridge errors.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The storage area rejected a read or write.
    #[error("Storage area error: {0}")]
    Area(String),

    /// The snapshot could not be encoded or decoded.
    #[error("Snapshot codec error: {0}")]
    Codec(String),
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::Codec(e.to_string())
    }
}

/// Suggestion adapter errors. Logged and degraded, never surfaced to the
/// palette.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Remote suggestion endpoint failed.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Payload did not match the engine's expected shape.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Messaging boundary errors.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Inbound payload did not decode to a known request.
    #[error("Unsupported message: {0}")]
    Unsupported(String),

    /// The reply channel closed before an answer arrived.
    #[error("Reply channel closed")]
    ReplyDropped,

    /// The router task is gone.
    #[error("Router unavailable")]
    RouterUnavailable,

    /// No tab is active to receive an intent.
    #[error("No active tab")]
    NoActiveTab,

    /// The tab host rejected an operation.
    #[error("Tab host error: {0}")]
    Host(String),

    /// The other side answered with a failure ack.
    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Tool invocation errors.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No live handler registered for the id.
    #[error("No handler registered for tool '{0}'")]
    Unregistered(String),

    /// The handler itself failed.
    #[error("Tool '{tool}' failed: {message}")]
    Failed { tool: String, message: String },
}

/// Native color picker errors.
#[derive(Debug, Error)]
pub enum PickerError {
    /// Host has no native picker.
    #[error("Native color picker unavailable")]
    Unsupported,

    /// User dismissed the picker.
    #[error("Pick cancelled")]
    Cancelled,

    /// Host picker failed.
    #[error("Picker error: {0}")]
    Host(String),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config directory found.
    #[error("Config directory not found")]
    NoConfigDir,

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid chord format.
    #[error("Invalid chord: {0}")]
    InvalidChord(String),
}
