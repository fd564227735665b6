//! Shortcut action records.
//!
//! Records are the persisted metadata layer only. Tool actions name an
//! invocable capability by id; the capability itself is registered in the
//! runtime catalog and re-attached after records are loaded.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable action identifier (UUID v4 text).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub String);

impl ActionId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl From<String> for ActionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ActionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ActionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A persisted shortcut action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Unique identifier.
    pub id: ActionId,

    /// Primary display text.
    pub name: String,

    /// Secondary display text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Key chord that triggers the action, e.g. "ctrl+shift+k".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,

    /// Icon identifier (path, emoji, or named icon).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Search tags for the tool finder.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Input for creating a new action. The store assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionDraft {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl ActionDraft {
    /// Create a draft with just a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Partial update for an existing action.
///
/// `None` fields are left unchanged. Setting an optional text field to an
/// empty string clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl ActionPatch {
    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.shortcut.is_none()
            && self.icon.is_none()
            && self.tags.is_none()
    }
}
