//! Key/value settings.
//!
//! Settings are schemaless JSON values keyed by convention. The keys the
//! core itself reads live in [`setting_keys`], with defaults seeded on
//! first run by the store.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// A single persisted setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingRecord {
    /// Setting key, e.g. "theme".
    pub key: String,

    /// JSON value.
    pub value: serde_json::Value,

    /// Last write time in unix millis.
    pub updated_at: u64,
}

/// Well-known setting keys.
pub mod setting_keys {
    /// UI theme: "light" or "dark".
    pub const THEME: &str = "theme";

    /// Default web search engine id.
    pub const SEARCH_ENGINE: &str = "searchEngine";

    /// Whether page-level chords are active.
    pub const SHORTCUTS_ENABLED: &str = "shortcutsEnabled";
}

/// Defaults seeded when a key is absent.
pub fn default_settings() -> Vec<(&'static str, serde_json::Value)> {
    vec![
        (setting_keys::THEME, serde_json::json!("light")),
        (setting_keys::SEARCH_ENGINE, serde_json::json!("google")),
        (setting_keys::SHORTCUTS_ENABLED, serde_json::json!(true)),
    ]
}

/// Current unix time in milliseconds.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
