//! Local collections and their laws.
//!
//! A `Store` is owned by exactly one context and mutated only from that
//! context's event loop, so operations are plain synchronous methods that
//! run to completion in issue order. Cross-context visibility goes through
//! the sync bridge, never through shared memory.

use std::collections::HashMap;

use glint_core::{
    default_settings, normalize_hex, now_millis, push_recent, ActionDraft, ActionId, ActionPatch,
    ActionRecord, Chord, RecentColor, SearchEngine, SettingRecord, StoreError,
};

/// The three local collections.
#[derive(Debug, Default)]
pub struct Store {
    /// Actions in insertion order.
    actions: Vec<ActionRecord>,

    /// Settings keyed by name.
    settings: HashMap<String, SettingRecord>,

    /// Recently picked colors, most recent first.
    colors: Vec<RecentColor>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Create a new action from a draft. Assigns a fresh id.
    pub fn create_action(&mut self, draft: ActionDraft) -> Result<ActionRecord, StoreError> {
        if draft.name.trim().is_empty() {
            return Err(StoreError::Validation("action name is empty".to_string()));
        }

        let record = ActionRecord {
            id: ActionId::generate(),
            name: draft.name,
            description: none_if_empty(draft.description),
            shortcut: none_if_empty(draft.shortcut),
            icon: none_if_empty(draft.icon),
            tags: draft.tags,
        };

        tracing::debug!("Created action '{}' ({})", record.name, record.id.0);
        self.actions.push(record.clone());
        Ok(record)
    }

    /// All actions, in insertion order.
    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    /// Look up an action by id.
    pub fn action(&self, id: &ActionId) -> Option<&ActionRecord> {
        self.actions.iter().find(|a| &a.id == id)
    }

    /// First action whose shortcut matches the pressed chord, if any.
    ///
    /// Records with no shortcut or an unparseable shortcut never match.
    pub fn action_by_shortcut(&self, pressed: &Chord) -> Option<&ActionRecord> {
        self.actions.iter().find(|a| {
            a.shortcut
                .as_deref()
                .and_then(|s| Chord::parse(s).ok())
                .is_some_and(|chord| chord.matches(pressed))
        })
    }

    /// Apply a partial update to an existing action.
    ///
    /// Only patched fields change. Patching an optional text field to an
    /// empty string clears it; patching `name` to an empty string is a
    /// validation error.
    pub fn update_action(
        &mut self,
        id: &ActionId,
        patch: ActionPatch,
    ) -> Result<ActionRecord, StoreError> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(StoreError::Validation("action name is empty".to_string()));
            }
        }

        let record = self
            .actions
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| StoreError::NotFound(id.0.clone()))?;

        if let Some(name) = patch.name {
            record.name = name;
        }
        if let Some(description) = patch.description {
            record.description = none_if_empty(Some(description));
        }
        if let Some(shortcut) = patch.shortcut {
            record.shortcut = none_if_empty(Some(shortcut));
        }
        if let Some(icon) = patch.icon {
            record.icon = none_if_empty(Some(icon));
        }
        if let Some(tags) = patch.tags {
            record.tags = tags;
        }

        tracing::debug!("Updated action {}", record.id.0);
        Ok(record.clone())
    }

    /// Delete an action by id. Deleting an absent id is not an error.
    ///
    /// Returns `true` if a record was removed.
    pub fn delete_action(&mut self, id: &ActionId) -> bool {
        let before = self.actions.len();
        self.actions.retain(|a| &a.id != id);
        let removed = self.actions.len() != before;
        if removed {
            tracing::debug!("Deleted action {}", id.0);
        }
        removed
    }

    /// Replace the whole collection with a pulled snapshot.
    pub fn replace_actions(&mut self, records: Vec<ActionRecord>) {
        tracing::debug!("Replaced action collection ({} records)", records.len());
        self.actions = records;
    }

    /// Number of actions.
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Look up a setting record.
    pub fn setting(&self, key: &str) -> Option<&SettingRecord> {
        self.settings.get(key)
    }

    /// Look up a setting's value.
    pub fn setting_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.settings.get(key).map(|s| &s.value)
    }

    /// Upsert a setting, bumping its `updated_at`.
    pub fn set_setting(&mut self, key: impl Into<String>, value: serde_json::Value) {
        let key = key.into();
        let record = SettingRecord {
            key: key.clone(),
            value,
            updated_at: now_millis(),
        };
        self.settings.insert(key, record);
    }

    /// Seed documented defaults for keys that are absent. Present keys are
    /// left alone.
    pub fn ensure_defaults(&mut self) {
        for (key, value) in default_settings() {
            if !self.settings.contains_key(key) {
                self.set_setting(key, value);
            }
        }
    }

    /// Configured search engine, defaulting when unset or malformed.
    pub fn search_engine(&self) -> SearchEngine {
        self.setting_value(glint_core::setting_keys::SEARCH_ENGINE)
            .and_then(|v| v.as_str())
            .map(SearchEngine::from_id)
            .unwrap_or_default()
    }

    /// Whether page-level chords are active. Defaults to true.
    pub fn shortcuts_enabled(&self) -> bool {
        self.setting_value(glint_core::setting_keys::SHORTCUTS_ENABLED)
            .and_then(|v| v.as_bool())
            .unwrap_or(true)
    }

    // =========================================================================
    // Recent Colors
    // =========================================================================

    /// Record a picked color. Returns the canonical "#rrggbb" form.
    pub fn touch_color(&mut self, raw: &str) -> Result<String, StoreError> {
        let value = normalize_hex(raw)?;
        push_recent(&mut self.colors, value.clone(), now_millis());
        Ok(value)
    }

    /// Recently picked colors, most recent first.
    pub fn recent_colors(&self) -> &[RecentColor] {
        &self.colors
    }
}

/// Treat empty or whitespace-only optional text as absent.
fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> ActionDraft {
        ActionDraft::named(name)
    }

    #[test]
    fn test_create_assigns_unique_ids() {
        let mut store = Store::new();
        let a = store.create_action(draft("One")).unwrap();
        let b = store.create_action(draft("Two")).unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.action(&a.id).unwrap(), &a);
        assert_eq!(store.action(&b.id).unwrap(), &b);
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let mut store = Store::new();
        assert!(matches!(
            store.create_action(draft("")),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            store.create_action(draft("   ")),
            Err(StoreError::Validation(_))
        ));
        assert_eq!(store.action_count(), 0);
    }

    #[test]
    fn test_update_is_partial() {
        let mut store = Store::new();
        let record = store
            .create_action(ActionDraft {
                name: "Color Picker".to_string(),
                description: Some("Pick a color".to_string()),
                shortcut: Some("ctrl+shift+c".to_string()),
                icon: None,
                tags: vec!["color".to_string()],
            })
            .unwrap();

        let updated = store
            .update_action(
                &record.id,
                ActionPatch {
                    description: Some("Pick any color".to_string()),
                    ..ActionPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Color Picker");
        assert_eq!(updated.description.as_deref(), Some("Pick any color"));
        assert_eq!(updated.shortcut.as_deref(), Some("ctrl+shift+c"));
        assert_eq!(updated.tags, vec!["color".to_string()]);
    }

    #[test]
    fn test_update_empty_string_clears_optional_field() {
        let mut store = Store::new();
        let record = store
            .create_action(ActionDraft {
                name: "Snip".to_string(),
                shortcut: Some("ctrl+shift+s".to_string()),
                ..ActionDraft::default()
            })
            .unwrap();

        let updated = store
            .update_action(
                &record.id,
                ActionPatch {
                    shortcut: Some(String::new()),
                    ..ActionPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.shortcut, None);
    }

    #[test]
    fn test_update_missing_id_is_not_found() {
        let mut store = Store::new();
        let result = store.update_action(
            &ActionId::from("nope"),
            ActionPatch {
                name: Some("Renamed".to_string()),
                ..ActionPatch::default()
            },
        );
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut store = Store::new();
        let record = store.create_action(draft("One")).unwrap();

        assert!(store.delete_action(&record.id));
        assert!(!store.delete_action(&record.id));
        assert!(store.action(&record.id).is_none());
    }

    #[test]
    fn test_action_by_shortcut_is_exact() {
        let mut store = Store::new();
        store
            .create_action(ActionDraft {
                name: "Web".to_string(),
                shortcut: Some("ctrl+space".to_string()),
                ..ActionDraft::default()
            })
            .unwrap();
        store
            .create_action(ActionDraft {
                name: "Tool".to_string(),
                shortcut: Some("ctrl+shift+space".to_string()),
                ..ActionDraft::default()
            })
            .unwrap();

        let pressed = Chord::from_event(" ", true, false, true, false);
        assert_eq!(store.action_by_shortcut(&pressed).unwrap().name, "Tool");

        let plain = Chord::from_event("k", false, false, false, false);
        assert!(store.action_by_shortcut(&plain).is_none());
    }

    #[test]
    fn test_ensure_defaults_does_not_clobber() {
        let mut store = Store::new();
        store.set_setting(
            glint_core::setting_keys::SEARCH_ENGINE,
            serde_json::json!("bing"),
        );
        store.ensure_defaults();

        assert_eq!(store.search_engine(), SearchEngine::Bing);
        assert_eq!(
            store.setting_value(glint_core::setting_keys::THEME),
            Some(&serde_json::json!("light"))
        );
        assert!(store.shortcuts_enabled());
    }

    #[test]
    fn test_touch_color_normalizes_and_caps() {
        let mut store = Store::new();
        for i in 0..25 {
            store.touch_color(&format!("{i:06x}")).unwrap();
        }
        store.touch_color("#FF8800").unwrap();
        store.touch_color("#f80").unwrap();

        let colors = store.recent_colors();
        assert!(colors.len() <= glint_core::RECENT_COLOR_CAP);
        // The short and long forms collapse to one front entry.
        assert_eq!(colors[0].value, "#ff8800");
        assert_eq!(
            colors.iter().filter(|c| c.value == "#ff8800").count(),
            1
        );
    }

    #[test]
    fn test_touch_color_rejects_garbage() {
        let mut store = Store::new();
        assert!(store.touch_color("not-a-color").is_err());
        assert!(store.recent_colors().is_empty());
    }
}
