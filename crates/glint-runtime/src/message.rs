//! Wire messages exchanged between contexts.
//!
//! Every payload that crosses a context boundary is JSON with a
//! SCREAMING_SNAKE `type` tag. The tag names are a compatibility
//! surface: stored queues and remote peers may hold serialized messages,
//! so renaming a variant is a breaking change.

use glint_core::{ActionDraft, ActionId, ActionPatch, ActionRecord, PaletteMode, ProtocolError};
use serde::{Deserialize, Serialize};

// =============================================================================
// Requests
// =============================================================================

/// Requests answered by the background router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    /// Read the full shortcut collection.
    GetShortcuts,

    /// Create a shortcut from a draft.
    CreateShortcut { payload: ActionDraft },

    /// Patch an existing shortcut.
    UpdateShortcut { id: ActionId, updates: ActionPatch },

    /// Remove a shortcut.
    DeleteShortcut { id: ActionId },

    /// Open a new tab at the given URL.
    OpenTab { url: String },
}

/// Decode a raw wire payload into a request. The failure carries the
/// offending tag so the router can name it in its reply.
pub fn decode_request(value: serde_json::Value) -> Result<Request, ProtocolError> {
    let tag = value
        .get("type")
        .and_then(|t| t.as_str())
        .unwrap_or("(untagged)")
        .to_string();
    serde_json::from_value(value).map_err(|_| ProtocolError::Unsupported(tag))
}

// =============================================================================
// Responses
// =============================================================================

/// Replies from the background router. Exactly one per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    /// Answer to `GetShortcuts`.
    Shortcuts { shortcuts: Vec<ActionRecord> },

    /// Acknowledgement for everything else.
    Ack {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl Response {
    pub fn shortcuts(shortcuts: Vec<ActionRecord>) -> Self {
        Response::Shortcuts { shortcuts }
    }

    pub fn success() -> Self {
        Response::Ack {
            success: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Response::Ack {
            success: false,
            error: Some(error.into()),
        }
    }
}

// =============================================================================
// Intents
// =============================================================================

/// Fire-and-forget nudges from the background to a tab's content context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    /// Open the web search palette.
    OpenWebSearch,

    /// Open the tool finder palette.
    OpenToolFinder,
}

impl Intent {
    /// The palette mode this intent opens.
    pub fn mode(self) -> PaletteMode {
        match self {
            Intent::OpenWebSearch => PaletteMode::Web,
            Intent::OpenToolFinder => PaletteMode::Tool,
        }
    }
}

/// Map a named host command to its intent.
pub fn intent_for_command(name: &str) -> Option<Intent> {
    match name {
        "open-web-search" => Some(Intent::OpenWebSearch),
        "open-tool-finder" => Some(Intent::OpenToolFinder),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_tags_are_screaming_snake() {
        let encoded = serde_json::to_value(Request::GetShortcuts).unwrap();
        assert_eq!(encoded, json!({ "type": "GET_SHORTCUTS" }));

        let encoded = serde_json::to_value(Request::OpenTab {
            url: "https://example.com".to_string(),
        })
        .unwrap();
        assert_eq!(
            encoded,
            json!({ "type": "OPEN_TAB", "url": "https://example.com" })
        );
    }

    #[test]
    fn test_create_request_nests_draft_under_payload() {
        let draft = ActionDraft::named("Color Picker");
        let encoded = serde_json::to_value(Request::CreateShortcut { payload: draft }).unwrap();

        assert_eq!(encoded["type"], "CREATE_SHORTCUT");
        assert_eq!(encoded["payload"]["name"], "Color Picker");
    }

    #[test]
    fn test_update_request_round_trips() {
        let request = Request::UpdateShortcut {
            id: ActionId::from("a1"),
            updates: ActionPatch {
                name: Some("Renamed".to_string()),
                ..ActionPatch::default()
            },
        };

        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded["type"], "UPDATE_SHORTCUT");
        assert_eq!(encoded["id"], "a1");
        assert_eq!(encoded["updates"]["name"], "Renamed");

        let decoded: Request = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn test_decode_request_accepts_known_tags() {
        let decoded = decode_request(json!({ "type": "DELETE_SHORTCUT", "id": "x9" })).unwrap();
        assert_eq!(
            decoded,
            Request::DeleteShortcut {
                id: ActionId::from("x9")
            }
        );
    }

    #[test]
    fn test_decode_request_names_the_unknown_tag() {
        let err = decode_request(json!({ "type": "MAKE_COFFEE" })).unwrap_err();
        assert!(err.to_string().contains("MAKE_COFFEE"));
    }

    #[test]
    fn test_decode_request_handles_untagged_garbage() {
        let err = decode_request(json!("not even an object")).unwrap_err();
        assert!(err.to_string().contains("(untagged)"));
    }

    #[test]
    fn test_ack_skips_absent_error() {
        let encoded = serde_json::to_value(Response::success()).unwrap();
        assert_eq!(encoded, json!({ "success": true }));

        let encoded = serde_json::to_value(Response::failure("nope")).unwrap();
        assert_eq!(encoded, json!({ "success": false, "error": "nope" }));
    }

    #[test]
    fn test_response_decodes_by_shape() {
        let decoded: Response = serde_json::from_value(json!({ "shortcuts": [] })).unwrap();
        assert_eq!(decoded, Response::shortcuts(Vec::new()));

        let decoded: Response = serde_json::from_value(json!({ "success": true })).unwrap();
        assert_eq!(decoded, Response::success());
    }

    #[test]
    fn test_intent_tags() {
        assert_eq!(
            serde_json::to_value(Intent::OpenWebSearch).unwrap(),
            json!({ "type": "OPEN_WEB_SEARCH" })
        );
        assert_eq!(
            serde_json::to_value(Intent::OpenToolFinder).unwrap(),
            json!({ "type": "OPEN_TOOL_FINDER" })
        );
    }

    #[test]
    fn test_command_names_map_to_intents() {
        assert_eq!(
            intent_for_command("open-web-search"),
            Some(Intent::OpenWebSearch)
        );
        assert_eq!(
            intent_for_command("open-tool-finder"),
            Some(Intent::OpenToolFinder)
        );
        assert_eq!(intent_for_command("reload"), None);
    }

    #[test]
    fn test_intents_map_to_modes() {
        assert_eq!(Intent::OpenWebSearch.mode(), PaletteMode::Web);
        assert_eq!(Intent::OpenToolFinder.mode(), PaletteMode::Tool);
    }
}
