//! Candidate adapters.
//!
//! An adapter produces the palette's candidate list for a query. Failures
//! never reach the palette: an adapter that cannot answer returns an
//! empty list and logs why.

mod fuzzy;
mod web;

pub use fuzzy::{FuzzyAdapter, FuzzyEntry, SIMILARITY_THRESHOLD, TOOL_RESULT_CAP};
pub use web::{
    decode_suggest_payload, local_suggestions, SuggestionFetcher, WebSuggestAdapter,
    MIN_QUERY_LEN, SUGGESTION_CAP,
};

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use glint_core::ActionId;

/// One row in the palette's candidate list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Stable id within the producing adapter.
    pub id: String,

    /// Primary display text.
    pub label: String,

    /// Secondary display text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// What committing this row does.
    pub commit: CommitAction,
}

impl Candidate {
    /// A web-search suggestion row.
    pub fn suggestion(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id: text.clone(),
            label: text.clone(),
            detail: None,
            commit: CommitAction::WebSearch { query: text },
        }
    }
}

/// The action a committed candidate performs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommitAction {
    /// Open a web search for this text.
    WebSearch { query: String },

    /// Invoke the registered tool behind an action id.
    InvokeTool { id: ActionId },

    /// Open a URL directly.
    OpenUrl { url: String },
}

/// A pluggable candidate producer.
pub trait SuggestionSource: Send + Sync {
    /// Produce ranked candidates for a query. An empty query returns the
    /// full unranked collection; errors degrade to an empty list.
    fn search(&self, query: &str) -> BoxFuture<'static, Vec<Candidate>>;

    /// Whether this source can commit a raw query with no candidate
    /// selected.
    fn supports_direct_commit(&self) -> bool {
        false
    }

    /// Commit action for the raw query itself, when supported.
    fn direct_commit(&self, _query: &str) -> Option<CommitAction> {
        None
    }
}
