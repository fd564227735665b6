//! Web query suggestions.
//!
//! Without a remote fetcher the adapter generates local variants of the
//! query, so the palette stays useful in contexts where the completion
//! endpoints are unreachable. With a fetcher, the engine's payload is
//! decoded per shape; any fetch or decode failure degrades to the local
//! variants rather than surfacing an error.

use futures::future::BoxFuture;
use std::sync::Arc;

use glint_core::{AdapterError, SearchEngine};

use crate::adapter::{Candidate, CommitAction, SuggestionSource};

/// Maximum suggestions surfaced per query.
pub const SUGGESTION_CAP: usize = 4;

/// Queries shorter than this produce no suggestions.
pub const MIN_QUERY_LEN: usize = 2;

/// Remote completion endpoint.
pub trait SuggestionFetcher: Send + Sync {
    /// Fetch the engine's raw completion payload for a query.
    fn fetch(
        &self,
        engine: SearchEngine,
        query: &str,
    ) -> BoxFuture<'static, Result<serde_json::Value, AdapterError>>;
}

/// Local variants of the query, most specific first.
pub fn local_suggestions(engine: SearchEngine, query: &str) -> Vec<String> {
    let trimmed = query.trim();
    if trimmed.chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }

    let mut suggestions = vec![trimmed.to_string(), format!("what is {trimmed}")];
    if trimmed.chars().count() > 3 {
        suggestions.push(format!("how to {trimmed}"));
    }
    if engine == SearchEngine::Google {
        suggestions.push(format!("{trimmed} tutorial"));
    }

    suggestions.truncate(SUGGESTION_CAP);
    suggestions
}

/// Decode an engine's completion payload into suggestion strings.
///
/// Google and Bing reply with a `[query, [suggestion, ...]]` pair;
/// DuckDuckGo with an array of `{phrase}` objects.
pub fn decode_suggest_payload(
    engine: SearchEngine,
    payload: &serde_json::Value,
) -> Result<Vec<String>, AdapterError> {
    let malformed = || AdapterError::Decode(format!("unexpected {} payload", engine.id()));

    match engine {
        SearchEngine::Google | SearchEngine::Bing => {
            let pair = payload.as_array().ok_or_else(malformed)?;
            let suggestions = pair.get(1).and_then(|v| v.as_array()).ok_or_else(malformed)?;
            Ok(suggestions
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect())
        }
        SearchEngine::DuckDuckGo => {
            let entries = payload.as_array().ok_or_else(malformed)?;
            Ok(entries
                .iter()
                .filter_map(|entry| entry.get("phrase").and_then(|v| v.as_str()))
                .map(str::to_string)
                .collect())
        }
    }
}

/// Suggestion adapter for the web palette.
pub struct WebSuggestAdapter {
    engine: SearchEngine,
    fetcher: Option<Arc<dyn SuggestionFetcher>>,
}

impl WebSuggestAdapter {
    /// Local-only adapter for the given engine.
    pub fn new(engine: SearchEngine) -> Self {
        Self {
            engine,
            fetcher: None,
        }
    }

    /// Attach a remote completion fetcher.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn SuggestionFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// The engine this adapter queries.
    pub fn engine(&self) -> SearchEngine {
        self.engine
    }

    async fn suggest(
        engine: SearchEngine,
        fetcher: Option<Arc<dyn SuggestionFetcher>>,
        query: String,
    ) -> Vec<String> {
        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        if let Some(fetcher) = fetcher {
            match fetcher.fetch(engine, trimmed).await {
                Ok(payload) => match decode_suggest_payload(engine, &payload) {
                    Ok(remote) if !remote.is_empty() => {
                        let mut suggestions = dedupe(remote);
                        suggestions.truncate(SUGGESTION_CAP);
                        return suggestions;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::debug!("Suggestion payload decode failed: {e}");
                    }
                },
                Err(e) => {
                    tracing::debug!("Suggestion fetch failed: {e}");
                }
            }
        }

        local_suggestions(engine, trimmed)
    }
}

impl SuggestionSource for WebSuggestAdapter {
    fn search(&self, query: &str) -> BoxFuture<'static, Vec<Candidate>> {
        let engine = self.engine;
        let fetcher = self.fetcher.clone();
        let query = query.to_string();

        Box::pin(async move {
            Self::suggest(engine, fetcher, query)
                .await
                .into_iter()
                .map(Candidate::suggestion)
                .collect()
        })
    }

    fn supports_direct_commit(&self) -> bool {
        true
    }

    fn direct_commit(&self, query: &str) -> Option<CommitAction> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(CommitAction::WebSearch {
            query: trimmed.to_string(),
        })
    }
}

fn dedupe(suggestions: Vec<String>) -> Vec<String> {
    let mut seen = Vec::new();
    for suggestion in suggestions {
        if !seen.contains(&suggestion) {
            seen.push(suggestion);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fetcher returning a canned payload.
    struct CannedFetcher {
        payload: serde_json::Value,
    }

    impl SuggestionFetcher for CannedFetcher {
        fn fetch(
            &self,
            _engine: SearchEngine,
            _query: &str,
        ) -> BoxFuture<'static, Result<serde_json::Value, AdapterError>> {
            let payload = self.payload.clone();
            Box::pin(async move { Ok(payload) })
        }
    }

    /// Fetcher that always fails.
    struct OfflineFetcher;

    impl SuggestionFetcher for OfflineFetcher {
        fn fetch(
            &self,
            _engine: SearchEngine,
            _query: &str,
        ) -> BoxFuture<'static, Result<serde_json::Value, AdapterError>> {
            Box::pin(async move { Err(AdapterError::Fetch("offline".to_string())) })
        }
    }

    #[test]
    fn test_local_suggestions_short_query_is_empty() {
        assert!(local_suggestions(SearchEngine::Google, "r").is_empty());
        assert!(local_suggestions(SearchEngine::Google, "  ").is_empty());
    }

    #[test]
    fn test_local_suggestions_variants() {
        let suggestions = local_suggestions(SearchEngine::Google, "rust");
        assert_eq!(
            suggestions,
            vec![
                "rust".to_string(),
                "what is rust".to_string(),
                "how to rust".to_string(),
                "rust tutorial".to_string(),
            ]
        );

        // "how to" needs more than three characters.
        let short = local_suggestions(SearchEngine::Google, "vim");
        assert_eq!(
            short,
            vec![
                "vim".to_string(),
                "what is vim".to_string(),
                "vim tutorial".to_string(),
            ]
        );

        // The tutorial variant is Google-only.
        let ddg = local_suggestions(SearchEngine::DuckDuckGo, "rust");
        assert_eq!(
            ddg,
            vec![
                "rust".to_string(),
                "what is rust".to_string(),
                "how to rust".to_string(),
            ]
        );
    }

    #[test]
    fn test_decode_google_pair_shape() {
        let payload = serde_json::json!(["rus", ["rust", "russia", "rust lang"]]);
        let decoded = decode_suggest_payload(SearchEngine::Google, &payload).unwrap();
        assert_eq!(decoded, vec!["rust", "russia", "rust lang"]);
    }

    #[test]
    fn test_decode_ddg_phrase_shape() {
        let payload = serde_json::json!([{"phrase": "rust"}, {"phrase": "rustup"}]);
        let decoded = decode_suggest_payload(SearchEngine::DuckDuckGo, &payload).unwrap();
        assert_eq!(decoded, vec!["rust", "rustup"]);
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        let payload = serde_json::json!({"not": "an array"});
        assert!(matches!(
            decode_suggest_payload(SearchEngine::Bing, &payload),
            Err(AdapterError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_remote_suggestions_capped_and_deduped() {
        let adapter = WebSuggestAdapter::new(SearchEngine::Google).with_fetcher(Arc::new(
            CannedFetcher {
                payload: serde_json::json!([
                    "rust",
                    ["rust", "rust", "rust lang", "rustup", "rust book", "rust wasm"]
                ]),
            },
        ));

        let candidates = adapter.search("rust").await;
        assert_eq!(candidates.len(), SUGGESTION_CAP);
        assert_eq!(candidates[0].label, "rust");
        assert_eq!(candidates[1].label, "rust lang");
        assert!(matches!(
            &candidates[0].commit,
            CommitAction::WebSearch { query } if query == "rust"
        ));
    }

    #[tokio::test]
    async fn test_fetch_failure_falls_back_to_local() {
        let adapter =
            WebSuggestAdapter::new(SearchEngine::DuckDuckGo).with_fetcher(Arc::new(OfflineFetcher));

        let candidates = adapter.search("rust").await;
        assert_eq!(candidates[0].label, "rust");
        assert_eq!(candidates[1].label, "what is rust");
    }

    #[tokio::test]
    async fn test_short_query_yields_nothing_even_with_fetcher() {
        let adapter = WebSuggestAdapter::new(SearchEngine::Google).with_fetcher(Arc::new(
            CannedFetcher {
                payload: serde_json::json!(["r", ["rust"]]),
            },
        ));
        assert!(adapter.search("r").await.is_empty());
    }

    #[test]
    fn test_direct_commit_trims_and_rejects_blank() {
        let adapter = WebSuggestAdapter::new(SearchEngine::Google);
        assert!(adapter.supports_direct_commit());
        assert_eq!(
            adapter.direct_commit("  rust lang  "),
            Some(CommitAction::WebSearch {
                query: "rust lang".to_string()
            })
        );
        assert_eq!(adapter.direct_commit("   "), None);
    }
}
