//! Web search engine table.

use serde::{Deserialize, Serialize};

/// Supported web search engines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    #[default]
    Google,
    DuckDuckGo,
    Bing,
}

impl SearchEngine {
    /// Parse an engine id, falling back to the default for unknown ids.
    pub fn from_id(id: &str) -> Self {
        match id.to_ascii_lowercase().as_str() {
            "duckduckgo" => SearchEngine::DuckDuckGo,
            "bing" => SearchEngine::Bing,
            _ => SearchEngine::Google,
        }
    }

    /// Stable engine id used in settings.
    pub fn id(&self) -> &'static str {
        match self {
            SearchEngine::Google => "google",
            SearchEngine::DuckDuckGo => "duckduckgo",
            SearchEngine::Bing => "bing",
        }
    }

    /// Display name.
    pub fn label(&self) -> &'static str {
        match self {
            SearchEngine::Google => "Google",
            SearchEngine::DuckDuckGo => "DuckDuckGo",
            SearchEngine::Bing => "Bing",
        }
    }

    /// Full results-page URL for a query.
    pub fn search_url(&self, query: &str) -> String {
        format!("{}{}", self.search_base(), urlencoding::encode(query))
    }

    /// Suggestion endpoint URL for a query prefix.
    pub fn suggest_url(&self, query: &str) -> String {
        format!("{}{}", self.suggest_base(), urlencoding::encode(query))
    }

    fn search_base(&self) -> &'static str {
        match self {
            SearchEngine::Google => "https://www.google.com/search?q=",
            SearchEngine::DuckDuckGo => "https://duckduckgo.com/?q=",
            SearchEngine::Bing => "https://www.bing.com/search?q=",
        }
    }

    fn suggest_base(&self) -> &'static str {
        match self {
            SearchEngine::Google => {
                "https://suggestqueries.google.com/complete/search?client=firefox&q="
            }
            SearchEngine::DuckDuckGo => "https://duckduckgo.com/ac/?q=",
            SearchEngine::Bing => "https://api.bing.com/osjson.aspx?query=",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_encodes_query() {
        let url = SearchEngine::Google.search_url("rust & wasm");
        assert_eq!(
            url,
            "https://www.google.com/search?q=rust%20%26%20wasm"
        );
    }

    #[test]
    fn test_from_id_falls_back_to_google() {
        assert_eq!(SearchEngine::from_id("bing"), SearchEngine::Bing);
        assert_eq!(SearchEngine::from_id("DuckDuckGo"), SearchEngine::DuckDuckGo);
        assert_eq!(SearchEngine::from_id("altavista"), SearchEngine::Google);
        assert_eq!(SearchEngine::from_id(""), SearchEngine::Google);
    }

    #[test]
    fn test_id_round_trip() {
        for engine in [
            SearchEngine::Google,
            SearchEngine::DuckDuckGo,
            SearchEngine::Bing,
        ] {
            assert_eq!(SearchEngine::from_id(engine.id()), engine);
        }
    }
}
