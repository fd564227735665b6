//! Token-similarity fuzzy matching over a local snapshot.

use futures::future::BoxFuture;
use std::cmp::Ordering;

use glint_store::ResolvedTool;

use crate::adapter::{Candidate, CommitAction, SuggestionSource};

/// Minimum Jaro-Winkler similarity for a query token to count as matched.
pub const SIMILARITY_THRESHOLD: f64 = 0.7;

/// Result cap for the tool finder.
pub const TOOL_RESULT_CAP: usize = 6;

/// One searchable entry: the candidate to surface plus its haystack.
#[derive(Debug, Clone)]
pub struct FuzzyEntry {
    pub candidate: Candidate,

    /// Lowercased tokens drawn from the entry's matchable fields.
    tokens: Vec<String>,
}

impl FuzzyEntry {
    /// Build an entry from a candidate and the field texts to match on.
    pub fn new<'a>(candidate: Candidate, fields: impl IntoIterator<Item = &'a str>) -> Self {
        let tokens = fields
            .into_iter()
            .flat_map(|field| field.split_whitespace())
            .map(str::to_lowercase)
            .collect();
        Self { candidate, tokens }
    }
}

/// Fuzzy matcher over a fixed snapshot of entries.
///
/// Matching is token-based and case-insensitive: every query token must
/// reach the similarity threshold against some haystack token (substrings
/// count as exact). Ranking is by total similarity, ties keeping the
/// snapshot's input order.
pub struct FuzzyAdapter {
    entries: Vec<FuzzyEntry>,
    cap: Option<usize>,
}

impl FuzzyAdapter {
    /// Create an adapter over a snapshot, unlimited results.
    pub fn new(entries: Vec<FuzzyEntry>) -> Self {
        Self { entries, cap: None }
    }

    /// Limit the number of returned candidates.
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Tool finder over rehydrated records: matches on name, description,
    /// and tags, capped at [`TOOL_RESULT_CAP`].
    pub fn for_tools(tools: &[ResolvedTool]) -> Self {
        let entries = tools
            .iter()
            .map(|tool| {
                let record = &tool.record;
                let mut fields: Vec<&str> = vec![&record.name];
                if let Some(description) = &record.description {
                    fields.push(description);
                }
                fields.extend(record.tags.iter().map(String::as_str));

                FuzzyEntry::new(
                    Candidate {
                        id: record.id.0.clone(),
                        label: record.name.clone(),
                        detail: record.description.clone(),
                        commit: CommitAction::InvokeTool {
                            id: record.id.clone(),
                        },
                    },
                    fields,
                )
            })
            .collect();

        Self::new(entries).with_cap(TOOL_RESULT_CAP)
    }

    /// Rank the snapshot against a query.
    ///
    /// An empty or blank query returns the full collection in input order.
    pub fn rank(&self, query: &str) -> Vec<Candidate> {
        let query_tokens: Vec<String> = query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();

        let mut results: Vec<Candidate> = if query_tokens.is_empty() {
            self.entries.iter().map(|e| e.candidate.clone()).collect()
        } else {
            let mut scored: Vec<(f64, &FuzzyEntry)> = self
                .entries
                .iter()
                .filter_map(|entry| entry_score(entry, &query_tokens).map(|s| (s, entry)))
                .collect();

            // Stable by score descending; ties keep input order.
            scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
            scored
                .into_iter()
                .map(|(_, entry)| entry.candidate.clone())
                .collect()
        };

        if let Some(cap) = self.cap {
            results.truncate(cap);
        }
        results
    }
}

/// Total similarity when every query token clears the threshold, `None`
/// otherwise.
fn entry_score(entry: &FuzzyEntry, query_tokens: &[String]) -> Option<f64> {
    let mut total = 0.0;
    for query_token in query_tokens {
        let best = entry
            .tokens
            .iter()
            .map(|token| token_score(query_token, token))
            .fold(0.0_f64, f64::max);
        if best < SIMILARITY_THRESHOLD {
            return None;
        }
        total += best;
    }
    Some(total)
}

fn token_score(query_token: &str, haystack_token: &str) -> f64 {
    if haystack_token.contains(query_token) {
        return 1.0;
    }
    strsim::jaro_winkler(query_token, haystack_token)
}

impl SuggestionSource for FuzzyAdapter {
    fn search(&self, query: &str) -> BoxFuture<'static, Vec<Candidate>> {
        let results = self.rank(query);
        Box::pin(async move { results })
    }
}
