//! Completion engine contract and the client the capture loop talks to.
//!
//! The engine speaks a flat text protocol inherited from native trie
//! libraries: [`CompletionEngine::get_autocomplete`] returns up to `k`
//! words joined by [`DELIMITER`]. [`CompletionClient`] hides that and hands
//! out [`SuggestionBatch`]es.

mod word_tree;

pub use word_tree::WordTree;

use crate::error::{Error, Result};
use std::path::Path;

/// Separator between suggestions in an engine response.
pub const DELIMITER: char = ' ';

/// Default number of suggestions per query.
pub const DEFAULT_SUGGESTIONS: usize = 5;

/// A prefix lookup structure returning ranked completions.
pub trait CompletionEngine: Send {
    /// Load the word list. Called once before any lookup.
    fn set_dictionary(&mut self, path: &Path) -> Result<()>;

    /// Return up to `k` completions of `prefix`, best first, joined by
    /// [`DELIMITER`].
    fn get_autocomplete(&self, prefix: &str, k: usize) -> String;
}

/// Suggestions for one queried word. Replaced wholesale, never merged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuggestionBatch {
    /// Ranked completions, best first.
    pub suggestions: Vec<String>,
    /// The word they complete.
    pub queried_word: String,
}

impl SuggestionBatch {
    /// Create a batch.
    pub fn new(suggestions: Vec<String>, queried_word: impl Into<String>) -> Self {
        Self {
            suggestions,
            queried_word: queried_word.into(),
        }
    }

    /// Number of suggestions.
    pub fn len(&self) -> usize {
        self.suggestions.len()
    }

    /// Check if there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }
}

/// Synchronous request/response wrapper around a [`CompletionEngine`].
#[derive(Debug)]
pub struct CompletionClient<E> {
    engine: E,
}

impl<E: CompletionEngine> CompletionClient<E> {
    /// Bring up `engine` with the dictionary at `dictionary`.
    ///
    /// This is the availability check: a client only exists for an engine
    /// that loaded its dictionary, so lookups never fail later on.
    pub fn connect(mut engine: E, dictionary: &Path) -> Result<Self> {
        engine
            .set_dictionary(dictionary)
            .map_err(|err| match err {
                unavailable @ Error::EngineUnavailable { .. } => unavailable,
                other => Error::EngineUnavailable {
                    reason: other.to_string(),
                },
            })?;
        tracing::info!(dictionary = %dictionary.display(), "completion engine ready");
        Ok(Self { engine })
    }

    /// Wrap an engine that is already loaded.
    pub const fn ready(engine: E) -> Self {
        Self { engine }
    }

    /// Up to `k` completions of `word`, best first.
    pub fn query(&self, word: &str, k: usize) -> Vec<String> {
        if word.is_empty() || k == 0 {
            return Vec::new();
        }
        parse_response(&self.engine.get_autocomplete(word, k), k)
    }

    /// Query `word` and package the result.
    pub fn batch(&self, word: &str, k: usize) -> SuggestionBatch {
        SuggestionBatch::new(self.query(word, k), word)
    }

    /// The wrapped engine.
    pub const fn engine(&self) -> &E {
        &self.engine
    }
}

/// Split an engine response, tolerating short and padded answers.
pub fn parse_response(response: &str, k: usize) -> Vec<String> {
    response
        .split(DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(k)
        .map(str::to_string)
        .collect()
}
