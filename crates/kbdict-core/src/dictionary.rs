use std::fmt;

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// Logical role of a dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DictionaryType {
    Main,
}

impl DictionaryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DictionaryType::Main => "main",
        }
    }
}

impl fmt::Display for DictionaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dictionary lookup operations shared by single sources and collections
pub trait Dictionary: Send + Sync {
    fn dictionary_type(&self) -> DictionaryType;

    fn locale(&self) -> Option<&Locale>;

    /// Structural validity, fixed when the source was opened
    fn is_valid(&self) -> bool;

    fn is_in_dictionary(&self, word: &str) -> bool;

    /// Unigram frequency of `word`, if present
    fn frequency(&self, word: &str) -> Option<u32>;

    fn suggestions(&self, query: &str, options: &SearchOptions) -> Vec<Suggestion>;

    /// Release underlying resources. Calling it again is a no-op.
    fn close(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub word: String,
    pub frequency: u32,
    pub source: DictionaryType,
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub max_results: usize,
    pub match_type: MatchType,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 18,
            match_type: MatchType::Prefix,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    Exact,
    Prefix,
}

impl MatchType {
    pub fn matches(&self, word: &str, query: &str) -> bool {
        match self {
            MatchType::Exact => word == query,
            MatchType::Prefix => word.starts_with(query),
        }
    }
}
