//! Synonym dictionary used for query-term expansion.
//!
//! Terms are stored in normalized form (NFKC, lowercase) so lookups by a
//! normalized morpheme hit regardless of how the dictionary was written.

use std::path::Path;

use ahash::AHashMap;

use crate::analysis::analyzer::simple::normalize_text;
use crate::error::{BunkatsuError, Result};

/// Maps each term to the other members of its synonym groups.
#[derive(Debug, Clone, Default)]
pub struct SynonymDictionary {
    synonyms: AHashMap<String, Vec<String>>,
}

impl SynonymDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dictionary from a JSON file.
    ///
    /// The file holds an array of synonym groups:
    ///
    /// ```json
    /// [
    ///   ["ml", "machine learning"],
    ///   ["検索", "サーチ"]
    /// ]
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BunkatsuError::invalid_config(format!(
                "failed to read synonym dictionary file '{}': {e}",
                path.display()
            ))
        })?;
        let groups: Vec<Vec<String>> = serde_json::from_str(&content).map_err(|e| {
            BunkatsuError::invalid_config(format!(
                "failed to parse synonym dictionary JSON from '{}': {e}",
                path.display()
            ))
        })?;
        Ok(Self::from_synonym_groups(groups))
    }

    /// Build a dictionary from synonym groups.
    pub fn from_synonym_groups(groups: Vec<Vec<String>>) -> Self {
        let mut dictionary = Self::new();
        for group in groups {
            dictionary.add_synonym_group(&group);
        }
        dictionary
    }

    /// Add a group whose terms are all synonyms of each other.
    ///
    /// A term that appears in several groups collects the synonyms of all of
    /// them, in insertion order and without duplicates.
    pub fn add_synonym_group<S: AsRef<str>>(&mut self, group: &[S]) {
        let terms: Vec<String> = group
            .iter()
            .map(|t| normalize_text(t.as_ref()))
            .filter(|t| !t.is_empty())
            .collect();
        for (i, term) in terms.iter().enumerate() {
            let entry = self.synonyms.entry(term.clone()).or_default();
            for (j, other) in terms.iter().enumerate() {
                if i != j && other != term && !entry.contains(other) {
                    entry.push(other.clone());
                }
            }
        }
    }

    /// Synonyms of a normalized term.
    pub fn get_synonyms(&self, term: &str) -> Option<&[String]> {
        self.synonyms
            .get(term)
            .map(|v| v.as_slice())
            .filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.synonyms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synonyms.is_empty()
    }
}
