//! Morphological analyzer contract.
//!
//! Tokenizers never segment words themselves; they drive a [`MorphAnalyzer`]
//! and consume its morpheme stream. The analyzer is a stateful cursor: `set`
//! loads a text, then `next_word`, `next_block` or `next_expansion` advance
//! through it until they return `None`.
//!
//! # Available Implementations
//!
//! - [`SimpleAnalyzer`](simple::SimpleAnalyzer) - dictionary-free reference analyzer
//!
//! Analyzers are expensive to build and not shareable between threads while
//! in use; [`AnalyzerPool`](pool::AnalyzerPool) checks them out under a lock.

pub mod pool;
pub mod simple;

use std::fmt;
use std::str::FromStr;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{BunkatsuError, Result};

/// Coarse part-of-speech shared by all analyzers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnifiedTag {
    Noun,
    Verb,
    Particle,
    Symbol,
    /// Not in the analyzer's dictionary (foreign words, alphabet strings).
    Unknown,
    Other,
}

/// Analyzer-independent classification of an analyzer-specific POS id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermType {
    Alphabet,
    Other,
}

/// Lookup from analyzer POS ids to term types.
pub type TermTypeTable = AHashMap<u32, TermType>;

/// One analyzed unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Morpheme {
    /// Normalized surface form.
    pub normalized: String,
    /// Surface form as it appeared in the input.
    pub original: String,
    /// Analyzer-specific part-of-speech id.
    pub pos: u32,
    /// Occurrence cost; rarer words cost more.
    pub cost: i32,
    pub tag: UnifiedTag,
}

/// Expansion variants of one morpheme of a query term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expansion {
    /// Normalized form first, then alternatives.
    pub variants: Vec<String>,
    pub original: String,
    pub pos: u32,
}

/// Ordered set of language tags, written `ja+en`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguageSet {
    tags: Vec<String>,
}

impl LanguageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(tag: &str) -> Self {
        LanguageSet {
            tags: vec![tag.to_ascii_lowercase()],
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl FromStr for LanguageSet {
    type Err = BunkatsuError;

    fn from_str(s: &str) -> Result<Self> {
        let mut tags = Vec::new();
        for tag in s.split('+').map(str::trim).filter(|t| !t.is_empty()) {
            if !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(BunkatsuError::invalid_config(format!(
                    "invalid language tag: {tag}"
                )));
            }
            let tag = tag.to_ascii_lowercase();
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        Ok(LanguageSet { tags })
    }
}

impl fmt::Display for LanguageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tags.join("+"))
    }
}

/// A morphological analyzer driven as a cursor over one text.
///
/// Every `next_*` method returns `Ok(None)` once the text is exhausted.
/// Errors are reported through [`BunkatsuError::Analysis`] and are passed on
/// unchanged by tokenizers.
pub trait MorphAnalyzer: Send {
    /// Name of the analyzer (for logs and descriptions).
    fn name(&self) -> &'static str;

    /// Load a text and rewind.
    fn set(&mut self, text: &str, languages: &LanguageSet) -> Result<()>;

    /// Next morpheme in normalized form.
    fn next_word(&mut self) -> Result<Option<String>>;

    /// Next morpheme as `(normalized, original)`.
    fn next_word_with_original(&mut self) -> Result<Option<(String, String)>>;

    /// Next analysis unit (typically a sentence) with full morpheme data.
    fn next_block(&mut self) -> Result<Option<Vec<Morpheme>>>;

    /// Expansion variants of the next morpheme.
    fn next_expansion(&mut self) -> Result<Option<Expansion>>;

    /// Normalize a whole buffer at once.
    fn normalize_buf(&mut self, text: &str, languages: &LanguageSet) -> Result<String>;

    /// Expansion variants of a whole buffer, normalized form first.
    fn expand_buf(&mut self, text: &str, languages: &LanguageSet) -> Result<Vec<String>>;

    /// POS-id to term-type table used by feature scoring, if the analyzer has one.
    fn term_types(&self) -> Option<&TermTypeTable> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_set_parse() {
        let langs: LanguageSet = "ja+EN+ja".parse().unwrap();
        assert_eq!(langs.tags(), ["ja", "en"]);
        assert!(langs.contains("en"));
        assert_eq!(langs.to_string(), "ja+en");
        assert!("".parse::<LanguageSet>().unwrap().is_empty());
        assert!("ja+e n".parse::<LanguageSet>().is_err());
    }

    #[test]
    fn test_single_language() {
        assert_eq!(LanguageSet::single("JA").tags(), ["ja"]);
    }
}
