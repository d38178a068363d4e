//! Tokenizers: text to index units, query terms to leaf-node trees.
//!
//! Two strategies implement the [`Tokenizer`] contract:
//!
//! - [`NgramTokenizer`](ngram::NgramTokenizer) (`NGR`) blocks the
//!   (optionally normalized) text into class-aware n-grams.
//! - [`DualTokenizer`](dual::DualTokenizer) (`DUAL`) drives a morphological
//!   analyzer and produces words, n-grams plus word boundaries, or n-grams
//!   alone, depending on the [`IndexingType`].
//!
//! Positions are 1-based. For dual indexing the empty key records word
//! boundaries: position 1 for the start of the text and one entry after
//! every morpheme.
//!
//! # Examples
//!
//! ```
//! use bunkatsu::analysis::analyzer::LanguageSet;
//! use bunkatsu::analysis::analyzer::simple::SimpleAnalyzer;
//! use bunkatsu::config::{IndexingType, TokenizerConfig};
//! use bunkatsu::leaf_node::MatchMode;
//! use bunkatsu::tokenizer::create_tokenizer;
//!
//! let mut tokenizer = create_tokenizer(
//!     "DUAL:JAP:ALL:2",
//!     TokenizerConfig::new(IndexingType::Dual),
//!     Box::new(SimpleAnalyzer::new()),
//! )
//! .unwrap();
//!
//! let lang = LanguageSet::single("en");
//! tokenizer.initialize();
//! let result = tokenizer.tokenize("helpful tools", &lang).unwrap();
//! let query = tokenizer.create_leaf_node("help", &lang, MatchMode::WordHead).unwrap();
//! assert!(query.matches(&result.units));
//! ```

pub mod dual;
pub mod ngram;
pub mod parameter;

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::ops::Bound;

use serde::Serialize;

use crate::analysis::analyzer::{LanguageSet, MorphAnalyzer};
use crate::analysis::blocker::{BlockMode, Blocker};
use crate::config::{IndexingType, TokenizerConfig};
use crate::error::{BunkatsuError, Result};
use crate::feature::{Feature, FeatureExtractor};
use crate::leaf_node::{LeafNode, LocatedUnit, MatchMode};

use self::dual::DualTokenizer;
use self::ngram::NgramTokenizer;
use self::parameter::{TokenizerKind, TokenizerParameter};

/// What an index unit stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitRole {
    Ngram,
    Word,
    Boundary,
}

/// Append-only occurrence positions of one index unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PositionList {
    pub role: UnitRole,
    positions: Vec<usize>,
}

impl PositionList {
    pub fn new(role: UnitRole) -> Self {
        PositionList {
            role,
            positions: Vec::new(),
        }
    }

    pub fn push(&mut self, position: usize) {
        self.positions.push(position);
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions are non-decreasing, so a binary search suffices.
    pub fn contains(&self, position: usize) -> bool {
        self.positions.binary_search(&position).is_ok()
    }
}

/// Index units of one tokenized text, keyed by unit text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IndexUnitMap {
    units: BTreeMap<String, PositionList>,
}

impl IndexUnitMap {
    /// Key under which word boundaries are recorded.
    pub const BOUNDARY_KEY: &'static str = "";

    pub fn new() -> Self {
        Self::default()
    }

    /// Record an occurrence of `unit`.
    pub fn push(&mut self, unit: &str, role: UnitRole, position: usize) {
        match self.units.get_mut(unit) {
            Some(list) => list.push(position),
            None => {
                let mut list = PositionList::new(role);
                list.push(position);
                self.units.insert(unit.to_string(), list);
            }
        }
    }

    /// Create the boundary list with its first position unless it exists.
    pub fn ensure_boundary_start(&mut self, position: usize) {
        if !self.units.contains_key(Self::BOUNDARY_KEY) {
            self.push(Self::BOUNDARY_KEY, UnitRole::Boundary, position);
        }
    }

    pub fn get(&self, unit: &str) -> Option<&PositionList> {
        self.units.get(unit)
    }

    /// Positions of `unit`; empty when absent.
    pub fn positions(&self, unit: &str) -> &[usize] {
        self.units.get(unit).map_or(&[], |l| l.positions())
    }

    pub fn contains(&self, unit: &str, position: usize) -> bool {
        self.units.get(unit).is_some_and(|l| l.contains(position))
    }

    /// Recorded word-boundary positions.
    pub fn boundaries(&self) -> &[usize] {
        self.positions(Self::BOUNDARY_KEY)
    }

    pub fn is_boundary(&self, position: usize) -> bool {
        self.contains(Self::BOUNDARY_KEY, position)
    }

    /// Units whose keys fall between the bounds.
    pub fn range<'a>(
        &'a self,
        lower: Bound<&'a str>,
        upper: Bound<&'a str>,
    ) -> Box<dyn Iterator<Item = (&'a String, &'a PositionList)> + 'a> {
        // BTreeMap::range panics on these.
        let inverted = match (lower, upper) {
            (Bound::Excluded(l), Bound::Excluded(u)) => l >= u,
            (Bound::Included(l) | Bound::Excluded(l), Bound::Included(u) | Bound::Excluded(u)) => {
                l > u
            }
            _ => false,
        };
        if inverted {
            return Box::new(std::iter::empty());
        }
        Box::new(self.units.range::<str, _>((lower, upper)))
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, PositionList> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl<'a> IntoIterator for &'a IndexUnitMap {
    type Item = (&'a String, &'a PositionList);
    type IntoIter = btree_map::Iter<'a, String, PositionList>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Result of tokenizing one text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TokenizeResult {
    pub units: IndexUnitMap,
    /// Characters after normalization (words for word indexing).
    pub normalized_size: usize,
    /// Characters before normalization.
    pub original_size: usize,
}

/// Sizes of one section of a multi-section document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SectionSize {
    pub normalized_size: usize,
    pub original_size: usize,
}

/// Result of tokenizing a multi-section document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionsResult {
    pub units: IndexUnitMap,
    pub sections: Vec<SectionSize>,
}

/// Lifecycle of a tokenizer instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TokenizerState {
    /// Built but no document started.
    Prepared,
    /// `initialize` ran; per-document state is in use.
    Document,
}

/// A tokenization strategy bound to an analyzer and a blocker.
///
/// An instance is not shareable between threads while in use. Call
/// [`initialize`](Tokenizer::initialize) before each new document.
pub trait Tokenizer: Send {
    /// Strategy name (`NGR`, `DUAL`).
    fn name(&self) -> &'static str;

    fn indexing_type(&self) -> IndexingType;

    fn config(&self) -> &TokenizerConfig;

    fn state(&self) -> TokenizerState;

    /// Reset per-document state (normalized buffer, feature candidates).
    fn initialize(&mut self);

    /// Tokenize a text starting at position 0.
    fn tokenize(&mut self, text: &str, languages: &LanguageSet) -> Result<TokenizeResult> {
        self.tokenize_at(text, languages, 0)
    }

    /// Tokenize a text whose first character sits at `start` (0-based).
    fn tokenize_at(
        &mut self,
        text: &str,
        languages: &LanguageSet,
        start: usize,
    ) -> Result<TokenizeResult>;

    /// Tokenize several sections into one contiguous position space.
    fn tokenize_sections(&mut self, sections: &[(&str, LanguageSet)]) -> Result<SectionsResult>;

    /// Build the search tree for a query term.
    fn create_leaf_node(
        &mut self,
        term: &str,
        languages: &LanguageSet,
        mode: MatchMode,
    ) -> Result<LeafNode>;

    /// Whole-buffer expansion variants of a term, normalized form first.
    fn expand_term(&mut self, term: &str, languages: &LanguageSet) -> Result<Vec<String>>;

    /// Top-K feature terms of the current document; empty when disabled.
    fn feature_list(&self) -> Vec<Feature>;

    /// Parameter string describing this instance.
    fn description(&self) -> String;

    /// Give the analyzer back, e.g. to an analyzer pool.
    fn into_analyzer(self: Box<Self>) -> Box<dyn MorphAnalyzer>;
}

/// Reject match modes the indexing type cannot answer.
pub fn check_match_mode(indexing: IndexingType, mode: MatchMode) -> Result<()> {
    let supported = match indexing {
        IndexingType::Ngram => mode == MatchMode::String,
        IndexingType::Word => matches!(mode, MatchMode::ExactWord | MatchMode::WordHead),
        IndexingType::Dual => true,
    };
    if supported {
        Ok(())
    } else {
        Err(BunkatsuError::not_supported(format!(
            "{mode} match on {indexing} index"
        )))
    }
}

/// Drain the analyzer's morphemes for the loaded text.
///
/// With feature extraction enabled the analyzer is read block by block so
/// every morpheme can be scored; otherwise word by word. Empty morphemes are
/// skipped. Returns normalized forms, or original forms when `normalize` is
/// off.
pub(crate) fn read_words(
    analyzer: &mut dyn MorphAnalyzer,
    features: &mut FeatureExtractor,
    normalize: bool,
) -> Result<Vec<String>> {
    let mut words = Vec::new();
    if features.is_enabled() {
        while let Some(block) = analyzer.next_block()? {
            for morpheme in block {
                if morpheme.normalized.is_empty() {
                    continue;
                }
                features.observe(&morpheme);
                words.push(if normalize {
                    morpheme.normalized
                } else {
                    morpheme.original
                });
            }
        }
    } else if normalize {
        while let Some(word) = analyzer.next_word()? {
            if !word.is_empty() {
                words.push(word);
            }
        }
    } else {
        while let Some((_, original)) = analyzer.next_word_with_original()? {
            if !original.is_empty() {
                words.push(original);
            }
        }
    }
    Ok(words)
}

/// Record the n-grams of `buffer`, whose first character sits at `start`.
pub(crate) fn index_ngrams(
    blocker: &mut Blocker,
    buffer: &str,
    start: usize,
    units: &mut IndexUnitMap,
) {
    blocker.set(buffer, BlockMode::Index);
    while let Some(token) = blocker.yield_token() {
        units.push(&token.text, UnitRole::Ngram, token.offset + start + 1);
    }
}

/// Leaf for one already-expanded term, blocked in search mode.
pub(crate) fn search_leaf(blocker: &mut Blocker, term: &str) -> LeafNode {
    blocker.set(term, BlockMode::Search);
    let mut units = Vec::new();
    while let Some(token) = blocker.yield_token() {
        if token.is_short {
            let (first, last) = token.class.region();
            return LeafNode::ShortWord {
                lower: format!("{}{first}", token.text),
                upper: format!("{}{last}", token.text),
                span: token.text.chars().count(),
                unit: token.text,
                offset: 0,
                min_length: token.min_length,
            };
        }
        units.push(LocatedUnit::new(token.offset, token.text));
    }
    if units.is_empty() {
        return LeafNode::empty();
    }
    LeafNode::plain(term, units, term.chars().count())
}

/// Build a tokenizer from a parameter string such as `DUAL:JAP:ALL:2`.
pub fn create_tokenizer(
    parameter: &str,
    config: TokenizerConfig,
    analyzer: Box<dyn MorphAnalyzer>,
) -> Result<Box<dyn Tokenizer>> {
    let parameter = TokenizerParameter::parse(parameter)?;
    log::debug!(
        "creating {} tokenizer for {} index ({parameter})",
        parameter.kind.name(),
        config.indexing
    );
    match parameter.kind {
        TokenizerKind::Ngram => Ok(Box::new(NgramTokenizer::new(parameter, config, analyzer)?)),
        TokenizerKind::Dual => Ok(Box::new(DualTokenizer::new(parameter, config, analyzer)?)),
    }
}
