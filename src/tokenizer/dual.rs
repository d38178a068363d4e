//! Analyzer-driven tokenizer (`DUAL`).
//!
//! Depending on the configured [`IndexingType`]:
//!
//! - `Word`: every morpheme is an index unit; positions count morphemes.
//! - `Dual`: the normalized morphemes are concatenated and blocked into
//!   n-grams, and the position after every morpheme is recorded under the
//!   empty key so that queries can demand word alignment.
//! - `Ngram`: like `Dual` without the boundaries.
//!
//! Query terms are expanded morpheme by morpheme and assembled by the
//! leaf-node builders under the expansion limit.

use std::fmt;

use crate::analysis::analyzer::{LanguageSet, MorphAnalyzer};
use crate::analysis::blocker::Blocker;
use crate::config::{IndexingType, TokenizerConfig};
use crate::error::{BunkatsuError, Result};
use crate::feature::{Feature, FeatureExtractor};
use crate::leaf_node::builder::{
    CandidateTerm, StringTreeBuilder, WordTreeBuilder, wrap_for_mode,
};
use crate::leaf_node::{LeafNode, MatchMode};
use crate::tokenizer::parameter::TokenizerParameter;
use crate::tokenizer::{
    IndexUnitMap, SectionSize, SectionsResult, TokenizeResult, Tokenizer, TokenizerState,
    UnitRole, check_match_mode, index_ngrams, read_words, search_leaf,
};

/// Tokenizer producing words, n-grams with word boundaries, or n-grams.
pub struct DualTokenizer {
    parameter: TokenizerParameter,
    config: TokenizerConfig,
    analyzer: Box<dyn MorphAnalyzer>,
    blocker: Blocker,
    features: FeatureExtractor,
    /// Normalized text of the current document.
    normalized: String,
    state: TokenizerState,
}

impl fmt::Debug for DualTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DualTokenizer")
            .field("parameter", &self.parameter)
            .field("config", &self.config)
            .field("analyzer", &self.analyzer.name())
            .field("state", &self.state)
            .finish()
    }
}

impl DualTokenizer {
    pub fn new(
        parameter: TokenizerParameter,
        config: TokenizerConfig,
        analyzer: Box<dyn MorphAnalyzer>,
    ) -> Result<Self> {
        config.validate()?;
        let blocker = Blocker::parse(&parameter.blocker)?;
        let features = FeatureExtractor::new(&config, analyzer.term_types().cloned());
        log::debug!(
            "dual tokenizer: {} indexing, analyzer {}, normalize={}",
            config.indexing,
            analyzer.name(),
            config.normalize
        );

        Ok(DualTokenizer {
            parameter,
            config,
            analyzer,
            blocker,
            features,
            normalized: String::new(),
            state: TokenizerState::Prepared,
        })
    }

    /// Unnormalized n-gram indexing blocks the raw text directly.
    fn is_passthrough(&self) -> bool {
        self.config.indexing == IndexingType::Ngram && !self.config.normalize
    }

    /// Analyze one text whose first character sits at `start`, recording
    /// words or boundaries in `units` and appending to the n-gram buffer.
    ///
    /// Returns the normalized size of the text.
    fn accumulate(
        &mut self,
        text: &str,
        languages: &LanguageSet,
        start: usize,
        units: &mut IndexUnitMap,
    ) -> Result<usize> {
        let passthrough = self.is_passthrough();
        let words = if passthrough && !self.features.is_enabled() {
            Vec::new()
        } else {
            self.analyzer.set(text, languages)?;
            read_words(
                self.analyzer.as_mut(),
                &mut self.features,
                self.config.normalize,
            )?
        };

        match self.config.indexing {
            IndexingType::Word => {
                for (index, word) in words.iter().enumerate() {
                    units.push(word, UnitRole::Word, start + index + 1);
                }
                Ok(words.len())
            }
            IndexingType::Dual => {
                if !words.is_empty() {
                    units.ensure_boundary_start(start + 1);
                }
                let mut position = 0;
                for word in &words {
                    position += word.chars().count();
                    self.normalized.push_str(word);
                    units.push(
                        IndexUnitMap::BOUNDARY_KEY,
                        UnitRole::Boundary,
                        position + start + 1,
                    );
                }
                Ok(position)
            }
            IndexingType::Ngram if passthrough => {
                self.normalized.push_str(text);
                Ok(text.chars().count())
            }
            IndexingType::Ngram => {
                let before = self.normalized.len();
                for word in &words {
                    self.normalized.push_str(word);
                }
                Ok(self.normalized[before..].chars().count())
            }
        }
    }

    fn word_leaf_node(
        &mut self,
        term: &str,
        languages: &LanguageSet,
        mode: MatchMode,
    ) -> Result<LeafNode> {
        self.analyzer.set(term, languages)?;
        let mut builder = WordTreeBuilder::new(mode, self.config.expand_limit);
        while let Some(variants) = next_variants(self.analyzer.as_mut(), self.config.normalize)? {
            builder.push(variants);
        }
        Ok(builder.finish().unwrap_or_else(LeafNode::empty))
    }
}

/// Variants of the next query morpheme; the original form alone when not
/// normalizing.
fn next_variants(analyzer: &mut dyn MorphAnalyzer, normalize: bool) -> Result<Option<Vec<String>>> {
    if normalize {
        Ok(analyzer.next_expansion()?.map(|e| e.variants))
    } else {
        Ok(analyzer
            .next_word_with_original()?
            .map(|(_, original)| vec![original]))
    }
}

impl Tokenizer for DualTokenizer {
    fn name(&self) -> &'static str {
        self.parameter.kind.name()
    }

    fn indexing_type(&self) -> IndexingType {
        self.config.indexing
    }

    fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    fn state(&self) -> TokenizerState {
        self.state
    }

    fn initialize(&mut self) {
        self.normalized.clear();
        self.features.clear();
        self.state = TokenizerState::Document;
    }

    fn tokenize_at(
        &mut self,
        text: &str,
        languages: &LanguageSet,
        start: usize,
    ) -> Result<TokenizeResult> {
        let mut units = IndexUnitMap::new();
        let from = self.normalized.len();
        let normalized_size = self.accumulate(text, languages, start, &mut units)?;
        if self.config.indexing != IndexingType::Word {
            index_ngrams(&mut self.blocker, &self.normalized[from..], start, &mut units);
        }
        log::trace!(
            "tokenized {normalized_size} units of {} index into {} keys",
            self.config.indexing,
            units.len()
        );

        Ok(TokenizeResult {
            units,
            normalized_size,
            original_size: text.chars().count(),
        })
    }

    fn tokenize_sections(&mut self, sections: &[(&str, LanguageSet)]) -> Result<SectionsResult> {
        let mut units = IndexUnitMap::new();
        let from = self.normalized.len();
        let mut position = 0;
        let mut sizes = Vec::with_capacity(sections.len());
        for (text, languages) in sections {
            let normalized_size = self.accumulate(text, languages, position, &mut units)?;
            position += normalized_size;
            sizes.push(SectionSize {
                normalized_size,
                original_size: text.chars().count(),
            });
        }
        if self.config.indexing != IndexingType::Word {
            index_ngrams(&mut self.blocker, &self.normalized[from..], 0, &mut units);
        }

        Ok(SectionsResult {
            units,
            sections: sizes,
        })
    }

    fn create_leaf_node(
        &mut self,
        term: &str,
        languages: &LanguageSet,
        mode: MatchMode,
    ) -> Result<LeafNode> {
        check_match_mode(self.config.indexing, mode)?;
        if term.is_empty() {
            return Ok(LeafNode::empty());
        }
        if self.config.indexing == IndexingType::Word {
            return self.word_leaf_node(term, languages, mode);
        }

        if !self.config.normalize && mode != MatchMode::ExactWord {
            let leaf = search_leaf(&mut self.blocker, term);
            if leaf.is_empty() {
                return Ok(leaf);
            }
            let candidate = CandidateTerm {
                text: term.to_string(),
                boundaries: vec![0, term.chars().count()],
            };
            return Ok(wrap_for_mode(leaf, mode, &candidate));
        }

        self.analyzer.set(term, languages)?;
        let blocker = &mut self.blocker;
        let mut make_leaf = |text: &str| search_leaf(blocker, text);
        let mut builder = StringTreeBuilder::new(mode, self.config.expand_limit);
        while let Some(variants) = next_variants(self.analyzer.as_mut(), self.config.normalize)? {
            builder.push(variants, &mut make_leaf);
        }
        Ok(builder
            .finish(&mut make_leaf)
            .unwrap_or_else(LeafNode::empty))
    }

    fn expand_term(&mut self, term: &str, languages: &LanguageSet) -> Result<Vec<String>> {
        if !self.config.normalize {
            return Err(BunkatsuError::not_supported(
                "term expansion requires normalization",
            ));
        }
        self.analyzer.expand_buf(term, languages)
    }

    fn feature_list(&self) -> Vec<Feature> {
        self.features.feature_list()
    }

    fn description(&self) -> String {
        TokenizerParameter {
            blocker: self.blocker.params().describe(),
            ..self.parameter.clone()
        }
        .to_string()
    }

    fn into_analyzer(self: Box<Self>) -> Box<dyn MorphAnalyzer> {
        self.analyzer
    }
}
