//! N-gram tokenizer (`NGR`).

use std::fmt;

use crate::analysis::analyzer::{LanguageSet, MorphAnalyzer};
use crate::analysis::blocker::Blocker;
use crate::config::{IndexingType, TokenizerConfig};
use crate::error::{BunkatsuError, Result};
use crate::feature::{Feature, FeatureExtractor};
use crate::leaf_node::builder::{CandidateTerm, is_contained};
use crate::leaf_node::{LeafNode, MatchMode};
use crate::tokenizer::parameter::TokenizerParameter;
use crate::tokenizer::{
    IndexUnitMap, SectionSize, SectionsResult, TokenizeResult, Tokenizer, TokenizerState,
    check_match_mode, index_ngrams, read_words, search_leaf,
};

/// A tokenizer that blocks the whole (normalized) text into n-grams.
///
/// The analyzer is only used for whole-buffer normalization and expansion,
/// and for feature scoring when that is enabled.
///
/// # Examples
///
/// ```
/// use bunkatsu::analysis::analyzer::LanguageSet;
/// use bunkatsu::analysis::analyzer::simple::SimpleAnalyzer;
/// use bunkatsu::config::TokenizerConfig;
/// use bunkatsu::tokenizer::Tokenizer;
/// use bunkatsu::tokenizer::ngram::NgramTokenizer;
/// use bunkatsu::tokenizer::parameter::TokenizerParameter;
///
/// let parameter = TokenizerParameter::parse("NGR:2").unwrap();
/// let mut tokenizer = NgramTokenizer::new(
///     parameter,
///     TokenizerConfig::default(),
///     Box::new(SimpleAnalyzer::new()),
/// )
/// .unwrap();
///
/// tokenizer.initialize();
/// let result = tokenizer.tokenize("ABC", &LanguageSet::single("en")).unwrap();
/// assert_eq!(result.units.positions("ab"), [1]);
/// assert_eq!(result.units.positions("bc"), [2]);
/// assert_eq!(result.units.positions("c"), [3]);
/// ```
pub struct NgramTokenizer {
    parameter: TokenizerParameter,
    config: TokenizerConfig,
    analyzer: Box<dyn MorphAnalyzer>,
    blocker: Blocker,
    features: FeatureExtractor,
    /// Normalized text of the current document.
    normalized: String,
    state: TokenizerState,
}

impl fmt::Debug for NgramTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NgramTokenizer")
            .field("parameter", &self.parameter)
            .field("config", &self.config)
            .field("analyzer", &self.analyzer.name())
            .field("state", &self.state)
            .finish()
    }
}

impl NgramTokenizer {
    pub fn new(
        parameter: TokenizerParameter,
        config: TokenizerConfig,
        analyzer: Box<dyn MorphAnalyzer>,
    ) -> Result<Self> {
        config.validate()?;
        if config.indexing != IndexingType::Ngram {
            return Err(BunkatsuError::invalid_config(format!(
                "NGR tokenizer cannot build a {} index",
                config.indexing
            )));
        }
        let blocker = Blocker::parse(&parameter.blocker)?;
        let features = FeatureExtractor::new(&config, analyzer.term_types().cloned());

        Ok(NgramTokenizer {
            parameter,
            config,
            analyzer,
            blocker,
            features,
            normalized: String::new(),
            state: TokenizerState::Prepared,
        })
    }

    /// Append one text to the document buffer; returns its normalized length.
    fn accumulate(&mut self, text: &str, languages: &LanguageSet) -> Result<usize> {
        if self.features.is_enabled() {
            self.analyzer.set(text, languages)?;
            read_words(
                self.analyzer.as_mut(),
                &mut self.features,
                self.config.normalize,
            )?;
        }

        let before = self.normalized.len();
        if self.config.normalize {
            let normalized = self.analyzer.normalize_buf(text, languages)?;
            self.normalized.push_str(&normalized);
        } else {
            self.normalized.push_str(text);
        }
        Ok(self.normalized[before..].chars().count())
    }
}

impl Tokenizer for NgramTokenizer {
    fn name(&self) -> &'static str {
        self.parameter.kind.name()
    }

    fn indexing_type(&self) -> IndexingType {
        IndexingType::Ngram
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
        let from = self.normalized.len();
        let normalized_size = self.accumulate(text, languages)?;

        let mut units = IndexUnitMap::new();
        index_ngrams(&mut self.blocker, &self.normalized[from..], start, &mut units);
        log::trace!(
            "tokenized {normalized_size} chars into {} units",
            units.len()
        );

        Ok(TokenizeResult {
            units,
            normalized_size,
            original_size: text.chars().count(),
        })
    }

    fn tokenize_sections(&mut self, sections: &[(&str, LanguageSet)]) -> Result<SectionsResult> {
        let from = self.normalized.len();
        let mut sizes = Vec::with_capacity(sections.len());
        for (text, languages) in sections {
            let normalized_size = self.accumulate(text, languages)?;
            sizes.push(SectionSize {
                normalized_size,
                original_size: text.chars().count(),
            });
        }

        let mut units = IndexUnitMap::new();
        index_ngrams(&mut self.blocker, &self.normalized[from..], 0, &mut units);
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
        check_match_mode(IndexingType::Ngram, mode)?;
        if term.is_empty() {
            return Ok(LeafNode::empty());
        }
        if !self.config.normalize {
            return Ok(search_leaf(&mut self.blocker, term));
        }

        let mut variants = self.analyzer.expand_buf(term, languages)?;
        if variants.len() > self.config.expand_limit {
            log::warn!(
                "truncating {} expansion variants of {term:?} to limit {}",
                variants.len(),
                self.config.expand_limit
            );
            variants.truncate(self.config.expand_limit);
        }

        let candidates: Vec<CandidateTerm> = variants
            .into_iter()
            .filter(|v| !v.is_empty())
            .map(|text| CandidateTerm {
                boundaries: vec![0, text.chars().count()],
                text,
            })
            .collect();
        let children = candidates
            .iter()
            .enumerate()
            .filter(|(i, _)| !is_contained(&candidates, *i, mode))
            .map(|(_, candidate)| search_leaf(&mut self.blocker, &candidate.text))
            .filter(|leaf| !leaf.is_empty())
            .collect();
        Ok(LeafNode::any_of(children))
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
