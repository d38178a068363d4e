//! Feature (keyword) extraction.
//!
//! While a document is tokenized, nouns and alphabetic unknown words of two
//! or more characters are counted together with an occurrence cost. The
//! feature list scores each term as `ln(tf + 1) * cost` and keeps the top K,
//! extending past K while the score ties with the K-th entry, up to 2K.

use std::cmp::Ordering;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Morpheme, TermType, TermTypeTable, UnifiedTag};
use crate::config::TokenizerConfig;

/// One scored feature term.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub term: String,
    pub scale: f64,
}

/// Per-term accumulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureCandidate {
    pub frequency: u32,
    pub cost: i32,
}

/// Accumulates feature candidates for one document.
#[derive(Clone, Debug)]
pub struct FeatureExtractor {
    size: usize,
    max_cost: i32,
    alphabet_cost_factor: f64,
    term_types: Option<TermTypeTable>,
    candidates: AHashMap<String, FeatureCandidate>,
}

impl FeatureExtractor {
    pub fn new(config: &TokenizerConfig, term_types: Option<TermTypeTable>) -> Self {
        FeatureExtractor {
            size: config.feature_size,
            max_cost: config.max_occurrence_cost,
            alphabet_cost_factor: config.alphabet_cost_factor,
            term_types,
            candidates: AHashMap::new(),
        }
    }

    /// Whether feature extraction was requested.
    pub fn is_enabled(&self) -> bool {
        self.size > 0
    }

    pub fn clear(&mut self) {
        self.candidates.clear();
    }

    pub fn candidate(&self, term: &str) -> Option<&FeatureCandidate> {
        self.candidates.get(term)
    }

    /// Count one morpheme if it qualifies as a feature candidate.
    pub fn observe(&mut self, morpheme: &Morpheme) {
        let is_noun = morpheme.tag == UnifiedTag::Noun;
        if !is_noun && morpheme.tag != UnifiedTag::Unknown {
            return;
        }
        let length = morpheme.normalized.chars().count();
        if length <= 1 {
            return;
        }
        // Without a table every unknown word counts as alphabetic.
        let term_type = self
            .term_types
            .as_ref()
            .map_or(TermType::Alphabet, |table| {
                table.get(&morpheme.pos).copied().unwrap_or(TermType::Other)
            });
        if !is_noun && term_type != TermType::Alphabet {
            return;
        }

        if let Some(candidate) = self.candidates.get_mut(&morpheme.normalized) {
            candidate.frequency += 1;
            return;
        }
        let cost = if is_noun {
            self.max_cost.min(morpheme.cost)
        } else {
            (self.alphabet_cost_factor * (length as f64).ln()) as i32
        };
        self.candidates.insert(
            morpheme.normalized.clone(),
            FeatureCandidate { frequency: 1, cost },
        );
    }

    /// Top-K features by descending scale; empty when extraction is off.
    pub fn feature_list(&self) -> Vec<Feature> {
        if !self.is_enabled() {
            return Vec::new();
        }

        let mut features: Vec<Feature> = self
            .candidates
            .iter()
            .map(|(term, c)| Feature {
                term: term.clone(),
                scale: ((c.frequency + 1) as f64).ln() * c.cost as f64,
            })
            .collect();
        features.sort_by(|a, b| a.term.cmp(&b.term));
        features.sort_by(|a, b| b.scale.partial_cmp(&a.scale).unwrap_or(Ordering::Equal));

        if features.len() > self.size {
            let boundary = features[self.size - 1].scale;
            let limit = features.len().min(self.size * 2);
            let mut keep = self.size;
            while keep < limit && features[keep].scale == boundary {
                keep += 1;
            }
            features.truncate(keep);
        }
        features
    }
}
