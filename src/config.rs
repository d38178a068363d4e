//! Tokenizer configuration.
//!
//! Tunables such as the expansion limit and the feature count live in
//! [`TokenizerConfig`] and are handed to each tokenizer at construction.
//! Independently configured instances can coexist in one process.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BunkatsuError, Result};

/// Default cap on multiplicative expansion fan-out.
pub const DEFAULT_EXPAND_LIMIT: usize = 200;

/// Default upper bound for a noun's occurrence cost.
pub const DEFAULT_MAX_OCCURRENCE_COST: i32 = 500;

/// Default multiplier applied to `ln(length)` for alphabetic terms.
pub const DEFAULT_ALPHABET_COST_FACTOR: f64 = 25.0;

/// Index layout selected from file metadata.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexingType {
    /// Character n-grams only.
    #[default]
    Ngram,
    /// Whole words only.
    Word,
    /// Character n-grams plus word-boundary markers.
    Dual,
}

impl IndexingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexingType::Ngram => "ngram",
            IndexingType::Word => "word",
            IndexingType::Dual => "dual",
        }
    }
}

impl fmt::Display for IndexingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndexingType {
    type Err = BunkatsuError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ngram" => Ok(IndexingType::Ngram),
            "word" => Ok(IndexingType::Word),
            "dual" => Ok(IndexingType::Dual),
            other => Err(BunkatsuError::invalid_config(format!(
                "unknown indexing type: {other}"
            ))),
        }
    }
}

/// Configuration shared by all tokenizer strategies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Index layout.
    pub indexing: IndexingType,
    /// Run text through the analyzer's normalization.
    pub normalize: bool,
    /// Cap on `#variants_so_far * #new_variants` at one term position.
    pub expand_limit: usize,
    /// Upper bound for noun occurrence costs in feature scoring.
    pub max_occurrence_cost: i32,
    /// Multiplier for `ln(length)` of alphabetic feature terms.
    pub alphabet_cost_factor: f64,
    /// Number of feature terms to keep; 0 disables feature extraction.
    pub feature_size: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        TokenizerConfig {
            indexing: IndexingType::default(),
            normalize: true,
            expand_limit: DEFAULT_EXPAND_LIMIT,
            max_occurrence_cost: DEFAULT_MAX_OCCURRENCE_COST,
            alphabet_cost_factor: DEFAULT_ALPHABET_COST_FACTOR,
            feature_size: 0,
        }
    }
}

impl TokenizerConfig {
    /// Create a configuration for the given index layout.
    pub fn new(indexing: IndexingType) -> Self {
        TokenizerConfig {
            indexing,
            ..Default::default()
        }
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_expand_limit(mut self, limit: usize) -> Self {
        self.expand_limit = limit;
        self
    }

    pub fn with_feature_size(mut self, size: usize) -> Self {
        self.feature_size = size;
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.expand_limit == 0 {
            return Err(BunkatsuError::invalid_config(
                "expand_limit must be greater than 0",
            ));
        }
        if self.max_occurrence_cost < 0 {
            return Err(BunkatsuError::invalid_config(
                "max_occurrence_cost must not be negative",
            ));
        }
        if !self.alphabet_cost_factor.is_finite() || self.alphabet_cost_factor < 0.0 {
            return Err(BunkatsuError::invalid_config(
                "alphabet_cost_factor must be a non-negative number",
            ));
        }
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            BunkatsuError::invalid_config(format!(
                "failed to read config file '{}': {e}",
                path.as_ref().display()
            ))
        })?;
        let config: TokenizerConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TokenizerConfig::default();
        assert_eq!(config.indexing, IndexingType::Ngram);
        assert!(config.normalize);
        assert_eq!(config.expand_limit, 200);
        assert_eq!(config.max_occurrence_cost, 500);
        assert_eq!(config.alphabet_cost_factor, 25.0);
        assert_eq!(config.feature_size, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_limit() {
        let config = TokenizerConfig::new(IndexingType::Dual).with_expand_limit(0);
        let err = config.validate().unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TokenizerConfig =
            serde_json::from_str(r#"{"indexing": "dual", "feature_size": 10}"#).unwrap();
        assert_eq!(config.indexing, IndexingType::Dual);
        assert_eq!(config.feature_size, 10);
        assert_eq!(config.expand_limit, DEFAULT_EXPAND_LIMIT);
    }

    #[test]
    fn test_indexing_type_from_str() {
        assert_eq!("DUAL".parse::<IndexingType>().unwrap(), IndexingType::Dual);
        assert_eq!("word".parse::<IndexingType>().unwrap(), IndexingType::Word);
        assert!("phrase".parse::<IndexingType>().is_err());
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = TokenizerConfig::from_json_file("/nonexistent/bunkatsu.json").unwrap_err();
        assert!(matches!(err, BunkatsuError::Configuration(_)));
    }
}
