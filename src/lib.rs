//! # bunkatsu
//!
//! Tokenization and query-term assembly for full-text inverted indexes.
//!
//! ## Features
//!
//! - Character-class aware n-gram blocking with per-class length bounds
//! - N-gram, word and dual (n-gram plus word boundary) indexing
//! - Query terms expanded into bounded leaf-node trees
//! - Frequency and cost based feature extraction
//!
//! ## Modules
//!
//! - [`analysis`] - character classes, the blocker and the analyzer contract
//! - [`tokenizer`] - the `NGR` and `DUAL` tokenizers
//! - [`leaf_node`] - search-expression trees, their builders and a matcher
//! - [`feature`] - top-K feature terms
//! - [`config`] - tokenizer configuration
//! - [`error`] - error types

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod feature;
pub mod leaf_node;
pub mod tokenizer;

pub mod prelude {
    pub use crate::analysis::analyzer::simple::SimpleAnalyzer;
    pub use crate::analysis::analyzer::{LanguageSet, MorphAnalyzer};
    pub use crate::config::{IndexingType, TokenizerConfig};
    pub use crate::error::{BunkatsuError, Result};
    pub use crate::leaf_node::{LeafNode, MatchMode};
    pub use crate::tokenizer::{IndexUnitMap, Tokenizer, create_tokenizer};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
