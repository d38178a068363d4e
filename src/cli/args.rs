//! Command line argument parsing for the bunkatsu CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::LanguageSet;
use crate::config::IndexingType;
use crate::leaf_node::MatchMode;

/// bunkatsu - tokenize text and build query trees for full-text indexes
#[derive(Parser, Debug, Clone)]
#[command(name = "bunkatsu")]
#[command(about = "Character-class blocking, dual tokenization and query leaf-node assembly")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct BunkatsuArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl BunkatsuArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Tokenize a text into index units
    Tokenize(TokenizeArgs),

    /// Build the leaf-node tree of a query term
    Query(QueryArgs),

    /// Extract feature terms from a text
    Features(FeaturesArgs),

    /// Show the effective tokenizer configuration
    Describe(DescribeArgs),
}

/// Options shared by every command that builds a tokenizer
#[derive(Args, Debug, Clone)]
pub struct TokenizerOptions {
    /// Tokenizer parameter string
    #[arg(short, long, default_value = "DUAL:JAP:ALL:2")]
    pub param: String,

    /// Index layout (ngram, word, dual); overrides the config file
    #[arg(short, long)]
    pub indexing: Option<IndexingType>,

    /// Language tags, e.g. ja+en
    #[arg(short, long, default_value = "ja+en")]
    pub lang: LanguageSet,

    /// Synonym dictionary file (JSON array of groups)
    #[arg(long, value_name = "SYNONYM_FILE")]
    pub synonyms: Option<PathBuf>,

    /// Tokenizer configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Disable normalization
    #[arg(long)]
    pub no_normalize: bool,

    /// Expansion limit; overrides the config file
    #[arg(long)]
    pub expand_limit: Option<usize>,
}

/// Arguments for tokenizing
#[derive(Parser, Debug, Clone)]
pub struct TokenizeArgs {
    #[command(flatten)]
    pub tokenizer: TokenizerOptions,

    /// Text to tokenize; repeat for multiple sections
    #[arg(value_name = "TEXT", required = true)]
    pub texts: Vec<String>,

    /// 0-based position of the first character
    #[arg(long, default_value = "0")]
    pub start: usize,
}

/// Arguments for building a query tree
#[derive(Parser, Debug, Clone)]
pub struct QueryArgs {
    #[command(flatten)]
    pub tokenizer: TokenizerOptions,

    /// Query term
    #[arg(value_name = "TERM")]
    pub term: String,

    /// Match mode
    #[arg(short, long, default_value = "string")]
    pub mode: MatchMode,

    /// Document to evaluate the tree against
    #[arg(short, long)]
    pub text: Option<String>,
}

/// Arguments for feature extraction
#[derive(Parser, Debug, Clone)]
pub struct FeaturesArgs {
    #[command(flatten)]
    pub tokenizer: TokenizerOptions,

    /// Text to analyze
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Number of features to keep
    #[arg(short, long, default_value = "10")]
    pub size: usize,
}

/// Arguments for describing a tokenizer
#[derive(Parser, Debug, Clone)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub tokenizer: TokenizerOptions,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
