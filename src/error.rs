//! Error types for the Bunkatsu library.
//!
//! All errors are represented by the [`BunkatsuError`] enum. The variants follow
//! the three failure classes of the tokenization layer:
//!
//! - configuration errors, raised while parsing blocker or tokenizer
//!   descriptions and fatal to the instance being built,
//! - unsupported operations, raised per call and recoverable by the caller,
//! - analysis errors, raised by a [`MorphAnalyzer`](crate::analysis::analyzer::MorphAnalyzer)
//!   and propagated unchanged.
//!
//! Expansion-limit overflow is not an error; it reshapes the leaf-node tree.
//!
//! # Examples
//!
//! ```
//! use bunkatsu::error::{BunkatsuError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(BunkatsuError::invalid_config("unknown class: XYZ"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Bunkatsu operations.
#[derive(Error, Debug)]
pub enum BunkatsuError {
    /// I/O errors (dictionary and configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed blocker or tokenizer parameters, unknown class names
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Operation not supported by the current indexing type or settings
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Errors raised by a morphological analyzer
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors from analyzer constructors outside this crate
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with BunkatsuError.
pub type Result<T> = std::result::Result<T, BunkatsuError>;

impl BunkatsuError {
    /// Create a new configuration error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        BunkatsuError::Configuration(msg.into())
    }

    /// Create a new not-supported error.
    pub fn not_supported<S: Into<String>>(msg: S) -> Self {
        BunkatsuError::NotSupported(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        BunkatsuError::Analysis(msg.into())
    }

    /// Whether this error invalidates the instance that raised it.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BunkatsuError::Configuration(_))
    }
}
