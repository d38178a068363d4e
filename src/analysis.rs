//! Text analysis layer: character classes, the blocker and the analyzer contract.
//!
//! - [`block`] classifies characters into [`BlockClass`](block::BlockClass)es
//! - [`blocker`] cuts class-aware n-grams from a buffer
//! - [`analyzer`] defines the morphological analyzer the tokenizers drive
//! - [`synonym`] holds the expansion dictionary of the reference analyzer

pub mod analyzer;
pub mod block;
pub mod blocker;
pub mod synonym;
