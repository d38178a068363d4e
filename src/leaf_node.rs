//! Search-expression leaf nodes.
//!
//! A [`LeafNode`] tree is what a tokenizer hands to the retrieval engine for
//! one query term. Leaves look index units up; inner nodes combine them:
//!
//! ```text
//! OrderedSequence            (only when expansion overflowed the limit)
//! ├── AnyOf                  (expansion variants of one stretch of the term)
//! │   ├── WordBoundary(Plain)
//! │   └── WordBoundary(Plain)
//! └── Plain | ShortWord
//! ```
//!
//! - [`builder`] assembles trees from expansion variants
//! - [`matcher`] evaluates a tree against one tokenized document

pub mod builder;
pub mod matcher;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BunkatsuError, Result};

/// How a query term has to line up with word boundaries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// Unanchored substring.
    #[default]
    String,
    /// Every morpheme boundary of the term must be a word boundary.
    ExactWord,
    /// Both ends of the term must be word boundaries.
    SimpleWord,
    /// The start of the term must be a word boundary.
    WordHead,
    /// The end of the term must be a word boundary.
    WordTail,
}

impl MatchMode {
    pub const ALL: [MatchMode; 5] = [
        MatchMode::String,
        MatchMode::ExactWord,
        MatchMode::SimpleWord,
        MatchMode::WordHead,
        MatchMode::WordTail,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::String => "string",
            MatchMode::ExactWord => "exact-word",
            MatchMode::SimpleWord => "simple-word",
            MatchMode::WordHead => "word-head",
            MatchMode::WordTail => "word-tail",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = BunkatsuError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.to_ascii_lowercase().replace('_', "-");
        MatchMode::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .ok_or_else(|| BunkatsuError::invalid_config(format!("unknown match mode: {s}")))
    }
}

/// An index unit at a relative offset inside a leaf.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatedUnit {
    pub offset: usize,
    pub unit: String,
}

impl LocatedUnit {
    pub fn new<S: Into<String>>(offset: usize, unit: S) -> Self {
        LocatedUnit {
            offset,
            unit: unit.into(),
        }
    }
}

/// A node of the search-expression tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LeafNode {
    /// Every unit must occur at `start + offset`.
    Plain {
        term: String,
        units: Vec<LocatedUnit>,
        /// Positions covered by a match.
        span: usize,
    },
    /// A token shorter than its class minimum; matches the exact unit or any
    /// unit whose key lies in `lower..=upper`.
    ShortWord {
        unit: String,
        offset: usize,
        min_length: usize,
        lower: String,
        upper: String,
        span: usize,
    },
    /// `inner` whose match start plus each boundary offset is a word boundary.
    WordBoundary {
        inner: Box<LeafNode>,
        boundaries: Vec<usize>,
        policy: MatchMode,
    },
    /// Any child may match.
    AnyOf { children: Vec<LeafNode> },
    /// Children match back to back in document order.
    OrderedSequence { children: Vec<LeafNode> },
}

impl LeafNode {
    pub fn plain<S: Into<String>>(term: S, units: Vec<LocatedUnit>, span: usize) -> Self {
        LeafNode::Plain {
            term: term.into(),
            units,
            span,
        }
    }

    pub fn word_boundary(inner: LeafNode, policy: MatchMode, boundaries: Vec<usize>) -> Self {
        LeafNode::WordBoundary {
            inner: Box::new(inner),
            boundaries,
            policy,
        }
    }

    /// Alternation over `children`; a single child is returned unwrapped.
    pub fn any_of(mut children: Vec<LeafNode>) -> Self {
        if children.len() == 1 {
            if let Some(child) = children.pop() {
                return child;
            }
        }
        LeafNode::AnyOf { children }
    }

    pub fn ordered(children: Vec<LeafNode>) -> Self {
        LeafNode::OrderedSequence { children }
    }

    /// A node that matches nothing.
    pub fn empty() -> Self {
        LeafNode::AnyOf {
            children: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, LeafNode::AnyOf { children } if children.is_empty())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LeafNode::Plain { .. } => "plain",
            LeafNode::ShortWord { .. } => "short_word",
            LeafNode::WordBoundary { .. } => "word_boundary",
            LeafNode::AnyOf { .. } => "any_of",
            LeafNode::OrderedSequence { .. } => "ordered_sequence",
        }
    }

    pub fn children(&self) -> &[LeafNode] {
        match self {
            LeafNode::AnyOf { children } | LeafNode::OrderedSequence { children } => children,
            LeafNode::WordBoundary { inner, .. } => std::slice::from_ref(inner.as_ref()),
            _ => &[],
        }
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(LeafNode::node_count).sum::<usize>()
    }

    /// Largest number of children of any `AnyOf` in the tree.
    pub fn max_alternation(&self) -> usize {
        let own = match self {
            LeafNode::AnyOf { children } => children.len(),
            _ => 0,
        };
        self.children()
            .iter()
            .map(LeafNode::max_alternation)
            .fold(own, usize::max)
    }
}

impl fmt::Display for LeafNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, children: &[LeafNode], sep: &str) -> fmt::Result {
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    f.write_str(sep)?;
                }
                write!(f, "{child}")?;
            }
            Ok(())
        }

        match self {
            LeafNode::Plain { term, units, .. } => {
                write!(f, "Plain[{term:?}:")?;
                for unit in units {
                    write!(f, " {}@{}", unit.unit, unit.offset)?;
                }
                f.write_str("]")
            }
            LeafNode::ShortWord {
                unit, min_length, ..
            } => write!(f, "Short[{unit:?} min={min_length}]"),
            LeafNode::WordBoundary {
                inner,
                boundaries,
                policy,
            } => write!(f, "Word[{policy} {boundaries:?}]({inner})"),
            LeafNode::AnyOf { children } => {
                f.write_str("AnyOf(")?;
                list(f, children, " | ")?;
                f.write_str(")")
            }
            LeafNode::OrderedSequence { children } => {
                f.write_str("Ordered(")?;
                list(f, children, ", ")?;
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(term: &str) -> LeafNode {
        LeafNode::plain(term, vec![LocatedUnit::new(0, term)], term.chars().count())
    }

    #[test]
    fn test_match_mode_parse() {
        assert_eq!("word-head".parse::<MatchMode>().unwrap(), MatchMode::WordHead);
        assert_eq!("EXACT_WORD".parse::<MatchMode>().unwrap(), MatchMode::ExactWord);
        assert!("prefix".parse::<MatchMode>().is_err());
        for mode in MatchMode::ALL {
            assert_eq!(mode.as_str().parse::<MatchMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_any_of_collapses_single_child() {
        let node = LeafNode::any_of(vec![plain("ab")]);
        assert_eq!(node.kind(), "plain");
        let node = LeafNode::any_of(vec![plain("ab"), plain("cd")]);
        assert_eq!(node.kind(), "any_of");
        assert_eq!(node.max_alternation(), 2);
        assert!(LeafNode::empty().is_empty());
    }

    #[test]
    fn test_display() {
        let node = LeafNode::ordered(vec![
            LeafNode::any_of(vec![plain("ab"), plain("cd")]),
            LeafNode::word_boundary(plain("ef"), MatchMode::WordTail, vec![2]),
        ]);
        assert_eq!(
            node.to_string(),
            r#"Ordered(AnyOf(Plain["ab": ab@0] | Plain["cd": cd@0]), Word[word-tail [2]](Plain["ef": ef@0]))"#
        );
        assert_eq!(node.node_count(), 6);
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_value(plain("ab")).unwrap();
        assert_eq!(json["kind"], "plain");
        assert_eq!(json["units"][0]["unit"], "ab");
    }
}
