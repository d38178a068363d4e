//! In-memory evaluation of leaf-node trees.
//!
//! Evaluates a tree against the [`IndexUnitMap`] of one tokenized document
//! and returns every matching span. This gives the node kinds their
//! executable meaning without a postings engine:
//!
//! - `Plain` matches at `s` when each unit occurs at `s + offset`
//! - `ShortWord` matches any occurrence of its unit or of a key in its range
//! - `WordBoundary` keeps inner matches whose `s + boundary` positions are
//!   all recorded under the empty key
//! - `AnyOf` is the union of its children
//! - `OrderedSequence` chains children so each starts where the previous ended

use std::ops::Bound;

use serde::Serialize;

use crate::leaf_node::LeafNode;
use crate::tokenizer::IndexUnitMap;

/// A matched stretch of positions, `end` exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }
}

impl LeafNode {
    /// All spans where this tree matches, sorted and deduplicated.
    pub fn find_spans(&self, units: &IndexUnitMap) -> Vec<Span> {
        let mut spans = match self {
            LeafNode::Plain {
                units: located,
                span,
                ..
            } => {
                let Some(first) = located.first() else {
                    return Vec::new();
                };
                units
                    .positions(&first.unit)
                    .iter()
                    .filter_map(|p| p.checked_sub(first.offset))
                    .filter(|start| *start > 0)
                    .filter(|start| {
                        located
                            .iter()
                            .all(|u| units.contains(&u.unit, start + u.offset))
                    })
                    .map(|start| Span::new(start, start + span))
                    .collect()
            }
            LeafNode::ShortWord {
                unit,
                offset,
                lower,
                upper,
                span,
                ..
            } => {
                let exact = units.positions(unit).iter();
                let ranged = units
                    .range(Bound::Included(lower.as_str()), Bound::Included(upper.as_str()))
                    .flat_map(|(_, list)| list.positions().iter());
                exact
                    .chain(ranged)
                    .filter_map(|p| p.checked_sub(*offset))
                    .filter(|start| *start > 0)
                    .map(|start| Span::new(start, start + span))
                    .collect()
            }
            LeafNode::WordBoundary {
                inner, boundaries, ..
            } => inner
                .find_spans(units)
                .into_iter()
                .filter(|s| {
                    boundaries
                        .iter()
                        .all(|b| units.is_boundary(s.start + b))
                })
                .collect(),
            LeafNode::AnyOf { children } => children
                .iter()
                .flat_map(|child| child.find_spans(units))
                .collect(),
            LeafNode::OrderedSequence { children } => {
                let mut iter = children.iter();
                let Some(first) = iter.next() else {
                    return Vec::new();
                };
                let mut chained = first.find_spans(units);
                for child in iter {
                    if chained.is_empty() {
                        break;
                    }
                    let next = child.find_spans(units);
                    chained = chained
                        .iter()
                        .flat_map(|head| {
                            next.iter()
                                .filter(move |tail| tail.start == head.end)
                                .map(move |tail| Span::new(head.start, tail.end))
                        })
                        .collect();
                }
                chained
            }
        };
        spans.sort_unstable();
        spans.dedup();
        spans
    }

    /// Whether the tree matches anywhere.
    pub fn matches(&self, units: &IndexUnitMap) -> bool {
        !self.find_spans(units).is_empty()
    }
}
