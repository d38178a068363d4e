//! Leaf-node tree assembly from expansion variants.
//!
//! A query term is analyzed into morphemes, each with one or more expansion
//! variants. The builders keep the cross product of the variants seen so far
//! as candidate terms. When adding the next variant set would push the
//! product past the expansion limit, the current candidates are materialized
//! as one `AnyOf` group and a new product starts from the overflowing set;
//! the groups are finally joined by an `OrderedSequence`.
//!
//! Leaf construction is delegated to a callback, so the builders stay free of
//! any tokenizer or index state.

use crate::leaf_node::{LeafNode, LocatedUnit, MatchMode};

/// One expansion combination of a query term.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CandidateTerm {
    pub text: String,
    /// Character offsets of morpheme boundaries, starting with 0.
    pub boundaries: Vec<usize>,
}

/// Running cross product of variant sets.
#[derive(Clone, Debug, Default)]
pub struct CandidateSet {
    terms: Vec<CandidateTerm>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[CandidateTerm] {
        &self.terms
    }

    pub fn take(&mut self) -> Vec<CandidateTerm> {
        std::mem::take(&mut self.terms)
    }

    /// Extend every candidate with every variant.
    ///
    /// Returns `false` and leaves the set untouched when the product would
    /// exceed `limit`.
    pub fn try_append(&mut self, variants: &[String], limit: usize) -> bool {
        if variants.len() * self.terms.len() > limit {
            return false;
        }
        if self.terms.is_empty() {
            self.terms.push(CandidateTerm {
                text: String::new(),
                boundaries: vec![0],
            });
        }

        let mut extended = Vec::with_capacity(self.terms.len() * variants.len());
        for variant in variants {
            let length = variant.chars().count();
            for term in &self.terms {
                let mut next = term.clone();
                next.text.push_str(variant);
                let last = next.boundaries.last().copied().unwrap_or(0);
                next.boundaries.push(last + length);
                extended.push(next);
            }
        }
        self.terms = extended;
        true
    }
}

/// Running cross product of word sequences for word indexes.
#[derive(Clone, Debug, Default)]
pub struct WordCandidateSet {
    terms: Vec<Vec<LocatedUnit>>,
}

impl WordCandidateSet {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn take(&mut self) -> Vec<Vec<LocatedUnit>> {
        std::mem::take(&mut self.terms)
    }

    /// Same contract as [`CandidateSet::try_append`], one word per variant.
    pub fn try_append(&mut self, variants: &[String], limit: usize) -> bool {
        if variants.len() * self.terms.len() > limit {
            return false;
        }
        if self.terms.is_empty() {
            self.terms.push(Vec::new());
        }

        let location = self.terms[0].len();
        let mut extended = Vec::with_capacity(self.terms.len() * variants.len());
        for variant in variants {
            for term in &self.terms {
                let mut next = term.clone();
                next.push(LocatedUnit::new(location, variant.clone()));
                extended.push(next);
            }
        }
        self.terms = extended;
        true
    }
}

/// Whether `candidates[index]` contains another candidate at an edge the
/// match mode makes redundant. Equal candidates keep the first occurrence.
pub fn is_contained(candidates: &[CandidateTerm], index: usize, mode: MatchMode) -> bool {
    let term = candidates[index].text.as_str();
    candidates.iter().enumerate().any(|(j, other)| {
        if j == index {
            return false;
        }
        let other = other.text.as_str();
        if other == term {
            return j < index && !matches!(mode, MatchMode::ExactWord | MatchMode::SimpleWord);
        }
        match mode {
            MatchMode::String => term.contains(other),
            MatchMode::WordHead => term.starts_with(other),
            MatchMode::WordTail => term.ends_with(other),
            MatchMode::ExactWord | MatchMode::SimpleWord => false,
        }
    })
}

/// Wrap a leaf according to the match mode of the final candidate group.
pub fn wrap_for_mode(leaf: LeafNode, mode: MatchMode, candidate: &CandidateTerm) -> LeafNode {
    let length = candidate.boundaries.last().copied().unwrap_or(0);
    match mode {
        MatchMode::String => leaf,
        MatchMode::ExactWord => {
            LeafNode::word_boundary(leaf, mode, candidate.boundaries.clone())
        }
        MatchMode::SimpleWord => LeafNode::word_boundary(leaf, mode, vec![0, length]),
        MatchMode::WordHead => LeafNode::word_boundary(leaf, mode, vec![0]),
        MatchMode::WordTail => LeafNode::word_boundary(leaf, mode, vec![length]),
    }
}

/// Cap a single variant set at the expansion limit.
fn clamp_variants(variants: &mut Vec<String>, limit: usize) {
    if variants.len() > limit {
        log::warn!(
            "truncating {} expansion variants to limit {limit}",
            variants.len()
        );
        variants.truncate(limit);
    }
}

fn is_blank(variants: &[String]) -> bool {
    variants.first().is_none_or(|v| v.is_empty())
}

/// Builds trees over character-position indexes (n-gram and dual).
#[derive(Debug)]
pub struct StringTreeBuilder {
    mode: MatchMode,
    limit: usize,
    current: CandidateSet,
    groups: Vec<LeafNode>,
}

impl StringTreeBuilder {
    pub fn new(mode: MatchMode, limit: usize) -> Self {
        StringTreeBuilder {
            mode,
            limit: limit.max(1),
            current: CandidateSet::new(),
            groups: Vec::new(),
        }
    }

    /// Match mode applied to the candidates still to be materialized.
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Number of groups already flushed by overflow.
    pub fn flushed_groups(&self) -> usize {
        self.groups.len()
    }

    /// Add the variants of the next morpheme.
    pub fn push<F>(&mut self, mut variants: Vec<String>, make_leaf: &mut F)
    where
        F: FnMut(&str) -> LeafNode,
    {
        if is_blank(&variants) {
            return;
        }
        clamp_variants(&mut variants, self.limit);
        if self.current.try_append(&variants, self.limit) {
            return;
        }

        log::debug!(
            "expansion limit {} exceeded ({} x {}), flushing group",
            self.limit,
            self.current.len(),
            variants.len()
        );
        let group = self.flush(make_leaf);
        self.groups.push(group);
        self.current.try_append(&variants, self.limit);
    }

    /// Materialize the current candidates as a group.
    ///
    /// Head boundaries belong to the first group only, so after flushing a
    /// head-anchored mode continues as the mode of its remaining edge.
    fn flush<F>(&mut self, make_leaf: &mut F) -> LeafNode
    where
        F: FnMut(&str) -> LeafNode,
    {
        let mode = self.mode;
        let children = self
            .current
            .take()
            .into_iter()
            .map(|candidate| {
                let leaf = make_leaf(&candidate.text);
                match mode {
                    MatchMode::ExactWord => {
                        LeafNode::word_boundary(leaf, mode, candidate.boundaries)
                    }
                    MatchMode::SimpleWord | MatchMode::WordHead => {
                        LeafNode::word_boundary(leaf, MatchMode::WordHead, vec![0])
                    }
                    MatchMode::String | MatchMode::WordTail => leaf,
                }
            })
            .collect();

        self.mode = match mode {
            MatchMode::SimpleWord => MatchMode::WordTail,
            MatchMode::WordHead => MatchMode::String,
            other => other,
        };
        LeafNode::any_of(children)
    }

    /// Build the tree; `None` when no variant was ever pushed.
    pub fn finish<F>(mut self, make_leaf: &mut F) -> Option<LeafNode>
    where
        F: FnMut(&str) -> LeafNode,
    {
        let candidates = self.current.take();
        if candidates.is_empty() {
            return None;
        }

        let elide = self.groups.is_empty();
        let children: Vec<LeafNode> = candidates
            .iter()
            .enumerate()
            .filter(|(i, _)| !(elide && is_contained(&candidates, *i, self.mode)))
            .map(|(_, candidate)| wrap_for_mode(make_leaf(&candidate.text), self.mode, candidate))
            .collect();
        let last = LeafNode::any_of(children);

        if self.groups.is_empty() {
            Some(last)
        } else {
            self.groups.push(last);
            Some(LeafNode::ordered(self.groups))
        }
    }
}

/// Builds trees over word indexes, where positions count words.
#[derive(Debug)]
pub struct WordTreeBuilder {
    mode: MatchMode,
    limit: usize,
    current: WordCandidateSet,
    groups: Vec<LeafNode>,
}

impl WordTreeBuilder {
    pub fn new(mode: MatchMode, limit: usize) -> Self {
        WordTreeBuilder {
            mode,
            limit: limit.max(1),
            current: WordCandidateSet::default(),
            groups: Vec::new(),
        }
    }

    pub fn push(&mut self, mut variants: Vec<String>) {
        if is_blank(&variants) {
            return;
        }
        clamp_variants(&mut variants, self.limit);
        if self.current.try_append(&variants, self.limit) {
            return;
        }

        log::debug!(
            "expansion limit {} exceeded ({} x {}), flushing word group",
            self.limit,
            self.current.len(),
            variants.len()
        );
        let children = self.current.take().into_iter().map(word_leaf).collect();
        self.groups.push(LeafNode::any_of(children));
        self.current.try_append(&variants, self.limit);
    }

    pub fn finish(mut self) -> Option<LeafNode> {
        let candidates = self.current.take();
        if candidates.is_empty() {
            return None;
        }

        let children: Vec<LeafNode> = candidates
            .into_iter()
            .filter_map(|mut words| {
                if self.mode != MatchMode::WordHead {
                    return Some(word_leaf(words));
                }
                // The last word only has to start the indexed word.
                let last = words.pop()?;
                let short = prefix_leaf(last.unit);
                if words.is_empty() {
                    Some(short)
                } else {
                    Some(LeafNode::ordered(vec![word_leaf(words), short]))
                }
            })
            .collect();
        let last = LeafNode::any_of(children);

        if self.groups.is_empty() {
            Some(last)
        } else {
            self.groups.push(last);
            Some(LeafNode::ordered(self.groups))
        }
    }
}

fn word_leaf(words: Vec<LocatedUnit>) -> LeafNode {
    let term: String = words.iter().map(|w| w.unit.as_str()).collect();
    let span = words.len();
    LeafNode::plain(term, words, span)
}

/// Matches any indexed word that starts with `word`.
fn prefix_leaf(word: String) -> LeafNode {
    let mut upper = word.clone();
    upper.push(char::MAX);
    LeafNode::ShortWord {
        lower: word.clone(),
        unit: word,
        offset: 0,
        min_length: 1,
        upper,
        span: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn leaf(term: &str) -> LeafNode {
        LeafNode::plain(term, vec![LocatedUnit::new(0, term)], term.chars().count())
    }

    fn terms(node: &LeafNode) -> Vec<String> {
        match node {
            LeafNode::Plain { term, .. } => vec![term.clone()],
            other => other.children().iter().flat_map(terms).collect(),
        }
    }

    #[test]
    fn test_cross_product_order_and_boundaries() {
        let mut set = CandidateSet::new();
        assert!(set.try_append(&strings(&["ab", "x"]), 200));
        assert!(set.try_append(&strings(&["cd", "yz"]), 200));
        let texts: Vec<&str> = set.terms().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["abcd", "xcd", "abyz", "xyz"]);
        assert_eq!(set.terms()[1].boundaries, vec![0, 1, 3]);
    }

    #[test]
    fn test_limit_refuses_append() {
        let mut set = CandidateSet::new();
        assert!(set.try_append(&strings(&["a", "b", "c"]), 4));
        assert!(!set.try_append(&strings(&["d", "e"]), 4));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_containment_elision() {
        let candidates: Vec<CandidateTerm> = ["abc", "b", "abd", "b"]
            .iter()
            .map(|t| CandidateTerm {
                text: t.to_string(),
                boundaries: vec![0, t.len()],
            })
            .collect();
        let dropped: Vec<bool> = (0..4)
            .map(|i| is_contained(&candidates, i, MatchMode::String))
            .collect();
        assert_eq!(dropped, vec![true, false, true, true]);

        let dropped: Vec<bool> = (0..4)
            .map(|i| is_contained(&candidates, i, MatchMode::WordHead))
            .collect();
        assert_eq!(dropped, vec![false, false, false, true]);

        assert!((0..4).all(|i| !is_contained(&candidates, i, MatchMode::ExactWord)));
    }

    #[test]
    fn test_single_variant_is_plain() {
        let mut builder = StringTreeBuilder::new(MatchMode::String, 200);
        let mut make = |t: &str| leaf(t);
        builder.push(strings(&["help"]), &mut make);
        let node = builder.finish(&mut make).unwrap();
        assert_eq!(node, leaf("help"));
    }

    #[test]
    fn test_overflow_creates_ordered_sequence() {
        let mut builder = StringTreeBuilder::new(MatchMode::String, 4);
        let mut make = |t: &str| leaf(t);
        builder.push(strings(&["a", "b"]), &mut make);
        builder.push(strings(&["c", "d"]), &mut make);
        builder.push(strings(&["e", "f"]), &mut make);
        assert_eq!(builder.flushed_groups(), 1);
        let node = builder.finish(&mut make).unwrap();

        assert_eq!(node.kind(), "ordered_sequence");
        assert_eq!(node.children().len(), 2);
        assert_eq!(terms(&node.children()[0]), vec!["ac", "bc", "ad", "bd"]);
        assert_eq!(terms(&node.children()[1]), vec!["e", "f"]);
        assert!(node.max_alternation() <= 4);
    }

    #[test]
    fn test_oversized_variant_set_is_truncated() {
        let mut builder = StringTreeBuilder::new(MatchMode::String, 3);
        let mut make = |t: &str| leaf(t);
        builder.push(strings(&["a", "b", "c", "d", "e"]), &mut make);
        let node = builder.finish(&mut make).unwrap();
        assert_eq!(node.max_alternation(), 3);
    }

    #[test]
    fn test_head_mode_after_flush() {
        let mut builder = StringTreeBuilder::new(MatchMode::SimpleWord, 2);
        let mut make = |t: &str| leaf(t);
        builder.push(strings(&["ab", "cd"]), &mut make);
        builder.push(strings(&["ef", "gh"]), &mut make);
        assert_eq!(builder.mode(), MatchMode::WordTail);
        let node = builder.finish(&mut make).unwrap();

        let first = &node.children()[0];
        for child in first.children() {
            assert!(matches!(
                child,
                LeafNode::WordBoundary { boundaries, policy: MatchMode::WordHead, .. }
                    if boundaries == &vec![0]
            ));
        }
        let last = &node.children()[1];
        for child in last.children() {
            assert!(matches!(
                child,
                LeafNode::WordBoundary { boundaries, policy: MatchMode::WordTail, .. }
                    if boundaries == &vec![2]
            ));
        }
    }

    #[test]
    fn test_exact_word_boundaries() {
        let mut builder = StringTreeBuilder::new(MatchMode::ExactWord, 200);
        let mut make = |t: &str| leaf(t);
        builder.push(strings(&["full"]), &mut make);
        builder.push(strings(&["text"]), &mut make);
        let node = builder.finish(&mut make).unwrap();
        assert!(matches!(
            node,
            LeafNode::WordBoundary { ref boundaries, .. } if boundaries == &vec![0, 4, 8]
        ));
    }

    #[test]
    fn test_blank_variants_skipped() {
        let mut builder = StringTreeBuilder::new(MatchMode::String, 200);
        let mut make = |t: &str| leaf(t);
        builder.push(Vec::new(), &mut make);
        builder.push(strings(&[""]), &mut make);
        assert!(builder.finish(&mut make).is_none());
    }

    #[test]
    fn test_word_builder_head_prefix() {
        let mut builder = WordTreeBuilder::new(MatchMode::WordHead, 200);
        builder.push(strings(&["full"]));
        builder.push(strings(&["te"]));
        let node = builder.finish().unwrap();
        assert_eq!(node.kind(), "ordered_sequence");
        match &node.children()[1] {
            LeafNode::ShortWord {
                unit, lower, upper, ..
            } => {
                assert_eq!(unit, "te");
                assert_eq!(lower, "te");
                assert!(upper.starts_with("te") && upper.ends_with(char::MAX));
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn test_word_builder_offsets() {
        let mut builder = WordTreeBuilder::new(MatchMode::ExactWord, 200);
        builder.push(strings(&["big", "large"]));
        builder.push(strings(&["data"]));
        let node = builder.finish().unwrap();
        assert_eq!(node.kind(), "any_of");
        match &node.children()[1] {
            LeafNode::Plain { units, span, .. } => {
                assert_eq!(units, &vec![LocatedUnit::new(0, "large"), LocatedUnit::new(1, "data")]);
                assert_eq!(*span, 2);
            }
            other => panic!("unexpected {other}"),
        }
    }
}
