//! Character-class aware n-gram blocker.
//!
//! The blocker walks a character buffer and emits candidate tokens whose
//! lengths follow the per-class bounds of its [`BlockerParams`]. It runs in
//! one of two modes:
//!
//! - [`BlockMode::Index`] emits, at every character position, the tokens
//!   that start there. At the start of the text the shortest token has the
//!   class minimum; at a class change it has length 1, so every prefix of a
//!   run is indexed at the run start. A run remainder shorter than the start
//!   length yields one truncated token. When the longest token at a position
//!   has length 1 and the next character belongs to a paired class, a
//!   2-character bridging token is emitted as well.
//! - [`BlockMode::Search`] covers a query with the fewest tokens that are
//!   guaranteed to be in the index: maximal windows inside long runs, whole
//!   runs otherwise. A query that is a single run shorter than its class
//!   minimum becomes one short-word token.
//!
//! # Examples
//!
//! ```
//! use bunkatsu::analysis::blocker::{BlockMode, Blocker};
//!
//! let mut blocker = Blocker::parse("JAP:ALL:2").unwrap();
//! blocker.set("abc", BlockMode::Index);
//! let tokens: Vec<(String, usize)> = blocker.map(|t| (t.text, t.offset)).collect();
//! assert_eq!(
//!     tokens,
//!     vec![("ab".to_string(), 0), ("bc".to_string(), 1), ("c".to_string(), 2)]
//! );
//! ```

pub mod params;

use std::collections::VecDeque;

use serde::Serialize;

use crate::analysis::block::BlockClass;
use crate::error::Result;

pub use params::{BlockerParams, BlockerRevision};

/// Segmentation mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlockMode {
    /// Deterministic segmentation used when building the index.
    #[default]
    Index,
    /// Covering segmentation used for query terms.
    Search,
}

/// One candidate token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BlockedToken {
    /// Token characters.
    pub text: String,
    /// 0-based character offset within the buffer.
    pub offset: usize,
    /// The token is a whole query shorter than its class minimum.
    pub is_short: bool,
    /// Minimum length configured for the token's class.
    pub min_length: usize,
    /// Class of the first character.
    pub class: BlockClass,
}

/// Blocker state over one buffer.
#[derive(Clone, Debug)]
pub struct Blocker {
    params: BlockerParams,
    chars: Vec<char>,
    classes: Vec<BlockClass>,
    mode: BlockMode,
    cursor: usize,
    pending: VecDeque<BlockedToken>,
}

impl Blocker {
    pub fn new(params: BlockerParams) -> Self {
        Blocker {
            params,
            chars: Vec::new(),
            classes: Vec::new(),
            mode: BlockMode::Index,
            cursor: 0,
            pending: VecDeque::new(),
        }
    }

    /// Build a blocker from a description such as `JAP:ALL:2 KAN:HIR`.
    pub fn parse(description: &str) -> Result<Self> {
        Ok(Blocker::new(BlockerParams::parse(description)?))
    }

    pub fn params(&self) -> &BlockerParams {
        &self.params
    }

    /// Class of `c` as seen by this blocker's revision.
    pub fn block_class(&self, c: char) -> BlockClass {
        match self.params.revision() {
            BlockerRevision::General => BlockClass::Other,
            _ => BlockClass::of(c),
        }
    }

    /// Point the blocker at a new buffer and rewind.
    pub fn set(&mut self, text: &str, mode: BlockMode) {
        self.chars.clear();
        self.chars.extend(text.chars());
        self.classes = self.chars.iter().map(|c| self.block_class(*c)).collect();
        self.mode = mode;
        self.cursor = 0;
        self.pending.clear();
    }

    /// Produce the next token, or `None` once the buffer is exhausted.
    pub fn yield_token(&mut self) -> Option<BlockedToken> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            if self.cursor >= self.chars.len() {
                return None;
            }
            match self.mode {
                BlockMode::Index => self.fill_index(),
                BlockMode::Search => self.fill_search(),
            }
        }
    }

    /// End (exclusive) of the same-class run containing `pos`.
    fn run_end(&self, pos: usize) -> usize {
        let class = self.classes[pos];
        self.classes[pos..]
            .iter()
            .position(|c| *c != class)
            .map_or(self.classes.len(), |n| pos + n)
    }

    fn push(&mut self, offset: usize, len: usize, is_short: bool) {
        let class = self.classes[offset];
        self.pending.push_back(BlockedToken {
            text: self.chars[offset..offset + len].iter().collect(),
            offset,
            is_short,
            min_length: self.params.min_length(class),
            class,
        });
    }

    fn pair_follows(&self, pos: usize) -> bool {
        pos + 1 < self.classes.len()
            && self
                .params
                .is_pair(self.classes[pos], self.classes[pos + 1])
    }

    fn fill_index(&mut self) {
        let pos = self.cursor;
        self.cursor += 1;

        let class = self.classes[pos];
        let min = self.params.min_length(class);
        let max = self.params.max_length(class);
        let remaining = self.run_end(pos) - pos;

        let new_block = pos > 0 && self.classes[pos - 1] != class;
        let start_len = if new_block { 1 } else { min };

        let longest = if remaining < start_len {
            self.push(pos, remaining, false);
            remaining
        } else {
            let longest = max.min(remaining);
            for len in start_len..=longest {
                self.push(pos, len, false);
            }
            longest
        };

        if longest == 1 && self.pair_follows(pos) {
            self.push(pos, 2, false);
        }
    }

    fn fill_search(&mut self) {
        let start = self.cursor;
        let end = self.run_end(start);
        self.cursor = end;

        let class = self.classes[start];
        let min = self.params.min_length(class);
        let max = self.params.max_length(class);
        let len = end - start;
        let first = start == 0;
        let last = end == self.chars.len();

        if first && last && len < min {
            self.push(start, len, true);
            return;
        }

        if len >= max {
            for offset in start..=end - max {
                self.push(offset, max, false);
            }
        } else if !(first && len < min) || self.params.revision().keeps_short_lead() {
            self.push(start, len, false);
        }

        if self.params.revision().bridges_in_search() && self.pair_follows(end - 1) {
            self.push(end - 1, 2, false);
        }
    }
}

impl Iterator for Blocker {
    type Item = BlockedToken;

    fn next(&mut self) -> Option<Self::Item> {
        self.yield_token()
    }
}
