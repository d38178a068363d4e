//! Blocker parameter tables and their textual description.
//!
//! A description has the form
//!
//! ```text
//! REVISION[:ENTRY][ ENTRY]...
//! ENTRY ::= CLASS:n | CLASS:min:max | CLASS:CLASS | @KEY:value
//! ```
//!
//! where `CLASS` is a three-letter class label or `ALL`, lengths are in
//! `1..=8` and `max >= min`. Entries are applied in order, so
//! `JAP:ALL:2 KAT:3` sets every class to 2 and then katakana to 3. Pairs are
//! symmetric and pairs of a class with itself are ignored. Entries starting
//! with `@` carry resource ids for other components and are skipped here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::block::BlockClass;
use crate::error::{BunkatsuError, Result};

/// Smallest legal token length.
pub const MIN_BLOCK_LENGTH: usize = 1;

/// Largest legal token length.
pub const MAX_BLOCK_LENGTH: usize = 8;

/// Token length used for every class when nothing else is specified.
pub const DEFAULT_BLOCK_LENGTH: usize = 2;

const N: usize = BlockClass::COUNT;

/// Blocker behaviour variants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockerRevision {
    /// No class awareness; every character blocks as [`BlockClass::Other`].
    General,
    /// Class-aware; a lead run shorter than its minimum is searched as is.
    #[default]
    Japanese,
    /// Like `Japanese` but a lead run shorter than its minimum is skipped
    /// in search mode.
    Japanese2,
    /// Like `Japanese` and also emits pair-bridging tokens in search mode.
    Japanese3,
}

impl BlockerRevision {
    pub fn name(&self) -> &'static str {
        match self {
            BlockerRevision::General => "GEN",
            BlockerRevision::Japanese => "JAP",
            BlockerRevision::Japanese2 => "JAP2",
            BlockerRevision::Japanese3 => "JAP3",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "GEN" => Some(BlockerRevision::General),
            "JAP" => Some(BlockerRevision::Japanese),
            "JAP2" => Some(BlockerRevision::Japanese2),
            "JAP3" => Some(BlockerRevision::Japanese3),
            _ => None,
        }
    }

    /// Whether a lead run shorter than its class minimum is re-emitted as a
    /// search token.
    pub fn keeps_short_lead(&self) -> bool {
        !matches!(self, BlockerRevision::Japanese2)
    }

    /// Whether search mode emits pair-bridging tokens.
    pub fn bridges_in_search(&self) -> bool {
        matches!(self, BlockerRevision::Japanese3)
    }
}

impl fmt::Display for BlockerRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-class length bounds and the pair-compatibility table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockerParams {
    revision: BlockerRevision,
    min: [usize; N],
    max: [usize; N],
    pairs: [[bool; N]; N],
}

impl Default for BlockerParams {
    fn default() -> Self {
        BlockerParams {
            revision: BlockerRevision::default(),
            min: [DEFAULT_BLOCK_LENGTH; N],
            max: [DEFAULT_BLOCK_LENGTH; N],
            pairs: [[false; N]; N],
        }
    }
}

/// Class operand of an entry: one class or `ALL`.
#[derive(Clone, Copy)]
enum ClassSpec {
    One(BlockClass),
    All,
}

impl ClassSpec {
    fn parse(label: &str) -> Option<Self> {
        if label == "ALL" {
            Some(ClassSpec::All)
        } else {
            BlockClass::from_label(label).map(ClassSpec::One)
        }
    }

    fn classes(self) -> Vec<BlockClass> {
        match self {
            ClassSpec::One(class) => vec![class],
            ClassSpec::All => BlockClass::ALL.to_vec(),
        }
    }
}

impl BlockerParams {
    /// Parse a blocker description such as `JAP:ALL:2 KAT:3 KAN:HIR`.
    pub fn parse(description: &str) -> Result<Self> {
        let description = description.trim();
        let name_end = description
            .find([':', ' '])
            .unwrap_or(description.len());
        let name = &description[..name_end];
        let revision = BlockerRevision::from_name(name).ok_or_else(|| {
            BunkatsuError::invalid_config(format!("invalid blocker name: {description}"))
        })?;

        let mut params = BlockerParams {
            revision,
            ..Default::default()
        };

        let rest = description.get(name_end + 1..).unwrap_or("");
        for entry in rest.split(' ') {
            if entry.is_empty() || entry.starts_with('@') {
                continue;
            }
            params.apply_entry(entry)?;
        }

        log::debug!("parsed blocker parameters: {}", params.describe());
        Ok(params)
    }

    fn apply_entry(&mut self, entry: &str) -> Result<()> {
        let parts: Vec<&str> = entry.split(':').collect();
        if parts.len() > 3 {
            return Err(BunkatsuError::invalid_config(format!(
                "too many tokens: {entry}"
            )));
        }
        if parts.len() < 2 {
            return Err(BunkatsuError::invalid_config(format!(
                "invalid token: {entry}"
            )));
        }

        let first = ClassSpec::parse(parts[0]).ok_or_else(|| {
            BunkatsuError::invalid_config(format!("invalid class: {}", parts[0]))
        })?;

        if let Some(second) = ClassSpec::parse(parts[1]) {
            if parts.len() != 2 {
                return Err(BunkatsuError::invalid_config(format!(
                    "invalid class pair: {entry}"
                )));
            }
            for a in first.classes() {
                for b in second.classes() {
                    self.set_pair(a, b);
                }
            }
            return Ok(());
        }

        let min = parse_length(parts[1], MIN_BLOCK_LENGTH)
            .ok_or_else(|| BunkatsuError::invalid_config(format!("invalid min: {}", parts[1])))?;
        let max = match parts.get(2) {
            Some(value) => parse_length(value, min)
                .ok_or_else(|| BunkatsuError::invalid_config(format!("invalid max: {value}")))?,
            None => min,
        };
        for class in first.classes() {
            self.min[class.index()] = min;
            self.max[class.index()] = max;
        }
        Ok(())
    }

    /// Register a symmetric pair; a class paired with itself is ignored.
    pub fn set_pair(&mut self, a: BlockClass, b: BlockClass) {
        if a != b {
            self.pairs[a.index()][b.index()] = true;
            self.pairs[b.index()][a.index()] = true;
        }
    }

    /// Set the length bounds of one class.
    pub fn set_lengths(&mut self, class: BlockClass, min: usize, max: usize) -> Result<()> {
        if !(MIN_BLOCK_LENGTH..=MAX_BLOCK_LENGTH).contains(&min)
            || !(min..=MAX_BLOCK_LENGTH).contains(&max)
        {
            return Err(BunkatsuError::invalid_config(format!(
                "invalid lengths for {class}: {min}:{max}"
            )));
        }
        self.min[class.index()] = min;
        self.max[class.index()] = max;
        Ok(())
    }

    pub fn revision(&self) -> BlockerRevision {
        self.revision
    }

    pub fn min_length(&self, class: BlockClass) -> usize {
        self.min[class.index()]
    }

    pub fn max_length(&self, class: BlockClass) -> usize {
        self.max[class.index()]
    }

    pub fn is_pair(&self, a: BlockClass, b: BlockClass) -> bool {
        self.pairs[a.index()][b.index()]
    }

    /// Render the effective table in the grammar [`parse`](Self::parse) accepts.
    pub fn describe(&self) -> String {
        let mut entries = Vec::with_capacity(N * 2);
        for class in BlockClass::ALL {
            entries.push(format!(
                "{}:{}:{}",
                class.label(),
                self.min_length(class),
                self.max_length(class)
            ));
        }
        for (i, a) in BlockClass::ALL.iter().enumerate() {
            for b in &BlockClass::ALL[i + 1..] {
                if self.is_pair(*a, *b) {
                    entries.push(format!("{}:{}", a.label(), b.label()));
                }
            }
        }
        format!("{}:{}", self.revision.name(), entries.join(" "))
    }
}

fn parse_length(value: &str, lower: usize) -> Option<usize> {
    value
        .parse::<usize>()
        .ok()
        .filter(|n| (lower..=MAX_BLOCK_LENGTH).contains(n))
}
