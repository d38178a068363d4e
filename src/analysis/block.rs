//! Character classes used by the blocker.
//!
//! Every character belongs to exactly one [`BlockClass`]. The blocker cuts
//! tokens inside runs of the same class and uses per-class length bounds, so
//! the classification decides where n-grams may start and how long they get.
//!
//! Classification is order-sensitive: 7-bit ASCII is checked first so that
//! ASCII letters and digits never fall into the generic alphabet or digit
//! classes, which are meant for their fullwidth and extended counterparts.
//!
//! # Examples
//!
//! ```
//! use bunkatsu::analysis::block::BlockClass;
//!
//! assert_eq!(BlockClass::of('a'), BlockClass::Ascii);
//! assert_eq!(BlockClass::of('ａ'), BlockClass::Alphabet);
//! assert_eq!(BlockClass::of('漢'), BlockClass::Kanji);
//! assert_eq!(BlockClass::of('ひ'), BlockClass::Hiragana);
//! assert_eq!(BlockClass::from_label("KAT"), Some(BlockClass::Katakana));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Character category driving token boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockClass {
    /// Anything not covered by another class (OTH)
    Other,
    /// 7-bit ASCII (ASC)
    Ascii,
    /// Fullwidth and CJK punctuation, general punctuation (SYM)
    Symbol,
    /// Fullwidth digits (DIG)
    Digit,
    /// Fullwidth and extended Latin letters (ALP)
    Alphabet,
    /// Hiragana (HIR)
    Hiragana,
    /// Fullwidth katakana (KAT)
    Katakana,
    /// Greek (GRK)
    Greek,
    /// Cyrillic (RUS)
    Russian,
    /// Box-drawing elements (KEI)
    LineDrawing,
    /// CJK ideographs and iteration marks (KAN)
    Kanji,
    /// Halfwidth katakana (HAN)
    HalfwidthKatakana,
    /// Private-use glyphs (GAI)
    ForeignGlyph,
    /// Controls and noncharacters (UND)
    Undefined,
}

impl BlockClass {
    /// Number of classes.
    pub const COUNT: usize = 14;

    /// All classes in table order.
    pub const ALL: [BlockClass; BlockClass::COUNT] = [
        BlockClass::Other,
        BlockClass::Ascii,
        BlockClass::Symbol,
        BlockClass::Digit,
        BlockClass::Alphabet,
        BlockClass::Hiragana,
        BlockClass::Katakana,
        BlockClass::Greek,
        BlockClass::Russian,
        BlockClass::LineDrawing,
        BlockClass::Kanji,
        BlockClass::HalfwidthKatakana,
        BlockClass::ForeignGlyph,
        BlockClass::Undefined,
    ];

    /// Classify a character.
    pub fn of(c: char) -> BlockClass {
        let cp = c as u32;
        if cp <= 0x7F {
            return BlockClass::Ascii;
        }
        match cp {
            0x80..=0x9F | 0xFDD0..=0xFDEF => BlockClass::Undefined,
            _ if cp & 0xFFFE == 0xFFFE => BlockClass::Undefined,
            0xFF10..=0xFF19 => BlockClass::Digit,
            0xFF21..=0xFF3A | 0xFF41..=0xFF5A => BlockClass::Alphabet,
            0x00C0..=0x024F | 0x1E00..=0x1EFF if c.is_alphabetic() => BlockClass::Alphabet,
            0x3041..=0x309F => BlockClass::Hiragana,
            0x30A0..=0x30FF | 0x31F0..=0x31FF => BlockClass::Katakana,
            0xFF66..=0xFF9F => BlockClass::HalfwidthKatakana,
            0x0370..=0x03FF | 0x1F00..=0x1FFF => BlockClass::Greek,
            0x0400..=0x04FF => BlockClass::Russian,
            0x2500..=0x257F => BlockClass::LineDrawing,
            0x3005..=0x3007
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xF900..=0xFAFF
            | 0x20000..=0x2FFFF => BlockClass::Kanji,
            0xE000..=0xF8FF | 0xF0000..=0x10FFFF => BlockClass::ForeignGlyph,
            0x00A0..=0x00BF
            | 0x2000..=0x24FF
            | 0x2580..=0x2BFF
            | 0x3000..=0x303F
            | 0xFE30..=0xFE4F
            | 0xFF01..=0xFF0F
            | 0xFF1A..=0xFF20
            | 0xFF3B..=0xFF40
            | 0xFF5B..=0xFF65 => BlockClass::Symbol,
            _ if c.is_control() => BlockClass::Undefined,
            _ => BlockClass::Other,
        }
    }

    /// Three-letter label used in parameter descriptions.
    pub fn label(self) -> &'static str {
        match self {
            BlockClass::Other => "OTH",
            BlockClass::Ascii => "ASC",
            BlockClass::Symbol => "SYM",
            BlockClass::Digit => "DIG",
            BlockClass::Alphabet => "ALP",
            BlockClass::Hiragana => "HIR",
            BlockClass::Katakana => "KAT",
            BlockClass::Greek => "GRK",
            BlockClass::Russian => "RUS",
            BlockClass::LineDrawing => "KEI",
            BlockClass::Kanji => "KAN",
            BlockClass::HalfwidthKatakana => "HAN",
            BlockClass::ForeignGlyph => "GAI",
            BlockClass::Undefined => "UND",
        }
    }

    /// Look a class up by its label.
    pub fn from_label(label: &str) -> Option<BlockClass> {
        BlockClass::ALL.iter().copied().find(|c| c.label() == label)
    }

    /// Position of this class in per-class tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// First and last code point of the class.
    ///
    /// Short-word search keys are extended with these to form the key range
    /// of every index unit that continues the short token within the class.
    pub fn region(self) -> (char, char) {
        match self {
            BlockClass::Other => ('\u{0250}', '\u{FFFD}'),
            BlockClass::Ascii => ('\u{0000}', '\u{007F}'),
            BlockClass::Symbol => ('\u{00A0}', '\u{FF65}'),
            BlockClass::Digit => ('\u{FF10}', '\u{FF19}'),
            BlockClass::Alphabet => ('\u{00C0}', '\u{FF5A}'),
            BlockClass::Hiragana => ('\u{3041}', '\u{309F}'),
            BlockClass::Katakana => ('\u{30A0}', '\u{31FF}'),
            BlockClass::Greek => ('\u{0370}', '\u{1FFF}'),
            BlockClass::Russian => ('\u{0400}', '\u{04FF}'),
            BlockClass::LineDrawing => ('\u{2500}', '\u{257F}'),
            BlockClass::Kanji => ('\u{3005}', '\u{2FFFF}'),
            BlockClass::HalfwidthKatakana => ('\u{FF66}', '\u{FF9F}'),
            BlockClass::ForeignGlyph => ('\u{E000}', '\u{10FFFF}'),
            BlockClass::Undefined => ('\u{0080}', '\u{FFFF}'),
        }
    }

    /// Whether the class belongs to the Japanese kana/kanji family.
    pub fn is_japanese(self) -> bool {
        matches!(
            self,
            BlockClass::Hiragana
                | BlockClass::Katakana
                | BlockClass::HalfwidthKatakana
                | BlockClass::Kanji
        )
    }
}

impl fmt::Display for BlockClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
