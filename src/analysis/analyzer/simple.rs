//! Dictionary-free reference analyzer.
//!
//! Segments text at Unicode word boundaries (UAX #29), merging adjacent
//! segments that are entirely kanji, hiragana or katakana of the same class
//! so that runs like `東京都` stay one morpheme. Whitespace segments are kept
//! as morphemes so that word boundaries survive in dual indexing.
//!
//! Normalization is NFKC followed by lowercasing. Tags and costs are derived
//! from character classes and length, and query expansion looks terms up in
//! a [`SynonymDictionary`].
//!
//! # Examples
//!
//! ```
//! use bunkatsu::analysis::analyzer::{LanguageSet, MorphAnalyzer};
//! use bunkatsu::analysis::analyzer::simple::SimpleAnalyzer;
//!
//! let mut analyzer = SimpleAnalyzer::new();
//! analyzer.set("Ｆｕｌｌ text", &LanguageSet::single("en")).unwrap();
//! assert_eq!(analyzer.next_word().unwrap().as_deref(), Some("full"));
//! assert_eq!(analyzer.next_word().unwrap().as_deref(), Some(" "));
//! assert_eq!(analyzer.next_word().unwrap().as_deref(), Some("text"));
//! assert_eq!(analyzer.next_word().unwrap(), None);
//! ```

use std::sync::LazyLock;

use ahash::AHashSet;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::analyzer::{
    Expansion, LanguageSet, Morpheme, MorphAnalyzer, TermType, TermTypeTable, UnifiedTag,
};
use crate::analysis::block::BlockClass;
use crate::analysis::synonym::SynonymDictionary;
use crate::error::Result;

pub const POS_SPACE: u32 = 0;
pub const POS_NOUN: u32 = 1;
pub const POS_NUMBER: u32 = 2;
pub const POS_ALPHABET: u32 = 3;
pub const POS_PARTICLE: u32 = 4;
pub const POS_SYMBOL: u32 = 5;
pub const POS_OTHER: u32 = 6;

/// Cost added per character of a noun.
const NOUN_COST_PER_CHAR: i32 = 120;

/// Upper bound of noun costs.
const MAX_NOUN_COST: i32 = 1000;

static STOP_WORDS: LazyLock<AHashSet<&'static str>> = LazyLock::new(|| {
    [
        // English
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "in", "is", "it", "of",
        "on", "or", "that", "the", "this", "to", "was", "with",
        // Japanese particles and auxiliaries
        "が", "の", "を", "に", "へ", "と", "で", "や", "は", "も", "か", "な", "だ", "です",
        "ます", "から", "まで", "より",
    ]
    .into_iter()
    .collect()
});

const SENTENCE_ENDINGS: &[char] = &['。', '.', '!', '?', '！', '？', '\n'];

/// NFKC followed by lowercasing.
pub fn normalize_text(text: &str) -> String {
    text.nfkc().flat_map(char::to_lowercase).collect()
}

/// Analyzer built on UAX #29 word segmentation.
#[derive(Debug, Clone)]
pub struct SimpleAnalyzer {
    synonyms: SynonymDictionary,
    term_types: TermTypeTable,
    morphemes: Vec<Morpheme>,
    cursor: usize,
}

impl Default for SimpleAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleAnalyzer {
    pub fn new() -> Self {
        let mut term_types = TermTypeTable::default();
        for pos in [
            POS_SPACE,
            POS_NOUN,
            POS_NUMBER,
            POS_PARTICLE,
            POS_SYMBOL,
            POS_OTHER,
        ] {
            term_types.insert(pos, TermType::Other);
        }
        term_types.insert(POS_ALPHABET, TermType::Alphabet);

        SimpleAnalyzer {
            synonyms: SynonymDictionary::new(),
            term_types,
            morphemes: Vec::new(),
            cursor: 0,
        }
    }

    pub fn with_synonyms(mut self, synonyms: SynonymDictionary) -> Self {
        self.synonyms = synonyms;
        self
    }

    pub fn synonyms(&self) -> &SynonymDictionary {
        &self.synonyms
    }

    /// Analyze a text into morphemes without touching the cursor.
    pub fn analyze(&self, text: &str) -> Vec<Morpheme> {
        segment(text)
            .into_iter()
            .map(|original| {
                let normalized = normalize_text(original);
                let (tag, pos, cost) = classify(original, &normalized);
                Morpheme {
                    normalized,
                    original: original.to_string(),
                    pos,
                    cost,
                    tag,
                }
            })
            .collect()
    }

    fn variants_of(&self, normalized: &str) -> Vec<String> {
        let mut variants = vec![normalized.to_string()];
        if let Some(synonyms) = self.synonyms.get_synonyms(normalized) {
            for synonym in synonyms {
                if !variants.contains(synonym) {
                    variants.push(synonym.clone());
                }
            }
        }
        variants
    }

    fn advance(&mut self) -> Option<&Morpheme> {
        let morpheme = self.morphemes.get(self.cursor)?;
        self.cursor += 1;
        Some(morpheme)
    }
}

impl MorphAnalyzer for SimpleAnalyzer {
    fn name(&self) -> &'static str {
        "simple"
    }

    fn set(&mut self, text: &str, languages: &LanguageSet) -> Result<()> {
        log::trace!("analyzing {} chars ({languages})", text.chars().count());
        self.morphemes = self.analyze(text);
        self.cursor = 0;
        Ok(())
    }

    fn next_word(&mut self) -> Result<Option<String>> {
        Ok(self.advance().map(|m| m.normalized.clone()))
    }

    fn next_word_with_original(&mut self) -> Result<Option<(String, String)>> {
        Ok(self
            .advance()
            .map(|m| (m.normalized.clone(), m.original.clone())))
    }

    fn next_block(&mut self) -> Result<Option<Vec<Morpheme>>> {
        if self.cursor >= self.morphemes.len() {
            return Ok(None);
        }
        let start = self.cursor;
        let end = self.morphemes[start..]
            .iter()
            .position(|m| m.original.ends_with(SENTENCE_ENDINGS))
            .map_or(self.morphemes.len(), |n| start + n + 1);
        self.cursor = end;
        Ok(Some(self.morphemes[start..end].to_vec()))
    }

    fn next_expansion(&mut self) -> Result<Option<Expansion>> {
        let Some(morpheme) = self.morphemes.get(self.cursor) else {
            return Ok(None);
        };
        self.cursor += 1;
        Ok(Some(Expansion {
            variants: self.variants_of(&morpheme.normalized),
            original: morpheme.original.clone(),
            pos: morpheme.pos,
        }))
    }

    fn normalize_buf(&mut self, text: &str, _languages: &LanguageSet) -> Result<String> {
        Ok(normalize_text(text))
    }

    fn expand_buf(&mut self, text: &str, _languages: &LanguageSet) -> Result<Vec<String>> {
        Ok(self.variants_of(&normalize_text(text)))
    }

    fn term_types(&self) -> Option<&TermTypeTable> {
        Some(&self.term_types)
    }
}

/// The class shared by every character of `s`, if it is a kana/kanji class.
fn uniform_japanese_class(s: &str) -> Option<BlockClass> {
    let mut chars = s.chars();
    let class = BlockClass::of(chars.next()?);
    (class.is_japanese() && chars.all(|c| BlockClass::of(c) == class)).then_some(class)
}

fn segment(text: &str) -> Vec<&str> {
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for (start, piece) in text.split_word_bound_indices() {
        let end = start + piece.len();
        if let Some(last) = ranges.last_mut() {
            let class = uniform_japanese_class(&text[last.0..last.1]);
            if class.is_some() && class == uniform_japanese_class(piece) {
                last.1 = end;
                continue;
            }
        }
        ranges.push((start, end));
    }
    ranges.into_iter().map(|(s, e)| &text[s..e]).collect()
}

fn classify(original: &str, normalized: &str) -> (UnifiedTag, u32, i32) {
    let length = normalized.chars().count() as i32;
    let noun_cost = (NOUN_COST_PER_CHAR * length).min(MAX_NOUN_COST);

    if normalized.chars().all(char::is_whitespace) {
        return (UnifiedTag::Other, POS_SPACE, 0);
    }
    if STOP_WORDS.contains(normalized) {
        return (UnifiedTag::Particle, POS_PARTICLE, 0);
    }
    if normalized.chars().all(char::is_numeric) {
        return (UnifiedTag::Noun, POS_NUMBER, noun_cost);
    }

    let classes: Vec<BlockClass> = original.chars().map(BlockClass::of).collect();
    if classes.iter().all(|c| {
        matches!(
            c,
            BlockClass::Kanji | BlockClass::Katakana | BlockClass::HalfwidthKatakana
        )
    }) {
        return (UnifiedTag::Noun, POS_NOUN, noun_cost);
    }
    if classes.iter().all(|c| *c == BlockClass::Hiragana) {
        return (UnifiedTag::Other, POS_OTHER, 0);
    }
    if normalized.chars().all(char::is_alphanumeric) {
        return (UnifiedTag::Unknown, POS_ALPHABET, 0);
    }
    if normalized.chars().all(|c| !c.is_alphanumeric()) {
        return (UnifiedTag::Symbol, POS_SYMBOL, 0);
    }
    (UnifiedTag::Unknown, POS_OTHER, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(analyzer: &mut SimpleAnalyzer, text: &str) -> Vec<String> {
        analyzer.set(text, &LanguageSet::single("ja")).unwrap();
        let mut out = Vec::new();
        while let Some(word) = analyzer.next_word().unwrap() {
            out.push(word);
        }
        out
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("Ｈｅｌｌｏ ＷＯＲＬＤ"), "hello world");
        assert_eq!(normalize_text("ｶﾀｶﾅ"), "カタカナ");
    }

    #[test]
    fn test_segmentation_keeps_whitespace() {
        let mut analyzer = SimpleAnalyzer::new();
        assert_eq!(
            words(&mut analyzer, "un helpful"),
            vec!["un", " ", "helpful"]
        );
    }

    #[test]
    fn test_japanese_runs_merge() {
        let mut analyzer = SimpleAnalyzer::new();
        assert_eq!(
            words(&mut analyzer, "東京都のタワー"),
            vec!["東京都", "の", "タワー"]
        );
    }

    #[test]
    fn test_tags() {
        let analyzer = SimpleAnalyzer::new();
        let morphemes = analyzer.analyze("The data 東京 123 です!");
        let tags: Vec<(String, UnifiedTag)> = morphemes
            .iter()
            .filter(|m| m.pos != POS_SPACE)
            .map(|m| (m.normalized.clone(), m.tag))
            .collect();
        assert_eq!(
            tags,
            vec![
                ("the".to_string(), UnifiedTag::Particle),
                ("data".to_string(), UnifiedTag::Unknown),
                ("東京".to_string(), UnifiedTag::Noun),
                ("123".to_string(), UnifiedTag::Noun),
                ("です".to_string(), UnifiedTag::Particle),
                ("!".to_string(), UnifiedTag::Symbol),
            ]
        );
        let tokyo = morphemes.iter().find(|m| m.normalized == "東京").unwrap();
        assert_eq!(tokyo.cost, 240);
        assert_eq!(tokyo.pos, POS_NOUN);
    }

    #[test]
    fn test_next_block_splits_sentences() {
        let mut analyzer = SimpleAnalyzer::new();
        analyzer
            .set("本を読む。次に行く", &LanguageSet::single("ja"))
            .unwrap();
        let first = analyzer.next_block().unwrap().unwrap();
        assert_eq!(first.last().unwrap().original, "。");
        let second = analyzer.next_block().unwrap().unwrap();
        assert_eq!(second.first().unwrap().original, "次");
        assert!(analyzer.next_block().unwrap().is_none());
    }

    #[test]
    fn test_expansion_with_synonyms() {
        let synonyms =
            SynonymDictionary::from_synonym_groups(vec![vec!["ml".into(), "machine learning".into()]]);
        let mut analyzer = SimpleAnalyzer::new().with_synonyms(synonyms);
        analyzer.set("ML rocks", &LanguageSet::single("en")).unwrap();
        let expansion = analyzer.next_expansion().unwrap().unwrap();
        assert_eq!(expansion.variants, vec!["ml", "machine learning"]);
        assert_eq!(expansion.original, "ML");

        assert_eq!(
            analyzer.expand_buf("Ml", &LanguageSet::new()).unwrap(),
            vec!["ml", "machine learning"]
        );
    }

    #[test]
    fn test_original_forms() {
        let mut analyzer = SimpleAnalyzer::new();
        analyzer.set("ＡＢＣ", &LanguageSet::new()).unwrap();
        assert_eq!(
            analyzer.next_word_with_original().unwrap(),
            Some(("abc".to_string(), "ＡＢＣ".to_string()))
        );
        assert_eq!(analyzer.next_word_with_original().unwrap(), None);
    }

    #[test]
    fn test_term_types() {
        let analyzer = SimpleAnalyzer::new();
        let table = analyzer.term_types().unwrap();
        assert_eq!(table.get(&POS_ALPHABET), Some(&TermType::Alphabet));
        assert_eq!(table.get(&POS_NOUN), Some(&TermType::Other));
    }
}
