//! Tokenizer parameter strings.
//!
//! ```text
//! TOKENIZER_NAME[:BLOCKER_DESCRIPTION] [@UNARSCID:n] [@NORMRSCID:n]
//! ```
//!
//! `DUAL:JAP:ALL:1 @UNARSCID:1` selects the dual tokenizer with a Japanese
//! blocker cutting unigrams and analyzer resource 1. The n-gram tokenizer
//! also accepts the short form `NGR:min[:max]`, a class-blind blocker with
//! the given lengths.

use std::fmt;

use crate::error::{BunkatsuError, Result};

/// Resource key selecting the analyzer.
pub const ANALYZER_RESOURCE_KEY: &str = "@UNARSCID";

/// Resource key selecting the normalizer.
pub const NORMALIZER_RESOURCE_KEY: &str = "@NORMRSCID";

/// Tokenizer strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenizerKind {
    Ngram,
    Dual,
}

impl TokenizerKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenizerKind::Ngram => "NGR",
            TokenizerKind::Dual => "DUAL",
        }
    }
}

/// Parsed tokenizer parameter string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenizerParameter {
    pub kind: TokenizerKind,
    /// Blocker description, without resource entries.
    pub blocker: String,
    pub analyzer_resource: u32,
    pub normalizer_resource: u32,
}

impl TokenizerParameter {
    pub fn parse(parameter: &str) -> Result<Self> {
        let parameter = parameter.trim();
        let (head, resources) = match parameter.find(" @") {
            Some(at) => (parameter[..at].trim(), &parameter[at + 1..]),
            None => (parameter, ""),
        };
        let (name, rest) = head.split_once(':').unwrap_or((head, ""));

        let kind = match name {
            "NGR" => TokenizerKind::Ngram,
            "DUAL" => TokenizerKind::Dual,
            _ => {
                return Err(BunkatsuError::invalid_config(format!(
                    "unknown tokenizer: {name}"
                )));
            }
        };

        let blocker = if rest.is_empty() {
            match kind {
                TokenizerKind::Ngram => "GEN".to_string(),
                TokenizerKind::Dual => "JAP".to_string(),
            }
        } else if rest.starts_with(|c: char| c.is_ascii_digit()) {
            Self::short_form(rest)?
        } else {
            rest.to_string()
        };

        let mut analyzer_resource = 0;
        let mut normalizer_resource = 0;
        for entry in resources.split(' ').filter(|e| !e.is_empty()) {
            let (key, value) = entry.split_once(':').ok_or_else(|| {
                BunkatsuError::invalid_config(format!("invalid resource entry: {entry}"))
            })?;
            let id = value.parse::<u32>().map_err(|_| {
                BunkatsuError::invalid_config(format!("invalid resource id: {entry}"))
            })?;
            match key {
                ANALYZER_RESOURCE_KEY => analyzer_resource = id,
                NORMALIZER_RESOURCE_KEY => normalizer_resource = id,
                _ => log::debug!("ignoring resource entry {entry}"),
            }
        }

        Ok(TokenizerParameter {
            kind,
            blocker,
            analyzer_resource,
            normalizer_resource,
        })
    }

    /// `min[:max]` as a class-blind blocker description.
    fn short_form(rest: &str) -> Result<String> {
        let mut parts = rest.split(':');
        let min = parts.next().unwrap_or_default();
        let max = parts.next().unwrap_or(min);
        if parts.next().is_some() {
            return Err(BunkatsuError::invalid_config(format!(
                "too many lengths: {rest}"
            )));
        }
        Ok(format!("GEN:ALL:{min}:{max}"))
    }
}

impl fmt::Display for TokenizerParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.name(), self.blocker)?;
        if self.analyzer_resource != 0 {
            write!(f, " {ANALYZER_RESOURCE_KEY}:{}", self.analyzer_resource)?;
        }
        if self.normalizer_resource != 0 {
            write!(f, " {NORMALIZER_RESOURCE_KEY}:{}", self.normalizer_resource)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dual_with_blocker() {
        let param = TokenizerParameter::parse("DUAL:JAP:ALL:1 @UNARSCID:1").unwrap();
        assert_eq!(param.kind, TokenizerKind::Dual);
        assert_eq!(param.blocker, "JAP:ALL:1");
        assert_eq!(param.analyzer_resource, 1);
        assert_eq!(param.normalizer_resource, 0);
        assert_eq!(param.to_string(), "DUAL:JAP:ALL:1 @UNARSCID:1");
    }

    #[test]
    fn test_dual_default_blocker() {
        let param = TokenizerParameter::parse("DUAL:JAP @UNARSCID:1").unwrap();
        assert_eq!(param.blocker, "JAP");
        let param = TokenizerParameter::parse("DUAL").unwrap();
        assert_eq!(param.blocker, "JAP");
    }

    #[test]
    fn test_ngram_short_form() {
        let param = TokenizerParameter::parse("NGR:1:1 @UNARSCID:1").unwrap();
        assert_eq!(param.kind, TokenizerKind::Ngram);
        assert_eq!(param.blocker, "GEN:ALL:1:1");
        let param = TokenizerParameter::parse("NGR:2").unwrap();
        assert_eq!(param.blocker, "GEN:ALL:2:2");
        let param = TokenizerParameter::parse("NGR:JAP:ALL:2 KAN:1").unwrap();
        assert_eq!(param.blocker, "JAP:ALL:2 KAN:1");
    }

    #[test]
    fn test_normalizer_resource() {
        let param = TokenizerParameter::parse("NGR:2 @NORMRSCID:4 @OTHER:9").unwrap();
        assert_eq!(param.normalizer_resource, 4);
    }

    #[test]
    fn test_invalid_parameters() {
        for bad in ["BNG:JAP", "", "DUAL:JAP @UNARSCID:x", "NGR:1:2:3", "DUAL @UNARSCID"] {
            assert!(TokenizerParameter::parse(bad).is_err(), "{bad}");
        }
    }
}
