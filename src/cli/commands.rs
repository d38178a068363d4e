//! Command implementations for the bunkatsu CLI.

use crate::analysis::analyzer::simple::SimpleAnalyzer;
use crate::analysis::synonym::SynonymDictionary;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::{IndexingType, TokenizerConfig};
use crate::error::Result;
use crate::tokenizer::{SectionSize, Tokenizer, create_tokenizer};

/// Execute a CLI command.
pub fn execute_command(args: BunkatsuArgs) -> Result<()> {
    match &args.command {
        Command::Tokenize(tokenize_args) => tokenize_text(tokenize_args, &args),
        Command::Query(query_args) => build_query(query_args, &args),
        Command::Features(features_args) => extract_features(features_args, &args),
        Command::Describe(describe_args) => describe_tokenizer(describe_args, &args),
    }
}

/// Resolve the tokenizer configuration from file and flags.
pub fn load_config(options: &TokenizerOptions) -> Result<TokenizerConfig> {
    let mut config = match &options.config {
        Some(path) => TokenizerConfig::from_json_file(path)?,
        None => TokenizerConfig::new(default_indexing(&options.param)),
    };
    if let Some(indexing) = options.indexing {
        config.indexing = indexing;
    }
    if options.no_normalize {
        config.normalize = false;
    }
    if let Some(limit) = options.expand_limit {
        config.expand_limit = limit;
    }
    Ok(config)
}

/// Without a config file, `NGR` builds n-gram indexes and `DUAL` dual ones.
fn default_indexing(param: &str) -> IndexingType {
    if param.trim_start().starts_with("NGR") {
        IndexingType::Ngram
    } else {
        IndexingType::Dual
    }
}

/// Build a tokenizer backed by the reference analyzer.
pub fn build_tokenizer(
    options: &TokenizerOptions,
    config: TokenizerConfig,
) -> Result<Box<dyn Tokenizer>> {
    let mut analyzer = SimpleAnalyzer::new();
    if let Some(path) = &options.synonyms {
        let synonyms = SynonymDictionary::load_from_file(path)?;
        log::info!(
            "loaded {} synonym entries from {}",
            synonyms.len(),
            path.display()
        );
        analyzer = analyzer.with_synonyms(synonyms);
    }
    create_tokenizer(&options.param, config, Box::new(analyzer))
}

/// Tokenize one or more sections.
fn tokenize_text(args: &TokenizeArgs, cli_args: &BunkatsuArgs) -> Result<()> {
    let config = load_config(&args.tokenizer)?;
    let mut tokenizer = build_tokenizer(&args.tokenizer, config)?;
    tokenizer.initialize();

    let (units, sections) = if args.texts.len() == 1 {
        let result = tokenizer.tokenize_at(&args.texts[0], &args.tokenizer.lang, args.start)?;
        let section = SectionSize {
            normalized_size: result.normalized_size,
            original_size: result.original_size,
        };
        (result.units, vec![section])
    } else {
        let sections: Vec<(&str, _)> = args
            .texts
            .iter()
            .map(|t| (t.as_str(), args.tokenizer.lang.clone()))
            .collect();
        let result = tokenizer.tokenize_sections(&sections)?;
        (result.units, result.sections)
    };

    let units = units
        .iter()
        .map(|(unit, list)| UnitEntry {
            unit: unit.clone(),
            role: list.role,
            positions: list.positions().to_vec(),
        })
        .collect::<Vec<_>>();

    output_result(
        &format!("Tokenized {} section(s) into {} units", sections.len(), units.len()),
        &TokenizeOutput {
            tokenizer: tokenizer.description(),
            sections,
            units,
        },
        cli_args,
    )
}

/// Build (and optionally evaluate) a query tree.
fn build_query(args: &QueryArgs, cli_args: &BunkatsuArgs) -> Result<()> {
    let config = load_config(&args.tokenizer)?;
    let mut tokenizer = build_tokenizer(&args.tokenizer, config)?;
    let lang = &args.tokenizer.lang;

    let tree = tokenizer.create_leaf_node(&args.term, lang, args.mode)?;
    let spans = match &args.text {
        Some(text) => {
            tokenizer.initialize();
            let document = tokenizer.tokenize(text, lang)?;
            Some(tree.find_spans(&document.units))
        }
        None => None,
    };

    output_result(
        &format!("Query tree for {:?}", args.term),
        &QueryOutput {
            term: args.term.clone(),
            mode: args.mode.to_string(),
            node_count: tree.node_count(),
            tree,
            spans,
        },
        cli_args,
    )
}

/// Extract top-K features.
fn extract_features(args: &FeaturesArgs, cli_args: &BunkatsuArgs) -> Result<()> {
    let config = load_config(&args.tokenizer)?.with_feature_size(args.size);
    let mut tokenizer = build_tokenizer(&args.tokenizer, config)?;
    tokenizer.initialize();
    tokenizer.tokenize(&args.text, &args.tokenizer.lang)?;

    output_result(
        &format!("Top {} features", args.size),
        &FeaturesOutput {
            features: tokenizer.feature_list(),
        },
        cli_args,
    )
}

/// Show the effective tokenizer configuration.
fn describe_tokenizer(args: &DescribeArgs, cli_args: &BunkatsuArgs) -> Result<()> {
    let config = load_config(&args.tokenizer)?;
    let tokenizer = build_tokenizer(&args.tokenizer, config)?;
    let config = tokenizer.config();

    output_result(
        "Tokenizer configuration",
        &DescribeOutput {
            tokenizer: tokenizer.description(),
            indexing: config.indexing.to_string(),
            normalize: config.normalize,
            expand_limit: config.expand_limit,
        },
        cli_args,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn options(extra: &[&str]) -> TokenizerOptions {
        let mut argv = vec!["bunkatsu", "describe"];
        argv.extend_from_slice(extra);
        match BunkatsuArgs::try_parse_from(argv).unwrap().command {
            Command::Describe(args) => args.tokenizer,
            _ => panic!("Expected Describe command"),
        }
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = load_config(&options(&[
            "--indexing",
            "word",
            "--no-normalize",
            "--expand-limit",
            "8",
        ]))
        .unwrap();
        assert_eq!(config.indexing, IndexingType::Word);
        assert!(!config.normalize);
        assert_eq!(config.expand_limit, 8);
    }

    #[test]
    fn test_indexing_follows_tokenizer_name() {
        let config = load_config(&options(&[])).unwrap();
        assert_eq!(config.indexing, IndexingType::Dual);
        let config = load_config(&options(&["--param", "NGR:2"])).unwrap();
        assert_eq!(config.indexing, IndexingType::Ngram);
    }

    #[test]
    fn test_config_file_and_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"indexing": "ngram", "expand_limit": 16}"#).unwrap();

        let path_arg = path.to_string_lossy().to_string();
        let config = load_config(&options(&["--config", &path_arg])).unwrap();
        assert_eq!(config.indexing, IndexingType::Ngram);
        assert_eq!(config.expand_limit, 16);

        let config = load_config(&options(&["--config", &path_arg, "--indexing", "dual"])).unwrap();
        assert_eq!(config.indexing, IndexingType::Dual);
    }

    #[test]
    fn test_build_tokenizer_with_synonyms() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synonyms.json");
        std::fs::write(&path, r#"[["car", "automobile"]]"#).unwrap();

        let path_arg = path.to_string_lossy().to_string();
        let opts = options(&["--synonyms", &path_arg, "--lang", "en"]);
        let config = load_config(&opts).unwrap();
        let mut tokenizer = build_tokenizer(&opts, config).unwrap();
        assert_eq!(
            tokenizer.expand_term("car", &opts.lang).unwrap(),
            vec!["car", "automobile"]
        );
    }

    #[test]
    fn test_unknown_tokenizer_fails() {
        let opts = options(&["--param", "XYZ:JAP"]);
        let config = load_config(&opts).unwrap();
        assert!(build_tokenizer(&opts, config).is_err());
    }
}
