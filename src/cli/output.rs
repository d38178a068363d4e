//! Output formatting for CLI commands.

use std::fmt::Write as _;

use serde::Serialize;

use crate::cli::args::{BunkatsuArgs, OutputFormat};
use crate::error::Result;
use crate::feature::Feature;
use crate::leaf_node::LeafNode;
use crate::leaf_node::matcher::Span;
use crate::tokenizer::{SectionSize, UnitRole};

/// Results that can render themselves for a terminal.
pub trait HumanReadable {
    fn render(&self) -> String;
}

/// One index unit with its positions.
#[derive(Debug, Serialize)]
pub struct UnitEntry {
    pub unit: String,
    pub role: UnitRole,
    pub positions: Vec<usize>,
}

/// Result structure for tokenization.
#[derive(Debug, Serialize)]
pub struct TokenizeOutput {
    pub tokenizer: String,
    pub sections: Vec<SectionSize>,
    pub units: Vec<UnitEntry>,
}

/// Result structure for query-tree construction.
#[derive(Debug, Serialize)]
pub struct QueryOutput {
    pub term: String,
    pub mode: String,
    pub node_count: usize,
    pub tree: LeafNode,
    /// Matches against `--text`, when given.
    pub spans: Option<Vec<Span>>,
}

/// Result structure for feature extraction.
#[derive(Debug, Serialize)]
pub struct FeaturesOutput {
    pub features: Vec<Feature>,
}

/// Result structure for tokenizer description.
#[derive(Debug, Serialize)]
pub struct DescribeOutput {
    pub tokenizer: String,
    pub indexing: String,
    pub normalize: bool,
    pub expand_limit: usize,
}

impl HumanReadable for TokenizeOutput {
    fn render(&self) -> String {
        let mut out = String::new();
        for (i, section) in self.sections.iter().enumerate() {
            let _ = writeln!(
                out,
                "section {i}: {} normalized / {} original",
                section.normalized_size, section.original_size
            );
        }
        for entry in &self.units {
            let label = match entry.role {
                UnitRole::Boundary => "<boundary>".to_string(),
                _ => format!("{:?}", entry.unit),
            };
            let _ = writeln!(out, "{label}\t{:?}", entry.positions);
        }
        out
    }
}

impl HumanReadable for QueryOutput {
    fn render(&self) -> String {
        let mut out = format!("{} [{}]\n{}\n", self.term, self.mode, self.tree);
        if let Some(spans) = &self.spans {
            if spans.is_empty() {
                out.push_str("no match\n");
            }
            for span in spans {
                let _ = writeln!(out, "match {}..{}", span.start, span.end);
            }
        }
        out
    }
}

impl HumanReadable for FeaturesOutput {
    fn render(&self) -> String {
        let mut out = String::new();
        for feature in &self.features {
            let _ = writeln!(out, "{:>10.3}  {}", feature.scale, feature.term);
        }
        out
    }
}

impl HumanReadable for DescribeOutput {
    fn render(&self) -> String {
        format!(
            "tokenizer:    {}\nindexing:     {}\nnormalize:    {}\nexpand limit: {}\n",
            self.tokenizer, self.indexing, self.normalize, self.expand_limit
        )
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanReadable>(
    message: &str,
    result: &T,
    args: &BunkatsuArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

fn output_human<T: HumanReadable>(message: &str, result: &T, args: &BunkatsuArgs) -> Result<()> {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }
    print!("{}", result.render());
    Ok(())
}

fn output_json<T: Serialize>(result: &T, args: &BunkatsuArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}
