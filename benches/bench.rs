//! Criterion benchmarks for bunkatsu.
//!
//! Covers the hot paths of indexing and query construction:
//! - Blocker segmentation in index and search mode
//! - N-gram and dual tokenization of whole documents
//! - Leaf-node construction with and without expansion overflow

use std::hint::black_box;

use bunkatsu::analysis::analyzer::LanguageSet;
use bunkatsu::analysis::analyzer::simple::SimpleAnalyzer;
use bunkatsu::analysis::blocker::{BlockMode, Blocker};
use bunkatsu::analysis::synonym::SynonymDictionary;
use bunkatsu::config::{IndexingType, TokenizerConfig};
use bunkatsu::leaf_node::MatchMode;
use bunkatsu::tokenizer::{Tokenizer, create_tokenizer};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};

/// Generate mixed Japanese/English test documents.
fn generate_test_documents(count: usize) -> Vec<String> {
    let words = [
        "全文検索",
        "エンジン",
        "は",
        "search",
        "index",
        "の",
        "形態素解析",
        "query",
        "を",
        "トークン",
        "ranking",
        "で",
        "データ",
        "retrieval",
        "。",
    ];

    let mut documents = Vec::with_capacity(count);
    for i in 0..count {
        let doc_length = 50 + (i % 100);
        let mut doc_words = Vec::with_capacity(doc_length);
        for j in 0..doc_length {
            let word_idx = (i * 7 + j * 13) % words.len();
            doc_words.push(words[word_idx]);
        }
        documents.push(doc_words.join(" "));
    }
    documents
}

fn synonym_analyzer() -> SimpleAnalyzer {
    let mut synonyms = SynonymDictionary::new();
    for group in [
        ["search", "retrieval", "lookup"],
        ["index", "catalog", "register"],
        ["query", "request", "question"],
        ["data", "record", "datum"],
    ] {
        synonyms.add_synonym_group(&group);
    }
    SimpleAnalyzer::new().with_synonyms(synonyms)
}

/// Benchmark the blocker alone.
fn bench_blocker(c: &mut Criterion) {
    let mut group = c.benchmark_group("blocker");
    let documents = generate_test_documents(10);
    let text = &documents[0];
    group.throughput(Throughput::Elements(text.chars().count() as u64));

    let mut blocker = Blocker::parse("JAP:ALL:1:3 KAN:HIR").unwrap();
    group.bench_function("index_mode", |b| {
        b.iter(|| {
            blocker.set(black_box(text), BlockMode::Index);
            black_box(blocker.by_ref().count())
        })
    });

    group.bench_function("search_mode", |b| {
        b.iter(|| {
            blocker.set(black_box(text), BlockMode::Search);
            black_box(blocker.by_ref().count())
        })
    });

    group.finish();
}

/// Benchmark document tokenization.
fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    let documents = generate_test_documents(100);
    let lang: LanguageSet = "ja+en".parse().unwrap();

    for (name, param, indexing) in [
        ("ngram", "NGR:JAP:ALL:2", IndexingType::Ngram),
        ("dual", "DUAL:JAP:ALL:2", IndexingType::Dual),
        ("word", "DUAL:JAP", IndexingType::Word),
    ] {
        let mut tokenizer = create_tokenizer(
            param,
            TokenizerConfig::new(indexing),
            Box::new(SimpleAnalyzer::new()),
        )
        .unwrap();

        group.throughput(Throughput::Elements(documents.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| {
                for document in &documents {
                    tokenizer.initialize();
                    let result = tokenizer.tokenize(black_box(document), &lang).unwrap();
                    black_box(result);
                }
            })
        });
    }

    group.finish();
}

/// Benchmark query leaf-node construction.
fn bench_leaf_node(c: &mut Criterion) {
    let mut group = c.benchmark_group("leaf_node");
    let lang = LanguageSet::single("en");

    let mut tokenizer = create_tokenizer(
        "DUAL:JAP:ALL:2",
        TokenizerConfig::new(IndexingType::Dual),
        Box::new(synonym_analyzer()),
    )
    .unwrap();
    group.bench_function("expanded_exact_word", |b| {
        b.iter(|| {
            let node = tokenizer
                .create_leaf_node(black_box("search index query data"), &lang, MatchMode::ExactWord)
                .unwrap();
            black_box(node)
        })
    });

    let mut tokenizer = create_tokenizer(
        "DUAL:JAP:ALL:2",
        TokenizerConfig::new(IndexingType::Dual).with_expand_limit(8),
        Box::new(synonym_analyzer()),
    )
    .unwrap();
    group.bench_function("overflowing_expansion", |b| {
        b.iter(|| {
            let node = tokenizer
                .create_leaf_node(black_box("search index query data"), &lang, MatchMode::String)
                .unwrap();
            black_box(node)
        })
    });

    group.finish();
}

/// Benchmark feature extraction during tokenization.
fn bench_features(c: &mut Criterion) {
    let mut group = c.benchmark_group("features");
    let documents = generate_test_documents(20);
    let lang: LanguageSet = "ja+en".parse().unwrap();

    let mut tokenizer = create_tokenizer(
        "DUAL:JAP:ALL:2",
        TokenizerConfig::new(IndexingType::Dual).with_feature_size(10),
        Box::new(SimpleAnalyzer::new()),
    )
    .unwrap();
    group.bench_function("tokenize_and_rank", |b| {
        b.iter(|| {
            for document in &documents {
                tokenizer.initialize();
                tokenizer.tokenize(black_box(document), &lang).unwrap();
                black_box(tokenizer.feature_list());
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_blocker,
    bench_tokenize,
    bench_leaf_node,
    bench_features
);
criterion_main!(benches);
