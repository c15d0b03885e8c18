//! Benchmarks for search operations (BM25, cosine, fusion, full engine).
//!
//! Run with: `cargo bench -p polysearch-core --bench search`
//!
//! These benchmarks measure the performance of:
//! - Lexical scoring (BM25 over every document)
//! - Semantic scoring (exhaustive cosine similarity)
//! - Normalization and fusion in isolation
//! - The full multilingual search path, query embedding included
//!
//! Every score is computed against every document, so all of these are
//! linear in corpus size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use polysearch_core::config::{Bm25Params, SearchConfig, DEFAULT_HASHING_DIM};
use polysearch_core::embedding::HashingEmbedder;
use polysearch_core::language::Language;
use polysearch_core::search::fusion::fuse_scores;
use polysearch_core::search::keyword::LexicalIndex;
use polysearch_core::search::normalize::min_max_normalize;
use polysearch_core::search::vector::SemanticIndex;
use polysearch_core::search::SearchEngine;
use polysearch_core::storage::InMemoryCorpusLoader;
use polysearch_core::text::TextNormalizer;
use std::sync::Arc;

// =============================================================================
// Benchmark Configuration
// =============================================================================

/// Seed for the query embedding; outside the document seed range.
const QUERY_EMBEDDING_SEED: u64 = 1_000_000;

const CORPUS_SIZES: [usize; 4] = [100, 1_000, 5_000, 10_000];

// =============================================================================
// Test Data Generation
// =============================================================================

/// Deterministic L2-normalized embedding.
fn seeded_embedding(seed: u64) -> Vec<f32> {
    let raw: Vec<f32> = (0..DEFAULT_HASHING_DIM)
        .map(|i| {
            let h = xxhash_rust::xxh3::xxh3_64_with_seed(&(i as u64).to_le_bytes(), seed);
            ((h as f32 / u64::MAX as f32) * 2.0) - 1.0
        })
        .collect();

    let norm: f32 = raw.iter().map(|x| x * x).sum::<f32>().sqrt();
    raw.into_iter().map(|x| x / norm).collect()
}

/// News-style snippet; topic varies by id for a realistic term distribution.
fn sample_text(id: u64) -> String {
    let topics = [
        "electric vehicle batteries and charging networks",
        "central bank interest rates and stock markets",
        "monsoon rainfall and crop yields",
        "football transfers and league standings",
        "semiconductor supply chains and export controls",
        "public health campaigns and vaccination rates",
        "renewable energy auctions and solar capacity",
        "election results and coalition negotiations",
    ];
    let topic = topics[(id % topics.len() as u64) as usize];

    format!(
        "Report {id} covers {topic}. Analysts said the latest figures point to \
         a gradual shift over the coming quarter, although regional differences \
         remain large. Officials expect further announcements once the review \
         of {topic} is complete. Reference {id}.",
    )
}

fn corpus_texts(size: usize) -> Vec<String> {
    (0..size as u64).map(sample_text).collect()
}

fn build_lexical_index(size: usize) -> LexicalIndex {
    LexicalIndex::build(
        TextNormalizer::new(Language::English),
        Bm25Params::default(),
        &corpus_texts(size),
    )
}

fn build_semantic_index(size: usize) -> SemanticIndex {
    let embeddings = (0..size as u64).map(seeded_embedding).collect();
    SemanticIndex::from_embeddings(DEFAULT_HASHING_DIM, embeddings).unwrap()
}

// ============================================================================
// BM25 Benchmarks
// ============================================================================

/// Benchmark: BM25 scoring with varying corpus sizes
fn bench_bm25_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("bm25/score_by_size");
    group.sample_size(50);

    let query = "electric vehicle charging";

    for size in CORPUS_SIZES {
        let index = build_lexical_index(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| index.score_text(black_box(query)));
        });
    }
    group.finish();
}

/// Benchmark: BM25 scoring with varying query lengths
fn bench_bm25_by_query_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("bm25/score_by_query_length");
    group.sample_size(50);

    let index = build_lexical_index(1_000);
    let queries = [
        ("1_word", "electric"),
        ("3_words", "electric vehicle charging"),
        ("5_words", "electric vehicle charging stock markets"),
        (
            "10_words",
            "electric vehicle charging stock markets monsoon rainfall crop yields election",
        ),
    ];

    for (name, query) in queries {
        group.bench_with_input(BenchmarkId::from_parameter(name), &query, |b, query| {
            b.iter(|| index.score_text(black_box(query)));
        });
    }
    group.finish();
}

// ============================================================================
// Cosine Benchmarks
// ============================================================================

/// Benchmark: exhaustive cosine scoring with varying corpus sizes
fn bench_cosine_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("cosine/score_by_size");
    group.sample_size(50);

    let query = seeded_embedding(QUERY_EMBEDDING_SEED);

    for size in CORPUS_SIZES {
        let index = build_semantic_index(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| index.score(black_box(&query)).unwrap());
        });
    }
    group.finish();
}

// ============================================================================
// Fusion Benchmarks
// ============================================================================

/// Benchmark: normalize both score vectors and fuse them
fn bench_normalize_and_fuse(c: &mut Criterion) {
    let mut group = c.benchmark_group("fusion/normalize_and_fuse");
    group.sample_size(200);

    for size in CORPUS_SIZES {
        let semantic: Vec<f32> = (0..size).map(|i| (i % 97) as f32 / 97.0).collect();
        let lexical: Vec<f32> = (0..size).map(|i| (i % 13) as f32 * 1.7).collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let sem = min_max_normalize(black_box(&semantic));
                let lex = min_max_normalize(black_box(&lexical));
                fuse_scores(&sem, &lex, 0.6).unwrap()
            });
        });
    }
    group.finish();
}

// ============================================================================
// Full Engine Benchmarks
// ============================================================================

/// Three equally sized corpora built with the hashing embedder.
fn build_engine(rt: &tokio::runtime::Runtime, size_per_language: usize) -> SearchEngine {
    let texts = corpus_texts(size_per_language);
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();

    let loader = InMemoryCorpusLoader::new()
        .with_texts(Language::English, &refs)
        .with_texts(Language::Spanish, &refs)
        .with_texts(Language::Hindi, &refs);

    rt.block_on(SearchEngine::build(
        &loader,
        Arc::new(HashingEmbedder::default()),
        SearchConfig::default(),
    ))
    .unwrap()
}

/// Benchmark: full search path
///
/// Measures:
/// 1. Query embedding (once)
/// 2. BM25 + cosine against every corpus
/// 3. Per-corpus normalization, fusion and thresholding
/// 4. Merge, sort and truncate
fn bench_engine_search(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("engine/search");
    group.sample_size(20);

    for size in [100, 1_000, 5_000] {
        let engine = build_engine(&rt, size);

        group.throughput(Throughput::Elements((size * 3) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                engine
                    .search(
                        black_box("electric vehicle charging"),
                        Some(Language::English),
                        12,
                    )
                    .unwrap()
            });
        });
    }
    group.finish();
}

/// Benchmark: engine build (normalize, index, embed) per corpus size
fn bench_engine_build(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("engine/build");
    group.sample_size(10);

    for size in [100, 1_000] {
        group.throughput(Throughput::Elements((size * 3) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| build_engine(&rt, size));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_bm25_by_size,
    bench_bm25_by_query_length,
    bench_cosine_by_size,
    bench_normalize_and_fuse,
    bench_engine_search,
    bench_engine_build,
);
criterion_main!(benches);
