use criterion::{criterion_group, criterion_main, Criterion};
use knowledge::tokenizer::tokenize;
use knowledge::{corpus, KnowledgeIndex};

fn bench_tokenize(c: &mut Criterion) {
    let text = include_str!("../data/knowledge.json");
    c.bench_function("tokenize_corpus_json", |b| b.iter(|| tokenize(text)));
}

fn bench_build(c: &mut Criterion) {
    let docs = corpus::builtin().expect("builtin corpus");
    c.bench_function("build_index", |b| b.iter(|| KnowledgeIndex::new(docs.clone())));
}

fn bench_query(c: &mut Criterion) {
    let index = KnowledgeIndex::new(corpus::builtin().expect("builtin corpus"));
    c.bench_function("query_voice_agent", |b| b.iter(|| index.query("Tell me about the real-time voice agent", 3)));
}

criterion_group!(benches, bench_tokenize, bench_build, bench_query);
criterion_main!(benches);
