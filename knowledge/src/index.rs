use crate::tokenizer::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Score added for every document keyword found verbatim in the lowercased query.
pub const KEYWORD_BOOST: f64 = 0.15;
/// Hits scoring at or below this value are dropped from results.
pub const MIN_SCORE: f64 = 0.05;
/// Query-side weight for terms the corpus has never seen.
pub const UNKNOWN_TERM_IDF: f64 = 0.5;
/// Added to `ln(N / df)` so that terms present in every document keep a positive weight.
pub const IDF_FLOOR: f64 = 1.0;
pub const DEFAULT_MAX_RESULTS: usize = 3;

pub type TermVector = HashMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    /// Informational label, never used for scoring.
    #[serde(default)]
    pub category: String,
    /// Curated terms folded into the indexed text and matched as substrings of the query.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>, category: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            category: category.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Text that goes through the tokenizer at build time: prose followed by keywords.
    fn indexed_text(&self) -> String {
        format!("{} {}", self.text, self.keywords.join(" "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    pub keyword_boost: f64,
    pub min_score: f64,
    pub unknown_term_idf: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self { keyword_boost: KEYWORD_BOOST, min_score: MIN_SCORE, unknown_term_idf: UNKNOWN_TERM_IDF }
    }
}

/// Immutable TF-IDF index over a fixed corpus.
///
/// Built once, then shared read-only (e.g. behind an `Arc`) by every caller
/// that needs retrieval. All query methods take `&self` and allocate only
/// call-local data.
#[derive(Debug, Clone)]
pub struct KnowledgeIndex {
    pub(crate) docs: Vec<Document>,
    pub(crate) idf: HashMap<String, f64>,
    pub(crate) vectors: Vec<TermVector>,
    pub(crate) norms: Vec<f64>,
    /// Lowercased, non-blank keywords per document.
    pub(crate) keywords: Vec<Vec<String>>,
    pub(crate) params: ScoringParams,
}

impl KnowledgeIndex {
    pub fn new(docs: Vec<Document>) -> Self {
        Self::with_params(docs, ScoringParams::default())
    }

    pub fn with_params(docs: Vec<Document>, params: ScoringParams) -> Self {
        let tokenized: Vec<Vec<String>> = docs.iter().map(|d| tokenize(&d.indexed_text())).collect();

        // Document frequency over token sets
        let mut df: HashMap<&str, u32> = HashMap::new();
        for tokens in &tokenized {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let n = docs.len() as f64;
        let idf: HashMap<String, f64> = df
            .into_iter()
            .map(|(term, df_t)| (term.to_string(), (n / df_t as f64).ln() + IDF_FLOOR))
            .collect();

        let mut vectors = Vec::with_capacity(tokenized.len());
        let mut norms = Vec::with_capacity(tokenized.len());
        for tokens in &tokenized {
            let vector = weigh(tokens, |term| idf.get(term).copied().unwrap_or(IDF_FLOOR));
            norms.push(magnitude(&vector));
            vectors.push(vector);
        }

        let keywords = docs
            .iter()
            .map(|d| {
                d.keywords
                    .iter()
                    .map(|k| k.to_lowercase())
                    .filter(|k| !k.trim().is_empty())
                    .collect()
            })
            .collect();

        tracing::info!(num_docs = docs.len(), num_terms = idf.len(), "knowledge index built");
        Self { docs, idf, vectors, norms, keywords, params }
    }

    pub fn documents(&self) -> &[Document] {
        &self.docs
    }

    pub fn document(&self, id: &str) -> Option<&Document> {
        self.docs.iter().find(|d| d.id == id)
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    /// Corpus-trained idf for `term`, if the corpus contains it.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    /// Terms ordered by descending idf, ties broken alphabetically.
    pub fn rarest_terms(&self, n: usize) -> Vec<(&str, f64)> {
        let mut terms: Vec<(&str, f64)> = self.idf.iter().map(|(t, w)| (t.as_str(), *w)).collect();
        terms.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.0.cmp(b.0)));
        terms.truncate(n);
        terms
    }
}

/// Max-normalized term frequency times `idf`, for documents and queries alike.
pub(crate) fn weigh(tokens: &[String], idf: impl Fn(&str) -> f64) -> TermVector {
    let mut tf: HashMap<&str, u32> = HashMap::new();
    for tok in tokens {
        *tf.entry(tok.as_str()).or_insert(0) += 1;
    }
    let max_tf = tf.values().copied().max().unwrap_or(0).max(1) as f64;
    tf.into_iter()
        .map(|(term, count)| (term.to_string(), (count as f64 / max_tf) * idf(term)))
        .collect()
}

pub(crate) fn magnitude(vector: &TermVector) -> f64 {
    vector.values().map(|w| w * w).sum::<f64>().sqrt()
}
