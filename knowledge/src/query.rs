use crate::index::{magnitude, weigh, Document, KnowledgeIndex, TermVector};
use crate::tokenizer::tokenize;
use std::cmp::Ordering;

/// A ranked document returned by [`KnowledgeIndex::search`].
#[derive(Debug, Clone, PartialEq)]
pub struct Hit<'a> {
    /// 1-based position in the result list.
    pub rank: usize,
    pub score: f64,
    pub doc: &'a Document,
}

impl KnowledgeIndex {
    /// Rank the corpus against `query` and return at most `max_results` hits
    /// scoring above the relevance floor, best first.
    ///
    /// `max_results` of zero is treated as one. Ties keep corpus order.
    pub fn search(&self, query: &str, max_results: usize) -> Vec<Hit<'_>> {
        let q_vec = self.query_vector(query);
        let q_norm = magnitude(&q_vec);
        let lowered = query.to_lowercase();

        let mut scored: Vec<(usize, f64)> = (0..self.docs.len())
            .map(|i| {
                let sim = cosine(&q_vec, q_norm, &self.vectors[i], self.norms[i]);
                (i, sim + self.keyword_boost(i, &lowered))
            })
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        scored
            .into_iter()
            .take(max_results.max(1))
            .filter(|(_, score)| *score > self.params.min_score)
            .enumerate()
            .map(|(pos, (i, score))| Hit { rank: pos + 1, score, doc: &self.docs[i] })
            .collect()
    }

    /// Context string for a language-model prompt, or `None` when nothing is relevant.
    ///
    /// Each surviving document is rendered as `[Source N]: text`, separated by a blank line.
    pub fn query(&self, query: &str, max_results: usize) -> Option<String> {
        let hits = self.search(query, max_results);
        if hits.is_empty() {
            return None;
        }
        Some(format_context(&hits))
    }

    fn query_vector(&self, query: &str) -> TermVector {
        let tokens = tokenize(query);
        weigh(&tokens, |term| self.idf.get(term).copied().unwrap_or(self.params.unknown_term_idf))
    }

    fn keyword_boost(&self, doc: usize, lowered_query: &str) -> f64 {
        let matched = self.keywords[doc].iter().filter(|kw| lowered_query.contains(kw.as_str())).count();
        matched as f64 * self.params.keyword_boost
    }
}

pub fn format_context(hits: &[Hit<'_>]) -> String {
    hits.iter()
        .map(|h| format!("[Source {}]: {}", h.rank, h.doc.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Cosine similarity of two sparse vectors with precomputed magnitudes.
///
/// Terms missing from either side contribute nothing to the dot product, so
/// iterating the smaller vector is enough.
fn cosine(a: &TermVector, a_norm: f64, b: &TermVector, b_norm: f64) -> f64 {
    let mag = a_norm * b_norm;
    if mag == 0.0 {
        return 0.0;
    }
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(term, w)| large.get(term).map(|other| w * other))
        .sum();
    dot / mag
}
