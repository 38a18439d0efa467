pub mod corpus;
pub mod index;
pub mod prompt;
pub mod query;
pub mod tokenizer;

pub use index::{
    Document, KnowledgeIndex, ScoringParams, DEFAULT_MAX_RESULTS, IDF_FLOOR, KEYWORD_BOOST, MIN_SCORE, UNKNOWN_TERM_IDF,
};
pub use query::Hit;
