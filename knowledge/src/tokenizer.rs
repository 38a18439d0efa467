use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Anything that is not a lowercase ASCII letter, digit, whitespace or hyphen.
    static ref NON_TERM: Regex = Regex::new(r"[^a-z0-9\s-]+").expect("valid regex");
}

/// Tokenize text into lowercase terms.
///
/// Characters outside `[a-z0-9]`, whitespace and `-` are treated as separators,
/// and tokens of a single character are dropped. Order and duplicates are kept,
/// so the output can be fed straight into term-frequency counting. The same
/// function is used when indexing documents and when building query vectors.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = NON_TERM.replace_all(&lowered, " ");
    cleaned
        .split_whitespace()
        .filter(|tok| tok.len() > 1)
        .map(str::to_owned)
        .collect()
}
