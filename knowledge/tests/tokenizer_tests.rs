use knowledge::tokenizer::tokenize;

#[test]
fn it_lowercases_and_strips_punctuation() {
    let toks = tokenize("Who ARE you?! (Maya's) voice... agent");
    assert_eq!(toks, vec!["who", "are", "you", "maya", "voice", "agent"]);
}

#[test]
fn it_drops_single_characters() {
    let toks = tokenize("a b c built a RAG x");
    assert_eq!(toks, vec!["built", "rag"]);
}

#[test]
fn it_keeps_duplicates_in_order() {
    let toks = tokenize("voice agent voice");
    assert_eq!(toks, vec!["voice", "agent", "voice"]);
}

#[test]
fn non_ascii_letters_become_separators() {
    // é is not in [a-z], so "café" splits into "caf" and a dropped single char
    let toks = tokenize("café naïve");
    assert_eq!(toks, vec!["caf", "na", "ve"]);
}

#[test]
fn empty_and_blank_input() {
    assert!(tokenize("").is_empty());
    assert!(tokenize("   \t\n ").is_empty());
    assert!(tokenize("?! ... ,").is_empty());
}

#[test]
fn paths_and_urls_split_on_punctuation() {
    let toks = tokenize("github.com/prajwal10001/pipecat_voice_agent");
    assert_eq!(toks, vec!["github", "com", "prajwal10001", "pipecat", "voice", "agent"]);
}
