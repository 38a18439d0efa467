//! Loading and validating knowledge documents.
//!
//! A corpus can come from the portfolio documents compiled into the binary, a
//! `.json` file (array or single object), a `.jsonl` file with one document
//! per line, or a directory containing any mix of those.

use crate::Document;
use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const BUILTIN: &str = include_str!("../data/knowledge.json");

/// The portfolio corpus shipped with the crate.
pub fn builtin() -> Result<Vec<Document>> {
    let docs: Vec<Document> = serde_json::from_str(BUILTIN).context("parsing builtin corpus")?;
    validate(&docs)?;
    Ok(docs)
}

/// Load and validate documents from a file or directory.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let mut docs = Vec::new();
    for file in corpus_files(path)? {
        let before = docs.len();
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file, &mut docs)?;
        } else {
            read_json(&file, &mut docs)?;
        }
        tracing::debug!(file = %file.display(), count = docs.len() - before, "read corpus file");
    }
    validate(&docs).with_context(|| format!("invalid corpus at {}", path.display()))?;
    Ok(docs)
}

/// Reject documents the index would silently mishandle.
pub fn validate(docs: &[Document]) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    for (pos, doc) in docs.iter().enumerate() {
        if doc.id.trim().is_empty() {
            bail!("document #{pos} has an empty id");
        }
        if !seen.insert(doc.id.as_str()) {
            bail!("duplicate document id {:?}", doc.id);
        }
        if doc.text.trim().is_empty() {
            bail!("document {:?} has empty text", doc.id);
        }
        // A blank keyword is a substring of every query.
        if doc.keywords.iter().any(|k| k.trim().is_empty()) {
            bail!("document {:?} has a blank keyword", doc.id);
        }
    }
    Ok(())
}

fn corpus_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        bail!("corpus path {} does not exist", path.display());
    }
    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl")))
        .collect();
    files.sort();
    Ok(files)
}

fn read_jsonl(file: &Path, docs: &mut Vec<Document>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    for (lineno, line) in BufReader::new(f).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let doc: Document = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: malformed document", file.display(), lineno + 1))?;
        docs.push(doc);
    }
    Ok(())
}

fn read_json(file: &Path, docs: &mut Vec<Document>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let json: serde_json::Value =
        serde_json::from_reader(BufReader::new(f)).with_context(|| format!("parsing {}", file.display()))?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                let doc: Document =
                    serde_json::from_value(v).with_context(|| format!("{}: malformed document", file.display()))?;
                docs.push(doc);
            }
        }
        serde_json::Value::Object(_) => {
            let doc: Document =
                serde_json::from_value(json).with_context(|| format!("{}: malformed document", file.display()))?;
            docs.push(doc);
        }
        _ => bail!("{}: expected a document or an array of documents", file.display()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_corpus_is_valid() {
        let docs = builtin().unwrap();
        assert_eq!(docs.len(), 16);
        assert!(docs.iter().any(|d| d.id == "about_maya"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let docs = vec![Document::new("a", "one", "", &[]), Document::new("a", "two", "", &[])];
        let err = validate(&docs).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn rejects_blank_keywords_and_text() {
        assert!(validate(&[Document::new("a", "text", "", &[" "])]).is_err());
        assert!(validate(&[Document::new("a", "  ", "", &[])]).is_err());
        assert!(validate(&[Document::new("", "text", "", &[])]).is_err());
    }
}
