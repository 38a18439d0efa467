use anyhow::Result;
use clap::{Parser, Subcommand};
use knowledge::{corpus, Document, KnowledgeIndex, ScoringParams, DEFAULT_MAX_RESULTS, KEYWORD_BOOST, MIN_SCORE};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "kb")]
#[command(about = "Inspect and query the in-memory knowledge index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a corpus and check it for malformed documents
    Validate {
        /// Input path (JSON/JSONL file or directory)
        #[arg(long)]
        input: String,
    },
    /// Print index statistics
    Stats {
        /// Input path; the builtin corpus when omitted
        #[arg(long)]
        input: Option<String>,
        /// Number of highest-idf terms to list
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Run a query and print the context string
    Query {
        /// Query text
        text: String,
        /// Input path; the builtin corpus when omitted
        #[arg(long)]
        input: Option<String>,
        /// Maximum number of sources
        #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
        k: usize,
        /// Relevance floor
        #[arg(long, default_value_t = MIN_SCORE)]
        min_score: f64,
        /// Score added per keyword found in the query
        #[arg(long, default_value_t = KEYWORD_BOOST)]
        keyword_boost: f64,
        /// Print scored hits as JSON instead of the context string
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Serialize)]
struct Stats<'a> {
    documents: usize,
    terms: usize,
    categories: BTreeMap<&'a str, usize>,
    rarest_terms: Vec<(&'a str, f64)>,
}

#[derive(Serialize)]
struct HitOut<'a> {
    rank: usize,
    id: &'a str,
    score: f64,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { input } => {
            let docs = corpus::load(&input)?;
            tracing::info!(input = %input, num_docs = docs.len(), "corpus valid");
            println!("{input}: {} documents ok", docs.len());
            Ok(())
        }
        Commands::Stats { input, top } => {
            let index = KnowledgeIndex::new(load_docs(input.as_deref())?);
            print_stats(&index, top)
        }
        Commands::Query { text, input, k, min_score, keyword_boost, json } => {
            let params = ScoringParams { min_score, keyword_boost, ..ScoringParams::default() };
            let index = KnowledgeIndex::with_params(load_docs(input.as_deref())?, params);
            tracing::info!(num_docs = index.num_docs(), k, min_score, keyword_boost, "running query");
            if json {
                let hits: Vec<HitOut> = index
                    .search(&text, k)
                    .into_iter()
                    .map(|h| HitOut { rank: h.rank, id: &h.doc.id, score: h.score })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else {
                match index.query(&text, k) {
                    Some(ctx) => println!("{ctx}"),
                    None => println!("no relevant match"),
                }
            }
            Ok(())
        }
    }
}

fn load_docs(input: Option<&str>) -> Result<Vec<Document>> {
    let docs = match input {
        Some(path) => corpus::load(path)?,
        None => corpus::builtin()?,
    };
    tracing::info!(source = input.unwrap_or("builtin"), num_docs = docs.len(), "loaded corpus");
    Ok(docs)
}

fn print_stats(index: &KnowledgeIndex, top: usize) -> Result<()> {
    let mut categories: BTreeMap<&str, usize> = BTreeMap::new();
    for doc in index.documents() {
        *categories.entry(doc.category.as_str()).or_insert(0) += 1;
    }
    let stats = Stats {
        documents: index.num_docs(),
        terms: index.vocabulary_size(),
        categories,
        rarest_terms: index.rarest_terms(top),
    };
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
