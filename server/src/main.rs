use anyhow::Result;
use axum::Router;
use clap::Parser;
use knowledge::{ScoringParams, KEYWORD_BOOST, MIN_SCORE};
use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};
use server::build_app;
use tokio::net::TcpListener;

#[derive(Parser)]
struct Args {
    /// Corpus file or directory (JSON/JSONL); the builtin portfolio corpus when omitted
    #[arg(long)]
    corpus: Option<String>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 3001)]
    port: u16,
    /// Relevance floor; hits at or below it are dropped
    #[arg(long, default_value_t = MIN_SCORE)]
    min_score: f64,
    /// Score added per keyword found in the query
    #[arg(long, default_value_t = KEYWORD_BOOST)]
    keyword_boost: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let params = ScoringParams { min_score: args.min_score, keyword_boost: args.keyword_boost, ..ScoringParams::default() };
    let app: Router = build_app(args.corpus.clone(), params)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "knowledge server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
