use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod claims;
mod index;
mod ingest;
mod model;
mod service;

use app::AppState;
use model::Config;
use service::IndexBuilder;
use service::decision::DecisionGenerate;
use service::evaluation::{self, report};

/// Characters of clause text printed per retrieval hit
const RETRIEVE_PREVIEW_CHARS: usize = 700;

#[derive(Parser)]
#[command(name = "coverage-intel")]
#[command(
    version,
    about = "Retrieval-grounded health insurance claim adjudication and faithfulness evaluation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split raw policy documents into overlapping clause chunks
    Chunk,

    /// Embed the policy chunks and build the vector index
    Index,

    /// Query the policy index and print the nearest clauses
    Retrieve {
        /// Query text
        query: String,
        /// Clauses to return (defaults to the configured top_k)
        #[arg(long)]
        top_k: Option<usize>,
    },

    /// Adjudicate one claim against the policy corpus
    Adjudicate {
        /// Claim file to adjudicate; reads stdin when omitted
        claim_file: Option<PathBuf>,
    },

    /// Generate synthetic claim documents from tabular claim exports
    GenerateClaims,

    /// Evaluate adjudication faithfulness over the synthetic claims
    Evaluate {
        /// Claims to evaluate (defaults to the configured batch limit)
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Chunk => run_chunk(&config),
        Commands::Index => run_index(&config).await,
        Commands::Retrieve { query, top_k } => {
            run_retrieve(&config, &query, top_k.unwrap_or(config.tuning.top_k)).await
        }
        Commands::Adjudicate { claim_file } => run_adjudicate(&config, claim_file).await,
        Commands::GenerateClaims => run_generate_claims(&config),
        Commands::Evaluate { limit } => {
            run_evaluate(&config, limit.unwrap_or(config.tuning.batch_limit)).await
        }
    }
}

fn run_chunk(config: &Config) -> anyhow::Result<()> {
    let documents = ingest::load_policy_documents(&config.paths.policy_dir)?;
    let clauses = ingest::chunk_documents(
        &documents,
        config.tuning.chunk_size,
        config.tuning.chunk_overlap,
    )?;
    ingest::save_chunks(&config.paths.chunks_file, &clauses)?;

    println!(
        "Chunked {} documents into {} clauses ({})",
        documents.len(),
        clauses.len(),
        config.paths.chunks_file.display()
    );
    Ok(())
}

async fn run_index(config: &Config) -> anyhow::Result<()> {
    let clauses = ingest::load_chunks(&config.paths.chunks_file)?;
    let state = AppState::new(config.clone())?;

    let built = IndexBuilder::new(state.llm_client())
        .build(&clauses, &config.paths.index_dir)
        .await?;

    println!(
        "Indexed {} clauses ({} dimensions) into {}",
        built.len(),
        built.dim(),
        config.paths.index_dir.display()
    );
    Ok(())
}

async fn run_retrieve(config: &Config, query: &str, top_k: usize) -> anyhow::Result<()> {
    let state = AppState::new(config.clone())?;
    let retriever = state.clause_retriever()?;
    let hits = retriever.retrieve(query, top_k).await?;

    println!("Top retrieved policy clauses:");
    for (rank, hit) in hits.iter().enumerate() {
        let preview: String = hit
            .clause
            .text
            .chars()
            .take(RETRIEVE_PREVIEW_CHARS)
            .collect();
        println!("\nResult {}", rank + 1);
        println!("Source file: {}", hit.clause.source_file);
        println!("L2 distance: {:.4}", hit.distance);
        println!("Text:\n{preview}");
        println!("{}", "-".repeat(80));
    }
    Ok(())
}

async fn run_adjudicate(config: &Config, claim_file: Option<PathBuf>) -> anyhow::Result<()> {
    let claim_text = match &claim_file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let state = AppState::new(config.clone())?;
    let service = state.decision_service()?;
    let generated = service.generate(claim_text.trim()).await?;

    println!("Retrieved {} policy clauses:", generated.clauses.len());
    for hit in &generated.clauses {
        println!(
            "- {} (distance {:.4})",
            hit.clause.source_file, hit.distance
        );
    }
    println!();

    match &generated.decision {
        Some(decision) => println!("{}", serde_json::to_string_pretty(decision)?),
        None => println!("Model output was not valid JSON:\n{}", generated.raw_output),
    }
    Ok(())
}

fn run_generate_claims(config: &Config) -> anyhow::Result<()> {
    let count = claims::synthetic::generate_claims(
        &config.paths.claims_tabular_dir,
        &config.paths.claims_dir,
    )?;

    println!(
        "Generated {count} synthetic claims in {}",
        config.paths.claims_dir.display()
    );
    Ok(())
}

async fn run_evaluate(config: &Config, limit: usize) -> anyhow::Result<()> {
    let state = AppState::new(config.clone())?;
    let service = state.evaluation_service()?;

    let claims = claims::load_claim_documents(&config.paths.claims_dir, limit)?;
    let records = service.run(&claims).await;

    let report_path = report::write_report(&config.paths.results_dir, &records)?;
    let summary = evaluation::summarize(&records);

    println!("{summary}");
    println!("\nResults saved to: {}", report_path.display());
    Ok(())
}
