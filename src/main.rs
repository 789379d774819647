use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::*;
use serde::Serialize;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use rq_core::{ErrorClass, QueryRequest};
use rq_groq::{GroqClient, GroqConfig};
use rq_rag::{QdrantIndex, QueryEngine, RagConfig, build_embedding_provider};

mod ui;

const EXIT_CLIENT_ERROR: u8 = 2;
const EXIT_RETRY_LATER: u8 = 3;
const EXIT_CONFIG: u8 = 78;

#[derive(Parser)]
#[command(name = "ragquery")]
#[command(about = "Ask questions against an indexed document collection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Return the most relevant passages without generating an answer
    Query(QueryArgs),
    /// Answer a question from the most relevant passages
    Chat(QueryArgs),
    /// Show point count and status of a collection
    Info {
        collection: String,
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the resolved configuration with secrets redacted
    Config,
}

#[derive(Args)]
struct QueryArgs {
    question: String,
    /// Collection to search (defaults to COLLECTION_NAME)
    #[arg(short, long)]
    collection: Option<String>,
    /// Number of passages to retrieve (defaults to TOP_K)
    #[arg(short = 'k', long)]
    top_k: Option<usize>,
    /// Print machine-readable JSON
    #[arg(long)]
    json: bool,
}

impl QueryArgs {
    fn request(&self) -> QueryRequest {
        QueryRequest {
            question: self.question.clone(),
            collection: self.collection.clone(),
            top_k: self.top_k,
        }
    }
}

type Engine = QueryEngine<QdrantIndex, GroqClient>;

fn build_engine(rag: RagConfig, groq: GroqConfig) -> rq_core::Result<Engine> {
    let embedder = build_embedding_provider(&rag.embedding)?;
    let index = Arc::new(QdrantIndex::new(rag.qdrant));
    let llm = GroqClient::new(groq)?;
    Ok(QueryEngine::new(embedder, index, llm, rag.query))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to serialize response")?;
    println!("{}", rendered);
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let rag = RagConfig::from_env()?;
    let groq = GroqConfig::from_env()?;

    if let Command::Config = cli.command {
        return print_json(&serde_json::json!({
            "rag": rag.redacted(),
            "groq": groq.redacted(),
        }));
    }

    let engine = build_engine(rag, groq)?;

    match cli.command {
        Command::Query(args) => {
            let response = engine.retrieve(&args.request()).await?;
            if args.json {
                return print_json(&response);
            }
            ui::display_retrieval(&response);
        }
        Command::Chat(args) => {
            let response = engine.answer(&args.request()).await?;
            if args.json {
                return print_json(&response);
            }
            ui::display_answer(&response);
        }
        Command::Info { collection, json } => {
            let info = engine.collection_info(&collection).await?;
            if json {
                return print_json(&info);
            }
            ui::display_collection_info(&info);
        }
        Command::Config => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "❌".red(), format!("{:#}", e).red());
            match e.downcast_ref::<rq_core::Error>().map(|err| err.class()) {
                Some(ErrorClass::Client) => {
                    eprintln!("   {}", "check the request and try again".dimmed());
                    ExitCode::from(EXIT_CLIENT_ERROR)
                }
                Some(ErrorClass::Transient) => {
                    eprintln!("   {}", "a backend is unavailable, retry later".dimmed());
                    ExitCode::from(EXIT_RETRY_LATER)
                }
                Some(ErrorClass::Fatal) => {
                    eprintln!("   {}", "fix the configuration and restart".dimmed());
                    ExitCode::from(EXIT_CONFIG)
                }
                None => ExitCode::FAILURE,
            }
        }
    }
}
