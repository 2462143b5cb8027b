//! # geomind: A CLI for the `geomind` pipeline
//!
//! Checks the configured services, runs one-off natural-language queries, and
//! initializes the PostGIS schema.

mod services;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geomind::providers::db::storage::SpatialStorage;
use serde_json::Value;
use services::ServiceArgs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// The query used by `check` to exercise interpretation.
const SAMPLE_QUERY: &str = "Show me areas with high potential for coffee shops";

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    services: ServiceArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Report the status of the database, model, and maps services
    Check,
    /// Run a natural-language query and print the response as JSON
    Query(QueryArgs),
    /// Create the PostGIS extension, tables, and indexes
    InitDb,
}

#[derive(Parser, Debug)]
struct QueryArgs {
    /// The question, e.g. "best places for a coffee shop in Porto Alegre"
    #[arg(required = true)]
    query: String,
    /// Extra context as a JSON object
    #[arg(long)]
    context: Option<String>,
    /// Include interpretation and SQL sources in the output
    #[arg(long)]
    debug: bool,
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match &cli.command {
        Commands::Check => handle_check(&cli.services).await,
        Commands::Query(args) => handle_query(&cli.services, args).await,
        Commands::InitDb => handle_init_db(&cli.services).await,
    }
}

// --- Command Handlers ---

async fn handle_check(services: &ServiceArgs) -> Result<()> {
    let executor = services.executor()?;

    println!("🧪 Checking GeoMind services\n");

    let db_status = executor.storage.check_connection().await;
    println!("1. Database (PostGIS): {db_status}");
    if !db_status.starts_with("healthy") {
        println!("   ⚠️  Database not connected (queries will use mock data)");
    }

    let llm_enabled = executor.interpreter.is_enabled();
    println!(
        "2. LLM (Gemini): {}",
        if llm_enabled { "healthy" } else { "disabled" }
    );
    let (interpretation, source) = executor.interpreter.interpret(SAMPLE_QUERY, None).await;
    println!("   Sample query: \"{SAMPLE_QUERY}\"");
    println!("   Query type: {}", interpretation.query_type);
    println!("   Analysis type: {}", interpretation.analysis_type);
    println!("   Interpreted by: {source:?}");

    println!(
        "3. Maps (Google Maps): {}",
        if executor.maps.is_some() {
            "healthy"
        } else {
            "disabled"
        }
    );

    Ok(())
}

async fn handle_query(services: &ServiceArgs, args: &QueryArgs) -> Result<()> {
    let context: Option<Value> = args
        .context
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .context("--context must be valid JSON")?;

    let executor = services.executor()?;
    info!("Running query: '{}'", args.query);
    let mut response = executor.process_query(&args.query, context.as_ref()).await;
    if !args.debug {
        response.debug = None;
    }

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn handle_init_db(services: &ServiceArgs) -> Result<()> {
    let settings = services.postgis_settings();
    println!(
        "🗄️  Initializing schema on {}:{}/{}...",
        settings.host, settings.port, settings.name
    );
    services.storage().initialize_schema().await?;
    println!("✅ PostGIS schema is ready.");
    Ok(())
}
