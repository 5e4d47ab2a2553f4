//! CLI entry point for the catalog query engine.
//!
//! Reads operation requests as JSON from stdin and writes one JSON response
//! per request to stdout. Logs go to stderr.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use catalog_core::config::LogConfig;
use catalog_core::CatalogConfig;
use catalog_query::{QueryEngine, Schema};
use catalog_store::open_store;

#[derive(Parser)]
#[command(name = "catalog-query")]
#[command(about = "Schema-driven query and mutation engine for users and their products")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: catalog).
    #[arg(short, long, default_value = "catalog", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Execute one request object, or an array of them, read from stdin.
    Execute,
    /// Print the schema as SDL.
    Schema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = CatalogConfig::load(&cli.config)?;
    init_tracing(&config.log);
    tracing::debug!(backend = ?config.store.backend, "Loaded catalog configuration");

    match cli.command {
        Command::Schema => {
            print!("{}", Schema::catalog().sdl());
            Ok(())
        }
        Command::Execute => {
            let input = std::io::read_to_string(std::io::stdin())?;

            let store = open_store(&config.store).await?;
            let engine = QueryEngine::with_store(store)?;

            let mut failed = 0usize;
            for response in engine.execute_document(&input).await {
                if !response.is_ok() {
                    failed += 1;
                }
                println!("{}", serde_json::to_string(&response)?);
            }

            engine.close().await?;

            if failed > 0 {
                tracing::warn!(failed, "Some operations returned errors");
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    if log.json {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    }
}
