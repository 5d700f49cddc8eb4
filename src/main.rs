// Main entry point - Dependency injection and shell setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::application::output_board::OutputBoard;
use crate::application::state_store::StateStore;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::file_store::FileStore;
use crate::infrastructure::http_client::ReqwestSource;
use crate::infrastructure::memory_store::MemoryStore;
use crate::presentation::app_state::AppState;
use crate::presentation::commands::Command;
use crate::presentation::handlers::{handle, Reply};
use crate::presentation::render::format_region;
use crate::presentation::shell::{run_shell, spawn_printer};

#[derive(Debug, Parser)]
#[command(name = "api-dashboard", version, about = "A terminal dashboard over public web APIs")]
struct Args {
    /// Config file (defaults to config/dashboard.toml when present)
    #[arg(long, env = "DASHBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// State file, overriding the configured location
    #[arg(long)]
    store: Option<PathBuf>,

    /// Keep state in memory only for this session
    #[arg(long, conflicts_with = "store")]
    ephemeral: bool,

    #[command(subcommand)]
    once: Option<Once>,
}

#[derive(Debug, Subcommand)]
enum Once {
    /// Run one feature, print its panel and exit
    Run {
        feature: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never mix with panel output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("api_dashboard=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Load configuration
    let config = load_dashboard_config(args.config.as_deref())?;

    // Create adapters (infrastructure layer)
    let store: Arc<dyn StateStore> = if args.ephemeral {
        tracing::info!("Using in-memory state");
        Arc::new(MemoryStore::new())
    } else {
        let path = args
            .store
            .or(config.storage.path.clone())
            .unwrap_or_else(FileStore::default_path);
        let store = FileStore::open(path)?;
        tracing::info!("Using state file {}", store.path().display());
        Arc::new(store)
    };
    let http = Arc::new(ReqwestSource::new(&config.http)?);

    match args.once {
        Some(Once::Run { feature, args }) => {
            let state = AppState::build(&config.api_keys, store, http, OutputBoard::new()).await;
            run_once(&state, feature, args).await
        }
        None => {
            let (board, updates) = OutputBoard::with_updates();
            let printer = spawn_printer(updates);
            let state = AppState::build(&config.api_keys, store, http, board).await;
            run_shell(state).await?;
            printer.abort();
            Ok(())
        }
    }
}

async fn run_once(state: &AppState, feature: String, args: Vec<String>) -> anyhow::Result<()> {
    let panel = match state.registry.get(&feature) {
        Some(spec) => spec.panel,
        None => anyhow::bail!("Unknown feature: {}", feature),
    };

    if let Reply::Dispatched(task) = handle(state, Command::Run { feature, args }) {
        task.await?;
    }
    if let Some(content) = state.board().read(panel) {
        println!("{}", format_region(panel, &content));
    }
    Ok(())
}
