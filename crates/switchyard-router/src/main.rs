//! Binary entry point for the switchyard CLI.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{debug, warn};

use switchyard_core::traits::{Cancellable, CancellationToken};
use switchyard_core::SwitchyardConfig;
use switchyard_llm::{OllamaEmbeddingProvider, OpenAiCompatClient};
use switchyard_planning::heuristic_plan;
use switchyard_router::tracing_setup::init_tracing;
use switchyard_router::{Collaborators, Router};
use switchyard_storage::StorageEngine;

#[derive(Parser, Debug)]
#[command(
    name = "switchyard",
    version,
    about = "Route catalog questions to SQL, vector search, or a planned hybrid query",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        env = "SWITCHYARD_CONFIG",
        help = "TOML configuration file"
    )]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help = "SQLite database path (overrides config)"
    )]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Route one request and print its result envelope.
    Ask {
        #[arg(required = true, num_args = 1.., help = "Request text")]
        text: Vec<String>,
    },
    /// Print the plan produced for a request, without executing it.
    Plan {
        #[arg(long, help = "Skip the completion service and use the keyword planner")]
        heuristic: bool,
        #[arg(required = true, num_args = 1.., help = "Request text")]
        text: Vec<String>,
    },
    /// Validate and execute a plan document (`{"plan": [...]}` or `{"input": "..."}`).
    Execute {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn load_config(cli: &Cli) -> Result<SwitchyardConfig> {
    let mut config = match &cli.config {
        Some(path) => SwitchyardConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SwitchyardConfig::default(),
    };
    config.apply_env_overrides();
    if let Some(db) = &cli.db {
        config.storage.db_path = db.display().to_string();
    }
    Ok(config)
}

fn build_router(config: &SwitchyardConfig) -> Result<Router> {
    let storage = Arc::new(
        StorageEngine::open_with_config(&config.storage)
            .with_context(|| format!("opening database {}", config.storage.db_path))?,
    );
    let completion = Arc::new(OpenAiCompatClient::from_config(&config.completion)?);
    let embedder = Arc::new(OllamaEmbeddingProvider::from_config(&config.embedding)?);

    let collab = Collaborators {
        completion,
        embedder,
        relational: storage.clone(),
        vectors: storage,
    };
    Ok(Router::new(collab, config)?)
}

/// Cancel `token` on Ctrl-C.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("interrupt received, cancelling request");
                token.cancel();
            }
            Err(e) => debug!(error = %e, "ctrl-c handler unavailable"),
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config.observability)?;

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let output = match &cli.command {
        Command::Ask { text } => {
            let router = build_router(&config)?;
            let envelope = router.handle(&text.join(" "), &cancel).await;
            serde_json::to_value(&envelope)?
        }
        Command::Plan { heuristic, text } => {
            let text = text.join(" ");
            if *heuristic {
                json!({ "source": "heuristic", "plan": heuristic_plan(&text, &config.planner) })
            } else {
                let router = build_router(&config)?;
                let out = router.hybrid().plan(&text, &cancel).await?;
                json!({ "source": out.source.label(), "plan": out.plan })
            }
        }
        Command::Execute { file } => {
            let raw = std::fs::read_to_string(file)
                .with_context(|| format!("reading plan document {}", file.display()))?;
            let doc: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("parsing plan document {}", file.display()))?;
            let router = build_router(&config)?;
            router.hybrid().execute_document(&doc, &cancel).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
