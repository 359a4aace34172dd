//! Loichao - conversation opener suggestions in the terminal
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use clap::Parser;
use loichao::{logging, ui, Config, GeminiAgent};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "loichao")]
#[command(author, version, about = "TUI that suggests how to open a conversation", long_about = None)]
struct Cli {
    /// Path to a loichao.toml configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the model identifier (e.g. gemini-2.5-pro)
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(model) = cli.model {
        config.agent.model = model;
    }

    match logging::init(&config) {
        Ok(Some(path)) => info!(log_file = %path.display(), "logging initialised"),
        Ok(None) => {}
        Err(e) => eprintln!("Warning: logging disabled: {}", e),
    }
    info!(source = ?config.source, model = %config.agent.model, "configuration loaded");

    // Fails fast when the API key is missing, before raw mode is entered
    let agent = GeminiAgent::new(&config)?;

    ui::run(Arc::new(agent)).await
}
