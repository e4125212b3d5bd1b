//! Tagledger command-line entry point

use anyhow::{Context, Result};
use clap::Parser;
use once_cell::sync::OnceCell;
use std::process::ExitCode;
use tagledger::cli::{self, Cli};
use tagledger::{Orchestrator, TagledgerConfig};
use tagledger_logging::{init_logging, LogConfig};
use tracing::error;

/// Process-wide dependencies, built on first use.
static ORCHESTRATOR: OnceCell<Orchestrator> = OnceCell::new();

fn orchestrator(config: &TagledgerConfig) -> Result<&'static Orchestrator> {
    ORCHESTRATOR
        .get_or_try_init(|| Orchestrator::from_config(config))
        .context("Failed to build orchestrator")
}

fn main() -> ExitCode {
    let args = Cli::parse();

    if let Err(e) = init_logging(LogConfig {
        app_name: "tagledger",
        verbose: args.verbose,
    }) {
        eprintln!("warning: logging disabled: {:#}", e);
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("sorry, we encountered an error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Cli) -> Result<()> {
    let config = TagledgerConfig::resolve(args.config.as_deref()).context("Failed to load config")?;
    let orch = orchestrator(&config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli::run(args, &config, orch, &mut out)
}
