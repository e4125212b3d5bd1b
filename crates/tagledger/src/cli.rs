//! Command-line surface: argument parsing and the generate-then-retry search.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::config::TagledgerConfig;
use crate::orchestrator::Orchestrator;
use crate::types::UserRecord;

#[derive(Parser, Debug)]
#[command(
    name = "tagledger",
    about = "Fetch user records from redundant sources and search them by tag"
)]
pub struct Cli {
    /// Config file (TOML); falls back to `$TAGLEDGER_CONFIG`
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Data file; overrides `data_path` from the config
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Tags to search, separated by comma (e.g. --tag=sed,quis). Without it
    /// the data file is regenerated from the sources.
    #[arg(long)]
    pub tag: Option<String>,

    /// Mirror logs on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn data_path(&self, config: &TagledgerConfig) -> PathBuf {
        self.data
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.data_path))
    }
}

/// Split a `--tag` value on commas. An empty value means "no requirement".
pub fn parse_tags(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(str::to_string).collect()
}

/// Fetch from the configured sources and replace the data file.
pub fn generate(orch: &Orchestrator, config: &TagledgerConfig, path: &Path) -> Result<usize> {
    let records = orch
        .fetch_all(config.sources.as_slice())
        .context("Failed to fetch user records")?;
    orch.store_all(&records, path)
        .with_context(|| format!("Failed to store user records to {}", path.display()))?;
    Ok(records.len())
}

/// Search, regenerating the data file once if it does not exist yet.
pub fn search_or_generate(
    orch: &Orchestrator,
    config: &TagledgerConfig,
    tags: &[String],
    path: &Path,
) -> Result<Vec<UserRecord>> {
    match orch.search(tags, path) {
        Err(err) if err.is_missing_file() => {
            info!("{} not found, generating it before searching", path.display());
            generate(orch, config, path)?;
            orch.search(tags, path)
                .with_context(|| format!("Failed to search {}", path.display()))
        }
        other => other.with_context(|| format!("Failed to search {}", path.display())),
    }
}

/// Run the parsed command against an already-built orchestrator.
pub fn run(
    cli: &Cli,
    config: &TagledgerConfig,
    orch: &Orchestrator,
    out: &mut dyn Write,
) -> Result<()> {
    let path = cli.data_path(config);

    let Some(raw_tags) = cli.tag.as_deref() else {
        let count = generate(orch, config, &path)?;
        writeln!(out, "Stored {} records to {}.", count, path.display())?;
        writeln!(
            out,
            "To search data, please use --tag\n e.g. --tag=sed,quis"
        )?;
        return Ok(());
    };

    let tags = parse_tags(raw_tags);
    let records = search_or_generate(orch, config, &tags, &path)?;
    for record in &records {
        writeln!(out, "ID: {}, Balance: {}", record.id, record.balance)?;
    }
    Ok(())
}
