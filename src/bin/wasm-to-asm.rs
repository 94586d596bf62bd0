use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wasm_to_asm::{Ordering, PatchConfig, PatchTask, DEFAULT_CONFIG_FILE};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Config file (defaults are used when wasm-to-asm.toml is absent)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Remove the artifact without waiting for the loader patches
    #[arg(long, global = true)]
    unordered: bool,

    /// Enables debug mode
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    debug: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Patch the loaders and remove the wasm artifact (the default)
    Run,
    /// Write the default configuration
    Init {
        /// Replace an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

fn default_filter(debug: u8) -> EnvFilter {
    match debug {
        0 => EnvFilter::new("info"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

fn load_config(cli: &Cli) -> Result<PatchConfig> {
    let config = match &cli.config {
        Some(path) => PatchConfig::load(path),
        None => PatchConfig::load_or_default(&PathBuf::from(DEFAULT_CONFIG_FILE)),
    };
    config.context("Could not load configuration")
}

fn init_config(cli: &Cli, force: bool) -> Result<()> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    PatchConfig::default()
        .save(&path, force)
        .map_err(|err| anyhow::anyhow!("{err}"))
        .with_context(|| format!("Could not write {}", path.display()))?;

    eprintln!("Config file created at: {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(cli.debug)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(Command::Init { force }) = cli.command {
        return init_config(&cli, force);
    }

    let config = load_config(&cli)?;
    let mut task = PatchTask::new(config);
    if cli.unordered {
        task = task.with_ordering(Ordering::Unordered);
    }

    let summary = task.run().await?;

    info!(
        "Done: {} file(s) patched, {} replacement(s), {} artifact(s) removed",
        summary.patched.len(),
        summary.replacements(),
        summary.removed.len()
    );

    Ok(())
}
