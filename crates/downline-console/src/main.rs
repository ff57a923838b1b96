use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use downline_console::config::ConsoleConfig;
use downline_console::dashboard;

#[derive(Parser, Debug)]
#[command(
    name = "downline",
    about = "Terminal dashboard for a binary-placement referral team",
    version
)]
struct Cli {
    /// Roster JSON file; the built-in sample organization is used when
    /// omitted.
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Config file path (defaults to the platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file path (overrides the config).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = ConsoleConfig::load(cli.config.as_deref())?;
    if let Some(log_file) = cli.log_file {
        config.log_file = Some(log_file);
    }
    init_logging(config.log_file.clone())?;

    let tree = match &cli.roster {
        Some(path) => downline_model::read_roster(path)
            .with_context(|| format!("loading roster {}", path.display()))?,
        None => downline_model::sample_tree(),
    };
    tracing::info!(members = tree.len(), "organization loaded");

    dashboard::run_dashboard(tree, &config)
}

/// Route tracing output to a file; the TUI owns the terminal.
fn init_logging(path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = match path {
        Some(p) => p,
        None => match dirs::data_dir() {
            Some(dir) => dir.join("downline").join("console.log"),
            // Nowhere sensible to log; run without a subscriber.
            None => return Ok(()),
        },
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = std::fs::File::create(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
