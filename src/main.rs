use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use bounty_watch::config::{Config, ConfigOverrides};
use bounty_watch::directory::HackeroneDirectory;
use bounty_watch::monitor::{run_cycle, run_watch_loop, CycleOutcome};
use bounty_watch::notify::{FileSink, ReportSink, StdoutSink, WebhookSink};
use bounty_watch::report::render_snapshot_summary;
use bounty_watch::snapshot::SnapshotStore;
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "bounty-watch", about = "HackerOne program and scope monitor")]
struct Cli {
    /// Path to the config file (defaults to ~/.config/bounty-watch/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Cache directory for the baseline snapshot and notification log
    #[arg(long, global = true)]
    cache_dir: Option<String>,

    /// Dataset URL to fetch instead of the configured one
    #[arg(long, global = true)]
    url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one check cycle and exit
    Check,
    /// Run one immediate check, then keep checking at a fixed interval
    Watch {
        /// Seconds between checks (overrides the configured interval)
        #[arg(long)]
        interval_secs: Option<u64>,
    },
    /// Print a summary of the cached baseline snapshot
    Snapshot,
    /// Manage the TOML config file
    Config {
        /// Write the config template to the config path
        #[arg(long)]
        init: bool,
        /// Print the effective configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        url: cli.url.clone(),
        cache_dir: cli.cache_dir.clone(),
    });

    if let Commands::Config { init, show } = &cli.command {
        if *init {
            Config::write_template(&config_path)?;
            println!("Wrote config template to {}", config_path.display());
        }
        if *show || !*init {
            println!("{}", toml::to_string_pretty(&config)?);
        }
        return Ok(());
    }

    let cache_dir = config.resolved_cache_dir();
    let store = SnapshotStore::open(&cache_dir)
        .with_context(|| format!("failed opening cache directory: {}", cache_dir.display()))?;

    if let Commands::Snapshot = &cli.command {
        let baseline = store.load_previous().with_context(|| {
            format!("no cached snapshot yet; run `check` first ({})", cache_dir.display())
        })?;
        print!("{}", render_snapshot_summary(&baseline));
        return Ok(());
    }

    let directory = HackeroneDirectory::new(config.source.url.clone());
    let sinks = build_sinks(&config, &cache_dir);

    match &cli.command {
        Commands::Check => {
            let outcome = run_cycle(&directory, &store, &sinks).await?;
            match outcome {
                CycleOutcome::Baseline => info!("baseline captured; next check will diff"),
                CycleOutcome::NoChanges => info!("no changes since the last check"),
                CycleOutcome::Reported {
                    new_programs,
                    updated_programs,
                } => info!(new_programs, updated_programs, "changes reported"),
            }
        }
        Commands::Watch { interval_secs } => {
            let interval =
                Duration::from_secs(interval_secs.unwrap_or(config.monitor.interval_secs).max(1));
            info!(interval_secs = interval.as_secs(), "starting watch loop");
            run_watch_loop(&directory, &store, &sinks, interval).await;
        }
        Commands::Snapshot | Commands::Config { .. } => unreachable!("handled before dispatch"),
    }

    Ok(())
}

fn build_sinks(config: &Config, cache_dir: &std::path::Path) -> Vec<Box<dyn ReportSink>> {
    let mut sinks: Vec<Box<dyn ReportSink>> = Vec::new();
    if config.notify.enable_stdout {
        sinks.push(Box::new(StdoutSink));
    }
    if config.notify.enable_file_log {
        sinks.push(Box::new(FileSink::in_cache_dir(cache_dir)));
    }
    if !config.notify.webhook_url.trim().is_empty() {
        sinks.push(Box::new(WebhookSink::new(config.notify.webhook_url.clone())));
    }
    sinks
}
