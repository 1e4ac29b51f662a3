//! repolens - browse GitHub repositories without cloning
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use repolens::cli::commands;
use repolens::cli::{Cli, Commands};
use repolens::config::{Config, ConfigManager};
use repolens::error::LensResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> LensResult<()> {
    let cli = Cli::parse();

    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = manager.load().await?;

    init_logging(cli.verbose, &config);
    repolens::ui::init_theme();
    debug!("Loaded configuration from {}", manager.path().display());

    let data_dir = ConfigManager::data_dir(&config, cli.data_dir.as_deref());
    let mut github = config.github.clone();
    if let Some(token) = cli.token.filter(|t| !t.is_empty()) {
        github.token = Some(token);
    }

    let command = cli.command;
    if let Commands::Config(args) = command {
        return commands::config(args, &manager, &config).await;
    }

    let service = commands::open_service(&data_dir, github, config.network.clone()).await?;

    match command {
        Commands::Import(args) => commands::import(args, &service).await,
        Commands::Update(args) => commands::update(args, &service).await,
        Commands::List(args) => commands::list(args, &service).await,
        Commands::Info(args) => commands::info(args, &service).await,
        Commands::Tree(args) => commands::tree(args, &service).await,
        Commands::Cat(args) => commands::cat(args, &service).await,
        Commands::Rm(args) => commands::rm(args, &service).await,
        Commands::Path(args) => commands::path(args, &service).await,
        Commands::Config(_) => unreachable!("Config handled above"),
    }
}

/// 0 = warn (spinners only), 1 = info, 2+ = debug; logs go to stderr
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("repolens=warn"),
        1 => EnvFilter::new("repolens=info"),
        _ => EnvFilter::new("repolens=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
