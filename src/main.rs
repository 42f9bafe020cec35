mod chunking;
mod cli;
mod commands;
mod config;
mod error;
mod extract;
mod mcp;
mod naming;
mod page_range;
mod pdf;

use anyhow::{anyhow, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::{JobFile, SplitConfig};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.log_level.as_deref()) {
        eprintln!("Error: {:#}", err);
    }

    if let Err(err) = run(cli).await {
        let code = error::exit_code_for(&err);
        if tracing::enabled!(tracing::Level::ERROR) {
            error!(exit_code = code, "{:#}", err);
        } else {
            eprintln!("Error: {:#}", err);
        }
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = SplitConfig::from(&cli.paths);
    let job = JobFile::load_optional(cli.job.as_deref())?;

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Ranges {
            ranges,
            name_template,
        } => {
            let settings = job.range_settings(ranges.as_deref(), name_template.as_deref())?;
            commands::ranges::run(&config, &settings)?;
        }
        Commands::Chunks {
            pages_per_chunk,
            filenames,
            tool,
            tool_path,
        } => {
            let settings = job.chunk_settings(
                pages_per_chunk,
                &filenames,
                tool.as_deref(),
                tool_path.as_deref(),
            )?;
            commands::chunks::run(&config, &settings)?;
        }
        Commands::Plan { pages_per_chunk } => {
            let pages_per_chunk = job.pages_per_chunk(pages_per_chunk)?;
            commands::plan::run(&config, pages_per_chunk)?;
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout carries progress lines, JSON and the MCP transport.
fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))
}
