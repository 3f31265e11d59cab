//! web-analyzer main entry point
//!
//! This is the command-line interface for the web page analyzer.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use web_analyzer::config::{load_runtime_config, Config};
use web_analyzer::server::{self, AppState};

/// web-analyzer: structural reports for web pages
///
/// Reports a page's title, HTML version, heading counts, internal/external
/// and inaccessible links, and whether it contains a login form.
#[derive(Parser, Debug)]
#[command(name = "web-analyzer")]
#[command(version)]
#[command(about = "Structural reports for web pages", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze one page and print the report as JSON
    Analyze {
        /// Page to analyze
        url: String,
    },

    /// Run the HTTP API
    Serve {
        /// Port to listen on (overrides config and SERVER_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Exit code for a rejected target URL
const EXIT_INVALID_INPUT: u8 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_runtime_config(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(path) = &cli.config {
        tracing::info!("Configuration loaded from: {}", path.display());
    }

    match cli.command {
        Command::Analyze { url } => handle_analyze(&config, &url).await,
        Command::Serve { port } => {
            handle_serve(config, port).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("web_analyzer=info,warn"),
            1 => EnvFilter::new("web_analyzer=debug,info"),
            2 => EnvFilter::new("web_analyzer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Reports go to stdout, so logs stay on stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Validates `raw`, analyzes it and prints the report to stdout
async fn handle_analyze(config: &Config, raw: &str) -> anyhow::Result<ExitCode> {
    let state = AppState::from_config(config).context("Failed to build HTTP client")?;

    let url = match state.validator.validate(raw).await {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("Invalid URL {:?}: {}", raw, e);
            return Ok(ExitCode::from(EXIT_INVALID_INPUT));
        }
    };

    match state.analyzer.analyze(&url).await {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!("Analysis of {} failed: {}", url, e);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Runs the HTTP API until the process is stopped
async fn handle_serve(mut config: Config, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }

    let state = AppState::from_config(&config).context("Failed to build HTTP client")?;
    server::serve(&config.server, state).await?;

    Ok(())
}
