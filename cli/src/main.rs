//! # convpage CLI
//!
//! Command-line interface for convpage - renders converter landing pages
//! from a `preview.json` payload.
//!
//! ## Usage
//!
//! - `convpage` - Render the page with discovered configuration
//! - `convpage render --stdout` - Render to stdout
//! - `convpage validate` - Check the preview payload and list every problem

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

use commands::{render_command, validate_command, RenderOptions};
use config::CliConfigLoader;

/// convpage - converter landing page renderer
#[derive(Parser)]
#[command(name = "convpage")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Render converter landing pages from preview.json")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file or directory path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Preview location (file path, URL, or env:VAR)
    #[arg(long, global = true)]
    source: Option<String>,

    /// Base URL relative preview locations are joined onto
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Output page path
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// How preview HTML fragments are treated (sanitize, trust, escape)
    #[arg(long, global = true)]
    html_policy: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the landing page (default)
    Render {
        /// Exit with an error status when the error page was produced
        #[arg(long)]
        fail_on_error: bool,

        /// Write the page to stdout instead of the output file
        #[arg(long)]
        stdout: bool,
    },

    /// Validate the preview payload without rendering
    Validate,
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> CliConfigLoader {
    let mut loader = CliConfigLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(config_path.clone());
    }

    if let Some(source) = &cli.source {
        loader = loader.with_source_override(source.clone());
    }

    if let Some(base_url) = &cli.base_url {
        loader = loader.with_base_url_override(base_url.clone());
    }

    if let Some(output) = &cli.output {
        loader = loader.with_output_override(output.clone());
    }

    if let Some(policy) = &cli.html_policy {
        loader = loader.with_html_policy_override(policy.clone());
    }

    loader
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    convpage_core::init_tracing(cli.verbose, cli.json_logs);

    let config_loader = build_config_loader(&cli);

    match cli.command {
        None => render_command(config_loader, RenderOptions::default()).await,
        Some(Commands::Render {
            fail_on_error,
            stdout,
        }) => {
            render_command(
                config_loader,
                RenderOptions {
                    fail_on_error,
                    stdout,
                },
            )
            .await
        }
        Some(Commands::Validate) => validate_command(config_loader).await,
    }
}
