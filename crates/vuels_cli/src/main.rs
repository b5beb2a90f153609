//! vuels CLI
//!
//! Vue language server written in Rust.

mod cli;
mod commands;
mod utils;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::{run_lsp, run_plugins};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the LSP channel.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Lsp { hybrid, ts_host } => run_lsp(*hybrid, ts_host.as_deref()),
        Commands::Plugins { hybrid } => run_plugins(*hybrid),
    }
}
