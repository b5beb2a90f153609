//! CLI argument definitions

use clap::{Parser, Subcommand};

/// vuels - Vue language server
#[derive(Parser)]
#[command(name = "vuels")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the LSP server on stdio
    Lsp {
        /// Serve semantic features from the TypeScript host process
        #[arg(long, requires = "ts_host")]
        hybrid: bool,

        /// Address of the TypeScript host process (e.g. 127.0.0.1:6009)
        #[arg(long, value_name = "ADDR")]
        ts_host: Option<String>,
    },

    /// Print the composed plugin names in order
    Plugins {
        /// Compose for hybrid mode
        #[arg(long)]
        hybrid: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_hybrid_requires_ts_host() {
        assert!(Cli::try_parse_from(["vuels", "lsp", "--hybrid"]).is_err());
        let cli = Cli::try_parse_from(["vuels", "lsp", "--hybrid", "--ts-host", "127.0.0.1:1"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Lsp { hybrid: true, .. }));
    }
}
