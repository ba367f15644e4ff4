use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for the `portico` binary.
#[derive(Debug, Parser)]
#[command(
    name = "portico",
    version,
    about = "Portico - organization-aware access gate and Clerk webhook sync"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Extra TOML config file, layered over portico.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the gate and webhook endpoint
    Serve {
        /// Override server.host
        #[arg(long)]
        host: Option<String>,

        /// Override server.port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Show how the gate classifies a path
    Classify {
        /// Request path, e.g. /sign-in/factor-one
        path: String,
    },

    /// Print the effective configuration (secrets masked)
    Config,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_accepts_overrides() {
        let cli = Cli::parse_from(["portico", "serve", "--port", "8080", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Serve { host: None, port: Some(8080) }
        ));
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::parse_from(["portico", "classify", "/billing", "--config", "gate.toml"]);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("gate.toml")));
        assert!(matches!(cli.command, Commands::Classify { path } if path == "/billing"));
    }
}
