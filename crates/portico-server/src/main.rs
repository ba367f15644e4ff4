use anyhow::Context;
use clap::Parser;
use portico_config::PorticoConfig;

mod cli;
mod commands;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("portico error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = PorticoConfig::load_with_dotenv(cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command {
        cli::Commands::Serve { host, port } => commands::serve::handle(config, host, port).await,
        cli::Commands::Classify { path } => commands::classify::handle(&config, &path),
        cli::Commands::Config => commands::config::handle(&config),
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("PORTICO_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
