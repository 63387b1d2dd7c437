//! Storefront HTTP server.
//!
//! ```text
//! storefront-server [--config storefront.yaml] [run]
//! storefront-server --config storefront.yaml migrate
//! storefront-server --config storefront.yaml --print-config
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod config;
mod logging;
mod server;

#[derive(Parser, Debug)]
#[command(name = "storefront-server", version, about = "Multi-tenant storefront API server")]
struct Cli {
    /// YAML configuration file; `STOREFRONT__*` variables override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long, global = true)]
    print_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Serve the HTTP API (default)
    Run,
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
        return Ok(());
    }

    logging::init(&cfg.logging)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?cli.config,
        "starting storefront-server"
    );

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => server::run(&cfg).await,
        Command::Migrate => server::migrate(&cfg).await,
    }
}
