use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod alert;
mod browser;
mod cli;
mod config;
mod error;
mod report;
mod runner;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise progress at info, --verbose for debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("omreport=debug")
        } else {
            EnvFilter::new("omreport=info")
        }
    });

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Run(args) => cli::run::execute(args).await,
        Commands::Alert(args) => cli::alert::execute(args),
        Commands::Schema => cli::schema::execute(),
    }
}
