use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use docsnap::cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Command::Create(args) => docsnap::cli::create::run(args)?,
        Command::Versions(args) => docsnap::cli::versions::run(args)?,
    }

    Ok(())
}
