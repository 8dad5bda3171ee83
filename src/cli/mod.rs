pub mod create;
pub mod versions;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "docsnap",
    about = "Create immutable versioned snapshots of a documentation site",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Freeze the current docs and static assets as a new version
    Create(create::CreateArgs),

    /// List the versions recorded by past runs
    Versions(versions::VersionsArgs),
}
