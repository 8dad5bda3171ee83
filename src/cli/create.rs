use std::path::PathBuf;

use clap::Args;

use crate::output::human;
use crate::version;

#[derive(Args)]
#[command(disable_version_flag = true)]
pub struct CreateArgs {
    /// Version label for the snapshot (e.g. 1.0.0)
    pub version: String,

    /// Site directory containing the generator's config and pages
    #[arg(short, long, default_value = ".")]
    pub site_dir: PathBuf,

    /// Static asset type to snapshot (repeat for several, e.g. --asset-type img)
    #[arg(long = "asset-type", value_name = "NAME")]
    pub asset_types: Vec<String>,
}

pub fn run(args: &CreateArgs) -> anyhow::Result<()> {
    version::create(&args.version, &args.site_dir, &args.asset_types)?;
    human::success(&format!("Created version {}", args.version));
    Ok(())
}
