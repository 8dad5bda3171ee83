use std::path::PathBuf;

use clap::Args;

use crate::config::SiteProps;
use crate::output::human;

#[derive(Args)]
pub struct VersionsArgs {
    /// Site directory containing the generator's config and pages
    #[arg(short, long, default_value = ".")]
    pub site_dir: PathBuf,
}

pub fn run(args: &VersionsArgs) -> anyhow::Result<()> {
    let props = SiteProps::load(&args.site_dir)?;
    if props.past_versions.is_empty() {
        human::info("No versions recorded");
        return Ok(());
    }
    for version in &props.past_versions {
        println!("{version}");
    }
    Ok(())
}
