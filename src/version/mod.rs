use std::path::Path;
use std::process::Command;

use crate::assets;
use crate::config::SiteProps;
use crate::diff;
use crate::error::{Result, SnapError};
use crate::linker;

/// Create one immutable snapshot of the site's docs and static assets.
///
/// The pipeline wraps the site generator's own version command: sentinels
/// go in first so the command copies every file, the command freezes the
/// docs tree, then the sentinels come back out and the snapshot's asset
/// and document links are pinned to their frozen copies.
pub fn create(version: &str, site_dir: &Path, asset_types: &[String]) -> Result<()> {
    let props = SiteProps::load(site_dir)?;
    validate(version, &props, asset_types)?;

    let paths = &props.paths;
    let snapshot = paths.versioned_docs_for(version);
    let site_versioned_before = !props.past_versions.is_empty();

    diff::insert_file_diff(&paths.docs)?;
    diff::insert_sidebar_diff(&paths.sidebars)?;

    // The live tree must be restored even when the command fails, so the
    // cleanup runs before the command's result is inspected.
    let command = run_version_command(&props.version_command, site_dir, version);
    diff::clean_file_diff(&paths.docs)?;
    diff::clean_sidebar_diff(&paths.sidebars)?;
    command?;

    if !snapshot.is_dir() {
        return Err(SnapError::VersionCommand(format!(
            "'{}' did not create {}",
            props.version_command,
            snapshot.display()
        )));
    }
    diff::clean_file_diff(&snapshot)?;
    diff::clean_versioned_sidebar_diff(&paths.versioned_sidebars, version)?;

    assets::copy_doc_assets(&paths.docs, version)?;
    assets::version_static_assets(paths, asset_types, version, site_versioned_before)?;
    linker::link_assets_and_markdown_files(&snapshot, version)?;

    tracing::info!("Created snapshot version-{version}");
    Ok(())
}

/// Reject requests the pipeline cannot honor before touching anything.
fn validate(version: &str, props: &SiteProps, asset_types: &[String]) -> Result<()> {
    if !props.paths.versions_js.exists() {
        return Err(SnapError::NotFound {
            path: props.paths.versions_js.clone(),
        });
    }
    if version.is_empty() {
        return Err(SnapError::InvalidVersion {
            message: "version label must not be empty".to_string(),
        });
    }
    if version.contains('/') {
        return Err(SnapError::InvalidVersion {
            message: format!("version label '{version}' must not contain '/'"),
        });
    }
    if props.past_versions.iter().any(|v| v == version) {
        return Err(SnapError::VersionExists(version.to_string()));
    }
    for asset_type in asset_types {
        let dir = props.paths.static_dir.join(asset_type);
        if !dir.is_dir() {
            return Err(SnapError::NotFound { path: dir });
        }
    }
    Ok(())
}

/// Run the site generator's version command with the version label appended
/// as its final argument, from the site directory.
fn run_version_command(command: &str, site_dir: &Path, version: &str) -> Result<()> {
    let mut parts = command.split_whitespace();
    let program = parts.next().ok_or_else(|| {
        SnapError::VersionCommand("version command must not be empty".to_string())
    })?;

    tracing::debug!("Running '{command} {version}' in {}", site_dir.display());
    let output = Command::new(program)
        .args(parts)
        .arg(version)
        .current_dir(site_dir)
        .output()
        .map_err(|e| SnapError::VersionCommand(format!("failed to run '{command}': {e}")))?;

    if !output.status.success() {
        return Err(SnapError::VersionCommand(format!(
            "'{command} {version}' failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(())
}
