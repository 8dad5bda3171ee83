use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::config::SitePaths;
use crate::error::{Result, SnapError};
use crate::fsops;
use crate::rewrite::rewrite_links;

/// Name of the staging subdirectory holding the live copy of an asset type.
pub const NEXT_DIR: &str = "next";

/// Where a planned link rewrite applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteTarget {
    /// The live docs tree.
    LiveDocs,
    /// The docs snapshot for the version being created.
    VersionedDocs,
}

/// One literal fragment substitution to run over a docs tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRewrite {
    pub target: RewriteTarget,
    pub pattern: String,
    pub replacement: String,
}

impl PlannedRewrite {
    fn new(target: RewriteTarget, pattern: String, replacement: String) -> Self {
        Self {
            target,
            pattern,
            replacement,
        }
    }
}

/// Snapshot each configured static asset type for `version`.
///
/// The first snapshot of an asset type moves its live files into a `next`
/// staging subdirectory; from then on `next` is the only mutable copy and
/// every `<type>/<version>` sibling is frozen. Which link rewrites the docs
/// trees need depends on whether the site has been versioned before and on
/// whether this asset type is already staged, so those two facts are
/// computed up front and drive the plan.
pub fn version_static_assets(
    paths: &SitePaths,
    asset_types: &[String],
    version: &str,
    site_versioned_before: bool,
) -> Result<()> {
    for asset_type in asset_types {
        let type_dir = paths.static_dir.join(asset_type);
        let next_dir = type_dir.join(NEXT_DIR);
        let staged = next_dir.is_dir();

        if !staged {
            tracing::debug!("Staging static/{asset_type} into {NEXT_DIR}/");
            fsops::copy_tree(&type_dir, &next_dir)?;
            fsops::clean_dir(&type_dir, &[NEXT_DIR])?;
        }

        for rewrite in plan_rewrites(asset_type, version, site_versioned_before, staged) {
            let base = match rewrite.target {
                RewriteTarget::LiveDocs => paths.docs.clone(),
                RewriteTarget::VersionedDocs => paths.versioned_docs_for(version),
            };
            let count = rewrite_links(&base, &rewrite.pattern, &rewrite.replacement)?;
            tracing::debug!(
                "Rewrote {count} file(s) under {}: {} -> {}",
                base.display(),
                rewrite.pattern,
                rewrite.replacement
            );
        }

        fsops::copy_tree(&next_dir, &type_dir.join(version))?;
    }
    Ok(())
}

/// Decide which link rewrites one asset type needs for this snapshot.
fn plan_rewrites(
    asset_type: &str,
    version: &str,
    site_versioned_before: bool,
    staged: bool,
) -> Vec<PlannedRewrite> {
    if staged {
        // Staged links are already one level deeper, so only the freshly
        // created docs snapshot needs pinning to the new version.
        return vec![PlannedRewrite::new(
            RewriteTarget::VersionedDocs,
            format!("../../{asset_type}/{NEXT_DIR}/"),
            format!("../{asset_type}/{version}/"),
        )];
    }
    if site_versioned_before {
        vec![
            PlannedRewrite::new(
                RewriteTarget::LiveDocs,
                format!("../{asset_type}/"),
                format!("../{asset_type}/{NEXT_DIR}/"),
            ),
            PlannedRewrite::new(
                RewriteTarget::VersionedDocs,
                format!("../../{asset_type}/"),
                format!("../{asset_type}/{version}/"),
            ),
        ]
    } else {
        vec![
            PlannedRewrite::new(
                RewriteTarget::LiveDocs,
                format!("../{asset_type}/"),
                format!("../../{asset_type}/{NEXT_DIR}/"),
            ),
            PlannedRewrite::new(
                RewriteTarget::VersionedDocs,
                format!("../{asset_type}/"),
                format!("../{asset_type}/{version}/"),
            ),
        ]
    }
}

/// Freeze the top-level files of `docs/assets` into `docs/assets/version-<v>`.
///
/// Only plain files are copied; per-version subdirectories created by
/// earlier snapshots stay where they are. A site without a docs assets
/// directory has nothing to freeze.
pub fn copy_doc_assets(docs: &Path, version: &str) -> Result<()> {
    let assets_dir = docs.join("assets");
    if !assets_dir.is_dir() {
        return Ok(());
    }
    let dest = assets_dir.join(format!("version-{version}"));
    if let Err(e) = fs::create_dir(&dest) {
        if e.kind() == ErrorKind::AlreadyExists {
            return Err(SnapError::TargetExists { path: dest });
        }
        return Err(e.into());
    }
    for entry in fs::read_dir(&assets_dir)? {
        let entry = entry?;
        let source = entry.path();
        if !source.is_file() {
            continue;
        }
        if let Err(e) = fs::copy(&source, dest.join(entry.file_name())) {
            tracing::warn!("Failed to copy {}: {e}", source.display());
        }
    }
    Ok(())
}
