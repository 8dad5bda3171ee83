pub mod defaults;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SnapError};

/// Site-level configuration, read from an optional `docsnap.toml` in the
/// site directory. Every field defaults to the conventional layout of the
/// underlying site generator, so most sites need no config file at all.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Docs tree location, resolved against the site directory. The docs
    /// tree conventionally sits beside the site directory.
    #[serde(default = "defaults::docs_dir")]
    pub docs_dir: String,

    /// Root containing one subdirectory per static asset type.
    #[serde(default = "defaults::static_dir")]
    pub static_dir: String,

    /// Root containing one `version-<label>` subdirectory per frozen version.
    #[serde(default = "defaults::versioned_docs_dir")]
    pub versioned_docs_dir: String,

    /// Directory holding the per-version sidebar files.
    #[serde(default = "defaults::versioned_sidebars_dir")]
    pub versioned_sidebars_dir: String,

    /// External command that creates the versioned docs copy. The version
    /// label is appended as the final argument and the command runs with
    /// the site directory as its working directory.
    #[serde(default = "defaults::version_command")]
    pub version_command: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            docs_dir: defaults::docs_dir(),
            static_dir: defaults::static_dir(),
            versioned_docs_dir: defaults::versioned_docs_dir(),
            versioned_sidebars_dir: defaults::versioned_sidebars_dir(),
            version_command: defaults::version_command(),
        }
    }
}

impl SiteConfig {
    /// Load config from `docsnap.toml` in the site directory. A missing
    /// file means all defaults.
    pub fn load(site_dir: &Path) -> Result<Self> {
        let path = site_dir.join("docsnap.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path)?;
        toml::from_str(&contents).map_err(|e| SnapError::ConfigInvalid {
            message: e.to_string(),
        })
    }

    /// Resolve all site paths relative to the site directory.
    pub fn resolve_paths(&self, site_dir: &Path) -> SitePaths {
        SitePaths {
            site_dir: site_dir.to_path_buf(),
            docs: site_dir.join(&self.docs_dir),
            static_dir: site_dir.join(&self.static_dir),
            versioned_docs: site_dir.join(&self.versioned_docs_dir),
            versioned_sidebars: site_dir.join(&self.versioned_sidebars_dir),
            sidebars: site_dir.join("sidebars.json"),
            versions_file: site_dir.join("versions.json"),
            versions_js: site_dir.join("pages").join("en").join("versions.js"),
        }
    }
}

/// Resolved paths for the site directories and well-known files.
#[derive(Debug, Clone)]
pub struct SitePaths {
    pub site_dir: PathBuf,
    pub docs: PathBuf,
    pub static_dir: PathBuf,
    pub versioned_docs: PathBuf,
    pub versioned_sidebars: PathBuf,
    pub sidebars: PathBuf,
    pub versions_file: PathBuf,
    pub versions_js: PathBuf,
}

impl SitePaths {
    /// The versioned docs subtree for one version label.
    pub fn versioned_docs_for(&self, version: &str) -> PathBuf {
        self.versioned_docs.join(format!("version-{version}"))
    }
}

/// Everything the versioning pipeline needs to know about a site: resolved
/// paths, the versions recorded by past runs, and the external command that
/// creates the versioned docs copy.
#[derive(Debug, Clone)]
pub struct SiteProps {
    pub paths: SitePaths,
    pub past_versions: Vec<String>,
    pub version_command: String,
}

impl SiteProps {
    pub fn load(site_dir: &Path) -> Result<Self> {
        if !site_dir.is_dir() {
            return Err(SnapError::NotFound {
                path: site_dir.to_path_buf(),
            });
        }
        let config = SiteConfig::load(site_dir)?;
        let paths = config.resolve_paths(site_dir);
        let past_versions = read_past_versions(&paths.versions_file)?;
        Ok(Self {
            paths,
            past_versions,
            version_command: config.version_command,
        })
    }
}

/// Read the list of recorded versions. A site that has never been versioned
/// has no versions.json yet; that reads as an empty list.
fn read_past_versions(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = std::fs::read_to_string(path)?;
    let versions: Vec<String> = serde_json::from_str(&raw)?;
    Ok(versions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = SiteConfig::load(tmp.path()).unwrap();
        assert_eq!(config.static_dir, "static");
        assert_eq!(config.docs_dir, "../docs");
        assert_eq!(config.version_command, "yarn run version");
    }

    #[test]
    fn test_load_config_overrides() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("docsnap.toml"),
            "docs_dir = \"documentation\"\nversion_command = \"npm run version\"\n",
        )
        .unwrap();
        let config = SiteConfig::load(tmp.path()).unwrap();
        assert_eq!(config.docs_dir, "documentation");
        assert_eq!(config.version_command, "npm run version");
        // untouched fields keep their defaults
        assert_eq!(config.versioned_docs_dir, "versioned_docs");
    }

    #[test]
    fn test_load_config_rejects_unknown_fields() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("docsnap.toml"), "no_such_field = 1\n").unwrap();
        assert!(matches!(
            SiteConfig::load(tmp.path()),
            Err(SnapError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn test_site_props_reads_past_versions() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("versions.json"), r#"["1.0.0", "1.1.0"]"#).unwrap();
        let props = SiteProps::load(tmp.path()).unwrap();
        assert_eq!(props.past_versions, vec!["1.0.0", "1.1.0"]);
    }

    #[test]
    fn test_site_props_missing_versions_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let props = SiteProps::load(tmp.path()).unwrap();
        assert!(props.past_versions.is_empty());
    }

    #[test]
    fn test_site_props_missing_site_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert!(matches!(
            SiteProps::load(&missing),
            Err(SnapError::NotFound { .. })
        ));
    }

    #[test]
    fn test_resolved_paths() {
        let config = SiteConfig::default();
        let paths = config.resolve_paths(Path::new("/site/website"));
        assert_eq!(paths.docs, Path::new("/site/website/../docs"));
        assert_eq!(paths.static_dir, Path::new("/site/website/static"));
        assert_eq!(
            paths.versioned_docs_for("1.0.x"),
            Path::new("/site/website/versioned_docs/version-1.0.x")
        );
    }
}
