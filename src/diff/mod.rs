use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use walkdir::WalkDir;

use crate::error::{Result, SnapError};

/// Sentinel appended to every document before the external version command
/// runs. Some site generators skip copying files they consider unchanged
/// since the last snapshot; the sentinel guarantees every file differs.
/// The exact text is shared with earlier tooling, so sites carrying stale
/// sentinels from interrupted runs still get cleaned up.
pub const DIFF_COMMENT: &str =
    "<!---This is a comment added by snapshot versioning script as a workaround for document versioning>";

/// Throwaway sidebar key serving the same purpose for sidebars.json.
const SIDEBAR_KEY: &str = "toBeDeleted";

/// Append the sentinel comment to every markdown file under `dir`.
pub fn insert_file_diff(dir: &Path) -> Result<()> {
    for_each_markdown(dir, |contents| {
        let mut updated = contents.to_string();
        updated.push_str(DIFF_COMMENT);
        Some(updated)
    })
}

/// Strip the sentinel comment from every markdown file under `dir` that
/// carries one. Files without the sentinel are left alone.
pub fn clean_file_diff(dir: &Path) -> Result<()> {
    for_each_markdown(dir, |contents| {
        contents.strip_suffix(DIFF_COMMENT).map(str::to_string)
    })
}

fn for_each_markdown<F>(dir: &Path, edit: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "md") {
            continue;
        }
        let contents = fs::read_to_string(path)?;
        if let Some(updated) = edit(&contents) {
            fs::write(path, updated)?;
        }
    }
    Ok(())
}

/// Add the throwaway key to `sidebars.json`. A site without a sidebars
/// file has nothing to patch.
pub fn insert_sidebar_diff(sidebars: &Path) -> Result<()> {
    if !sidebars.exists() {
        tracing::debug!("No sidebars file at {}", sidebars.display());
        return Ok(());
    }
    edit_sidebar_file(sidebars, |map| {
        map.insert(SIDEBAR_KEY.to_string(), Value::Object(Map::new()));
        true
    })
}

/// Remove the throwaway key from `sidebars.json` again.
pub fn clean_sidebar_diff(sidebars: &Path) -> Result<()> {
    if !sidebars.exists() {
        return Ok(());
    }
    edit_sidebar_file(sidebars, |map| map.remove(SIDEBAR_KEY).is_some())
}

/// Remove the prefixed throwaway key the external command copied into the
/// frozen sidebar file for `version`.
pub fn clean_versioned_sidebar_diff(versioned_sidebars: &Path, version: &str) -> Result<()> {
    let path = versioned_sidebars.join(format!("version-{version}-sidebars.json"));
    if !path.exists() {
        tracing::debug!("No versioned sidebars file at {}", path.display());
        return Ok(());
    }
    let key = format!("version-{version}-{SIDEBAR_KEY}");
    edit_sidebar_file(&path, |map| map.remove(&key).is_some())
}

fn edit_sidebar_file<F>(path: &Path, edit: F) -> Result<()>
where
    F: FnOnce(&mut Map<String, Value>) -> bool,
{
    let raw = fs::read_to_string(path)?;
    let mut value: Value = serde_json::from_str(&raw).map_err(|e| SnapError::Sidebar {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let map = value.as_object_mut().ok_or_else(|| SnapError::Sidebar {
        path: path.to_path_buf(),
        message: "expected a top-level JSON object".to_string(),
    })?;
    if edit(map) {
        fs::write(path, serde_json::to_string_pretty(&value)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_diff_round_trip() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), "# Title\n").unwrap();
        fs::write(tmp.path().join("b.txt"), "not markdown").unwrap();

        insert_file_diff(tmp.path()).unwrap();
        let patched = fs::read_to_string(tmp.path().join("a.md")).unwrap();
        assert_eq!(patched, format!("# Title\n{DIFF_COMMENT}"));
        assert_eq!(
            fs::read_to_string(tmp.path().join("b.txt")).unwrap(),
            "not markdown"
        );

        clean_file_diff(tmp.path()).unwrap();
        assert_eq!(
            fs::read_to_string(tmp.path().join("a.md")).unwrap(),
            "# Title\n"
        );
    }

    #[test]
    fn test_clean_file_diff_leaves_unmarked_files() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), "# Untouched\n").unwrap();
        clean_file_diff(tmp.path()).unwrap();
        assert_eq!(
            fs::read_to_string(tmp.path().join("a.md")).unwrap(),
            "# Untouched\n"
        );
    }

    #[test]
    fn test_sidebar_diff_round_trip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let sidebars = tmp.path().join("sidebars.json");
        fs::write(&sidebars, r#"{"docs": {"Guides": ["overview"]}}"#).unwrap();

        insert_sidebar_diff(&sidebars).unwrap();
        let patched: Value =
            serde_json::from_str(&fs::read_to_string(&sidebars).unwrap()).unwrap();
        assert!(patched.get("toBeDeleted").is_some());
        assert!(patched.get("docs").is_some());

        clean_sidebar_diff(&sidebars).unwrap();
        let cleaned: Value =
            serde_json::from_str(&fs::read_to_string(&sidebars).unwrap()).unwrap();
        assert!(cleaned.get("toBeDeleted").is_none());
        assert!(cleaned.get("docs").is_some());
    }

    #[test]
    fn test_missing_sidebars_file_is_noop() {
        let tmp = tempfile::TempDir::new().unwrap();
        let sidebars = tmp.path().join("sidebars.json");
        insert_sidebar_diff(&sidebars).unwrap();
        clean_sidebar_diff(&sidebars).unwrap();
        assert!(!sidebars.exists());
    }

    #[test]
    fn test_invalid_sidebars_json_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let sidebars = tmp.path().join("sidebars.json");
        fs::write(&sidebars, "not json").unwrap();
        assert!(matches!(
            insert_sidebar_diff(&sidebars),
            Err(SnapError::Sidebar { .. })
        ));
    }

    #[test]
    fn test_clean_versioned_sidebar_diff() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("version-1.0.0-sidebars.json");
        fs::write(
            &path,
            r#"{"version-1.0.0-docs": {}, "version-1.0.0-toBeDeleted": {}}"#,
        )
        .unwrap();
        clean_versioned_sidebar_diff(tmp.path(), "1.0.0").unwrap();
        let cleaned: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(cleaned.get("version-1.0.0-toBeDeleted").is_none());
        assert!(cleaned.get("version-1.0.0-docs").is_some());
    }
}
