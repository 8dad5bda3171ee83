use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Result, SnapError};

/// Recursively copy a directory tree. The destination must not already
/// exist; snapshots are immutable, so landing on an existing target is
/// always a caller error rather than something to merge over.
///
/// When the destination lies inside the source tree (staging a `next`
/// subdirectory back into its parent, say) the recursion skips it, so the
/// copy never descends into its own output.
///
/// Individual file failures are logged and skipped; one unreadable file
/// should not abort a snapshot that is otherwise fine.
pub fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    if let Err(e) = fs::create_dir(to) {
        if e.kind() == ErrorKind::AlreadyExists {
            return Err(SnapError::TargetExists {
                path: to.to_path_buf(),
            });
        }
        return Err(e.into());
    }
    copy_tree_inner(from, to, to)
}

fn copy_tree_inner(from: &Path, to: &Path, root_dest: &Path) -> Result<()> {
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let source = entry.path();
        let dest = to.join(entry.file_name());
        if source.is_dir() {
            if source.as_path() == root_dest {
                continue;
            }
            fs::create_dir(&dest)?;
            copy_tree_inner(&source, &dest, root_dest)?;
        } else if let Err(e) = fs::copy(&source, &dest) {
            tracing::warn!("Failed to copy {}: {e}", source.display());
        }
    }
    Ok(())
}

/// Remove every entry of `dir` except the names listed in `keep`.
pub fn clean_dir(dir: &Path, keep: &[&str]) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if keep.iter().any(|k| name.to_string_lossy() == *k) {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}
