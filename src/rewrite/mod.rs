use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::Result;

/// Walk every file under `base` and replace all occurrences of the literal
/// path fragment `pattern` with `replacement`. Returns how many files were
/// rewritten.
///
/// Files that already lack the fragment are left untouched, so unmodified
/// files keep their timestamps. Binary files (anything that is not valid
/// UTF-8) are skipped.
pub fn rewrite_links(base: &Path, pattern: &str, replacement: &str) -> Result<usize> {
    let mut rewritten = 0;
    for entry in WalkDir::new(base) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                tracing::debug!("Skipping non-text file {}", path.display());
                continue;
            }
            Err(e) => {
                tracing::warn!("Failed to read {}: {e}", path.display());
                continue;
            }
        };
        if !contents.contains(pattern) {
            continue;
        }
        let updated = contents.replace(pattern, replacement);
        if let Err(e) = fs::write(path, updated) {
            tracing::warn!("Failed to write {}: {e}", path.display());
            continue;
        }
        rewritten += 1;
    }
    Ok(rewritten)
}
