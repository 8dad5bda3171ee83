use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::Result;

/// Pin asset and document links inside one frozen docs snapshot.
///
/// Walks every markdown file under the snapshot directory and applies two
/// rewrites: image links into `assets/` gain a `version-<v>/` segment so
/// they resolve against the frozen asset copy, and links to `.md` documents
/// become `.html` links so they resolve against the rendered site. Returns
/// how many files were rewritten.
pub fn link_assets_and_markdown_files(snapshot_dir: &Path, version: &str) -> Result<usize> {
    let mut rewritten = 0;
    for entry in WalkDir::new(snapshot_dir) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "md") {
            continue;
        }
        let contents = fs::read_to_string(path)?;
        if let Some(updated) = rewrite_markdown(&contents, version) {
            fs::write(path, updated)?;
            rewritten += 1;
        }
    }
    Ok(rewritten)
}

/// Apply both link rewrites to one document. `None` means nothing matched
/// and the file should be left untouched.
fn rewrite_markdown(contents: &str, version: &str) -> Option<String> {
    match rewrite_asset_links(contents, version) {
        Some(with_assets) => Some(
            rewrite_markdown_links(&with_assets).unwrap_or(with_assets),
        ),
        None => rewrite_markdown_links(contents),
    }
}

/// Insert a `version-<v>/` segment into well-formed image links pointing
/// into `assets/`. A link qualifies only when it has an image label, a
/// filename made of word characters (plus spaces, commas and hyphens) and
/// a purely alphabetic extension. Anything looser is left alone rather
/// than risk mangling prose that merely resembles a link.
fn rewrite_asset_links(contents: &str, version: &str) -> Option<String> {
    const MARKER: &str = "](assets/";
    let bytes = contents.as_bytes();
    let mut out = String::with_capacity(contents.len());
    let mut copied = 0;
    let mut search = 0;
    let mut changed = false;
    while let Some(found) = contents[search..].find(MARKER) {
        let bracket = search + found;
        let slash = bracket + MARKER.len() - 1;
        search = bracket + 1;
        if !has_image_label_ending_at(bytes, bracket) {
            continue;
        }
        if !is_asset_filename_at(bytes, slash + 1) {
            continue;
        }
        out.push_str(&contents[copied..=slash]);
        out.push_str("version-");
        out.push_str(version);
        out.push('/');
        copied = slash + 1;
        search = slash + 1;
        changed = true;
    }
    if !changed {
        return None;
    }
    out.push_str(&contents[copied..]);
    Some(out)
}

/// Walk backwards from the closing `]` at `bracket` looking for a matching
/// `![`. Label characters may be anything except brackets around the label
/// itself, parentheses and quotes; a bare `[` inside the label is fine as
/// long as an image opener appears further left.
fn has_image_label_ending_at(bytes: &[u8], bracket: usize) -> bool {
    let mut k = bracket;
    while k > 0 {
        k -= 1;
        match bytes[k] {
            b']' | b'(' | b')' | b'\'' | b'"' => return false,
            b'[' => {
                if k > 0 && bytes[k - 1] == b'!' {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

/// Check that `pos` starts a filename of the shape `<name>.<ext>)` where
/// the name uses word characters, whitespace, commas or hyphens and the
/// extension is alphabetic.
fn is_asset_filename_at(bytes: &[u8], pos: usize) -> bool {
    let mut i = pos;
    while i < bytes.len() && is_asset_name_byte(bytes[i]) {
        i += 1;
    }
    if i == pos || i >= bytes.len() || bytes[i] != b'.' {
        return false;
    }
    i += 1;
    let ext_start = i;
    while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
        i += 1;
    }
    i > ext_start && i < bytes.len() && bytes[i] == b')'
}

fn is_asset_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b.is_ascii_whitespace() || matches!(b, b'_' | b',' | b'-')
}

/// Turn `.md` targets of well-formed markdown links into `.html` targets.
/// Only the occurrence immediately before a `#` fragment or the closing
/// parenthesis is rewritten.
fn rewrite_markdown_links(contents: &str) -> Option<String> {
    const SUFFIX: &str = ".md";
    let bytes = contents.as_bytes();
    let mut out = String::with_capacity(contents.len());
    let mut copied = 0;
    let mut search = 0;
    let mut changed = false;
    while let Some(found) = contents[search..].find(SUFFIX) {
        let start = search + found;
        let end = start + SUFFIX.len();
        search = start + 1;
        if end >= bytes.len() || !matches!(bytes[end], b'#' | b')') {
            continue;
        }
        if !is_link_target_ending_at(bytes, start) {
            continue;
        }
        out.push_str(&contents[copied..start]);
        out.push_str(".html");
        copied = end;
        search = end;
        changed = true;
    }
    if !changed {
        return None;
    }
    out.push_str(&contents[copied..]);
    Some(out)
}

/// Walk backwards from a `.md` occurrence to confirm it sits inside the
/// target of a `[label](target)` link.
fn is_link_target_ending_at(bytes: &[u8], pos: usize) -> bool {
    let mut k = pos;
    while k > 0 {
        k -= 1;
        match bytes[k] {
            b'(' => return k > 0 && bytes[k - 1] == b']' && has_link_label_ending_at(bytes, k - 1),
            b')' | b'\'' | b'"' => return false,
            _ => {}
        }
    }
    false
}

fn has_link_label_ending_at(bytes: &[u8], bracket: usize) -> bool {
    let mut k = bracket;
    while k > 0 {
        k -= 1;
        match bytes[k] {
            b']' | b'(' | b')' | b'\'' | b'"' => return false,
            b'[' => return true,
            _ => {}
        }
    }
    false
}
