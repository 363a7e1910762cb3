//! URL modeling and local target derivation.
//!
//! Maps a record's archive link to a stable file name under the destination
//! directory. Pure: never touches the filesystem and never fails.

mod path;

pub use path::archive_segment;

use std::path::{Path, PathBuf};

use crate::record::Record;

/// Extensions accepted verbatim from the URL path.
const RECOGNIZED_EXTENSIONS: &[&str] = &[".zip", ".pgn"];

/// Extension of the synthesized fallback name.
const FALLBACK_EXTENSION: &str = "zip";

/// Resolved local file for a record's archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTarget {
    pub filename: String,
    pub path: PathBuf,
}

/// Name used when the URL does not yield a usable archive name (`twic0007.zip`).
pub fn fallback_filename(id: u32) -> String {
    format!("twic{:04}.{}", id, FALLBACK_EXTENSION)
}

fn has_recognized_extension(name: &str) -> bool {
    RECOGNIZED_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Derives the file name for `url`, falling back to the id-based name when the
/// URL is missing, malformed, or its last segment is not a `.zip`/`.pgn` file.
///
/// # Examples
///
/// - `target_filename(Some("https://x/y/twic0007.zip"), 7)` → `"twic0007.zip"`
/// - `target_filename(Some("https://x/bad"), 9)` → `"twic0009.zip"`
/// - `target_filename(None, 8)` → `"twic0008.zip"`
pub fn target_filename(url: Option<&str>, id: u32) -> String {
    url.and_then(archive_segment)
        .filter(|name| has_recognized_extension(name))
        .unwrap_or_else(|| fallback_filename(id))
}

/// Resolves the local target for `record` under `dest_dir`.
pub fn resolve_target(record: &Record, dest_dir: &Path) -> LocalTarget {
    let filename = target_filename(record.source_url(), record.id);
    let path = dest_dir.join(&filename);
    LocalTarget { filename, path }
}
