//! Last path segment of an archive link.

use url::Url;

/// Returns the final path segment of `link`, ignoring query and fragment.
///
/// `None` for unparsable links, paths ending in `/`, dot segments, and
/// segments that could not be used as a plain file name under the
/// destination directory.
pub fn archive_segment(link: &str) -> Option<String> {
    let parsed = Url::parse(link.trim()).ok()?;
    let segment = parsed.path_segments()?.next_back()?;
    match segment {
        "" | "." | ".." => None,
        s if s.contains(['\\', '\0']) => None,
        s => Some(s.to_string()),
    }
}
