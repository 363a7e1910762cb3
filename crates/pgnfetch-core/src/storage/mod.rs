//! Disk I/O and file lifecycle.
//!
//! Archives are streamed into `<name>.part` and only renamed to their final
//! name once the transfer completed, so the final path never holds a partial
//! body.

mod part;

pub use part::PartFile;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `twic0007.zip` → `twic0007.zip.part`).
pub fn temp_path(final_path: &std::path::Path) -> std::path::PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    std::path::PathBuf::from(o)
}
