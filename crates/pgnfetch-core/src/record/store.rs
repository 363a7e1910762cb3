//! Directory-backed record store.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::Record;

const FILE_PREFIX: &str = "twic_";
const FILE_SUFFIX: &str = ".json";

/// File name a record is persisted under (`twic_0007.json`).
pub fn record_file_name(id: u32) -> String {
    format!("{}{:04}{}", FILE_PREFIX, id, FILE_SUFFIX)
}

fn is_record_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with(FILE_PREFIX) && n.ends_with(FILE_SUFFIX))
        .unwrap_or(false)
}

fn read_record(path: &Path) -> Result<Record> {
    let data = fs::read_to_string(path).context("read")?;
    let record: Record = serde_json::from_str(&data).context("parse JSON")?;
    if record.id == 0 {
        anyhow::bail!("record id must be greater than zero");
    }
    Ok(record)
}

/// Loads every `twic_*.json` record from `dir`, in file-name order.
///
/// A missing directory yields an empty list. Files that cannot be read or
/// parsed are logged and skipped; they never abort loading of the rest.
/// Ids are unique in the result: a later file repeating an id is dropped.
pub fn load_records(dir: &Path) -> Result<Vec<Record>> {
    if !dir.exists() {
        tracing::warn!("records directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("list {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && is_record_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut records = Vec::with_capacity(paths.len());
    let mut seen = HashSet::new();
    for path in paths {
        match read_record(&path) {
            Ok(record) if !seen.insert(record.id) => {
                tracing::warn!("skipping {}: duplicate id {}", path.display(), record.id)
            }
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!("skipping {}: {:#}", path.display(), e),
        }
    }
    tracing::debug!(count = records.len(), dir = %dir.display(), "loaded records");
    Ok(records)
}

/// Writes each record to `dir/twic_NNNN.json` (pretty JSON), creating `dir` if needed.
/// Returns the number of files written.
pub fn save_records(records: &[Record], dir: &Path) -> Result<usize> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    for record in records {
        let path = dir.join(record_file_name(record.id));
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    }
    Ok(records.len())
}
