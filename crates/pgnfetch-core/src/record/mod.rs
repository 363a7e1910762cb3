//! Catalog records: one persisted JSON file per archive issue.
//!
//! Records are produced by the catalog scraper and consumed read-only by the
//! fetch pipeline. Field names on disk follow the `twic_NNNN.json` layout.

mod store;

pub use store::{load_records, record_file_name, save_records};

use serde::{Deserialize, Serialize};

/// One catalog entry describing a retrievable archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Issue number; unique and non-zero.
    #[serde(rename = "twic_number")]
    pub id: u32,
    /// Issue label as shown in the index (e.g. "1520").
    #[serde(default)]
    pub issue: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub html_link: Option<String>,
    /// Archive to download; records without one are never fetched.
    #[serde(rename = "pgn_link", default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub cbv_link: Option<String>,
    #[serde(default)]
    pub games: Option<u32>,
    #[serde(default)]
    pub stories: Option<u32>,
}

impl Record {
    /// Minimal record with only an id and optional source link.
    pub fn new(id: u32, source_url: Option<&str>) -> Self {
        Self {
            id,
            issue: None,
            date: None,
            html_link: None,
            source_url: source_url.map(str::to_string),
            cbv_link: None,
            games: None,
            stories: None,
        }
    }

    /// Source URL, treating an empty string the same as a missing link.
    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref().filter(|u| !u.trim().is_empty())
    }
}
