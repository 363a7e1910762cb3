//! Catalog scraping: index page → records.
//!
//! Downloads the issue index, extracts one record per table row and hands
//! them to the record store. Single-threaded and one-shot.

mod parse;

pub use parse::parse_index;

use anyhow::{Context, Result};

use crate::record::Record;
use crate::transport::{get_to_vec, Transport};

/// Fetches the index page at `url` as text.
pub fn fetch_index(url: &str, transport: &dyn Transport) -> Result<String> {
    let body = get_to_vec(transport, url).with_context(|| format!("fetch index {}", url))?;
    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Fetches and parses the index at `url`; links are resolved against `url`.
pub fn scrape(url: &str, transport: &dyn Transport) -> Result<Vec<Record>> {
    let html = fetch_index(url, transport)?;
    tracing::debug!(bytes = html.len(), "fetched index page");
    let records = parse_index(&html, url)?;
    tracing::info!(count = records.len(), "parsed catalog rows");
    Ok(records)
}
