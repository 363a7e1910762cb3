//! `pgnfetch scrape` – fetch the issue index and persist one record per row.

use anyhow::{Context, Result};
use pgnfetch_core::catalog;
use pgnfetch_core::config::FetchConfig;
use pgnfetch_core::record;
use pgnfetch_core::transport::CurlTransport;

pub async fn run_scrape(cfg: &FetchConfig) -> Result<()> {
    println!("Fetching {} ...", cfg.index_url);
    let transport = CurlTransport::from_config(cfg);
    let url = cfg.index_url.clone();
    let records = tokio::task::spawn_blocking(move || catalog::scrape(&url, &transport))
        .await
        .context("scrape task join")??;

    let Some(first) = records.first() else {
        println!("No data found");
        return Ok(());
    };
    println!("Found {} rows of data", records.len());
    println!(
        "First entry: TWIC {} ({}) {}",
        first.id,
        first.date.as_deref().unwrap_or("no date"),
        first.source_url().unwrap_or("no PGN link")
    );

    let dir = cfg.records_dir.clone();
    let written = tokio::task::spawn_blocking(move || record::save_records(&records, &dir))
        .await
        .context("save task join")??;
    println!("Saved {} JSON files to {}/", written, cfg.records_dir.display());
    Ok(())
}
