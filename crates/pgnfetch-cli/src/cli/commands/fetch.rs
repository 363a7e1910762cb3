//! `pgnfetch fetch` – download every archive referenced by the saved records.

use anyhow::{Context, Result};
use pgnfetch_core::config::FetchConfig;
use pgnfetch_core::record;
use pgnfetch_core::scheduler::{FetchCoordinator, FetchOptions, ItemReport, RunReport};
use pgnfetch_core::transport::CurlTransport;
use std::sync::Arc;

pub async fn run_fetch(cfg: &FetchConfig) -> Result<()> {
    println!("TWIC PGN Downloader");
    println!("{}", "=".repeat(40));

    let records_dir = cfg.records_dir.clone();
    let records = tokio::task::spawn_blocking(move || record::load_records(&records_dir))
        .await
        .context("load task join")??;
    if records.is_empty() {
        println!("No records found in {}", cfg.records_dir.display());
        return Ok(());
    }
    let linked = records.iter().filter(|r| r.source_url().is_some()).count();
    println!("Found {} TWIC issues ({} with PGN links)", records.len(), linked);
    println!("Starting downloads with {} concurrent workers...", cfg.concurrency);

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::unbounded_channel::<ItemReport>();
    let progress_handle = tokio::spawn(async move {
        while let Some(item) = progress_rx.recv().await {
            println!("{}", item);
        }
    });

    let coordinator = FetchCoordinator::new(
        FetchOptions::from_config(cfg),
        Arc::new(CurlTransport::from_config(cfg)),
    );
    let dest = cfg.destination_dir.clone();
    let report = tokio::task::spawn_blocking(move || coordinator.run(records, &dest, Some(&progress_tx)))
        .await
        .context("fetch task join")??;

    let _ = progress_handle.await;

    match report {
        RunReport::NothingToDo => println!("Nothing to do."),
        RunReport::Completed(summary) => {
            println!();
            println!("{}", summary);
            if summary.stats.failed > 0 {
                tracing::warn!("{} archive(s) failed; re-run to retry them", summary.stats.failed);
            }
        }
    }
    Ok(())
}
