//! Single-record fetch: existence check, streamed transfer, outcome classification.

use std::path::Path;

use crate::outcome::Outcome;
use crate::record::Record;
use crate::retry::{run_with_retry, FetchFailure, RetryPolicy, TransferError};
use crate::storage::PartFile;
use crate::transport::Transport;
use crate::url_model;

/// Reason reported for records that carry no archive link.
pub const NO_SOURCE_LINK: &str = "no source link";

/// Fetches one record's archive into `dest_dir` and classifies the result.
///
/// Never returns an error: every failure is folded into `Outcome::Failed`.
/// The body is streamed into `<name>.part` and renamed on success, so a failed
/// transfer leaves nothing at the target path. An existing target is trusted
/// as-is and no request is made.
pub fn fetch_record(
    record: &Record,
    dest_dir: &Path,
    transport: &dyn Transport,
    retry: &RetryPolicy,
) -> Outcome {
    let Some(url) = record.source_url() else {
        return Outcome::skipped(NO_SOURCE_LINK);
    };

    let target = url_model::resolve_target(record, dest_dir);
    if target.path.exists() {
        return Outcome::AlreadyExists {
            filename: target.filename,
        };
    }

    let result = run_with_retry(retry, || {
        let mut part = PartFile::new(&target.path);
        match transport.get(url, &mut part) {
            Ok(_) => part.finalize().map_err(TransferError::Storage),
            Err(e) => {
                part.discard();
                Err(e)
            }
        }
    });

    match result {
        Ok(bytes) => {
            tracing::debug!(id = record.id, file = %target.filename, bytes, "downloaded");
            Outcome::Downloaded { bytes }
        }
        Err(e) => {
            let error = FetchFailure::from(&e);
            tracing::warn!(id = record.id, %url, kind = %error.kind, "fetch failed: {}", e);
            Outcome::Failed { error }
        }
    }
}
