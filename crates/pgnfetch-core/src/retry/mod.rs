//! Transfer error classification and retry/backoff policy.
//!
//! Transport failures are classified into a small set of kinds (timeout,
//! connection, HTTP status, storage) so the fetcher can both report a
//! structured failure and decide whether another attempt is worthwhile.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::{FetchFailure, TransferError};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
