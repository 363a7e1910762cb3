//! Transfer error type and the structured failure reported per record.

use super::classify::classify;
use super::policy::ErrorKind;

/// Error returned by a single streamed GET (curl failure, HTTP error, or storage failure).
/// Kept unflattened so it can be classified before being turned into a report.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Writing the body to disk failed (e.g. disk full, permission denied). Not retried.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
}

/// Terminal failure of one record's fetch: the classified kind plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl FetchFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<&TransferError> for FetchFailure {
    fn from(e: &TransferError) -> Self {
        FetchFailure::new(classify(e), e.to_string())
    }
}

impl From<TransferError> for FetchFailure {
    fn from(e: TransferError) -> Self {
        FetchFailure::from(&e)
    }
}
