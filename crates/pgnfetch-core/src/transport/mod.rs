//! Blocking HTTP GET transport.
//!
//! The fetcher and the catalog scraper only see the `Transport` trait, so
//! tests can substitute a counting or failing implementation for libcurl.

mod http;

pub use http::CurlTransport;

use std::io::Write;

use crate::retry::TransferError;

/// A blocking, streamed HTTP GET.
pub trait Transport: Send + Sync {
    /// Streams the body of `url` into `sink`, returning the number of body bytes.
    ///
    /// Any non-2xx final status is an error. Implementations must bound the
    /// whole call with a finite timeout.
    fn get(&self, url: &str, sink: &mut dyn Write) -> Result<u64, TransferError>;
}

/// Fetches `url` fully into memory.
pub fn get_to_vec(transport: &dyn Transport, url: &str) -> Result<Vec<u8>, TransferError> {
    let mut body = Vec::new();
    transport.get(url, &mut body)?;
    Ok(body)
}
