//! Fetch coordinator.
//!
//! Turns a list of records into a bounded-concurrency batch of fetches:
//! a fixed pool of worker threads pulls record indices from a job channel,
//! results come back on one completion channel, and the coordinator loop
//! reports them in completion order, aggregates stats, and paces dispatch.

mod options;
mod pool;
mod report;

pub use options::FetchOptions;
pub use pool::FetchCoordinator;
pub use report::{ItemReport, RunReport, RunSummary};
