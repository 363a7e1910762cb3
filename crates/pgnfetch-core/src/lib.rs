pub mod config;
pub mod logging;

pub mod catalog;
pub mod fetcher;
pub mod outcome;
pub mod record;
pub mod retry;
pub mod scheduler;
pub mod stats;
pub mod storage;
pub mod transport;
pub mod url_model;
