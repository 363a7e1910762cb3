//! CLI command handlers, one per file.

mod completions;
mod fetch;
mod scrape;

pub use completions::run_completions;
pub use fetch::run_fetch;
pub use scrape::run_scrape;
