use std::time::Duration;

use crate::config::FetchConfig;
use crate::retry::RetryPolicy;

/// Tuning for one coordinator run.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Worker threads, i.e. maximum fetches in flight.
    pub concurrency: usize,
    /// Pause dispatch after every N completions (0 = never).
    pub pause_every: usize,
    /// Length of each cadence pause.
    pub pause: Duration,
    /// Per-record retry policy.
    pub retry: RetryPolicy,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from_config(&FetchConfig::default())
    }
}

impl FetchOptions {
    pub fn from_config(cfg: &FetchConfig) -> Self {
        Self {
            concurrency: cfg.concurrency.max(1),
            pause_every: cfg.pause_every,
            pause: cfg.pause(),
            retry: cfg.retry_policy(),
        }
    }

    /// True when completion number `completed` (1-based) should be followed by a pause.
    pub fn pause_due(&self, completed: usize) -> bool {
        self.pause_every > 0 && completed > 0 && completed % self.pause_every == 0
    }
}
