//! Thread-safe aggregation of per-record outcomes.

use std::fmt;
use std::sync::Mutex;

use crate::outcome::Outcome;

/// Aggregate counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    pub total: u64,
    pub downloaded: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl FetchStats {
    /// Records that have produced an outcome so far.
    pub fn completed(&self) -> u64 {
        self.downloaded + self.skipped + self.failed
    }

    /// True once every record contributed exactly one outcome.
    pub fn is_complete(&self) -> bool {
        self.completed() == self.total
    }
}

impl fmt::Display for FetchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total files:      {}", self.total)?;
        writeln!(f, "Downloaded:       {}", self.downloaded)?;
        writeln!(f, "Skipped:          {}", self.skipped)?;
        write!(f, "Failed:           {}", self.failed)
    }
}

/// Counters shared by the coordinator; every mutation happens under one lock.
#[derive(Debug)]
pub struct StatsAggregator {
    inner: Mutex<FetchStats>,
}

impl StatsAggregator {
    pub fn new(total: u64) -> Self {
        Self {
            inner: Mutex::new(FetchStats {
                total,
                ..FetchStats::default()
            }),
        }
    }

    /// Adds one outcome to exactly one bucket.
    pub fn record(&self, outcome: &Outcome) {
        let mut stats = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        match outcome {
            Outcome::Downloaded { .. } => stats.downloaded += 1,
            Outcome::AlreadyExists { .. } | Outcome::Skipped { .. } => stats.skipped += 1,
            Outcome::Failed { .. } => stats.failed += 1,
        }
    }

    pub fn snapshot(&self) -> FetchStats {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::{ErrorKind, FetchFailure};
    use std::sync::Arc;

    #[test]
    fn each_variant_hits_one_bucket() {
        let agg = StatsAggregator::new(4);
        agg.record(&Outcome::Downloaded { bytes: 10 });
        agg.record(&Outcome::AlreadyExists {
            filename: "a.zip".into(),
        });
        agg.record(&Outcome::skipped("no source link"));
        agg.record(&Outcome::Failed {
            error: FetchFailure::new(ErrorKind::Timeout, "timed out"),
        });
        let s = agg.snapshot();
        assert_eq!(
            s,
            FetchStats {
                total: 4,
                downloaded: 1,
                skipped: 2,
                failed: 1
            }
        );
        assert!(s.is_complete());
    }

    #[test]
    fn concurrent_updates_are_not_lost() {
        let agg = Arc::new(StatsAggregator::new(8 * 500));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let agg = Arc::clone(&agg);
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        if i % 2 == 0 {
                            agg.record(&Outcome::Downloaded { bytes: 1 });
                        } else {
                            agg.record(&Outcome::skipped("x"));
                        }
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let s = agg.snapshot();
        assert_eq!(s.downloaded, 2000);
        assert_eq!(s.skipped, 2000);
        assert!(s.is_complete());
    }

    #[test]
    fn summary_block() {
        let s = FetchStats {
            total: 3,
            downloaded: 1,
            skipped: 1,
            failed: 1,
        };
        let text = s.to_string();
        assert!(text.starts_with("Total files:      3"));
        assert!(text.ends_with("Failed:           1"));
    }
}
