//! Per-item and end-of-run reports.

use std::fmt;
use std::path::PathBuf;

use crate::outcome::{group_thousands, Outcome};
use crate::stats::FetchStats;

const RULE_WIDTH: usize = 60;

/// One completed record, emitted in completion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    /// 1-based position in completion order.
    pub index: usize,
    pub total: usize,
    pub record_id: u32,
    /// Resolved target name; `None` for records without a link.
    pub filename: Option<String>,
    pub outcome: Outcome,
}

impl fmt::Display for ItemReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}] TWIC {}: ", self.index, self.total, self.record_id)?;
        match (&self.outcome, &self.filename) {
            (Outcome::Downloaded { bytes }, Some(name)) => {
                write!(f, "Downloaded {} ({} bytes)", name, group_thousands(*bytes))
            }
            (outcome, _) => write!(f, "{}", outcome),
        }
    }
}

/// Final counts plus where the files went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub stats: FetchStats,
    /// Absolute destination directory.
    pub destination: PathBuf,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f, "{}", rule)?;
        writeln!(f, "DOWNLOAD SUMMARY")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "{}", self.stats)?;
        writeln!(f, "Output directory: {}", self.destination.display())?;
        write!(f, "{}", rule)
    }
}

/// Result of a coordinator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    /// No input records; no workers were started.
    NothingToDo,
    Completed(RunSummary),
}

impl RunReport {
    pub fn stats(&self) -> Option<FetchStats> {
        match self {
            RunReport::NothingToDo => None,
            RunReport::Completed(summary) => Some(summary.stats),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downloaded_line_names_file() {
        let r = ItemReport {
            index: 3,
            total: 12,
            record_id: 7,
            filename: Some("twic0007.zip".into()),
            outcome: Outcome::Downloaded { bytes: 123456 },
        };
        assert_eq!(r.to_string(), "[3/12] TWIC 7: Downloaded twic0007.zip (123,456 bytes)");
    }

    #[test]
    fn skipped_line() {
        let r = ItemReport {
            index: 1,
            total: 1,
            record_id: 8,
            filename: None,
            outcome: Outcome::skipped("no source link"),
        };
        assert_eq!(r.to_string(), "[1/1] TWIC 8: Skipped - no source link");
    }

    #[test]
    fn summary_contains_counts_and_path() {
        let s = RunSummary {
            stats: FetchStats {
                total: 2,
                downloaded: 1,
                skipped: 0,
                failed: 1,
            },
            destination: PathBuf::from("/srv/twic_pgns"),
        };
        let text = s.to_string();
        assert!(text.contains("DOWNLOAD SUMMARY"));
        assert!(text.contains("Downloaded:       1"));
        assert!(text.contains("Output directory: /srv/twic_pgns"));
    }
}
