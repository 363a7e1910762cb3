//! Terminal classification of one record's fetch attempt.

use std::fmt;

use crate::retry::FetchFailure;

/// Exactly one outcome is produced per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Archive written; `bytes` is the final size on disk.
    Downloaded { bytes: u64 },
    /// Target file was already present; no request was made.
    AlreadyExists { filename: String },
    /// Record was not fetchable (e.g. no source link).
    Skipped { reason: String },
    /// Transfer failed; nothing was left at the target path.
    Failed { error: FetchFailure },
}

impl Outcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Outcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

/// Formats `n` with thousands separators (`1234567` → `1,234,567`).
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Downloaded { bytes } => write!(f, "Downloaded ({} bytes)", group_thousands(*bytes)),
            Outcome::AlreadyExists { filename } => write!(f, "Already exists - {}", filename),
            Outcome::Skipped { reason } => write!(f, "Skipped - {}", reason),
            Outcome::Failed { error } => write!(f, "Failed - {}", error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::ErrorKind;

    #[test]
    fn thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn display_lines() {
        assert_eq!(
            Outcome::Downloaded { bytes: 2048 }.to_string(),
            "Downloaded (2,048 bytes)"
        );
        assert_eq!(Outcome::skipped("no source link").to_string(), "Skipped - no source link");
        let failed = Outcome::Failed {
            error: FetchFailure::new(ErrorKind::Status(404), "HTTP 404"),
        };
        assert_eq!(failed.to_string(), "Failed - status 404: HTTP 404");
        assert!(failed.is_failure());
    }
}
