use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

// ===== FAILURE TYPES =====

/// Recoverable per-file failure classes, reported in the end-of-run tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureCategory {
    /// Tree construction failed (mismatched, unclosed, or stray tags)
    MalformedMarkup,
    /// Bytes could not be decoded as UTF-8
    Encoding,
    /// File could not be read
    Io,
    /// Rewritten page could not be persisted
    Write,
}

impl FailureCategory {
    pub fn label(&self) -> &'static str {
        match self {
            FailureCategory::MalformedMarkup => "malformed-markup",
            FailureCategory::Encoding => "encoding",
            FailureCategory::Io => "io",
            FailureCategory::Write => "write",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub category: FailureCategory,
    pub message: String,
}

// ===== LEDGER =====

/// Rule name -> number of documents the rule fired on, for one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    counts: BTreeMap<String, usize>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, rule_name: &str) {
        *self.counts.entry(rule_name.to_string()).or_insert(0) += 1;
    }

    pub fn count(&self, rule_name: &str) -> usize {
        self.counts.get(rule_name).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries with a nonzero count, ordered by rule name
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(name, count)| (name.as_str(), *count))
    }
}

// ===== SUMMARY =====

/// One line of the end-of-run report for a rule that fired at least once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleTally {
    pub rule: String,
    pub label: String,
    pub files: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub directory: PathBuf,
    pub started_at: DateTime<Utc>,
    pub dry_run: bool,
    pub files_scanned: usize,
    pub files_modified: usize,
    pub ledger: Ledger,
    /// Ledger entries in pipeline order, with human-readable labels
    pub rules: Vec<RuleTally>,
    pub failure_counts: BTreeMap<FailureCategory, usize>,
    pub failures: Vec<FileFailure>,
}

impl BatchSummary {
    pub fn total_failures(&self) -> usize {
        self.failure_counts.values().sum()
    }

    pub fn failures_in(&self, category: FailureCategory) -> usize {
        self.failure_counts.get(&category).copied().unwrap_or(0)
    }
}
