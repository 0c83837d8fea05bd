use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

pub const SCHEMA_VERSION: u32 = 1;

/// One commit's contribution, as folded into an author's totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub author: String,
    pub added: u64,
    pub removed: u64,
    pub files: HashSet<String>,
}

impl CommitRecord {
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            added: 0,
            removed: 0,
            files: HashSet::new(),
        }
    }

    pub fn add_file(&mut self, path: &str, added: u64, removed: u64) {
        self.added += added;
        self.removed += removed;
        if !self.files.contains(path) {
            self.files.insert(path.to_string());
        }
    }

    pub fn num_files_changed(&self) -> usize {
        self.files.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorTotals {
    pub author: String,
    pub added: u64,
    pub removed: u64,
    pub files: HashSet<String>,
    pub commits: usize,
}

impl AuthorTotals {
    pub fn new(author: String) -> Self {
        Self {
            author,
            added: 0,
            removed: 0,
            files: HashSet::new(),
            commits: 0,
        }
    }

    /// Adds one record. Files are a union, so a path touched by several
    /// commits is counted once.
    pub fn fold(&mut self, record: &CommitRecord) {
        self.added += record.added;
        self.removed += record.removed;
        self.files.extend(record.files.iter().cloned());
        self.commits += 1;
    }

    pub fn files_changed(&self) -> usize {
        self.files.len()
    }

    /// Saturates at the `i64` bounds instead of wrapping.
    pub fn diff(&self) -> i64 {
        let added = i64::try_from(self.added).unwrap_or(i64::MAX);
        let removed = i64::try_from(self.removed).unwrap_or(i64::MAX);
        added.saturating_sub(removed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Files,
    Commits,
    Added,
    Removed,
    Diff,
    Author,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Files => "files",
            SortKey::Commits => "commits",
            SortKey::Added => "added",
            SortKey::Removed => "removed",
            SortKey::Diff => "diff",
            SortKey::Author => "author",
        };
        f.write_str(name)
    }
}

/// How an in-progress commit reaches the author totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FoldMode {
    /// Refold the cumulative commit after every file line. Matches the
    /// historical numbers, which over-count multi-file commits.
    #[default]
    Incremental,
    /// Fold each commit once, when the next header or end of stream is seen.
    PerCommit,
}

/// What to do with `-\t-\tpath` lines git emits for binary files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinaryPolicy {
    #[default]
    Skip,
    /// Record the path as touched with zero lines.
    Count,
}

/// Authors ranked by a [`SortKey`]. Ties keep first-seen order.
#[derive(Debug, Clone)]
pub struct Report {
    sort: SortKey,
    authors: Vec<AuthorTotals>,
}

impl Report {
    pub fn new(mut authors: Vec<AuthorTotals>, sort: SortKey) -> Self {
        match sort {
            SortKey::Files => authors.sort_by(|a, b| b.files_changed().cmp(&a.files_changed())),
            SortKey::Commits => authors.sort_by(|a, b| b.commits.cmp(&a.commits)),
            SortKey::Added => authors.sort_by(|a, b| b.added.cmp(&a.added)),
            SortKey::Removed => authors.sort_by(|a, b| b.removed.cmp(&a.removed)),
            SortKey::Diff => authors.sort_by(|a, b| b.diff().cmp(&a.diff())),
            SortKey::Author => authors.sort_by(|a, b| a.author.cmp(&b.author)),
        }
        Self { sort, authors }
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort
    }

    pub fn authors(&self) -> &[AuthorTotals] {
        &self.authors
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    pub fn get(&self, author: &str) -> Option<&AuthorTotals> {
        self.authors.iter().find(|a| a.author == author)
    }

    /// Keeps authors whose identity contains `needle`, ignoring case.
    pub fn retain_matching(&mut self, needle: &str) {
        let needle = needle.to_lowercase();
        self.authors.retain(|a| a.author.to_lowercase().contains(&needle));
    }

    pub fn rows(&self) -> Vec<AuthorRow> {
        self.authors.iter().map(AuthorRow::from).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRow {
    pub author: String,
    pub commits: usize,
    pub files_changed: usize,
    pub added: u64,
    pub removed: u64,
    pub diff: i64,
}

impl From<&AuthorTotals> for AuthorRow {
    fn from(totals: &AuthorTotals) -> Self {
        Self {
            author: totals.author.clone(),
            commits: totals.commits,
            files_changed: totals.files_changed(),
            added: totals.added,
            removed: totals.removed,
            diff: totals.diff(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub since: Option<String>,
    pub until: Option<String>,
    pub sort: SortKey,
    pub fold_mode: FoldMode,
    pub authors: Vec<AuthorRow>,
}

#[derive(Debug, Clone, Default)]
pub struct DateRange {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn with_until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// `git log` arguments restricting history to this range.
    pub fn to_git_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(since) = self.since {
            args.push(format!("--since={}", since.to_rfc3339()));
        }
        if let Some(until) = self.until {
            args.push(format!("--until={}", until.to_rfc3339()));
        }
        args
    }
}
