//! Folding of `git log --numstat --pretty=format:+%an (%ae)` output into
//! per-author totals.
//!
//! The stream has no framing: a `+Name (email)` header opens a commit and the
//! `added\tremoved\tpath` lines after it belong to that commit until the next
//! header. Blank lines carry nothing.

use crate::error::{RankError, Result};
use crate::model::{AuthorTotals, BinaryPolicy, CommitRecord, FoldMode, Report, SortKey};
use std::collections::HashMap;
use tracing::{debug, trace};

pub const HEADER_SENTINEL: char = '+';

#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateOptions {
    pub fold_mode: FoldMode,
    pub binary: BinaryPolicy,
}

/// A classified, non-blank log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLine<'a> {
    Header(&'a str),
    FileStat { added: u64, removed: u64, path: &'a str },
    BinaryFileStat { path: &'a str },
}

/// Classifies one trimmed, non-blank line. `None` means it is neither a
/// header nor a numstat line.
pub fn classify_line(line: &str) -> Option<LogLine<'_>> {
    if let Some(author) = line.strip_prefix(HEADER_SENTINEL) {
        return Some(LogLine::Header(author));
    }

    let mut fields = line.splitn(3, '\t');
    let added = fields.next()?;
    let removed = fields.next()?;
    let path = fields.next()?;

    if added == "-" && removed == "-" {
        return Some(LogLine::BinaryFileStat { path });
    }

    Some(LogLine::FileStat {
        added: parse_count(added)?,
        removed: parse_count(removed)?,
        path,
    })
}

fn parse_count(field: &str) -> Option<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

#[derive(Debug)]
enum ParseState {
    NoCurrentCommit,
    InCommit {
        commit: CommitRecord,
        /// Set when the commit holds counts not yet folded into its author.
        pending: bool,
    },
}

/// Author totals in first-seen order, addressable by identity.
#[derive(Debug, Default)]
struct AuthorMap {
    index: HashMap<String, usize>,
    totals: Vec<AuthorTotals>,
}

impl AuthorMap {
    fn get_or_insert(&mut self, author: &str) -> &mut AuthorTotals {
        let idx = match self.index.get(author) {
            Some(&idx) => idx,
            None => {
                let idx = self.totals.len();
                self.totals.push(AuthorTotals::new(author.to_string()));
                self.index.insert(author.to_string(), idx);
                idx
            }
        };
        &mut self.totals[idx]
    }
}

#[derive(Debug)]
pub struct LogAggregator {
    options: AggregateOptions,
    state: ParseState,
    authors: AuthorMap,
    line_no: usize,
    commits_seen: usize,
    discarded: usize,
}

impl LogAggregator {
    pub fn new(options: AggregateOptions) -> Self {
        Self {
            options,
            state: ParseState::NoCurrentCommit,
            authors: AuthorMap::default(),
            line_no: 0,
            commits_seen: 0,
            discarded: 0,
        }
    }

    /// Number of commit headers consumed so far.
    pub fn commits_seen(&self) -> usize {
        self.commits_seen
    }

    /// Commits that ended without touching any file.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn feed_line(&mut self, raw: &str) -> Result<()> {
        self.line_no += 1;
        let line = raw.trim();
        if line.is_empty() {
            return Ok(());
        }

        let parsed = classify_line(line).ok_or_else(|| RankError::malformed(self.line_no, line))?;
        match parsed {
            LogLine::Header(author) => {
                self.flush();
                self.commits_seen += 1;
                self.state = ParseState::InCommit {
                    commit: CommitRecord::new(author),
                    pending: false,
                };
            }
            LogLine::FileStat { added, removed, path } => self.add_file(line, path, added, removed)?,
            LogLine::BinaryFileStat { path } => match self.options.binary {
                BinaryPolicy::Count => self.add_file(line, path, 0, 0)?,
                BinaryPolicy::Skip => trace!(path, "skipping binary file"),
            },
        }
        Ok(())
    }

    fn add_file(&mut self, line: &str, path: &str, added: u64, removed: u64) -> Result<()> {
        let ParseState::InCommit { commit, pending } = &mut self.state else {
            return Err(RankError::malformed(self.line_no, line));
        };

        commit.add_file(path, added, removed);
        *pending = true;

        if self.options.fold_mode == FoldMode::Incremental {
            self.authors.get_or_insert(&commit.author).fold(commit);
            *pending = false;
        }
        Ok(())
    }

    /// Folds whatever the current commit holds that has not been folded yet.
    fn flush(&mut self) {
        let ParseState::InCommit { commit, pending } = &mut self.state else {
            return;
        };

        if commit.files.is_empty() {
            self.discarded += 1;
            trace!(author = %commit.author, "discarding commit without file changes");
            return;
        }

        if *pending {
            self.authors.get_or_insert(&commit.author).fold(commit);
            *pending = false;
        }
    }

    pub fn finish(mut self) -> Vec<AuthorTotals> {
        self.flush();
        self.state = ParseState::NoCurrentCommit;
        debug!(
            lines = self.line_no,
            commits = self.commits_seen,
            discarded = self.discarded,
            authors = self.authors.totals.len(),
            "aggregation finished"
        );
        self.authors.totals
    }

    pub fn into_report(self, sort: SortKey) -> Report {
        Report::new(self.finish(), sort)
    }
}

/// Aggregates a complete in-memory line sequence.
pub fn aggregate_lines<I, S>(lines: I, options: AggregateOptions) -> Result<Vec<AuthorTotals>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut aggregator = LogAggregator::new(options);
    for line in lines {
        aggregator.feed_line(line.as_ref())?;
    }
    Ok(aggregator.finish())
}
