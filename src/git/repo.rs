use crate::error::{RankError, Result};
use crate::git::log::{LogOptions, LogStream};
use crate::model::DateRange;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use gix::{discover, Repository};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::debug;

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `false` for a freshly initialized repository whose HEAD is unborn.
    pub fn has_commits(&self) -> Result<bool> {
        let head = self.repo.head()?;
        Ok(!head.is_unborn())
    }

    pub fn log_stream(&self, options: &LogOptions) -> Result<LogStream> {
        if !self.has_commits()? {
            debug!(path = %self.path.display(), "HEAD is unborn, no history to read");
            return Ok(LogStream::empty());
        }
        LogStream::spawn(&self.path, options)
    }

    pub fn resolve_range(&self, since: Option<&str>, until: Option<&str>) -> Result<DateRange> {
        let since_dt = since.map(|s| self.parse_commit_or_date(s)).transpose()?;
        let until_dt = until.map(|u| self.parse_commit_or_date(u)).transpose()?;

        if let (Some(s), Some(u)) = (since_dt, until_dt) {
            if s > u {
                return Err(RankError::InvalidDate(format!(
                    "Invalid range: since ({s}) is after until ({u})"
                )));
            }
        }

        let mut range = DateRange::new();
        if let Some(s) = since_dt {
            range = range.with_since(s);
        }
        if let Some(u) = until_dt {
            range = range.with_until(u);
        }
        Ok(range)
    }

    fn parse_commit_or_date(&self, input: &str) -> Result<DateTime<Utc>> {
        if let Some(dt) = parse_date(input)? {
            return Ok(dt);
        }

        // Fallback to Git ref
        let id = self
            .repo
            .rev_parse_single(input)
            .map_err(|e| RankError::Parse(format!("Invalid commit or date '{input}': {e}")))?;

        let commit = id
            .object()?
            .try_into_commit()
            .map_err(|_| RankError::Parse(format!("Not a commit: {input}")))?;

        let secs = commit.time()?.seconds;
        DateTime::<Utc>::from_timestamp(secs, 0)
            .ok_or_else(|| RankError::InvalidDate(format!("Invalid timestamp: {secs}")))
    }
}

/// Parses the date forms accepted by `--since`/`--until`. `Ok(None)` means
/// the input is not a date and may still name a revision.
pub fn parse_date(input: &str) -> Result<Option<DateTime<Utc>>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(datetime) = date.and_hms_opt(0, 0, 0) {
            return Ok(Some(Utc.from_utc_datetime(&datetime)));
        }
    }

    if let Some(duration) = parse_natural_duration(input) {
        let target = SystemTime::now()
            .checked_sub(duration)
            .ok_or_else(|| RankError::InvalidDate(format!("Duration overflow for '{input}'")))?;
        return Ok(Some(DateTime::<Utc>::from(target)));
    }

    Ok(None)
}

pub fn parse_natural_duration(input: &str) -> Option<Duration> {
    const DAY: u64 = 86_400;
    let input = input.trim().to_lowercase();

    let units = [(" days ago", DAY), (" weeks ago", 7 * DAY), (" months ago", 30 * DAY)];
    for (suffix, secs) in units {
        if let Some(n) = input.strip_suffix(suffix) {
            if let Ok(n) = n.trim().parse::<u64>() {
                return n.checked_mul(secs).map(Duration::from_secs);
            }
        }
    }
    None
}
