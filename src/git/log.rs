use crate::error::{RankError, Result};
use crate::model::DateRange;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};
use tracing::{debug, warn};

pub const GIT_PROGRAM: &str = "git";
pub const PRETTY_FORMAT: &str = "--pretty=format:+%an (%ae)";

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub range: DateRange,
    pub no_merges: bool,
}

impl LogOptions {
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["log".to_string(), "--numstat".to_string(), PRETTY_FORMAT.to_string()];
        if self.no_merges {
            args.push("--no-merges".to_string());
        }
        args.extend(self.range.to_git_args());
        args
    }
}

/// Lines of `git log` stdout, read lazily from the child process.
///
/// Call [`LogStream::finish`] after the last line to check the exit status.
/// Dropping an unfinished stream kills the child.
pub struct LogStream {
    child: Option<Child>,
    reader: Option<BufReader<ChildStdout>>,
    buf: Vec<u8>,
}

impl LogStream {
    pub fn spawn(workdir: &Path, options: &LogOptions) -> Result<Self> {
        let args = options.to_args();
        debug!(workdir = %workdir.display(), ?args, "spawning git");

        let mut child = Command::new(GIT_PROGRAM)
            .args(&args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| RankError::ExternalTool(format!("failed to launch {GIT_PROGRAM}: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RankError::ExternalTool("git stdout was not captured".to_string()))?;

        Ok(Self {
            child: Some(child),
            reader: Some(BufReader::new(stdout)),
            buf: Vec::new(),
        })
    }

    /// A stream with no lines and no process behind it.
    pub fn empty() -> Self {
        Self {
            child: None,
            reader: None,
            buf: Vec::new(),
        }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };

        self.buf.clear();
        if reader.read_until(b'\n', &mut self.buf)? == 0 {
            self.reader = None;
            return Ok(None);
        }

        while matches!(self.buf.last(), Some(b'\n' | b'\r')) {
            self.buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }

    /// Waits for git to exit and fails on a non-zero status.
    pub fn finish(mut self) -> Result<()> {
        self.reader = None;
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        let status = child.wait()?;
        if !status.success() {
            return Err(RankError::ExternalTool(format!("git log exited with {status}")));
        }
        Ok(())
    }
}

impl Iterator for LogStream {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_line().transpose()
    }
}

impl Drop for LogStream {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                warn!("failed to kill git: {e}");
            }
            let _ = child.wait();
        }
    }
}
