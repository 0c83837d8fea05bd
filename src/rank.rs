use crate::aggregate::{AggregateOptions, LogAggregator};
use crate::cli::{CommonArgs, RankArgs};
use crate::git::{GitRepo, LogOptions, LogStream};
use crate::model::{RankOutput, Report, SortKey, SCHEMA_VERSION};
use crate::output::{no_match_message, write_json, write_ndjson, write_table, NO_COMMITS_MESSAGE};
use anyhow::Context;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use tracing::info;

pub fn exec(common: CommonArgs, args: RankArgs) -> anyhow::Result<()> {
    let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;

    let range = repo
        .resolve_range(common.since.as_deref(), common.until.as_deref())
        .context("Failed to resolve date range")?;

    let log_options = LogOptions {
        range,
        no_merges: common.no_merges,
    };
    let stream = repo.log_stream(&log_options).context("Failed to read git history")?;

    let options = AggregateOptions {
        fold_mode: args.fold_mode(),
        binary: common.binary_policy(),
    };
    let show_progress = !(args.json || args.ndjson);
    let mut report = build_report(stream, options, args.sort, show_progress)?;
    let history_empty = report.is_empty();

    if let Some(needle) = args.author.as_deref() {
        report.retain_matching(needle);
    }
    info!(authors = report.len(), sort = %report.sort_key(), "report ready");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.json {
        let output = RankOutput {
            version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            repository_path: repo.path().to_string_lossy().to_string(),
            since: common.since.clone(),
            until: common.until.clone(),
            sort: report.sort_key(),
            fold_mode: options.fold_mode,
            authors: report.rows(),
        };
        write_json(&mut out, &output)?;
    } else if args.ndjson {
        write_ndjson(&mut out, &report.rows())?;
    } else if history_empty {
        writeln!(out, "{NO_COMMITS_MESSAGE}")?;
    } else if report.is_empty() {
        let needle = args.author.as_deref().unwrap_or_default();
        writeln!(out, "{}", no_match_message(needle))?;
    } else {
        write_table(&mut out, &report, args.top)?;
    }

    out.flush()?;
    Ok(())
}

/// Drains `stream` into a report. Nothing is returned unless every line
/// parsed and git exited cleanly.
pub fn build_report(
    mut stream: LogStream,
    options: AggregateOptions,
    sort: SortKey,
    show_progress: bool,
) -> anyhow::Result<Report> {
    let pb = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} {pos}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Reading commits...");
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut aggregator = LogAggregator::new(options);
    let drained = (|| -> anyhow::Result<()> {
        for line in stream.by_ref() {
            let line = line.context("Failed to read git log output")?;
            aggregator
                .feed_line(&line)
                .context("Failed to parse git log output")?;
            pb.set_position(aggregator.commits_seen() as u64);
        }
        stream.finish().context("git log did not complete")
    })();
    pb.finish_and_clear();
    drained?;

    Ok(aggregator.into_report(sort))
}
