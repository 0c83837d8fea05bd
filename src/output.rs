use crate::model::{AuthorRow, RankOutput, Report};
use crate::util::{trim_name, COLUMN_WIDTH, NAME_WIDTH};
use anyhow::Result;
use console::style;
use std::io::Write;

pub const NO_COMMITS_MESSAGE: &str = "No commits found, exiting";

pub fn no_match_message(needle: &str) -> String {
    format!("No authors match '{needle}'")
}

fn format_row(user: &str, cells: [String; 5]) -> String {
    let mut row = format!("{user:<NAME_WIDTH$}");
    for cell in cells {
        row.push_str(&format!("{cell:<COLUMN_WIDTH$}"));
    }
    row
}

pub fn header_line() -> String {
    let header = format_row(
        "user",
        ["commits", "files", "added", "removed", "diff"].map(String::from),
    );
    style(header).bold().force_styling(true).to_string()
}

pub fn author_line(row: &AuthorRow) -> String {
    format_row(
        &trim_name(&row.author),
        [
            row.commits.to_string(),
            row.files_changed.to_string(),
            row.added.to_string(),
            row.removed.to_string(),
            row.diff.to_string(),
        ],
    )
}

/// Writes the ranked table. `top` limits the number of author rows.
pub fn write_table<W: Write>(out: &mut W, report: &Report, top: Option<usize>) -> Result<()> {
    let rows = report.rows();
    let shown = top.unwrap_or(rows.len()).min(rows.len());

    writeln!(out, "{}", header_line())?;
    for row in &rows[..shown] {
        writeln!(out, "{}", author_line(row))?;
    }
    if shown < rows.len() {
        writeln!(out, "\n... and {} more authors", rows.len() - shown)?;
    }
    Ok(())
}

pub fn write_json<W: Write>(out: &mut W, output: &RankOutput) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(output)?)?;
    Ok(())
}

pub fn write_ndjson<W: Write>(out: &mut W, rows: &[AuthorRow]) -> Result<()> {
    for row in rows {
        writeln!(out, "{}", serde_json::to_string(row)?)?;
    }
    Ok(())
}
