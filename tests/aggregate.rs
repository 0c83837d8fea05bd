use git_rank::aggregate::{aggregate_lines, classify_line, AggregateOptions, LogLine, LogAggregator};
use git_rank::{AuthorTotals, BinaryPolicy, FoldMode, RankError, Report, SortKey};
use pretty_assertions::assert_eq;

const EXAMPLE: &[&str] = &[
    "+Alice (a@x.com)",
    "3\t1\tfoo.txt",
    "2\t0\tbar.txt",
    "+Bob (b@x.com)",
    "5\t5\tbaz.txt",
];

fn incremental() -> AggregateOptions {
    AggregateOptions::default()
}

fn per_commit() -> AggregateOptions {
    AggregateOptions {
        fold_mode: FoldMode::PerCommit,
        ..AggregateOptions::default()
    }
}

fn find<'a>(totals: &'a [AuthorTotals], author: &str) -> &'a AuthorTotals {
    totals
        .iter()
        .find(|t| t.author == author)
        .unwrap_or_else(|| panic!("no totals for {author}"))
}

/// (author, added, removed, files, commits, diff)
fn summary(t: &AuthorTotals) -> (&str, u64, u64, usize, usize, i64) {
    (t.author.as_str(), t.added, t.removed, t.files_changed(), t.commits, t.diff())
}

#[test]
fn incremental_refold_matches_reference_numbers() {
    let totals = aggregate_lines(EXAMPLE, incremental()).unwrap();
    assert_eq!(totals.len(), 2);
    assert_eq!(summary(find(&totals, "Alice (a@x.com)")), ("Alice (a@x.com)", 8, 2, 2, 2, 6));
    assert_eq!(summary(find(&totals, "Bob (b@x.com)")), ("Bob (b@x.com)", 5, 5, 1, 1, 0));
}

#[test]
fn per_commit_folds_each_commit_once() {
    let totals = aggregate_lines(EXAMPLE, per_commit()).unwrap();
    assert_eq!(summary(find(&totals, "Alice (a@x.com)")), ("Alice (a@x.com)", 5, 1, 2, 1, 4));
    assert_eq!(summary(find(&totals, "Bob (b@x.com)")), ("Bob (b@x.com)", 5, 5, 1, 1, 0));
}

#[test]
fn per_commit_flushes_last_commit_at_end_of_stream() {
    let lines = ["+Carol (c@x.com)", "1\t0\ta", "1\t0\tb", "1\t0\tc"];
    let totals = aggregate_lines(lines, per_commit()).unwrap();
    assert_eq!(summary(&totals[0]), ("Carol (c@x.com)", 3, 0, 3, 1, 3));
}

#[test]
fn diff_sum_follows_refold_formula() {
    // Each commit contributes the sum of its cumulative prefixes.
    let commits: &[(&str, &[(u64, u64, &str)])] = &[
        ("A", &[(10, 2, "x"), (4, 4, "y"), (1, 0, "z")]),
        ("B", &[(0, 7, "x")]),
        ("A", &[(3, 3, "x"), (2, 1, "w")]),
    ];

    let mut lines = Vec::new();
    let mut expected_diff = 0i64;
    for (author, files) in commits {
        lines.push(format!("+{author}"));
        let (mut added, mut removed) = (0i64, 0i64);
        for (a, r, path) in files.iter() {
            lines.push(format!("{a}\t{r}\t{path}"));
            added += *a as i64;
            removed += *r as i64;
            expected_diff += added - removed;
        }
    }

    let totals = aggregate_lines(&lines, incremental()).unwrap();
    let diff_sum: i64 = totals.iter().map(|t| t.diff()).sum();
    assert_eq!(diff_sum, expected_diff);

    let a = find(&totals, "A");
    assert_eq!(a.commits, 5);
    assert_eq!(a.files_changed(), 4);
}

#[test]
fn files_changed_is_a_union_across_commits() {
    let lines = [
        "+Dana (d@x.com)",
        "1\t1\tsrc/lib.rs",
        "+Dana (d@x.com)",
        "2\t0\tsrc/lib.rs",
        "+Dana (d@x.com)",
        "2\t0\tsrc/main.rs",
    ];
    for options in [incremental(), per_commit()] {
        let totals = aggregate_lines(lines, options).unwrap();
        let dana = find(&totals, "Dana (d@x.com)");
        assert_eq!(dana.files_changed(), 2);
        assert_eq!(dana.commits, 3);
        assert_eq!((dana.added, dana.removed), (5, 1));
    }
}

#[test]
fn repeated_path_within_commit_counts_once() {
    let lines = ["+Eve (e@x.com)", "1\t0\tsame.txt", "1\t0\tsame.txt"];
    let totals = aggregate_lines(lines, per_commit()).unwrap();
    assert_eq!(summary(&totals[0]), ("Eve (e@x.com)", 2, 0, 1, 1, 2));
}

#[test]
fn header_followed_by_header_contributes_nothing() {
    let lines = ["+Merge (m@x.com)", "+Bob (b@x.com)", "1\t2\tfile"];
    let mut aggregator = LogAggregator::new(incremental());
    for line in lines {
        aggregator.feed_line(line).unwrap();
    }
    assert_eq!(aggregator.commits_seen(), 2);
    assert_eq!(aggregator.discarded(), 1);

    let totals = aggregator.finish();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].author, "Bob (b@x.com)");
}

#[test]
fn trailing_header_without_files_is_discarded() {
    let lines = ["+Bob (b@x.com)", "1\t2\tfile", "+Ghost (g@x.com)"];
    let totals = aggregate_lines(lines, per_commit()).unwrap();
    assert_eq!(totals.len(), 1);
    assert_eq!(summary(&totals[0]), ("Bob (b@x.com)", 1, 2, 1, 1, -1));
}

#[test]
fn blank_lines_do_not_change_the_result() {
    let plain = aggregate_lines(EXAMPLE, incremental()).unwrap();

    let mut padded = vec!["", "   "];
    for line in EXAMPLE {
        padded.push(*line);
        padded.push("");
        padded.push("\t");
    }
    let with_blanks = aggregate_lines(padded, incremental()).unwrap();

    assert_eq!(plain, with_blanks);
}

#[test]
fn empty_stream_yields_empty_report() {
    let totals = aggregate_lines(Vec::<String>::new(), incremental()).unwrap();
    assert!(totals.is_empty());
    assert!(Report::new(totals, SortKey::Files).is_empty());
}

#[test]
fn malformed_line_aborts_with_its_position() {
    let lines = ["+Alice (a@x.com)", "3\t1\tfoo.txt", "abc\tdef\tfile.txt", "1\t1\tlater.txt"];
    let err = aggregate_lines(lines, incremental()).unwrap_err();
    match err {
        RankError::MalformedLogLine { line_no, line } => {
            assert_eq!(line_no, 3);
            assert_eq!(line, "abc\tdef\tfile.txt");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_count_field_is_malformed() {
    let lines = ["+Alice (a@x.com)", "\t1\tfoo.txt"];
    assert!(matches!(
        aggregate_lines(lines, incremental()),
        Err(RankError::MalformedLogLine { line_no: 2, .. })
    ));
}

#[test]
fn file_line_before_any_header_is_malformed() {
    let lines = ["1\t1\torphan.txt"];
    assert!(matches!(
        aggregate_lines(lines, incremental()),
        Err(RankError::MalformedLogLine { line_no: 1, .. })
    ));
}

#[test]
fn binary_files_are_skipped_by_default() {
    let lines = ["+Ann (a@x.com)", "-\t-\tlogo.png", "+Ben (b@x.com)", "-\t-\ticon.png", "4\t0\tREADME"];
    let totals = aggregate_lines(lines, incremental()).unwrap();
    assert_eq!(totals.len(), 1);
    assert_eq!(summary(&totals[0]), ("Ben (b@x.com)", 4, 0, 1, 1, 4));
}

#[test]
fn binary_files_can_be_counted_with_zero_lines() {
    let options = AggregateOptions {
        binary: BinaryPolicy::Count,
        ..AggregateOptions::default()
    };
    let lines = ["+Ann (a@x.com)", "-\t-\tlogo.png"];
    let totals = aggregate_lines(lines, options).unwrap();
    assert_eq!(summary(&totals[0]), ("Ann (a@x.com)", 0, 0, 1, 1, 0));
}

#[test]
fn half_binary_counts_are_malformed() {
    let lines = ["+Ann (a@x.com)", "-\t3\tlogo.png"];
    assert!(aggregate_lines(lines, incremental()).is_err());
}

#[test]
fn author_identity_is_verbatim() {
    let lines = [
        "+Alice (a@x.com)",
        "1\t0\ta",
        "+alice (a@x.com)",
        "1\t0\tb",
        "  +Alice (a@x.com)  ",
        "1\t0\tc",
    ];
    let totals = aggregate_lines(lines, incremental()).unwrap();
    assert_eq!(totals.len(), 2);
    assert_eq!(find(&totals, "Alice (a@x.com)").files_changed(), 2);
    assert_eq!(find(&totals, "alice (a@x.com)").files_changed(), 1);
}

#[test]
fn authors_keep_first_seen_order() {
    let lines = ["+Z", "1\t0\ta", "+M", "1\t0\ta", "+A", "1\t0\ta"];
    let totals = aggregate_lines(lines, incremental()).unwrap();
    let names: Vec<&str> = totals.iter().map(|t| t.author.as_str()).collect();
    assert_eq!(names, ["Z", "M", "A"]);
}

#[test]
fn classify_line_recognizes_each_kind() {
    assert_eq!(classify_line("+Name (n@x)"), Some(LogLine::Header("Name (n@x)")));
    assert_eq!(
        classify_line("12\t3\tsrc/{old => new}.rs"),
        Some(LogLine::FileStat {
            added: 12,
            removed: 3,
            path: "src/{old => new}.rs"
        })
    );
    assert_eq!(
        classify_line("1\t2\tpath\twith\ttabs"),
        Some(LogLine::FileStat {
            added: 1,
            removed: 2,
            path: "path\twith\ttabs"
        })
    );
    assert_eq!(classify_line("-\t-\tbin.dat"), Some(LogLine::BinaryFileStat { path: "bin.dat" }));
    assert_eq!(classify_line("1\t2"), None);
    assert_eq!(classify_line("x1\t2\tfile"), None);
    assert_eq!(classify_line("+1\t2\tfile"), Some(LogLine::Header("1\t2\tfile")));
}
