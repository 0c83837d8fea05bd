//! Per-author contribution statistics from `git log --numstat`.
//!
//! The library side is split the same way the binary runs: [`git`] fetches the
//! numstat log, [`aggregate`] folds it into per-author totals, and [`output`]
//! renders the ranked [`model::Report`].

pub mod aggregate;
pub mod cli;
pub mod error;
pub mod git;
pub mod model;
pub mod output;
pub mod rank;
pub mod util;

pub use aggregate::{aggregate_lines, LogAggregator};
pub use error::{RankError, Result};
pub use model::{AuthorTotals, BinaryPolicy, CommitRecord, FoldMode, Report, SortKey};
