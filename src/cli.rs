use crate::model::{BinaryPolicy, FoldMode, SortKey};
use anyhow::Result;
use clap::{Args, Parser};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "git-rank")]
#[command(about = "Rank git authors by files changed, commits and lines added/removed")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[clap(flatten)]
    pub rank: RankArgs,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity (-v, -vv, -vvv)")]
    pub verbose: u8,
}

#[derive(Args, Clone, Debug, Default)]
pub struct CommonArgs {
    #[arg(long, help = "Path to git repository")]
    pub repo: Option<PathBuf>,

    #[arg(long, help = "Leave merge commits out of the log")]
    pub no_merges: bool,

    #[arg(long, help = "Count binary files as changed files with zero lines")]
    pub binary: bool,

    #[arg(long, help = "Start from this commit or date (RFC3339, YYYY-MM-DD, or natural language)")]
    pub since: Option<String>,

    #[arg(long, help = "End at this commit or date (RFC3339, YYYY-MM-DD, or natural language)")]
    pub until: Option<String>,
}

#[derive(Args, Clone, Debug, Default)]
pub struct RankArgs {
    #[arg(long, value_enum, default_value_t = SortKey::Files, help = "Column to rank authors by")]
    pub sort: SortKey,

    #[arg(long, help = "Only show authors whose name or email contains this text")]
    pub author: Option<String>,

    #[arg(long, help = "Show at most this many authors")]
    pub top: Option<usize>,

    #[arg(long, help = "Fold each commit once instead of after every file line")]
    pub per_commit: bool,

    #[arg(long, help = "Output as JSON", conflicts_with = "ndjson")]
    pub json: bool,

    #[arg(long, help = "Output as NDJSON")]
    pub ndjson: bool,
}

impl CommonArgs {
    pub fn binary_policy(&self) -> BinaryPolicy {
        if self.binary {
            BinaryPolicy::Count
        } else {
            BinaryPolicy::Skip
        }
    }
}

impl RankArgs {
    pub fn fold_mode(&self) -> FoldMode {
        if self.per_commit {
            FoldMode::PerCommit
        } else {
            FoldMode::Incremental
        }
    }
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        crate::rank::exec(self.common, self.rank)
    }
}
