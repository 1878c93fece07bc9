use std::path::PathBuf;

use clap::Args;

/// Offline analysis of a diff
pub mod analyze;
/// Full run against a pull request
pub mod run;

/// Where to read the diff summary from
#[derive(Args, Debug, Clone)]
pub struct DiffArgs {
    /// Read the `git diff --numstat` summary from this file instead of running git
    #[arg(long)]
    pub diff_file: Option<PathBuf>,

    /// Target branch of the pull request
    #[arg(long, default_value = "origin/main")]
    pub base: String,

    /// Source branch or commit of the pull request
    #[arg(long, default_value = "HEAD")]
    pub head: String,
}
