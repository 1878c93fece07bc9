//! # Diff Parsing
//!
//! Parses the output of `git diff --numstat` into per-file added-line counts.
//!
//! Each line of the summary holds three tab separated fields: lines added,
//! lines deleted and the path. Binary files report `-` for both counts.
//! Renamed files use either the `prefix{old => new}suffix` or the
//! `old => new` form, which are collapsed to the new path.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::errors::PrMetricsError;

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;

lazy_static! {
    static ref BRACED_RENAME_REGEX: Regex =
        Regex::new(r"\{[^{}]*? => ([^{}]*?)\}").expect("Failed to compile braced rename regex");
    static ref BARE_RENAME_REGEX: Regex =
        Regex::new(r"^.*? => (.*)$").expect("Failed to compile rename regex");
}

/// The number of lines added to a single file.
///
/// # Examples
///
/// ```
/// use pr_metrics_core::diff::parse_diff_summary;
///
/// let metrics = parse_diff_summary("10\t2\tsrc/lib.rs\n").unwrap();
/// assert_eq!(metrics[0].file_name, "src/lib.rs");
/// assert_eq!(metrics[0].lines_added, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetric {
    /// The path of the file after any rename
    pub file_name: String,

    /// The number of lines added. Zero for binary files.
    pub lines_added: u64,
}

/// Parses a `git diff --numstat` summary.
///
/// # Errors
///
/// * [`PrMetricsError::EmptyDiff`] if the summary is empty or only whitespace
/// * [`PrMetricsError::MalformedDiffLine`] if a line does not have exactly
///   three tab separated fields
/// * [`PrMetricsError::InvalidLineCount`] if the added line count is neither
///   a number nor `-`
pub fn parse_diff_summary(summary: &str) -> Result<Vec<FileMetric>, PrMetricsError> {
    if summary.trim().is_empty() {
        return Err(PrMetricsError::EmptyDiff);
    }

    let mut lines: Vec<&str> = summary
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    let mut result = Vec::with_capacity(lines.len());
    for line in lines {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 3 {
            return Err(PrMetricsError::MalformedDiffLine(line.to_string()));
        }

        let lines_added = parse_lines_added(fields[0], line)?;
        let file_name = normalize_file_name(fields[2]);

        debug!(file = file_name.as_str(), lines_added, "Parsed diff entry");
        result.push(FileMetric {
            file_name,
            lines_added,
        });
    }

    Ok(result)
}

fn parse_lines_added(token: &str, line: &str) -> Result<u64, PrMetricsError> {
    if token == "-" {
        return Ok(0);
    }

    token
        .parse::<u64>()
        .map_err(|_| PrMetricsError::InvalidLineCount {
            token: token.to_string(),
            line: line.to_string(),
        })
}

/// Collapses the rename syntax used by `git diff --numstat` to the final path.
///
/// # Examples
///
/// ```
/// use pr_metrics_core::diff::normalize_file_name;
///
/// assert_eq!(normalize_file_name("src/{old => new}/lib.rs"), "src/new/lib.rs");
/// assert_eq!(normalize_file_name("old.rs => new.rs"), "new.rs");
/// assert_eq!(normalize_file_name("src/lib.rs"), "src/lib.rs");
/// ```
pub fn normalize_file_name(path_spec: &str) -> String {
    let mut file_name = path_spec.to_string();
    while BRACED_RENAME_REGEX.is_match(&file_name) {
        file_name = BRACED_RENAME_REGEX
            .replace_all(&file_name, "$1")
            .into_owned();
    }

    if let Some(captures) = BARE_RENAME_REGEX.captures(&file_name) {
        file_name = captures[1].to_string();
    }

    while file_name.contains("//") {
        file_name = file_name.replace("//", "/");
    }

    file_name
}
