use std::fs;
use std::path::Path;
use std::process::Command;

use tracing::{debug, error};

use crate::errors::CliError;

#[cfg(test)]
#[path = "diff_source_tests.rs"]
mod tests;

/// The arguments passed to `git` to produce the diff summary of a branch
pub fn git_diff_arguments(base: &str, head: &str) -> Vec<String> {
    vec![
        "diff".to_string(),
        "--numstat".to_string(),
        "--ignore-all-space".to_string(),
        format!("{}...{}", base, head),
    ]
}

/// Read the `git diff --numstat` summary, either from a file or by running
/// `git` in the current directory.
pub fn read_diff_summary(
    diff_file: Option<&Path>,
    base: &str,
    head: &str,
) -> Result<String, CliError> {
    match diff_file {
        Some(path) => {
            debug!("Reading diff summary from {:?}", path);
            fs::read_to_string(path).map_err(|e| {
                CliError::DiffError(format!("Failed to read diff file {:?}: {}", path, e))
            })
        }
        None => run_git_diff(base, head),
    }
}

/// Runs `git diff --numstat` between the two revisions.
fn run_git_diff(base: &str, head: &str) -> Result<String, CliError> {
    let arguments = git_diff_arguments(base, head);
    debug!(arguments = arguments.join(" "), "Running git");

    let output = Command::new("git")
        .args(&arguments)
        .output()
        .map_err(|e| CliError::DiffError(format!("Failed to run git: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!(
            status = output.status.to_string(),
            stderr = stderr.as_ref(),
            "git diff failed"
        );
        return Err(CliError::DiffError(format!(
            "git diff failed with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    String::from_utf8(output.stdout)
        .map_err(|e| CliError::DiffError(format!("git diff returned invalid UTF-8: {}", e)))
}
