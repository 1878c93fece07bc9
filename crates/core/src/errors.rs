use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

#[derive(Error, Debug)]
pub enum PrMetricsError {
    #[error("The git diff summary is empty. There are no changes to analyze.")]
    EmptyDiff,

    #[error("Failed to update pull request. Issue was: '{0}'.")]
    FailedToUpdatePullRequest(String),

    #[error("Git provider error: {0}")]
    GitProviderError(String),

    #[error("Invalid file matching pattern '{pattern}': {reason}")]
    InvalidFilePattern { pattern: String, reason: String },

    #[error("Could not parse added lines '{token}' from git diff summary line '{line}'.")]
    InvalidLineCount { token: String, line: String },

    #[error("The number of added lines overflows when counting file '{0}'.")]
    LineCountOverflow(String),

    #[error("The git diff summary line '{0}' does not contain exactly three tab separated fields.")]
    MalformedDiffLine(String),
}

/// Errors raised while loading the metrics configuration file.
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unsupported configuration schema version: {0}")]
    UnsupportedSchemaVersion(u32),
}
