use pr_metrics_core::errors::PrMetricsError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Authentication error
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// The diff could not be read or parsed
    #[error("Diff error: {0}")]
    DiffError(String),

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Invalid arguments
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// One or more updates to the pull request failed
    #[error("Update failed: {0}")]
    UpdateFailed(String),

    /// Other errors
    #[error("Error: {0}")]
    Other(String),
}

impl From<PrMetricsError> for CliError {
    fn from(err: PrMetricsError) -> Self {
        match err {
            PrMetricsError::InvalidFilePattern { .. } => CliError::ConfigError(err.to_string()),
            PrMetricsError::EmptyDiff
            | PrMetricsError::InvalidLineCount { .. }
            | PrMetricsError::LineCountOverflow(_)
            | PrMetricsError::MalformedDiffLine(_) => CliError::DiffError(err.to_string()),
            PrMetricsError::GitProviderError(_) => CliError::NetworkError(err.to_string()),
            PrMetricsError::FailedToUpdatePullRequest(_) => CliError::UpdateFailed(err.to_string()),
        }
    }
}

impl std::process::Termination for CliError {
    fn report(self) -> std::process::ExitCode {
        match self {
            CliError::UpdateFailed(_) => std::process::ExitCode::from(1),
            CliError::ConfigError(_) => std::process::ExitCode::from(2),
            CliError::AuthError(_) => std::process::ExitCode::from(3),
            CliError::NetworkError(_) => std::process::ExitCode::from(4),
            CliError::InvalidArguments(_) => std::process::ExitCode::from(5),
            CliError::DiffError(_) => std::process::ExitCode::from(6),
            CliError::Other(_) => std::process::ExitCode::FAILURE,
        }
    }
}
