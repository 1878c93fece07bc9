use super::*;
use std::process::{ExitCode, Termination};

#[test]
fn test_config_error_display() {
    let err = CliError::ConfigError("bad config".to_string());
    assert_eq!(format!("{}", err), "Configuration error: bad config");
}

#[test]
fn test_diff_error_display() {
    let err = CliError::DiffError("no changes".to_string());
    assert_eq!(format!("{}", err), "Diff error: no changes");
}

#[test]
fn test_update_failed_display() {
    let err = CliError::UpdateFailed("1 of 3 operations failed".to_string());
    assert_eq!(format!("{}", err), "Update failed: 1 of 3 operations failed");
}

#[test]
fn test_from_pr_metrics_error_line_count_overflow() {
    let err: CliError = PrMetricsError::LineCountOverflow("b.rs".to_string()).into();
    assert!(matches!(err, CliError::DiffError(_)));
}

#[test]
fn test_from_pr_metrics_error_empty_diff() {
    let err: CliError = PrMetricsError::EmptyDiff.into();
    assert!(matches!(err, CliError::DiffError(_)));
}

#[test]
fn test_from_pr_metrics_error_malformed_line() {
    let err: CliError = PrMetricsError::MalformedDiffLine("10\tfile.ts".to_string()).into();
    match err {
        CliError::DiffError(message) => assert!(message.contains("10\tfile.ts")),
        other => panic!("Unexpected error: {:?}", other),
    }
}

#[test]
fn test_from_pr_metrics_error_invalid_pattern() {
    let err: CliError = PrMetricsError::InvalidFilePattern {
        pattern: "[".to_string(),
        reason: "unclosed character class".to_string(),
    }
    .into();
    assert!(matches!(err, CliError::ConfigError(_)));
}

#[test]
fn test_from_pr_metrics_error_provider_failures() {
    let read: CliError = PrMetricsError::GitProviderError("timeout".to_string()).into();
    let write: CliError = PrMetricsError::FailedToUpdatePullRequest("denied".to_string()).into();

    assert!(matches!(read, CliError::NetworkError(_)));
    assert!(matches!(write, CliError::UpdateFailed(_)));
}

#[test]
fn test_exit_codes() {
    let code = |err: CliError| format!("{:?}", err.report());
    let expected = |code: ExitCode| format!("{:?}", code);

    assert_eq!(code(CliError::UpdateFailed(String::new())), expected(ExitCode::from(1)));
    assert_eq!(code(CliError::ConfigError(String::new())), expected(ExitCode::from(2)));
    assert_eq!(code(CliError::AuthError(String::new())), expected(ExitCode::from(3)));
    assert_eq!(code(CliError::NetworkError(String::new())), expected(ExitCode::from(4)));
    assert_eq!(code(CliError::InvalidArguments(String::new())), expected(ExitCode::from(5)));
    assert_eq!(code(CliError::DiffError(String::new())), expected(ExitCode::from(6)));
    assert_eq!(code(CliError::Other(String::new())), expected(ExitCode::FAILURE));
}
