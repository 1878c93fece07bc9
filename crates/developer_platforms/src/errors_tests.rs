use super::*;
use std::error::Error as StdError;

#[test]
fn test_api_error() {
    let error = Error::ApiError("connection reset".to_string());

    assert_eq!(error.to_string(), "API request failed: connection reset");
    assert!(error.source().is_none());
}

#[test]
fn test_auth_error() {
    let error = Error::AuthError("Invalid credentials".to_string());

    assert_eq!(
        error.to_string(),
        "Authentication failed: Invalid credentials"
    );
    assert!(error.source().is_none());
}

#[test]
fn test_failed_to_update_pull_request_error() {
    let error = Error::FailedToUpdatePullRequest("Network error".to_string());

    assert_eq!(error.to_string(), "Failed to update the PR: Network error");
}

#[test]
fn test_invalid_response_error() {
    let error = Error::InvalidResponse;

    assert_eq!(error.to_string(), "Invalid response format");
}

#[test]
fn test_not_found_error() {
    let error = Error::NotFound("pull request 12".to_string());

    assert_eq!(error.to_string(), "Resource not found: pull request 12");
}

#[test]
fn test_rate_limit_exceeded_error() {
    let error = Error::RateLimitExceeded;

    assert_eq!(error.to_string(), "Rate limit exceeded");
}

#[test]
fn test_from_status_maps_auth_failures() {
    let unauthorized = Error::from_status(401, "get comments");
    let forbidden = Error::from_status(403, "get comments");

    assert!(matches!(unauthorized, Error::AuthError(_)));
    assert!(matches!(forbidden, Error::AuthError(_)));
}

#[test]
fn test_from_status_maps_not_found() {
    let error = Error::from_status(404, "pull request 7");

    assert!(matches!(error, Error::NotFound(ref c) if c == "pull request 7"));
}

#[test]
fn test_from_status_maps_rate_limit() {
    let error = Error::from_status(429, "create comment");

    assert!(matches!(error, Error::RateLimitExceeded));
}

#[test]
fn test_from_status_maps_everything_else_to_api_error() {
    let error = Error::from_status(502, "delete thread");

    match error {
        Error::ApiError(message) => {
            assert!(message.contains("delete thread"));
            assert!(message.contains("502"));
        }
        other => panic!("Unexpected error variant: {:?}", other),
    }
}
