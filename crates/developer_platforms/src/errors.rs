#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Error types for developer platform operations.
///
/// This enum represents all possible errors that can occur when reading or
/// writing pull request state on a developer platform such as GitHub or
/// Azure Repos. Each variant provides specific context about the type of
/// failure encountered.
///
/// # Examples
///
/// ```rust
/// use pr_metrics_developer_platforms::errors::Error;
///
/// let auth_error = Error::AuthError("Invalid token".to_string());
/// assert_eq!(auth_error.to_string(), "Authentication failed: Invalid token");
///
/// let rate_limit = Error::RateLimitExceeded;
/// assert_eq!(rate_limit.to_string(), "Rate limit exceeded");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Generic API request failure.
    ///
    /// The request reached the platform (or failed in transit) but did not
    /// succeed for a reason that has no more specific variant. The string
    /// carries the HTTP status or transport error.
    #[error("API request failed: {0}")]
    ApiError(String),

    /// Authentication failed with the platform.
    ///
    /// The provided access token is invalid, expired, or lacks the scopes
    /// needed for the requested operation.
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// Failed to update pull request.
    ///
    /// An operation that modifies the pull request (comment, thread status,
    /// title, description or properties) was rejected.
    #[error("Failed to update the PR: {0}")]
    FailedToUpdatePullRequest(String),

    /// Invalid response format from platform API.
    ///
    /// The response body could not be decoded into the expected shape.
    #[error("Invalid response format")]
    InvalidResponse,

    /// The requested resource does not exist.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Platform rate limit exceeded.
    ///
    /// Retrying is left to the caller.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl Error {
    /// Maps a non-success HTTP status code into the matching error variant.
    pub(crate) fn from_status(status: u16, context: &str) -> Self {
        match status {
            401 | 403 => Error::AuthError(format!("{} returned status {}", context, status)),
            404 => Error::NotFound(context.to_string()),
            429 => Error::RateLimitExceeded,
            _ => Error::ApiError(format!("{} returned status {}", context, status)),
        }
    }
}
