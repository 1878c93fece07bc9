//! # Models
//!
//! This module contains the provider-agnostic data models exchanged between the
//! repository providers and the PR Metrics core.
//!
//! Providers translate their own REST payloads into these types so that no
//! GitHub or Azure Repos specific shape leaks into the classifier or the
//! comment reconciler.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// The open/closed state of a comment thread.
///
/// Used as a proxy for "this pull request needs attention". Providers that
/// do not track thread states report `None` wherever a status is optional.
///
/// # Examples
///
/// ```
/// use pr_metrics_developer_platforms::models::ThreadStatus;
///
/// assert_eq!(ThreadStatus::Active.to_string(), "active");
/// assert_eq!(ThreadStatus::Closed.to_string(), "closed");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadStatus {
    /// The thread still requires attention
    Active,

    /// The thread has been resolved
    Closed,
}

impl ThreadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadStatus::Active => "active",
            ThreadStatus::Closed => "closed",
        }
    }
}

impl std::fmt::Display for ThreadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A comment thread on the pull request that is not tied to a file.
///
/// # Examples
///
/// ```
/// use pr_metrics_developer_platforms::models::{PullRequestComment, ThreadStatus};
///
/// let comment = PullRequestComment {
///     id: 17,
///     content: "# PR Metrics\n...".to_string(),
///     status: Some(ThreadStatus::Closed),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestComment {
    /// The provider assigned thread ID
    pub id: u64,

    /// The content of the first comment in the thread
    pub content: String,

    /// The thread status, if the provider tracks one
    pub status: Option<ThreadStatus>,
}

/// A comment thread anchored to a specific file of the pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileComment {
    /// The provider assigned thread ID
    pub id: u64,

    /// The content of the first comment in the thread
    pub content: String,

    /// The thread status, if the provider tracks one
    pub status: Option<ThreadStatus>,

    /// The path of the file the thread is anchored to, as reported by the
    /// provider. Azure Repos prefixes paths with `/`.
    pub file_name: String,
}

/// Snapshot of all comment threads currently on a pull request.
///
/// The order of both lists is the order in which the provider returned the
/// threads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentData {
    /// Threads that are not tied to a file
    pub pull_request_comments: Vec<PullRequestComment>,

    /// Threads that are tied to a file
    pub file_comments: Vec<FileComment>,
}

/// The title and description of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestDetails {
    /// The title of the pull request
    pub title: String,

    /// The description of the pull request, if any
    pub description: Option<String>,
}

/// A key/value pair stored against the pull request.
///
/// # Examples
///
/// ```
/// use pr_metrics_developer_platforms::models::MetadataEntry;
///
/// let entry = MetadataEntry::new("Size", "XS");
/// assert_eq!(entry.key, "Size");
/// assert_eq!(entry.value, "XS");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
}

impl MetadataEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
