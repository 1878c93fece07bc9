//! # Comment Reconciliation
//!
//! Turns the inspected comment state into the minimal set of comment
//! operations needed to bring the pull request up to date. Running the plan
//! against an unchanged pull request yields no operations.

use std::fmt;

use pr_metrics_developer_platforms::models::{MetadataEntry, ThreadStatus};

use crate::comments::PullRequestCommentsData;

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;

/// A single change to the comment threads of a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentOperation {
    /// Post the metrics comment in a new thread
    CreateMetricsComment {
        content: String,
        status: ThreadStatus,
    },

    /// Update the existing metrics thread. Fields that did not change are
    /// `None`.
    UpdateMetricsComment {
        thread_id: u64,
        content: Option<String>,
        status: Option<ThreadStatus>,
    },

    /// Post a closed "no review required" thread on a file
    CreateFileComment {
        file_name: String,
        is_file_deleted: bool,
    },

    /// Remove a stale "no review required" thread
    DeleteCommentThread { thread_id: u64 },
}

impl fmt::Display for CommentOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentOperation::CreateMetricsComment { status, .. } => {
                write!(f, "create metrics comment ({})", status)
            }
            CommentOperation::UpdateMetricsComment { thread_id, .. } => {
                write!(f, "update metrics comment {}", thread_id)
            }
            CommentOperation::CreateFileComment { file_name, .. } => {
                write!(f, "create comment on '{}'", file_name)
            }
            CommentOperation::DeleteCommentThread { thread_id } => {
                write!(f, "delete comment thread {}", thread_id)
            }
        }
    }
}

/// Plans the comment operations for a run.
///
/// The metrics comment is created when missing and otherwise updated only in
/// the parts that differ. A stored status of `None` means the provider does
/// not track statuses, so it never causes a status update.
///
/// # Examples
///
/// ```
/// use pr_metrics_core::comments::PullRequestCommentsData;
/// use pr_metrics_core::reconcile::{plan_comment_operations, CommentOperation};
/// use pr_metrics_developer_platforms::models::{MetadataEntry, ThreadStatus};
///
/// let data = PullRequestCommentsData {
///     metrics_comment_thread_id: Some(4),
///     metrics_comment_thread_status: Some(ThreadStatus::Closed),
///     metrics_comment_content: Some("# PR Metrics".to_string()),
///     ..PullRequestCommentsData::default()
/// };
///
/// assert!(plan_comment_operations(&data, "# PR Metrics", ThreadStatus::Closed).is_empty());
/// assert_eq!(
///     plan_comment_operations(&data, "# PR Metrics", ThreadStatus::Active),
///     vec![CommentOperation::UpdateMetricsComment {
///         thread_id: 4,
///         content: None,
///         status: Some(ThreadStatus::Active),
///     }]
/// );
/// ```
pub fn plan_comment_operations(
    data: &PullRequestCommentsData,
    metrics_comment: &str,
    status: ThreadStatus,
) -> Vec<CommentOperation> {
    let mut operations = Vec::new();

    match data.metrics_comment_thread_id {
        None => operations.push(CommentOperation::CreateMetricsComment {
            content: metrics_comment.to_string(),
            status,
        }),
        Some(thread_id) => {
            let content = match &data.metrics_comment_content {
                Some(existing) if existing == metrics_comment => None,
                _ => Some(metrics_comment.to_string()),
            };
            let status = match data.metrics_comment_thread_status {
                Some(existing) if existing != status => Some(status),
                _ => None,
            };

            if content.is_some() || status.is_some() {
                operations.push(CommentOperation::UpdateMetricsComment {
                    thread_id,
                    content,
                    status,
                });
            }
        }
    }

    operations.extend(data.files_not_requiring_review.iter().map(|file_name| {
        CommentOperation::CreateFileComment {
            file_name: file_name.clone(),
            is_file_deleted: false,
        }
    }));
    operations.extend(
        data.deleted_files_not_requiring_review
            .iter()
            .map(|file_name| CommentOperation::CreateFileComment {
                file_name: file_name.clone(),
                is_file_deleted: true,
            }),
    );
    operations.extend(
        data.comment_threads_requiring_deletion
            .iter()
            .map(|&thread_id| CommentOperation::DeleteCommentThread { thread_id }),
    );

    operations
}

/// Whether the metadata stored on the pull request differs from `desired`.
///
/// `stored` is `None` for providers without a property store, which never
/// need an update. Stored keys that are not part of `desired` are ignored.
pub fn metadata_requires_update(
    desired: &[MetadataEntry],
    stored: Option<&[MetadataEntry]>,
) -> bool {
    match stored {
        None => false,
        Some(stored) => desired.iter().any(|entry| !stored.contains(entry)),
    }
}
