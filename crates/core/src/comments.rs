//! # Comment State
//!
//! Reads the comment threads already present on a pull request and works out
//! which of them were posted by an earlier run.
//!
//! The working set starts from the files the classifier flagged as not
//! requiring a review. Every existing "no review required" thread on such a
//! file removes the file from the set, since it already has its comment. A
//! "no review required" thread on any other file is stale and is queued for
//! deletion.

use pr_metrics_developer_platforms::models::{
    CommentData, FileComment, PullRequestComment, ThreadStatus,
};
use tracing::{debug, warn};

use crate::classifier::ClassificationResult;
use crate::config::{METRICS_COMMENT_TITLE, NO_REVIEW_REQUIRED_COMMENT};

#[cfg(test)]
#[path = "comments_tests.rs"]
mod tests;

/// The comment state of a pull request after inspecting its threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestCommentsData {
    /// The thread holding the metrics comment, if one was found
    pub metrics_comment_thread_id: Option<u64>,

    /// The status of the metrics thread. `None` if there is no metrics thread
    /// or the provider does not track statuses.
    pub metrics_comment_thread_status: Option<ThreadStatus>,

    /// The current content of the metrics comment
    pub metrics_comment_content: Option<String>,

    /// Files with added lines that still need a "no review required" comment
    pub files_not_requiring_review: Vec<String>,

    /// Files without added lines that still need a "no review required" comment
    pub deleted_files_not_requiring_review: Vec<String>,

    /// Stale "no review required" threads
    pub comment_threads_requiring_deletion: Vec<u64>,
}

impl PullRequestCommentsData {
    pub fn new(
        files_not_requiring_review: Vec<String>,
        deleted_files_not_requiring_review: Vec<String>,
    ) -> Self {
        Self {
            files_not_requiring_review,
            deleted_files_not_requiring_review,
            ..Self::default()
        }
    }

    /// Builds the comment state from the classification of the diff and the
    /// threads currently on the pull request.
    pub fn from_comments(comments: &CommentData, classification: &ClassificationResult) -> Self {
        let mut data = Self::new(
            classification.files_not_requiring_review.clone(),
            classification.deleted_files_not_requiring_review.clone(),
        );

        for comment in &comments.pull_request_comments {
            data.inspect_pull_request_comment(comment);
        }

        for comment in &comments.file_comments {
            data.inspect_file_comment(comment);
        }

        data
    }

    fn inspect_pull_request_comment(&mut self, comment: &PullRequestComment) {
        if comment.content.is_empty() || !comment.content.starts_with(METRICS_COMMENT_TITLE) {
            return;
        }

        // Later metrics comments are left untouched.
        if self.metrics_comment_thread_id.is_some() {
            debug!(
                thread_id = comment.id,
                "Ignoring additional metrics comment"
            );
            return;
        }

        debug!(thread_id = comment.id, "Found metrics comment");
        self.metrics_comment_thread_id = Some(comment.id);
        self.metrics_comment_thread_status = comment.status;
        self.metrics_comment_content = Some(comment.content.clone());
    }

    fn inspect_file_comment(&mut self, comment: &FileComment) {
        if comment.content.is_empty() {
            return;
        }

        let file_name = comment
            .file_name
            .strip_prefix('/')
            .unwrap_or(&comment.file_name);
        if file_name.len() <= 1 {
            warn!(
                thread_id = comment.id,
                file = comment.file_name.as_str(),
                "Skipping comment thread with a malformed file path"
            );
            return;
        }

        if comment.content != NO_REVIEW_REQUIRED_COMMENT {
            return;
        }

        if let Some(index) = self
            .files_not_requiring_review
            .iter()
            .position(|f| f == file_name)
        {
            self.files_not_requiring_review.remove(index);
        } else if let Some(index) = self
            .deleted_files_not_requiring_review
            .iter()
            .position(|f| f == file_name)
        {
            self.deleted_files_not_requiring_review.remove(index);
        } else {
            debug!(
                thread_id = comment.id,
                file = file_name,
                "Found stale comment thread"
            );
            self.comment_threads_requiring_deletion.push(comment.id);
        }
    }
}
