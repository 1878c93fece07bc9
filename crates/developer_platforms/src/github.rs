use async_trait::async_trait;
use octocrab::{Octocrab, Page};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    errors::Error,
    models::{
        CommentData, FileComment, MetadataEntry, PullRequestComment, PullRequestDetails,
        ThreadStatus,
    },
    RepositoryApi,
};

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;

/// The public GitHub REST API endpoint.
pub const GITHUB_API_URL: &str = "https://api.github.com";

const PAGE_SIZE: u8 = 100;

#[derive(Debug, Deserialize)]
struct GitHubIssueComment {
    id: Option<u64>,
    body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubReviewComment {
    id: Option<u64>,
    body: Option<String>,
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubCommitRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GitHubPullRequest {
    title: Option<String>,
    body: Option<String>,
    head: GitHubCommitRef,
}

fn log_octocrab_error(message: &str, e: &octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, .. } => error!(
            error_message = source.message.as_str(),
            status = source.status_code.as_u16(),
            "{}. Received an error from GitHub",
            message
        ),
        octocrab::Error::Serde { source, .. } => error!(
            error_message = source.to_string(),
            "{}. The response was malformed.",
            message
        ),
        octocrab::Error::Json { source, .. } => error!(
            error_message = source.to_string(),
            "{}. The response was malformed.",
            message
        ),
        _ => error!(error_message = e.to_string(), "{}", message),
    };
}

/// Logs an octocrab error and maps it onto the provider error model.
fn map_octocrab_error(message: &str, e: octocrab::Error) -> Error {
    log_octocrab_error(message, &e);
    match e {
        octocrab::Error::GitHub { source, .. } => {
            Error::from_status(source.status_code.as_u16(), message)
        }
        octocrab::Error::Serde { .. } | octocrab::Error::Json { .. } => Error::InvalidResponse,
        _ => Error::ApiError(format!("{}: {}", message, e)),
    }
}

/// Repository provider for pull requests hosted on GitHub.
///
/// Issue comments on the pull request are reported as pull request comments
/// and review comments as file comments. GitHub has no thread states, so all
/// statuses are reported as `None` and status updates are ignored. GitHub has
/// no property store either, so metadata is not persisted.
pub struct GitHubProvider {
    client: Octocrab,
    base_url: String,
    repo_owner: String,
    repo_name: String,
    pr_number: u64,
}

impl std::fmt::Debug for GitHubProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubProvider")
            .field("base_url", &self.base_url)
            .field("repo_owner", &self.repo_owner)
            .field("repo_name", &self.repo_name)
            .field("pr_number", &self.pr_number)
            .finish()
    }
}

impl GitHubProvider {
    /// Creates a provider for the given pull request on github.com.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use pr_metrics_developer_platforms::github::GitHubProvider;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let provider = GitHubProvider::new("ghp_token", "octocat", "hello-world", 42).unwrap();
    /// # }
    /// ```
    pub fn new(
        token: &str,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<Self, Error> {
        Self::with_base_url(GITHUB_API_URL, token, repo_owner, repo_name, pr_number)
    }

    /// Creates a provider that talks to a specific API endpoint, e.g. a
    /// GitHub Enterprise Server instance.
    #[instrument(skip(token))]
    pub fn with_base_url(
        base_url: &str,
        token: &str,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<Self, Error> {
        let base_url = base_url.trim_end_matches('/');
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(base_url)
            .map_err(|e| map_octocrab_error("Failed to set the GitHub API URL", e))?
            .build()
            .map_err(|e| map_octocrab_error("Failed to create the GitHub client", e))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            repo_owner: repo_owner.to_string(),
            repo_name: repo_name.to_string(),
            pr_number,
        })
    }

    fn repo_path(&self) -> String {
        format!(
            "/repos/{}/{}",
            urlencoding::encode(&self.repo_owner),
            urlencoding::encode(&self.repo_name)
        )
    }

    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        route: &str,
        context: &str,
    ) -> Result<Vec<T>, Error> {
        let first_page: Page<T> = self
            .client
            .get(route, Some(&[("per_page", PAGE_SIZE)][..]))
            .await
            .map_err(|e| map_octocrab_error(context, e))?;

        self.client
            .all_pages(first_page)
            .await
            .map_err(|e| map_octocrab_error(context, e))
    }

    async fn get_pull_request(&self) -> Result<GitHubPullRequest, Error> {
        let route = format!("{}/pulls/{}", self.repo_path(), self.pr_number);
        self.client
            .get(route, None::<&()>)
            .await
            .map_err(|e| map_octocrab_error("Failed to get pull request information", e))
    }
}

#[async_trait]
impl RepositoryApi for GitHubProvider {
    #[instrument]
    async fn get_comments(&self) -> Result<CommentData, Error> {
        let issue_route = format!("{}/issues/{}/comments", self.repo_path(), self.pr_number);
        let review_route = format!("{}/pulls/{}/comments", self.repo_path(), self.pr_number);

        let (issue_comments, review_comments) = tokio::try_join!(
            self.get_all_pages::<GitHubIssueComment>(&issue_route, "Failed to list PR comments"),
            self.get_all_pages::<GitHubReviewComment>(
                &review_route,
                "Failed to list PR review comments"
            ),
        )?;

        let mut result = CommentData::default();
        for comment in issue_comments {
            let Some(id) = comment.id else {
                warn!(
                    pull_request = self.pr_number,
                    "Skipping a pull request comment without an ID"
                );
                continue;
            };

            result.pull_request_comments.push(PullRequestComment {
                id,
                content: comment.body.unwrap_or_default(),
                status: None,
            });
        }

        for comment in review_comments {
            let Some(id) = comment.id else {
                warn!(
                    pull_request = self.pr_number,
                    "Skipping a review comment without an ID"
                );
                continue;
            };

            result.file_comments.push(FileComment {
                id,
                content: comment.body.unwrap_or_default(),
                status: None,
                file_name: comment.path.unwrap_or_default(),
            });
        }

        debug!(
            pull_request = self.pr_number,
            pull_request_comments = result.pull_request_comments.len(),
            file_comments = result.file_comments.len(),
            "Retrieved comments"
        );

        Ok(result)
    }

    #[instrument(skip(content))]
    async fn create_comment(
        &self,
        content: &str,
        status: ThreadStatus,
        file_name: Option<&str>,
        is_file_deleted: bool,
    ) -> Result<(), Error> {
        debug!(
            pull_request = self.pr_number,
            status = status.as_str(),
            "GitHub does not track comment states. Ignoring the requested status."
        );

        let created: Result<serde_json::Value, octocrab::Error> = match file_name {
            None => {
                let route = format!("{}/issues/{}/comments", self.repo_path(), self.pr_number);
                let body = json!({ "body": content });
                self.client.post(route, Some(&body)).await
            }
            Some(file_name) => {
                let pull_request = self.get_pull_request().await?;
                let mut body = json!({
                    "body": content,
                    "commit_id": pull_request.head.sha,
                    "path": file_name,
                    "subject_type": "file",
                });
                if is_file_deleted {
                    body["side"] = json!("LEFT");
                }

                let route = format!("{}/pulls/{}/comments", self.repo_path(), self.pr_number);
                self.client.post(route, Some(&body)).await
            }
        };

        created.map_err(|e| {
            log_octocrab_error("Failed to add pull request comment", &e);
            Error::FailedToUpdatePullRequest(format!("Failed to add comment: {}", e))
        })?;

        info!(
            pull_request = self.pr_number,
            file = file_name.unwrap_or_default(),
            "Created comment"
        );
        Ok(())
    }

    #[instrument(skip(content))]
    async fn update_comment(
        &self,
        thread_id: u64,
        content: Option<&str>,
        status: Option<ThreadStatus>,
    ) -> Result<(), Error> {
        if status.is_some() {
            debug!(
                pull_request = self.pr_number,
                thread = thread_id,
                "GitHub does not track comment states. Ignoring the requested status."
            );
        }

        let Some(content) = content else {
            return Ok(());
        };

        let route = format!("{}/issues/comments/{}", self.repo_path(), thread_id);
        let body = json!({ "body": content });
        let _: serde_json::Value = self
            .client
            .patch(route, Some(&body))
            .await
            .map_err(|e| {
                log_octocrab_error("Failed to update pull request comment", &e);
                Error::FailedToUpdatePullRequest(format!("Failed to update comment: {}", e))
            })?;

        info!(
            pull_request = self.pr_number,
            thread = thread_id,
            "Updated comment"
        );
        Ok(())
    }

    #[instrument]
    async fn delete_comment_thread(&self, thread_id: u64) -> Result<(), Error> {
        let route = format!("{}/pulls/comments/{}", self.repo_path(), thread_id);
        let response = self
            .client
            ._delete(route, None::<&()>)
            .await
            .map_err(|e| {
                log_octocrab_error("Failed to delete review comment", &e);
                Error::FailedToUpdatePullRequest(format!("Failed to delete comment: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                repository_owner = self.repo_owner.as_str(),
                repository = self.repo_name.as_str(),
                thread = thread_id,
                status = status.as_u16(),
                "Failed to delete review comment",
            );
            return Err(Error::FailedToUpdatePullRequest(format!(
                "Failed to delete comment: {}",
                Error::from_status(status.as_u16(), "Deleting the review comment")
            )));
        }

        info!(
            pull_request = self.pr_number,
            thread = thread_id,
            "Deleted comment"
        );
        Ok(())
    }

    #[instrument]
    async fn get_title_and_description(&self) -> Result<PullRequestDetails, Error> {
        let pr = self.get_pull_request().await?;
        Ok(PullRequestDetails {
            title: pr.title.unwrap_or_default(),
            description: pr.body,
        })
    }

    #[instrument]
    async fn set_title_and_description(
        &self,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<(), Error> {
        if title.is_none() && description.is_none() {
            return Ok(());
        }

        let mut body = serde_json::Map::new();
        if let Some(title) = title {
            body.insert("title".to_string(), json!(title));
        }
        if let Some(description) = description {
            body.insert("body".to_string(), json!(description));
        }

        let route = format!("{}/pulls/{}", self.repo_path(), self.pr_number);
        let _: serde_json::Value = self
            .client
            .patch(route, Some(&body))
            .await
            .map_err(|e| {
                log_octocrab_error("Failed to update the pull request", &e);
                Error::FailedToUpdatePullRequest(format!("Failed to update the PR: {}", e))
            })?;

        info!(pull_request = self.pr_number, "Updated title and description");
        Ok(())
    }

    async fn get_metadata(&self) -> Result<Option<Vec<MetadataEntry>>, Error> {
        Ok(None)
    }

    #[instrument(skip(metadata))]
    async fn add_metadata(&self, metadata: &[MetadataEntry]) -> Result<(), Error> {
        debug!(
            pull_request = self.pr_number,
            count = metadata.len(),
            "GitHub has no pull request property store. Skipping metadata."
        );
        Ok(())
    }
}
