//! Azure Repos implementation of [`RepositoryApi`].
//!
//! Talks to the Azure DevOps Git REST API. Every thread on the pull request
//! is read through the `threads` endpoint; threads carrying a file path in
//! their thread context are reported as file comments, the rest as pull
//! request comments.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Response};
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
#[path = "azure_repos_tests.rs"]
mod tests;

const API_VERSION: &str = "7.1";

/// Prefix applied to every metadata key written to the pull request
/// properties.
pub const METADATA_KEY_PREFIX: &str = "PRMetrics.";

/// The ID Azure Repos assigns to the first comment of every thread.
const FIRST_COMMENT_ID: u64 = 1;

#[derive(Debug, Deserialize)]
struct AzureThreadList {
    #[serde(default)]
    value: Vec<AzureThread>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AzureThread {
    id: Option<u64>,
    status: Option<String>,
    thread_context: Option<AzureThreadContext>,
    comments: Option<Vec<AzureComment>>,
    #[serde(default)]
    is_deleted: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AzureThreadContext {
    file_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AzureComment {
    id: Option<u64>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AzurePropertyList {
    #[serde(default)]
    value: BTreeMap<String, AzurePropertyValue>,
}

#[derive(Debug, Deserialize)]
struct AzurePropertyValue {
    #[serde(rename = "$value")]
    value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct AzurePullRequest {
    title: Option<String>,
    description: Option<String>,
}

/// Maps an Azure Repos thread status onto the open/closed model.
///
/// Returns `None` for statuses that carry no open/closed meaning, such as
/// `unknown`.
fn parse_thread_status(status: &str) -> Option<ThreadStatus> {
    match status {
        "active" | "pending" => Some(ThreadStatus::Active),
        "fixed" | "wontFix" | "closed" | "byDesign" => Some(ThreadStatus::Closed),
        _ => None,
    }
}

/// Repository provider for pull requests hosted on Azure Repos.
pub struct AzureReposProvider {
    client: Client,
    pull_request_url: String,
    token: String,
    pr_number: u64,
}

impl std::fmt::Debug for AzureReposProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureReposProvider")
            .field("pull_request_url", &self.pull_request_url)
            .field("pr_number", &self.pr_number)
            .finish()
    }
}

impl AzureReposProvider {
    /// Creates a provider for a pull request in an Azure DevOps project.
    ///
    /// # Arguments
    ///
    /// * `collection_uri` - The organization URL, e.g. `https://dev.azure.com/contoso/`
    /// * `project` - The project that contains the repository
    /// * `repository` - The name or ID of the repository
    /// * `pr_number` - The pull request ID
    /// * `token` - A personal access token or job access token
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use pr_metrics_developer_platforms::azure_repos::AzureReposProvider;
    ///
    /// let provider = AzureReposProvider::new(
    ///     "https://dev.azure.com/contoso/",
    ///     "Fabrikam",
    ///     "website",
    ///     101,
    ///     "token",
    /// )
    /// .unwrap();
    /// ```
    pub fn new(
        collection_uri: &str,
        project: &str,
        repository: &str,
        pr_number: u64,
        token: &str,
    ) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(concat!("pr-metrics/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::ApiError(format!("Failed to create the HTTP client: {}", e)))?;

        let pull_request_url = format!(
            "{}/{}/_apis/git/repositories/{}/pullRequests/{}",
            collection_uri.trim_end_matches('/'),
            urlencoding::encode(project),
            urlencoding::encode(repository),
            pr_number
        );

        Ok(Self {
            client,
            pull_request_url,
            token: token.to_string(),
            pr_number,
        })
    }

    fn request(&self, method: Method, suffix: &str) -> RequestBuilder {
        self.client
            .request(
                method,
                format!(
                    "{}{}?api-version={}",
                    self.pull_request_url, suffix, API_VERSION
                ),
            )
            .basic_auth("", Some(&self.token))
            .header(header::ACCEPT, "application/json")
    }

    async fn send(&self, builder: RequestBuilder, context: &str) -> Result<Response, Error> {
        let response = builder.send().await.map_err(|e| {
            error!(
                pull_request = self.pr_number,
                error = e.to_string(),
                "{}. The request could not be sent.",
                context
            );
            Error::ApiError(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(
                pull_request = self.pr_number,
                status = status.as_u16(),
                "{}. Received an error from Azure Repos",
                context
            );
            return Err(Error::from_status(status.as_u16(), context));
        }

        Ok(response)
    }

    fn convert_threads(&self, threads: Vec<AzureThread>) -> CommentData {
        let mut result = CommentData::default();
        for thread in threads {
            let Some(id) = thread.id else {
                warn!(
                    pull_request = self.pr_number,
                    "Skipping a comment thread without an ID"
                );
                continue;
            };

            if thread.is_deleted {
                continue;
            }

            let Some(first_comment) = thread.comments.and_then(|c| c.into_iter().next()) else {
                warn!(
                    pull_request = self.pr_number,
                    thread = id,
                    "Skipping a comment thread without comments"
                );
                continue;
            };

            if first_comment.id.is_none() {
                warn!(
                    pull_request = self.pr_number,
                    thread = id,
                    "Skipping a comment thread whose first comment has no ID"
                );
                continue;
            }

            let content = first_comment.content.unwrap_or_default();
            let status = thread.status.as_deref().and_then(parse_thread_status);

            match thread.thread_context {
                None => result.pull_request_comments.push(PullRequestComment {
                    id,
                    content,
                    status,
                }),
                Some(context) => result.file_comments.push(FileComment {
                    id,
                    content,
                    status,
                    file_name: context.file_path.unwrap_or_default(),
                }),
            }
        }

        result
    }
}

#[async_trait]
impl RepositoryApi for AzureReposProvider {
    #[instrument]
    async fn get_comments(&self) -> Result<CommentData, Error> {
        let response = self
            .send(
                self.request(Method::GET, "/threads"),
                "Failed to list comment threads",
            )
            .await?;

        let threads: AzureThreadList = response.json().await.map_err(|e| {
            error!(
                pull_request = self.pr_number,
                error = e.to_string(),
                "The comment thread list was malformed"
            );
            Error::InvalidResponse
        })?;

        let result = self.convert_threads(threads.value);
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
        let mut body = json!({
            "comments": [{
                "parentCommentId": 0,
                "content": content,
                "commentType": 1,
            }],
            "status": status.as_str(),
        });

        if let Some(file_name) = file_name {
            let mut context = json!({
                "filePath": format!("/{}", file_name.trim_start_matches('/')),
            });
            let (start, end) = if is_file_deleted {
                ("leftFileStart", "leftFileEnd")
            } else {
                ("rightFileStart", "rightFileEnd")
            };
            context[start] = json!({ "line": 1, "offset": 1 });
            context[end] = json!({ "line": 1, "offset": 2 });
            body["threadContext"] = context;
        }

        let builder = self.request(Method::POST, "/threads").json(&body);
        self.send(builder, "Failed to create comment thread")
            .await
            .map_err(|e| Error::FailedToUpdatePullRequest(e.to_string()))?;

        info!(
            pull_request = self.pr_number,
            file = file_name.unwrap_or_default(),
            status = status.as_str(),
            "Created comment thread"
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
        if let Some(status) = status {
            let builder = self
                .request(Method::PATCH, &format!("/threads/{}", thread_id))
                .json(&json!({ "status": status.as_str() }));
            self.send(builder, "Failed to update comment thread status")
                .await
                .map_err(|e| Error::FailedToUpdatePullRequest(e.to_string()))?;

            info!(
                pull_request = self.pr_number,
                thread = thread_id,
                status = status.as_str(),
                "Updated thread status"
            );
        }

        if let Some(content) = content {
            let builder = self
                .request(
                    Method::PATCH,
                    &format!("/threads/{}/comments/{}", thread_id, FIRST_COMMENT_ID),
                )
                .json(&json!({ "content": content }));
            self.send(builder, "Failed to update comment content")
                .await
                .map_err(|e| Error::FailedToUpdatePullRequest(e.to_string()))?;

            info!(
                pull_request = self.pr_number,
                thread = thread_id,
                "Updated comment content"
            );
        }

        Ok(())
    }

    #[instrument]
    async fn delete_comment_thread(&self, thread_id: u64) -> Result<(), Error> {
        let builder = self.request(
            Method::DELETE,
            &format!("/threads/{}/comments/{}", thread_id, FIRST_COMMENT_ID),
        );
        self.send(builder, "Failed to delete comment thread")
            .await
            .map_err(|e| {
                warn!(
                    pull_request = self.pr_number,
                    thread = thread_id,
                    "Failed to delete comment thread",
                );
                Error::FailedToUpdatePullRequest(format!("Failed to delete comment: {}", e))
            })?;

        info!(
            pull_request = self.pr_number,
            thread = thread_id,
            "Deleted comment thread"
        );
        Ok(())
    }

    #[instrument]
    async fn get_title_and_description(&self) -> Result<PullRequestDetails, Error> {
        let response = self
            .send(
                self.request(Method::GET, ""),
                "Failed to get pull request information",
            )
            .await?;

        let pr: AzurePullRequest = response.json().await.map_err(|e| {
            error!(
                pull_request = self.pr_number,
                error = e.to_string(),
                "The pull request information was malformed"
            );
            Error::InvalidResponse
        })?;

        Ok(PullRequestDetails {
            title: pr.title.unwrap_or_default(),
            description: pr.description,
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
            body.insert("description".to_string(), json!(description));
        }

        let builder = self.request(Method::PATCH, "").json(&body);
        self.send(builder, "Failed to update the pull request")
            .await
            .map_err(|e| Error::FailedToUpdatePullRequest(e.to_string()))?;

        info!(pull_request = self.pr_number, "Updated title and description");
        Ok(())
    }

    #[instrument]
    async fn get_metadata(&self) -> Result<Option<Vec<MetadataEntry>>, Error> {
        let response = self
            .send(
                self.request(Method::GET, "/properties"),
                "Failed to get pull request metadata",
            )
            .await?;

        let properties: AzurePropertyList = response.json().await.map_err(|e| {
            error!(
                pull_request = self.pr_number,
                error = e.to_string(),
                "The pull request properties were malformed"
            );
            Error::InvalidResponse
        })?;

        let metadata: Vec<MetadataEntry> = properties
            .value
            .into_iter()
            .filter_map(|(key, property)| {
                let key = key.strip_prefix(METADATA_KEY_PREFIX)?.to_string();
                let value = match property.value {
                    serde_json::Value::String(value) => value,
                    other => other.to_string(),
                };
                Some(MetadataEntry::new(key, value))
            })
            .collect();

        debug!(
            pull_request = self.pr_number,
            count = metadata.len(),
            "Retrieved metadata"
        );
        Ok(Some(metadata))
    }

    #[instrument(skip(metadata))]
    async fn add_metadata(&self, metadata: &[MetadataEntry]) -> Result<(), Error> {
        if metadata.is_empty() {
            return Ok(());
        }

        let patch: Vec<serde_json::Value> = metadata
            .iter()
            .map(|entry| {
                json!({
                    "op": "replace",
                    "path": format!("/{}{}", METADATA_KEY_PREFIX, entry.key),
                    "value": entry.value,
                })
            })
            .collect();
        let payload = serde_json::to_string(&patch)
            .map_err(|e| Error::ApiError(format!("Failed to serialize metadata: {}", e)))?;

        let builder = self
            .request(Method::PATCH, "/properties")
            .header(header::CONTENT_TYPE, "application/json-patch+json")
            .body(payload);
        self.send(builder, "Failed to add pull request metadata")
            .await
            .map_err(|e| Error::FailedToUpdatePullRequest(e.to_string()))?;

        info!(
            pull_request = self.pr_number,
            count = metadata.len(),
            "Added metadata"
        );
        Ok(())
    }
}
