use async_trait::async_trait;

pub mod azure_repos;

pub mod errors;

pub mod github;

pub mod models;
use azure_repos::AzureReposProvider;
use errors::Error;
use github::GitHubProvider;
use models::{CommentData, MetadataEntry, PullRequestDetails, ThreadStatus};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Trait for reading and writing the state of a single pull request on a
/// developer platform (e.g. GitHub, Azure Repos).
///
/// An implementation is bound to one pull request when it is constructed, so
/// none of the methods take repository or pull request identifiers. All
/// methods are independent of each other and may be called concurrently.
///
/// # Example Implementation
///
/// ```rust,no_run
/// use async_trait::async_trait;
/// use pr_metrics_developer_platforms::{RepositoryApi, errors::Error};
/// use pr_metrics_developer_platforms::models::{
///     CommentData, MetadataEntry, PullRequestDetails, ThreadStatus,
/// };
///
/// struct InMemoryProvider;
///
/// #[async_trait]
/// impl RepositoryApi for InMemoryProvider {
///     async fn get_comments(&self) -> Result<CommentData, Error> {
///         Ok(CommentData::default())
///     }
///
///     // Implement other required methods...
///     # async fn create_comment(&self, _: &str, _: ThreadStatus, _: Option<&str>, _: bool) -> Result<(), Error> { unimplemented!() }
///     # async fn update_comment(&self, _: u64, _: Option<&str>, _: Option<ThreadStatus>) -> Result<(), Error> { unimplemented!() }
///     # async fn delete_comment_thread(&self, _: u64) -> Result<(), Error> { unimplemented!() }
///     # async fn get_title_and_description(&self) -> Result<PullRequestDetails, Error> { unimplemented!() }
///     # async fn set_title_and_description(&self, _: Option<&str>, _: Option<&str>) -> Result<(), Error> { unimplemented!() }
///     # async fn get_metadata(&self) -> Result<Option<Vec<MetadataEntry>>, Error> { unimplemented!() }
///     # async fn add_metadata(&self, _: &[MetadataEntry]) -> Result<(), Error> { unimplemented!() }
/// }
/// ```
#[async_trait]
pub trait RepositoryApi: Send + Sync {
    /// Retrieves a snapshot of all comment threads on the pull request.
    ///
    /// Threads the provider cannot interpret (no comments, no ID) are left
    /// out of the snapshot rather than failing the call.
    async fn get_comments(&self) -> Result<CommentData, Error>;

    /// Creates a new comment thread.
    ///
    /// # Arguments
    ///
    /// * `content` - The Markdown content of the first comment
    /// * `status` - The status of the new thread
    /// * `file_name` - The file to anchor the thread to, or `None` for a
    ///   pull request level thread
    /// * `is_file_deleted` - Whether the anchored file was deleted, which
    ///   places the anchor on the left side of the diff
    async fn create_comment(
        &self,
        content: &str,
        status: ThreadStatus,
        file_name: Option<&str>,
        is_file_deleted: bool,
    ) -> Result<(), Error>;

    /// Updates the content and/or the status of an existing thread.
    ///
    /// Either argument may be `None` to leave that part unchanged.
    async fn update_comment(
        &self,
        thread_id: u64,
        content: Option<&str>,
        status: Option<ThreadStatus>,
    ) -> Result<(), Error>;

    /// Deletes a comment thread.
    async fn delete_comment_thread(&self, thread_id: u64) -> Result<(), Error>;

    /// Gets the current title and description of the pull request.
    async fn get_title_and_description(&self) -> Result<PullRequestDetails, Error>;

    /// Sets the title and/or the description of the pull request.
    ///
    /// Either argument may be `None` to leave that part unchanged.
    async fn set_title_and_description(
        &self,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<(), Error>;

    /// Reads the metadata previously stored against the pull request.
    ///
    /// Keys are reported without any provider specific prefix. Returns
    /// `None` when the provider has no property store.
    async fn get_metadata(&self) -> Result<Option<Vec<MetadataEntry>>, Error>;

    /// Stores key/value metadata against the pull request.
    ///
    /// Providers without a property store accept and ignore the call.
    async fn add_metadata(&self, metadata: &[MetadataEntry]) -> Result<(), Error>;
}

/// The repository provider selected at startup.
///
/// Wraps each concrete provider so that callers can hold a single type
/// regardless of which platform the pull request lives on.
#[derive(Debug)]
pub enum RepositoryProvider {
    AzureRepos(AzureReposProvider),
    GitHub(GitHubProvider),
}

impl RepositoryProvider {
    /// The name of the platform, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            RepositoryProvider::AzureRepos(_) => "azure-repos",
            RepositoryProvider::GitHub(_) => "github",
        }
    }
}

#[async_trait]
impl RepositoryApi for RepositoryProvider {
    async fn get_comments(&self) -> Result<CommentData, Error> {
        match self {
            RepositoryProvider::AzureRepos(p) => p.get_comments().await,
            RepositoryProvider::GitHub(p) => p.get_comments().await,
        }
    }

    async fn create_comment(
        &self,
        content: &str,
        status: ThreadStatus,
        file_name: Option<&str>,
        is_file_deleted: bool,
    ) -> Result<(), Error> {
        match self {
            RepositoryProvider::AzureRepos(p) => {
                p.create_comment(content, status, file_name, is_file_deleted)
                    .await
            }
            RepositoryProvider::GitHub(p) => {
                p.create_comment(content, status, file_name, is_file_deleted)
                    .await
            }
        }
    }

    async fn update_comment(
        &self,
        thread_id: u64,
        content: Option<&str>,
        status: Option<ThreadStatus>,
    ) -> Result<(), Error> {
        match self {
            RepositoryProvider::AzureRepos(p) => p.update_comment(thread_id, content, status).await,
            RepositoryProvider::GitHub(p) => p.update_comment(thread_id, content, status).await,
        }
    }

    async fn delete_comment_thread(&self, thread_id: u64) -> Result<(), Error> {
        match self {
            RepositoryProvider::AzureRepos(p) => p.delete_comment_thread(thread_id).await,
            RepositoryProvider::GitHub(p) => p.delete_comment_thread(thread_id).await,
        }
    }

    async fn get_title_and_description(&self) -> Result<PullRequestDetails, Error> {
        match self {
            RepositoryProvider::AzureRepos(p) => p.get_title_and_description().await,
            RepositoryProvider::GitHub(p) => p.get_title_and_description().await,
        }
    }

    async fn set_title_and_description(
        &self,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<(), Error> {
        match self {
            RepositoryProvider::AzureRepos(p) => {
                p.set_title_and_description(title, description).await
            }
            RepositoryProvider::GitHub(p) => p.set_title_and_description(title, description).await,
        }
    }

    async fn get_metadata(&self) -> Result<Option<Vec<MetadataEntry>>, Error> {
        match self {
            RepositoryProvider::AzureRepos(p) => p.get_metadata().await,
            RepositoryProvider::GitHub(p) => p.get_metadata().await,
        }
    }

    async fn add_metadata(&self, metadata: &[MetadataEntry]) -> Result<(), Error> {
        match self {
            RepositoryProvider::AzureRepos(p) => p.add_metadata(metadata).await,
            RepositoryProvider::GitHub(p) => p.add_metadata(metadata).await,
        }
    }
}
