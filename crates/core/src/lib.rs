//! # PR Metrics Core
//!
//! Core business logic for sizing pull requests and keeping the metrics they
//! carry up to date.
//!
//! For every run PR Metrics:
//! - Parses the `git diff --numstat` summary of the pull request
//! - Classifies the added lines as product, test or ignored code
//! - Buckets the pull request into a size label and checks its test coverage
//! - Reconciles the metrics comment and the per-file "no review required"
//!   comments with the threads already on the pull request
//! - Prefixes the title with the size indicator and fills in an empty
//!   description
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pr_metrics_core::{config::MetricsConfig, PrMetrics};
//! use pr_metrics_developer_platforms::RepositoryApi;
//! use anyhow::Result;
//!
//! async fn update_pr<P: RepositoryApi + std::fmt::Debug>(provider: P, diff: &str) -> Result<()> {
//!     let pr_metrics = PrMetrics::with_config(provider, MetricsConfig::default());
//!
//!     let result = pr_metrics.process_pull_request(diff).await?;
//!     println!("Size: {}", result.analysis.indicator());
//!
//!     Ok(())
//! }
//! ```

use futures::future::{join_all, BoxFuture, FutureExt};
use pr_metrics_developer_platforms::errors::Error as ProviderError;
use pr_metrics_developer_platforms::models::ThreadStatus;
use pr_metrics_developer_platforms::RepositoryApi;
use tracing::{debug, error, info, instrument};

pub mod classifier;
use classifier::{ClassificationResult, FileClassifier};

pub mod comments;
use comments::PullRequestCommentsData;

pub mod config;
use config::{MetricsConfig, NO_REVIEW_REQUIRED_COMMENT};

pub mod diff;

pub mod errors;
use errors::PrMetricsError;

pub mod metrics;

pub mod reconcile;
use reconcile::{metadata_requires_update, plan_comment_operations, CommentOperation};

pub mod render;

pub mod size;
use size::SizeAnalysis;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// The metrics computed from a diff, without touching the pull request.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffAnalysis {
    pub classification: ClassificationResult,
    pub analysis: SizeAnalysis,
}

/// Result of processing a pull request through PR Metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsResult {
    pub classification: ClassificationResult,
    pub analysis: SizeAnalysis,

    /// The comment operations that were issued
    pub comment_operations: Vec<CommentOperation>,

    /// The new title, if the title was changed
    pub title: Option<String>,

    /// Whether the description placeholder was applied
    pub description_updated: bool,

    /// Whether the metadata stored on the pull request was written
    pub metadata_updated: bool,
}

/// Main struct for computing and publishing pull request metrics.
///
/// # Examples
///
/// ```rust,no_run
/// use pr_metrics_core::PrMetrics;
/// use pr_metrics_developer_platforms::RepositoryApi;
/// use anyhow::Result;
///
/// async fn example<P: RepositoryApi + std::fmt::Debug>(provider: P) -> Result<()> {
///     let pr_metrics = PrMetrics::new(provider);
///
///     let result = pr_metrics.process_pull_request("10\t0\tsrc/lib.rs\n").await?;
///     println!("Issued {} comment operations", result.comment_operations.len());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct PrMetrics<P: RepositoryApi + std::fmt::Debug> {
    provider: P,
    config: MetricsConfig,
}

impl<P: RepositoryApi + std::fmt::Debug> PrMetrics<P> {
    /// Creates a new `PrMetrics` instance with the default configuration.
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, MetricsConfig::default())
    }

    /// Creates a new `PrMetrics` instance with a custom configuration.
    pub fn with_config(provider: P, config: MetricsConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Parses and classifies a diff summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the diff summary is malformed or a file matching
    /// pattern is invalid.
    pub fn analyze(&self, diff_summary: &str) -> Result<DiffAnalysis, PrMetricsError> {
        analyze_diff(diff_summary, &self.config)
    }

    /// Computes the metrics of the pull request and updates it.
    ///
    /// All updates are issued concurrently. A failing update does not stop
    /// the others and nothing is rolled back.
    ///
    /// # Errors
    ///
    /// * Any error of [`PrMetrics::analyze`]
    /// * [`PrMetricsError::GitProviderError`] if the current state of the
    ///   pull request could not be read
    /// * [`PrMetricsError::FailedToUpdatePullRequest`] if one or more updates
    ///   failed, after all updates have completed
    #[instrument(skip(self, diff_summary))]
    pub async fn process_pull_request(
        &self,
        diff_summary: &str,
    ) -> Result<MetricsResult, PrMetricsError> {
        info!("Processing pull request");

        let DiffAnalysis {
            classification,
            analysis,
        } = self.analyze(diff_summary)?;

        let comments = self.provider.get_comments().await.map_err(|e| {
            error!(error = e.to_string(), "Failed to get the comment threads");
            PrMetricsError::GitProviderError(format!("Failed to get comment threads: {}", e))
        })?;
        let details = self
            .provider
            .get_title_and_description()
            .await
            .map_err(|e| {
                error!(
                    error = e.to_string(),
                    "Failed to get the title and description"
                );
                PrMetricsError::GitProviderError(format!(
                    "Failed to get the title and description: {}",
                    e
                ))
            })?;

        let stored_metadata = self.provider.get_metadata().await.map_err(|e| {
            error!(error = e.to_string(), "Failed to get the pull request metadata");
            PrMetricsError::GitProviderError(format!("Failed to get the metadata: {}", e))
        })?;

        debug!(
            pull_request_comments = comments.pull_request_comments.len(),
            file_comments = comments.file_comments.len(),
            "Got pull request state",
        );

        let comments_data = PullRequestCommentsData::from_comments(&comments, &classification);
        let metrics_comment =
            render::render_metrics_comment(&classification.metrics, &analysis, &self.config);
        let comment_operations =
            plan_comment_operations(&comments_data, &metrics_comment, analysis.thread_status());

        let indicator = analysis.indicator();
        let title = render::updated_title(&details.title, &indicator);
        let description = render::updated_description(details.description.as_deref());
        let metadata = render::metadata_entries(&classification.metrics, &analysis);
        let metadata_updated = metadata_requires_update(&metadata, stored_metadata.as_deref());

        let mut tasks: Vec<(String, BoxFuture<'_, Result<(), ProviderError>>)> = comment_operations
            .iter()
            .map(|operation| (operation.to_string(), self.execute(operation).boxed()))
            .collect();

        if title.is_some() || description.is_some() {
            let title = title.as_deref();
            tasks.push((
                "update title and description".to_string(),
                self.provider
                    .set_title_and_description(title, description)
                    .boxed(),
            ));
        }

        if metadata_updated {
            tasks.push((
                "add metadata".to_string(),
                self.provider.add_metadata(&metadata).boxed(),
            ));
        }

        let (names, futures): (Vec<String>, Vec<_>) = tasks.into_iter().unzip();
        let results = join_all(futures).await;

        let failures: Vec<String> = names
            .iter()
            .zip(results)
            .filter_map(|(name, result)| {
                result
                    .inspect_err(|e| {
                        error!(
                            operation = name.as_str(),
                            error = e.to_string(),
                            "Failed to update the pull request"
                        )
                    })
                    .err()
                    .map(|e| format!("{}: {}", name, e))
            })
            .collect();

        if !failures.is_empty() {
            return Err(PrMetricsError::FailedToUpdatePullRequest(format!(
                "{} of {} operations failed ({})",
                failures.len(),
                names.len(),
                failures.join("; ")
            )));
        }

        info!(
            size = indicator.as_str(),
            comment_operations = comment_operations.len(),
            title_updated = title.is_some(),
            description_updated = description.is_some(),
            metadata_updated,
            "Updated pull request",
        );

        Ok(MetricsResult {
            classification,
            analysis,
            comment_operations,
            title,
            description_updated: description.is_some(),
            metadata_updated,
        })
    }

    async fn execute(&self, operation: &CommentOperation) -> Result<(), ProviderError> {
        debug!(operation = operation.to_string(), "Executing comment operation");
        match operation {
            CommentOperation::CreateMetricsComment { content, status } => {
                self.provider
                    .create_comment(content, *status, None, false)
                    .await
            }
            CommentOperation::UpdateMetricsComment {
                thread_id,
                content,
                status,
            } => {
                self.provider
                    .update_comment(*thread_id, content.as_deref(), *status)
                    .await
            }
            CommentOperation::CreateFileComment {
                file_name,
                is_file_deleted,
            } => {
                self.provider
                    .create_comment(
                        NO_REVIEW_REQUIRED_COMMENT,
                        ThreadStatus::Closed,
                        Some(file_name),
                        *is_file_deleted,
                    )
                    .await
            }
            CommentOperation::DeleteCommentThread { thread_id } => {
                self.provider.delete_comment_thread(*thread_id).await
            }
        }
    }
}

/// Parses and classifies a diff summary using the given configuration.
///
/// # Examples
///
/// ```
/// use pr_metrics_core::{analyze_diff, config::MetricsConfig};
///
/// let diff = "10\t0\tfile.ts\n5\t0\tfile.test.ts";
/// let result = analyze_diff(diff, &MetricsConfig::default()).unwrap();
/// assert_eq!(result.classification.metrics.product_code(), 10);
/// assert_eq!(result.classification.metrics.test_code(), 5);
/// assert_eq!(result.analysis.indicator(), "XS⚠️");
/// ```
pub fn analyze_diff(
    diff_summary: &str,
    config: &MetricsConfig,
) -> Result<DiffAnalysis, PrMetricsError> {
    let files = diff::parse_diff_summary(diff_summary)?;
    let classifier = FileClassifier::new(config)?;
    let classification = classifier.classify(&files)?;
    let analysis = SizeAnalysis::new(&classification.metrics, config);

    Ok(DiffAnalysis {
        classification,
        analysis,
    })
}
