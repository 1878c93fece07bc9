use clap::{Args, ValueEnum};
use pr_metrics_core::PrMetrics;
use pr_metrics_developer_platforms::azure_repos::AzureReposProvider;
use pr_metrics_developer_platforms::github::{GitHubProvider, GITHUB_API_URL};
use pr_metrics_developer_platforms::RepositoryProvider;
use tracing::{debug, error, info, instrument};

use crate::commands::DiffArgs;
use crate::config::load_metrics_config;
use crate::diff_source::read_diff_summary;
use crate::errors::CliError;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Environment variable holding the access token for the provider
pub const TOKEN_ENV_VAR: &str = "PR_METRICS_TOKEN";

/// The developer platform hosting the pull request
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// GitHub or GitHub Enterprise Server
    #[value(name = "github")]
    GitHub,

    /// Azure Repos in Azure DevOps Services or Server
    #[value(name = "azure-repos")]
    AzureRepos,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// The developer platform hosting the pull request
    #[arg(short, long, value_enum)]
    pub provider: ProviderKind,

    /// `owner/name` for GitHub, the repository name for Azure Repos
    #[arg(short, long)]
    pub repository: String,

    /// The pull request number
    #[arg(long)]
    pub pr_number: u64,

    /// Azure DevOps collection URI, e.g. `https://dev.azure.com/contoso`
    #[arg(long)]
    pub collection_uri: Option<String>,

    /// Azure DevOps project
    #[arg(long)]
    pub project: Option<String>,

    /// GitHub API URL, for GitHub Enterprise Server
    #[arg(long)]
    pub api_url: Option<String>,

    /// Where to read the diff summary from
    #[command(flatten)]
    pub diff: DiffArgs,

    /// Alternate config file
    #[arg(short, long)]
    pub config: Option<String>,
}

/// Executes the `run` command.
///
/// Reads the diff, computes the metrics and updates the pull request.
#[instrument(skip(args), fields(provider = ?args.provider, pull_request = args.pr_number))]
pub async fn execute(args: RunArgs) -> Result<(), CliError> {
    let config = load_metrics_config(args.config.as_deref())?;
    let diff_summary = read_diff_summary(
        args.diff.diff_file.as_deref(),
        &args.diff.base,
        &args.diff.head,
    )?;

    let token = read_token()?;
    let provider = create_provider(&args, &token)?;
    info!(provider = provider.name(), "Created repository provider");

    let pr_metrics = PrMetrics::with_config(provider, config);
    let result = pr_metrics
        .process_pull_request(&diff_summary)
        .await
        .inspect_err(|e| {
            error!(
                repository = args.repository.as_str(),
                pull_request = args.pr_number,
                error = e.to_string(),
                "Failed to update the pull request"
            )
        })?;

    info!(
        repository = args.repository.as_str(),
        pull_request = args.pr_number,
        size = result.analysis.indicator().as_str(),
        product_code = result.classification.metrics.product_code(),
        test_code = result.classification.metrics.test_code(),
        ignored_code = result.classification.metrics.ignored_code(),
        comment_operations = result.comment_operations.len(),
        "Pull request metrics updated"
    );

    Ok(())
}

/// Reads the provider access token from the environment.
fn read_token() -> Result<String, CliError> {
    match std::env::var(TOKEN_ENV_VAR) {
        Ok(token) if !token.trim().is_empty() => Ok(token),
        _ => Err(CliError::AuthError(format!(
            "No access token found. Set the {} environment variable.",
            TOKEN_ENV_VAR
        ))),
    }
}

/// Creates the repository provider selected on the command line.
pub fn create_provider(args: &RunArgs, token: &str) -> Result<RepositoryProvider, CliError> {
    match args.provider {
        ProviderKind::GitHub => {
            let (owner, name) = args
                .repository
                .split_once('/')
                .filter(|(owner, name)| {
                    !owner.is_empty() && !name.is_empty() && !name.contains('/')
                })
                .ok_or_else(|| {
                    CliError::InvalidArguments(format!(
                        "Expected the repository as 'owner/name', got '{}'",
                        args.repository
                    ))
                })?;

            let api_url = args.api_url.as_deref().unwrap_or(GITHUB_API_URL);
            debug!(api_url, owner, name, "Creating GitHub provider");
            let provider =
                GitHubProvider::with_base_url(api_url, token, owner, name, args.pr_number)
                    .map_err(|e| CliError::Other(e.to_string()))?;

            Ok(RepositoryProvider::GitHub(provider))
        }
        ProviderKind::AzureRepos => {
            let collection_uri = args.collection_uri.as_deref().ok_or_else(|| {
                CliError::InvalidArguments(
                    "--collection-uri is required for Azure Repos".to_string(),
                )
            })?;
            let project = args.project.as_deref().ok_or_else(|| {
                CliError::InvalidArguments("--project is required for Azure Repos".to_string())
            })?;

            debug!(collection_uri, project, "Creating Azure Repos provider");
            let provider = AzureReposProvider::new(
                collection_uri,
                project,
                &args.repository,
                args.pr_number,
                token,
            )
            .map_err(|e| CliError::Other(e.to_string()))?;

            Ok(RepositoryProvider::AzureRepos(provider))
        }
    }
}
