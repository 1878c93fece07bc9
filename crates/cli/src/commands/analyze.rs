use clap::Args;
use indoc::formatdoc;
use pr_metrics_core::config::MetricsConfig;
use pr_metrics_core::render::render_metrics_comment;
use pr_metrics_core::{analyze_diff, DiffAnalysis};
use tracing::{info, instrument};

use crate::commands::DiffArgs;
use crate::config::load_metrics_config;
use crate::diff_source::read_diff_summary;
use crate::errors::CliError;

#[cfg(test)]
#[path = "analyze_tests.rs"]
mod tests;

/// Arguments for the analyze command
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Where to read the diff summary from
    #[command(flatten)]
    pub diff: DiffArgs,

    /// Alternate config file
    #[arg(short, long)]
    pub config: Option<String>,
}

/// Executes the `analyze` command.
///
/// Prints the metrics and the comment that a run would post, without
/// contacting any provider.
#[instrument(skip(args))]
pub async fn execute(args: AnalyzeArgs) -> Result<(), CliError> {
    let config = load_metrics_config(args.config.as_deref())?;
    let diff_summary = read_diff_summary(
        args.diff.diff_file.as_deref(),
        &args.diff.base,
        &args.diff.head,
    )?;

    let result = analyze_diff(&diff_summary, &config)?;
    info!(
        size = result.analysis.indicator().as_str(),
        "Analyzed diff"
    );

    println!("{}", format_analysis(&result, &config));
    Ok(())
}

/// Formats the analysis result for the terminal
pub fn format_analysis(result: &DiffAnalysis, config: &MetricsConfig) -> String {
    let classification = &result.classification;
    let mut not_reviewed: Vec<String> = classification
        .files_not_requiring_review
        .iter()
        .map(|f| format!("  {}", f))
        .collect();
    not_reviewed.extend(
        classification
            .deleted_files_not_requiring_review
            .iter()
            .map(|f| format!("  {} (deleted)", f)),
    );
    let not_reviewed = if not_reviewed.is_empty() {
        "  (none)".to_string()
    } else {
        not_reviewed.join("\n")
    };

    let tests = match result.analysis.tests_sufficient {
        Some(true) => "sufficient",
        Some(false) => "insufficient",
        None => "not checked",
    };

    formatdoc!(
        "Size: {indicator}
        Tests: {tests}
        Product code: {product_code}
        Test code: {test_code}
        Ignored code: {ignored_code}
        Files not requiring review:
        {not_reviewed}

        {comment}",
        indicator = result.analysis.indicator(),
        tests = tests,
        product_code = classification.metrics.product_code(),
        test_code = classification.metrics.test_code(),
        ignored_code = classification.metrics.ignored_code(),
        not_reviewed = not_reviewed,
        comment = render_metrics_comment(&classification.metrics, &result.analysis, config),
    )
}
