//! # Rendering
//!
//! Produces everything PR Metrics writes back to a pull request: the metrics
//! comment, the size indicator prefix of the title, the description
//! placeholder and the metadata entries.

use indoc::formatdoc;
use pr_metrics_developer_platforms::models::MetadataEntry;

use crate::config::{
    MetricsConfig, DESCRIPTION_PLACEHOLDER, METRICS_COMMENT_FOOTER, METRICS_COMMENT_TITLE,
    SIZE_INDICATOR_REGEX, TEST_INSUFFICIENT_GLYPH, TEST_SUFFICIENT_GLYPH, TITLE_SEPARATOR,
};
use crate::metrics::CodeMetricsData;
use crate::size::SizeAnalysis;

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;

const SMALL_PULL_REQUEST_MESSAGE: &str = "Thanks for keeping your pull request small.";
const TESTS_ADDED_MESSAGE: &str = "Thanks for adding tests.";
const TESTS_MISSING_MESSAGE: &str = "Consider adding additional tests.";
const SRP_LINK: &str =
    "[Single Responsibility Principle (SRP)](https://aka.ms/PRMetrics/SRP)";

/// Renders the body of the metrics comment.
///
/// The body always starts with [`METRICS_COMMENT_TITLE`], which is how the
/// comment is recognized on later runs.
pub fn render_metrics_comment(
    metrics: &CodeMetricsData,
    analysis: &SizeAnalysis,
    config: &MetricsConfig,
) -> String {
    let size_line = if analysis.label.is_small() {
        format!("{} **{}**", TEST_SUFFICIENT_GLYPH, SMALL_PULL_REQUEST_MESSAGE)
    } else {
        let limit = (config.base_size * config.growth_rate).floor() as u64;
        format!(
            "❌ **Try to keep pull requests smaller than {} lines of new product code by following the {}.**",
            format_count(limit),
            SRP_LINK
        )
    };

    let test_line = match analysis.tests_sufficient {
        Some(true) => format!("{} **{}**\n", TEST_SUFFICIENT_GLYPH, TESTS_ADDED_MESSAGE),
        Some(false) => format!("{} **{}**\n", TEST_INSUFFICIENT_GLYPH, TESTS_MISSING_MESSAGE),
        None => String::new(),
    };

    formatdoc!(
        "{title}
        {size_line}
        {test_line}{indicator}|Lines
        -|-:
        Product Code|{product_code}
        Test Code|{test_code}
        **Subtotal**|**{subtotal}**
        Ignored Code|{ignored_code}
        **Total**|**{total}**

        {footer}",
        title = METRICS_COMMENT_TITLE,
        indicator = analysis.indicator(),
        product_code = format_count(metrics.product_code()),
        test_code = format_count(metrics.test_code()),
        subtotal = format_count(metrics.subtotal()),
        ignored_code = format_count(metrics.ignored_code()),
        total = format_count(metrics.total()),
        footer = METRICS_COMMENT_FOOTER,
    )
}

/// Formats an integer with `,` as the thousands separator.
///
/// # Examples
///
/// ```
/// use pr_metrics_core::render::format_count;
///
/// assert_eq!(format_count(999), "999");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

/// Removes a previously applied size indicator from the start of a title
pub fn strip_size_indicator(title: &str) -> &str {
    match SIZE_INDICATOR_REGEX.find(title) {
        Some(m) => &title[m.end()..],
        None => title,
    }
}

/// Prefixes the title with the size indicator, replacing any existing one.
///
/// # Examples
///
/// ```
/// use pr_metrics_core::render::apply_size_indicator;
///
/// assert_eq!(apply_size_indicator("Add parser", "S✔"), "S✔ ◾ Add parser");
/// assert_eq!(apply_size_indicator("XL⚠️ ◾ Add parser", "S✔"), "S✔ ◾ Add parser");
/// ```
pub fn apply_size_indicator(title: &str, indicator: &str) -> String {
    format!("{}{}{}", indicator, TITLE_SEPARATOR, strip_size_indicator(title))
}

/// The new title, or `None` if the title already carries the indicator
pub fn updated_title(current_title: &str, indicator: &str) -> Option<String> {
    let title = apply_size_indicator(current_title, indicator);
    if title == current_title {
        None
    } else {
        Some(title)
    }
}

/// The placeholder for an empty description, or `None` if the pull request
/// already has one
pub fn updated_description(current_description: Option<&str>) -> Option<&'static str> {
    match current_description {
        Some(description) if !description.trim().is_empty() => None,
        _ => Some(DESCRIPTION_PLACEHOLDER),
    }
}

/// The metadata stored on the pull request by providers that support it
pub fn metadata_entries(
    metrics: &CodeMetricsData,
    analysis: &SizeAnalysis,
) -> Vec<MetadataEntry> {
    let mut entries = vec![
        MetadataEntry::new("Size", analysis.label.to_string()),
        MetadataEntry::new("ProductCode", metrics.product_code().to_string()),
        MetadataEntry::new("TestCode", metrics.test_code().to_string()),
        MetadataEntry::new("Subtotal", metrics.subtotal().to_string()),
        MetadataEntry::new("IgnoredCode", metrics.ignored_code().to_string()),
        MetadataEntry::new("Total", metrics.total().to_string()),
    ];

    if let Some(sufficient) = analysis.tests_sufficient {
        entries.push(MetadataEntry::new("TestCoverage", sufficient.to_string()));
    }

    entries
}
