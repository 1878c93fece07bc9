//! Configuration settings for the PR Metrics core functionality.
//!
//! This module centralizes the fixed comment templates, glyphs and default
//! thresholds used throughout the crate, together with the TOML
//! configuration file format and its validation into runtime settings.
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::errors::ConfigLoadError;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// First line of the metrics comment. Used to recognize a previously posted
/// metrics comment.
pub const METRICS_COMMENT_TITLE: &str = "# PR Metrics";

/// Content of the comment placed on files that do not need a review
pub const NO_REVIEW_REQUIRED_COMMENT: &str = "❗ **This file may not need to be reviewed.**";

/// Placeholder description applied to pull requests without one
pub const DESCRIPTION_PLACEHOLDER: &str = "❌ **Add a description.**";

/// Glyph appended to the size label when the test check passed
pub const TEST_SUFFICIENT_GLYPH: &str = "✔";

/// Glyph appended to the size label when the test check failed
pub const TEST_INSUFFICIENT_GLYPH: &str = "⚠️";

/// Separator between the size indicator and the original title
pub const TITLE_SEPARATOR: &str = " ◾ ";

/// Footer line of the metrics comment
pub const METRICS_COMMENT_FOOTER: &str =
    "[Metrics computed by PR Metrics. Add it to your Azure DevOps and GitHub PRs!](https://aka.ms/PRMetrics/Comment)";

/// Default number of product code lines at which a pull request stops being `XS`
pub const DEFAULT_BASE_SIZE: f64 = 200.0;

/// Default multiplicative step between size buckets
pub const DEFAULT_GROWTH_RATE: f64 = 2.0;

/// Default number of test lines required per product code line
pub const DEFAULT_TEST_FACTOR: f64 = 1.0;

/// Default file matching patterns
pub const DEFAULT_FILE_MATCHING_PATTERNS: [&str; 1] = ["**/*"];

/// Default extensions of files that count as code
pub const DEFAULT_CODE_FILE_EXTENSIONS: [&str; 62] = [
    "ada", "adb", "ads", "asm", "bas", "bat", "c", "cbl", "cc", "clj", "cls", "cmd", "cob",
    "cpp", "cs", "cshtml", "css", "cxx", "d", "dart", "erl", "ex", "exs", "f", "f90", "fs",
    "fsx", "go", "groovy", "h", "hpp", "hs", "html", "hxx", "java", "js", "jsx", "kt", "kts",
    "less", "lua", "m", "ml", "mm", "php", "pl", "pm", "ps1", "psm1", "py", "r", "rb", "rs",
    "scala", "scss", "sh", "sql", "swift", "ts", "tsx", "vb", "vue",
];

lazy_static! {
    /// Pre-compiled regex matching a size indicator previously applied to a title
    pub static ref SIZE_INDICATOR_REGEX: Regex = Regex::new(
        r"^(?:XS|S|M|L|XL|[1-9][0-9]*XL)(?:✔|⚠️)?\s◾\s"
    ).expect("Failed to compile size indicator regex");
}

/// Runtime settings for a single metrics run.
///
/// These values have been validated and normalized; construct them with
/// [`PrMetricsConfig::to_metrics_config`] or [`MetricsConfig::default`].
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsConfig {
    /// Product code lines at which a pull request stops being `XS`
    pub base_size: f64,

    /// Multiplicative step between size buckets. Always greater than one.
    pub growth_rate: f64,

    /// Test lines required per product code line, or `None` when the test
    /// check is disabled
    pub test_factor: Option<f64>,

    /// Ordered glob patterns. Patterns starting with `!` exclude files.
    pub file_matching_patterns: Vec<String>,

    /// Lower-cased code file extensions without a leading dot
    pub code_file_extensions: BTreeSet<String>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            base_size: DEFAULT_BASE_SIZE,
            growth_rate: DEFAULT_GROWTH_RATE,
            test_factor: Some(DEFAULT_TEST_FACTOR),
            file_matching_patterns: default_file_matching_patterns(),
            code_file_extensions: DEFAULT_CODE_FILE_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

/// Top-level configuration file for PR Metrics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrMetricsConfig {
    #[serde(rename = "schemaVersion")]
    pub schema_version: u32,

    #[serde(default)]
    pub metrics: MetricsSettings,
}

impl Default for PrMetricsConfig {
    fn default() -> Self {
        Self {
            schema_version: 1,
            metrics: MetricsSettings::default(),
        }
    }
}

impl PrMetricsConfig {
    /// Convert the file settings into validated runtime settings.
    ///
    /// Out of range values fall back to their defaults with a warning rather
    /// than failing the run.
    pub fn to_metrics_config(&self) -> MetricsConfig {
        let settings = &self.metrics;

        let base_size = if settings.base_size.is_finite() && settings.base_size > 0.0 {
            settings.base_size
        } else {
            warn!(
                base_size = settings.base_size,
                default = DEFAULT_BASE_SIZE,
                "Base size must be a positive number. Using the default."
            );
            DEFAULT_BASE_SIZE
        };

        let growth_rate = if settings.growth_rate.is_finite() && settings.growth_rate > 1.0 {
            settings.growth_rate
        } else {
            warn!(
                growth_rate = settings.growth_rate,
                default = DEFAULT_GROWTH_RATE,
                "Growth rate must be greater than 1. Using the default."
            );
            DEFAULT_GROWTH_RATE
        };

        let test_factor = match settings.test_factor {
            None => None,
            Some(factor) if factor == 0.0 => None,
            Some(factor) if factor.is_finite() && factor > 0.0 => Some(factor),
            Some(factor) => {
                warn!(
                    test_factor = factor,
                    default = DEFAULT_TEST_FACTOR,
                    "Test factor must be zero or a positive number. Using the default."
                );
                Some(DEFAULT_TEST_FACTOR)
            }
        };

        let file_matching_patterns: Vec<String> = settings
            .file_matching_patterns
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        let file_matching_patterns = if file_matching_patterns.is_empty() {
            warn!("No file matching patterns were configured. Using the default.");
            default_file_matching_patterns()
        } else {
            file_matching_patterns
        };

        let code_file_extensions: BTreeSet<String> = settings
            .code_file_extensions
            .iter()
            .filter_map(|e| normalize_extension(e))
            .collect();
        let code_file_extensions = if code_file_extensions.is_empty() {
            warn!("No code file extensions were configured. Using the default.");
            MetricsConfig::default().code_file_extensions
        } else {
            code_file_extensions
        };

        MetricsConfig {
            base_size,
            growth_rate,
            test_factor,
            file_matching_patterns,
            code_file_extensions,
        }
    }
}

/// The `[metrics]` table of the configuration file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsSettings {
    /// Product code lines at which a pull request stops being `XS`
    #[serde(default = "MetricsSettings::default_base_size")]
    pub base_size: f64,

    /// Multiplicative step between size buckets
    #[serde(default = "MetricsSettings::default_growth_rate")]
    pub growth_rate: f64,

    /// Test lines required per product code line. `0` disables the check.
    #[serde(default = "MetricsSettings::default_test_factor")]
    pub test_factor: Option<f64>,

    /// Ordered glob patterns. Patterns starting with `!` exclude files.
    #[serde(default = "default_file_matching_patterns")]
    pub file_matching_patterns: Vec<String>,

    /// Code file extensions. A leading `*.` or `.` is accepted.
    #[serde(default = "MetricsSettings::default_code_file_extensions")]
    pub code_file_extensions: Vec<String>,
}

impl MetricsSettings {
    fn default_base_size() -> f64 {
        DEFAULT_BASE_SIZE
    }

    fn default_growth_rate() -> f64 {
        DEFAULT_GROWTH_RATE
    }

    fn default_test_factor() -> Option<f64> {
        Some(DEFAULT_TEST_FACTOR)
    }

    fn default_code_file_extensions() -> Vec<String> {
        DEFAULT_CODE_FILE_EXTENSIONS
            .iter()
            .map(|e| e.to_string())
            .collect()
    }
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            base_size: Self::default_base_size(),
            growth_rate: Self::default_growth_rate(),
            test_factor: Self::default_test_factor(),
            file_matching_patterns: default_file_matching_patterns(),
            code_file_extensions: Self::default_code_file_extensions(),
        }
    }
}

fn default_file_matching_patterns() -> Vec<String> {
    DEFAULT_FILE_MATCHING_PATTERNS
        .iter()
        .map(|p| p.to_string())
        .collect()
}

/// Normalizes a configured extension to its lower-cased form without a
/// leading `*.` or `.`. Returns `None` for blank entries.
pub fn normalize_extension(extension: &str) -> Option<String> {
    let trimmed = extension.trim();
    let trimmed = trimmed.strip_prefix('*').unwrap_or(trimmed);
    let trimmed = trimmed.strip_prefix('.').unwrap_or(trimmed);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Loads the PR Metrics configuration from the given path.
///
/// # Arguments
/// * `path` - Path to the configuration file
///
/// # Returns
/// * `Ok(PrMetricsConfig)` if loaded and valid
/// * `Err(ConfigLoadError)` if the file is missing, unreadable, malformed or
///   has an unsupported schema version
pub fn load_pr_metrics_config<P: AsRef<Path>>(path: P) -> Result<PrMetricsConfig, ConfigLoadError> {
    let path_ref = path.as_ref();
    let content = match fs::read_to_string(path_ref) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigLoadError::NotFound(path_ref.display().to_string()));
        }
        Err(e) => return Err(ConfigLoadError::Io(e)),
    };
    let config: PrMetricsConfig = toml::from_str(&content)?;
    if config.schema_version != 1 {
        return Err(ConfigLoadError::UnsupportedSchemaVersion(
            config.schema_version,
        ));
    }
    Ok(config)
}
