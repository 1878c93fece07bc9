//! # File Classification
//!
//! Splits the files of a diff into product code, test code and ignored code.
//!
//! Every file is checked against two independent filters:
//!
//! 1. The configured glob patterns. Files that do not match are flagged as
//!    not requiring a review and receive a comment saying so.
//! 2. The configured code file extensions. Files that match the patterns but
//!    not the extensions are counted as ignored code without a comment.
//!
//! Files passing both filters count as test code when their path contains
//! `test` (in any case) and as product code otherwise.

use std::collections::BTreeSet;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::{debug, info};

use crate::config::MetricsConfig;
use crate::diff::FileMetric;
use crate::errors::PrMetricsError;
use crate::metrics::CodeMetricsData;

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;

/// The outcome of classifying every file in a diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationResult {
    /// Added lines per category
    pub metrics: CodeMetricsData,

    /// Files excluded by pattern that had lines added
    pub files_not_requiring_review: Vec<String>,

    /// Files excluded by pattern that had no lines added
    pub deleted_files_not_requiring_review: Vec<String>,
}

/// Classifies files using the configured glob patterns and extensions.
#[derive(Debug, Clone)]
pub struct FileClassifier {
    includes: GlobSet,
    excludes: GlobSet,
    code_file_extensions: BTreeSet<String>,
}

impl FileClassifier {
    /// Compiles the file matching patterns of the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PrMetricsError::InvalidFilePattern`] if a pattern is not a
    /// valid glob.
    ///
    /// # Examples
    ///
    /// ```
    /// use pr_metrics_core::classifier::FileClassifier;
    /// use pr_metrics_core::config::MetricsConfig;
    ///
    /// let mut config = MetricsConfig::default();
    /// config.file_matching_patterns = vec!["**/*".to_string(), "!**/*.lock".to_string()];
    ///
    /// let classifier = FileClassifier::new(&config).unwrap();
    /// assert!(classifier.matches_patterns("src/lib.rs"));
    /// assert!(!classifier.matches_patterns("Cargo.lock"));
    /// ```
    pub fn new(config: &MetricsConfig) -> Result<Self, PrMetricsError> {
        let mut includes = GlobSetBuilder::new();
        let mut excludes = GlobSetBuilder::new();
        for pattern in &config.file_matching_patterns {
            match pattern.strip_prefix('!') {
                Some(negated) => excludes.add(build_glob(negated)?),
                None => includes.add(build_glob(pattern)?),
            };
        }

        Ok(Self {
            includes: build_glob_set(includes)?,
            excludes: build_glob_set(excludes)?,
            code_file_extensions: config.code_file_extensions.clone(),
        })
    }

    /// Whether the file matches at least one inclusion and no exclusion
    pub fn matches_patterns(&self, file_name: &str) -> bool {
        self.includes.is_match(file_name) && !self.excludes.is_match(file_name)
    }

    /// Whether the file has one of the configured code file extensions
    pub fn is_code_file(&self, file_name: &str) -> bool {
        self.code_file_extensions.contains(&file_extension(file_name))
    }

    /// Classifies every file of a parsed diff.
    ///
    /// The sum of all three categories always equals the total number of
    /// lines added across `files`.
    ///
    /// # Errors
    ///
    /// Returns [`PrMetricsError::LineCountOverflow`] if the added lines of
    /// all files together do not fit in a `u64`.
    pub fn classify(&self, files: &[FileMetric]) -> Result<ClassificationResult, PrMetricsError> {
        let mut product_code: u64 = 0;
        let mut test_code: u64 = 0;
        let mut ignored_code: u64 = 0;
        let mut total: u64 = 0;
        let mut files_not_requiring_review = Vec::new();
        let mut deleted_files_not_requiring_review = Vec::new();

        for file in files {
            let matches_patterns = self.matches_patterns(&file.file_name);
            let is_code_file = self.is_code_file(&file.file_name);

            total = add_lines(total, file)?;
            if !matches_patterns {
                if file.lines_added > 0 {
                    files_not_requiring_review.push(file.file_name.clone());
                    ignored_code = add_lines(ignored_code, file)?;
                } else {
                    deleted_files_not_requiring_review.push(file.file_name.clone());
                }
            } else if !is_code_file {
                ignored_code = add_lines(ignored_code, file)?;
            } else if file.file_name.to_lowercase().contains("test") {
                test_code = add_lines(test_code, file)?;
            } else {
                product_code = add_lines(product_code, file)?;
            }

            debug!(
                file = file.file_name.as_str(),
                lines_added = file.lines_added,
                matches_patterns,
                is_code_file,
                "Classified file"
            );
        }

        let metrics = CodeMetricsData::new(product_code, test_code, ignored_code);
        info!(
            product_code = metrics.product_code(),
            test_code = metrics.test_code(),
            ignored_code = metrics.ignored_code(),
            files_not_requiring_review = files_not_requiring_review.len(),
            deleted_files_not_requiring_review = deleted_files_not_requiring_review.len(),
            "Classified diff"
        );

        Ok(ClassificationResult {
            metrics,
            files_not_requiring_review,
            deleted_files_not_requiring_review,
        })
    }
}

/// Adds the lines of `file` to a running count.
///
/// The grand total is checked as well, so no sum of the categories can
/// overflow once classification succeeds.
fn add_lines(count: u64, file: &FileMetric) -> Result<u64, PrMetricsError> {
    count
        .checked_add(file.lines_added)
        .ok_or_else(|| PrMetricsError::LineCountOverflow(file.file_name.clone()))
}

/// Returns the lower-cased extension of the file name, without the dot.
///
/// Only the last path segment is considered. Files without a dot have an
/// empty extension.
pub fn file_extension(file_name: &str) -> String {
    let base_name = file_name.rsplit('/').next().unwrap_or(file_name);
    match base_name.rfind('.') {
        Some(index) => base_name[index + 1..].to_lowercase(),
        None => String::new(),
    }
}

fn build_glob(pattern: &str) -> Result<globset::Glob, PrMetricsError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| PrMetricsError::InvalidFilePattern {
            pattern: pattern.to_string(),
            reason: e.kind().to_string(),
        })
}

fn build_glob_set(builder: GlobSetBuilder) -> Result<GlobSet, PrMetricsError> {
    builder
        .build()
        .map_err(|e| PrMetricsError::InvalidFilePattern {
            pattern: e.glob().unwrap_or_default().to_string(),
            reason: e.kind().to_string(),
        })
}
