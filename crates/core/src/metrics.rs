//! # Code Metrics
//!
//! Holds the categorized line counts computed for a pull request.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;

/// The number of added lines in each category.
///
/// * Product code - reviewable files that are not tests
/// * Test code - reviewable files whose path contains `test`
/// * Ignored code - files excluded by pattern or extension
///
/// # Examples
///
/// ```
/// use pr_metrics_core::metrics::CodeMetricsData;
///
/// let data = CodeMetricsData::new(100, 40, 7);
/// assert_eq!(data.subtotal(), 140);
/// assert_eq!(data.total(), 147);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeMetricsData {
    product_code: u64,
    test_code: u64,
    ignored_code: u64,
}

impl CodeMetricsData {
    pub fn new(product_code: u64, test_code: u64, ignored_code: u64) -> Self {
        Self {
            product_code,
            test_code,
            ignored_code,
        }
    }

    pub fn product_code(&self) -> u64 {
        self.product_code
    }

    pub fn test_code(&self) -> u64 {
        self.test_code
    }

    pub fn ignored_code(&self) -> u64 {
        self.ignored_code
    }

    /// Product and test code together, saturating at `u64::MAX`
    pub fn subtotal(&self) -> u64 {
        self.product_code.saturating_add(self.test_code)
    }

    /// All added lines, including ignored code, saturating at `u64::MAX`
    pub fn total(&self) -> u64 {
        self.subtotal().saturating_add(self.ignored_code)
    }
}
