//! # PR Size Analysis
//!
//! Buckets a pull request by its product code into a geometric sequence of
//! size labels and checks whether enough test code accompanies it.
//!
//! The first bucket (`XS`) ends at the configured base size. Every following
//! bucket is `growth_rate` times wider than the one before it, so the labels
//! continue indefinitely as `XS, S, M, L, XL, 2XL, 3XL, ...`.

use std::fmt;

use pr_metrics_developer_platforms::models::ThreadStatus;

use crate::config::{MetricsConfig, TEST_INSUFFICIENT_GLYPH, TEST_SUFFICIENT_GLYPH};
use crate::metrics::CodeMetricsData;

#[cfg(test)]
#[path = "size_tests.rs"]
mod tests;

/// The size bucket of a pull request.
///
/// Labels are ordered by bucket, so a larger label always means more product
/// code.
///
/// # Examples
///
/// ```
/// use pr_metrics_core::size::SizeLabel;
///
/// assert_eq!(SizeLabel::from_product_code(150, 200.0, 2.0), SizeLabel::XS);
/// assert_eq!(SizeLabel::from_product_code(200, 200.0, 2.0), SizeLabel::S);
/// assert_eq!(SizeLabel::from_product_code(6400, 200.0, 2.0).to_string(), "3XL");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SizeLabel(usize);

impl SizeLabel {
    pub const XS: SizeLabel = SizeLabel(0);
    pub const S: SizeLabel = SizeLabel(1);
    pub const M: SizeLabel = SizeLabel(2);
    pub const L: SizeLabel = SizeLabel(3);
    pub const XL: SizeLabel = SizeLabel(4);

    /// Determine the size label from the number of added product code lines.
    ///
    /// `growth_rate` must be greater than one. Configurations loaded through
    /// [`crate::config::PrMetricsConfig::to_metrics_config`] guarantee this.
    pub fn from_product_code(product_code: u64, base_size: f64, growth_rate: f64) -> Self {
        let product_code = product_code as f64;
        if product_code < base_size {
            return Self::XS;
        }

        let mut index = 1;
        let mut threshold = base_size * growth_rate;
        while product_code >= threshold {
            let next = threshold * growth_rate;
            if next <= threshold {
                break;
            }

            threshold = next;
            index += 1;
        }

        SizeLabel(index)
    }

    /// Builds the label of a bucket directly from its position
    #[cfg(test)]
    pub(crate) fn from_index(index: usize) -> Self {
        SizeLabel(index)
    }

    /// The position of the bucket, starting at zero for `XS`
    pub fn index(&self) -> usize {
        self.0
    }

    /// `XS` and `S` pull requests are considered small
    pub fn is_small(&self) -> bool {
        self.0 <= Self::S.0
    }
}

impl fmt::Display for SizeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => write!(f, "XS"),
            1 => write!(f, "S"),
            2 => write!(f, "M"),
            3 => write!(f, "L"),
            4 => write!(f, "XL"),
            index => write!(f, "{}XL", index - 3),
        }
    }
}

/// Whether the pull request contains enough test code.
///
/// Returns `None` when the test check is disabled.
pub fn test_sufficiency(metrics: &CodeMetricsData, test_factor: Option<f64>) -> Option<bool> {
    test_factor.map(|factor| metrics.test_code() as f64 >= metrics.product_code() as f64 * factor)
}

/// The size label and test verdict computed for a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeAnalysis {
    pub label: SizeLabel,

    /// `None` when the test check is disabled
    pub tests_sufficient: Option<bool>,
}

impl SizeAnalysis {
    /// Analyze the metrics using the configured thresholds.
    ///
    /// # Examples
    ///
    /// ```
    /// use pr_metrics_core::config::MetricsConfig;
    /// use pr_metrics_core::metrics::CodeMetricsData;
    /// use pr_metrics_core::size::{SizeAnalysis, SizeLabel};
    ///
    /// let metrics = CodeMetricsData::new(450, 500, 0);
    /// let analysis = SizeAnalysis::new(&metrics, &MetricsConfig::default());
    /// assert_eq!(analysis.label, SizeLabel::M);
    /// assert_eq!(analysis.tests_sufficient, Some(true));
    /// assert_eq!(analysis.indicator(), "M✔");
    /// ```
    pub fn new(metrics: &CodeMetricsData, config: &MetricsConfig) -> Self {
        Self {
            label: SizeLabel::from_product_code(
                metrics.product_code(),
                config.base_size,
                config.growth_rate,
            ),
            tests_sufficient: test_sufficiency(metrics, config.test_factor),
        }
    }

    /// The size label followed by the test glyph, if the check is enabled
    pub fn indicator(&self) -> String {
        let glyph = match self.tests_sufficient {
            Some(true) => TEST_SUFFICIENT_GLYPH,
            Some(false) => TEST_INSUFFICIENT_GLYPH,
            None => "",
        };

        format!("{}{}", self.label, glyph)
    }

    /// The status for the metrics comment thread.
    ///
    /// The thread is closed for small pull requests that do not lack tests.
    pub fn thread_status(&self) -> ThreadStatus {
        if self.label.is_small() && self.tests_sufficient != Some(false) {
            ThreadStatus::Closed
        } else {
            ThreadStatus::Active
        }
    }
}
