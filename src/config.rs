//! Engine configuration.
//!
//! [`EngineConfig`] selects test variants that the dispatch engine would
//! otherwise default. It deserializes with every field optional, so a JSON
//! file only needs the keys it overrides.

use serde::{Deserialize, Serialize};

/// Variant selection for [`run_test_with`](crate::dispatch::run_test_with).
///
/// # Examples
///
/// ```
/// use hypotest::config::EngineConfig;
///
/// let config = EngineConfig::default().with_equal_var(true);
/// assert!(config.equal_var);
/// assert!(config.yates_correction);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Assume equal population variances in the two-sample test
    /// (Student's pooled t-test). `false` selects Welch's test.
    pub equal_var: bool,
    /// Apply the Yates continuity correction to chi-square tables with one
    /// degree of freedom.
    pub yates_correction: bool,
    /// Hypothesized mean used by the one-sample test when the spec gives none.
    pub default_hypothesized_mean: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            equal_var: false,
            yates_correction: true,
            default_hypothesized_mean: 0.0,
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the two-sample test pools variances.
    #[must_use]
    pub fn with_equal_var(mut self, equal_var: bool) -> Self {
        self.equal_var = equal_var;
        self
    }

    /// Sets whether the Yates correction is applied.
    #[must_use]
    pub fn with_yates_correction(mut self, yates_correction: bool) -> Self {
        self.yates_correction = yates_correction;
        self
    }

    /// Sets the fallback hypothesized mean.
    #[must_use]
    pub fn with_default_hypothesized_mean(mut self, mean: f64) -> Self {
        self.default_hypothesized_mean = mean;
        self
    }
}
