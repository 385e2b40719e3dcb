//! Error types for hypotest operations.
//!
//! Every validation failure is reported before any numeric work starts, so a
//! caller either gets a complete `TestResult` or one of these variants.

use thiserror::Error;

/// Main error type for hypothesis-test dispatch.
///
/// # Examples
///
/// ```
/// use hypotest::error::HypotestError;
///
/// let err = HypotestError::UnknownColumn {
///     name: "weight".to_string(),
/// };
/// assert!(err.to_string().contains("weight"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HypotestError {
    /// Requested test kind is not in the catalog.
    #[error("Unknown test kind: '{name}'")]
    UnknownTestKind {
        /// Name as supplied by the caller
        name: String,
    },

    /// Significance level outside the open interval (0, 1).
    #[error("Invalid significance level: alpha = {alpha}, expected 0 < alpha < 1")]
    InvalidSignificanceLevel {
        /// Provided alpha
        alpha: f64,
    },

    /// A referenced column does not exist in the dataset.
    #[error("Unknown column: '{name}'")]
    UnknownColumn {
        /// Column name
        name: String,
    },

    /// Wrong number of operand or grouping columns for the test.
    #[error("Arity mismatch for {test}: expected {expected} {role}, got {actual}")]
    ArityMismatch {
        /// Display name of the test kind
        test: String,
        /// What was miscounted ("operand columns", "grouping columns", ...)
        role: String,
        /// Expected count description
        expected: String,
        /// Actual count
        actual: usize,
    },

    /// A column has the wrong value type for its role in the test.
    #[error("Column '{column}' has type {actual}, expected {expected}")]
    InvalidColumnType {
        /// Column name
        column: String,
        /// Required type
        expected: String,
        /// Type found
        actual: String,
    },

    /// A grouping column yields too few levels, or a level combination is empty.
    #[error("Insufficient groups in '{column}': {reason}")]
    InsufficientGroups {
        /// Column (or column pair) that failed the check
        column: String,
        /// Description of the failure
        reason: String,
    },

    /// Too few observations remain after missing-value exclusion.
    #[error("Insufficient data: {context} (required {required}, got {actual})")]
    InsufficientData {
        /// Which sample or group ran short
        context: String,
        /// Minimum number of observations required
        required: usize,
        /// Observations remaining
        actual: usize,
    },

    /// Dataset construction failed (ragged, unnamed or duplicate columns).
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// Numeric failure inside the statistics layer.
    #[error("Computation error: {0}")]
    Computation(String),
}

impl HypotestError {
    /// Create an insufficient-data error with descriptive context.
    #[must_use]
    pub fn insufficient_data(context: impl Into<String>, required: usize, actual: usize) -> Self {
        Self::InsufficientData {
            context: context.into(),
            required,
            actual,
        }
    }

    /// Create a computation error.
    #[must_use]
    pub fn computation(msg: impl Into<String>) -> Self {
        Self::Computation(msg.into())
    }

    /// Returns true if the error was raised while validating inputs, before
    /// any statistic was computed.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Computation(_))
    }
}

impl From<&str> for HypotestError {
    fn from(msg: &str) -> Self {
        HypotestError::Computation(msg.to_string())
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, HypotestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_test_kind_display() {
        let err = HypotestError::UnknownTestKind {
            name: "z-test".to_string(),
        };
        assert!(err.to_string().contains("Unknown test kind"));
        assert!(err.to_string().contains("z-test"));
    }

    #[test]
    fn test_invalid_significance_level_display() {
        let err = HypotestError::InvalidSignificanceLevel { alpha: 1.5 };
        let msg = err.to_string();
        assert!(msg.contains("alpha = 1.5"));
        assert!(msg.contains("0 < alpha < 1"));
    }

    #[test]
    fn test_arity_mismatch_display() {
        let err = HypotestError::ArityMismatch {
            test: "Paired T-Test".to_string(),
            role: "operand columns".to_string(),
            expected: "2".to_string(),
            actual: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("Paired T-Test"));
        assert!(msg.contains("expected 2 operand columns"));
        assert!(msg.contains("got 3"));
    }

    #[test]
    fn test_insufficient_data_helper() {
        let err = HypotestError::insufficient_data("sample 'A'", 2, 1);
        assert!(matches!(
            err,
            HypotestError::InsufficientData {
                required: 2,
                actual: 1,
                ..
            }
        ));
        assert!(err.to_string().contains("sample 'A'"));
    }

    #[test]
    fn test_from_str_is_computation() {
        let err: HypotestError = "matrix is singular".into();
        assert!(matches!(err, HypotestError::Computation(_)));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_validation_classification() {
        assert!(HypotestError::UnknownColumn {
            name: "x".to_string()
        }
        .is_validation());
        assert!(HypotestError::InvalidDataset("empty".to_string()).is_validation());
    }
}
