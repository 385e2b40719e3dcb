//! Error types for hypotest-cli

use hypotest::HypotestError;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Result type alias for CLI operations
pub(crate) type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Malformed CSV input
    #[error("Invalid CSV in {path}: {message}")]
    InvalidCsv {
        /// Offending file
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Malformed configuration file
    #[error("Invalid config {path}: {message}")]
    InvalidConfig {
        /// Offending file
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The request was rejected by validation
    #[error("{0}")]
    Validation(HypotestError),

    /// The statistic could not be computed
    #[error("{0}")]
    Computation(HypotestError),
}

impl CliError {
    /// Raw process status for this error
    pub(crate) fn code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::FileNotFound(_) => 3,
            Self::InvalidCsv { .. } | Self::InvalidConfig { .. } => 4,
            Self::Computation(_) => 5,
            Self::Io(_) | Self::Json(_) => 7,
        }
    }

    /// Get exit code for this error
    pub(crate) fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

impl From<HypotestError> for CliError {
    fn from(e: HypotestError) -> Self {
        if e.is_validation() {
            Self::Validation(e)
        } else {
            Self::Computation(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_map_to_exit_code_2() {
        let err = CliError::from(HypotestError::UnknownColumn {
            name: "x".to_string(),
        });
        assert!(matches!(err, CliError::Validation(_)));
        assert_eq!(err.code(), 2);
    }

    #[test]
    fn test_computation_errors_map_to_exit_code_5() {
        let err = CliError::from(HypotestError::computation("zero variance"));
        assert!(matches!(err, CliError::Computation(_)));
        assert_eq!(err.code(), 5);
        assert!(err.to_string().contains("zero variance"));
    }

    #[test]
    fn test_file_not_found_display() {
        let err = CliError::FileNotFound(PathBuf::from("/no/such.csv"));
        assert!(err.to_string().contains("/no/such.csv"));
        assert_eq!(err.code(), 3);
    }
}
