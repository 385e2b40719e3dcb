//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use hypotest::prelude::*;
//! ```

pub use crate::catalog::{describe, describe_name, Decision, TestContract, TestKind};
pub use crate::config::EngineConfig;
pub use crate::data::{Column, ColumnType, Dataset, Level};
pub use crate::dispatch::{run_test, run_test_with, TestDetails, TestResult, TestSpec};
pub use crate::error::{HypotestError, Result};
pub use crate::stats::{AnovaTable, ContingencyTable, Term};
