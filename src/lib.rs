//! Hypotest: hypothesis-test dispatch and decision engine in pure Rust.
//!
//! Given a tabular [`Dataset`], a [`TestSpec`] naming one of six standard
//! tests, its operand and grouping columns and a significance level,
//! hypotest validates the request, computes the statistic and p-value with
//! the correct variant of the test and renders a plain-language verdict.
//!
//! # Quick Start
//!
//! ```
//! use hypotest::prelude::*;
//!
//! let ds = Dataset::new(vec![
//!     Column::from_f64("response", &[1.0, 2.0, 3.0, 4.0, 100.0]),
//!     Column::from_strs("group", &["x", "x", "y", "y", "z"]),
//! ])
//! .expect("columns are row-aligned");
//!
//! let spec = TestSpec::one_way_anova("response", "group", 0.05);
//! let result = run_test(&ds, &spec).expect("valid test");
//!
//! assert!((result.statistic - 7609.0).abs() < 1e-6);
//! assert_eq!(result.decision, Decision::Reject);
//! println!("{}", result.narrative);
//! ```
//!
//! # Modules
//!
//! - [`catalog`]: Supported test kinds and their contracts
//! - [`dispatch`]: Validation, dispatch and decision
//! - [`data`]: Dataset of named, typed columns with missing cells
//! - [`stats`]: t-tests, one-way F-test, contingency chi-square, factorial ANOVA
//! - [`linear_model`]: Ordinary least squares used by the factorial ANOVA
//! - [`primitives`]: Dense matrix type
//! - [`config`]: Engine variant selection
//! - [`error`]: Error type
//!
//! # Logging
//!
//! The engine emits `tracing` events at `debug` and `trace` level and
//! installs no subscriber.

pub mod catalog;
pub mod config;
pub mod data;
pub mod dispatch;
pub mod error;
pub mod linear_model;
pub mod prelude;
pub mod primitives;
pub mod stats;

pub use catalog::{Decision, TestKind};
pub use config::EngineConfig;
pub use data::{Column, Dataset};
pub use dispatch::{run_test, run_test_with, TestDetails, TestResult, TestSpec};
pub use error::{HypotestError, Result};
