//! Statistical computations behind the dispatch engine.
//!
//! - t-tests (one-sample, Welch/pooled two-sample, paired)
//! - one-way ANOVA over any number of groups
//! - two-way factorial ANOVA via least squares
//! - Pearson chi-square test of independence on a contingency table
//!
//! All functions here operate on clean numeric or categorical slices; they
//! know nothing about datasets, column names, or missing values.

pub mod anova;
pub mod contingency;
pub mod distribution;
pub mod hypothesis;

pub use anova::{fit_factorial, AnovaRow, AnovaTable, ModelSpec, Term};
pub use contingency::{chi2_contingency, ChiSquareResult, ContingencyTable};
pub use hypothesis::{f_oneway, ttest_1samp, ttest_ind, ttest_rel, AnovaResult, TTestResult};
