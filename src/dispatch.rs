//! Hypothesis-test dispatch engine.
//!
//! [`run_test`] validates a [`TestSpec`] against a [`Dataset`] and the
//! catalog contract of its kind, excludes missing values, runs exactly one
//! statistical computation and renders the decision.
//!
//! Validation runs in a fixed order and finishes before any statistic is
//! computed: significance level, column existence, arity, column types,
//! grouping levels, then per-test sample sizes after exclusion.
//!
//! # Example
//!
//! ```
//! use hypotest::data::{Column, Dataset};
//! use hypotest::dispatch::{run_test, TestSpec};
//! use hypotest::catalog::Decision;
//!
//! let ds = Dataset::new(vec![
//!     Column::from_f64("A", &[1.0, 2.0, 3.0, 4.0, 5.0]),
//!     Column::from_f64("B", &[2.0, 3.0, 4.0, 5.0, 16.0]),
//! ])
//! .expect("row-aligned columns");
//!
//! let result = run_test(&ds, &TestSpec::two_sample("A", "B", 0.05)).expect("valid test");
//! assert_eq!(result.decision, Decision::FailToReject);
//! assert!((result.statistic + 1.1338934190276817).abs() < 1e-9);
//! ```

use crate::catalog::{self, Decision, NarrativeContext, TestContract, TestKind};
use crate::config::EngineConfig;
use crate::data::{Column, Dataset, Level};
use crate::error::{HypotestError, Result};
use crate::stats::{
    chi2_contingency, f_oneway, fit_factorial, ttest_1samp, ttest_ind, ttest_rel, AnovaTable,
    ContingencyTable, ModelSpec, Term,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

/// Default significance level.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// A request to run one hypothesis test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSpec {
    /// Test to run
    pub kind: TestKind,
    /// Operand column names, in order
    pub operands: Vec<String>,
    /// Grouping column names (ANOVA only)
    #[serde(default)]
    pub grouping_columns: Vec<String>,
    /// Hypothesized mean (one-sample only)
    #[serde(default)]
    pub hypothesized_mean: Option<f64>,
    /// Significance level in (0, 1)
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

fn names<const N: usize>(cols: [&str; N]) -> Vec<String> {
    cols.iter().map(|s| (*s).to_string()).collect()
}

impl TestSpec {
    /// Creates an empty spec for `kind` at the default significance level.
    #[must_use]
    pub fn new(kind: TestKind) -> Self {
        Self {
            kind,
            operands: Vec::new(),
            grouping_columns: Vec::new(),
            hypothesized_mean: None,
            alpha: DEFAULT_ALPHA,
        }
    }

    /// Sets the operand columns.
    #[must_use]
    pub fn with_operands<I, S>(mut self, operands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operands = operands.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the grouping columns.
    #[must_use]
    pub fn with_grouping_columns<I, S>(mut self, groupings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grouping_columns = groupings.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the hypothesized mean.
    #[must_use]
    pub fn with_hypothesized_mean(mut self, mean: f64) -> Self {
        self.hypothesized_mean = Some(mean);
        self
    }

    /// Sets the significance level.
    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Independent two-sample t-test of `a` against `b`.
    #[must_use]
    pub fn two_sample(a: &str, b: &str, alpha: f64) -> Self {
        Self::new(TestKind::TwoSample)
            .with_operands(names([a, b]))
            .with_alpha(alpha)
    }

    /// Paired t-test of `a` against `b`.
    #[must_use]
    pub fn paired(a: &str, b: &str, alpha: f64) -> Self {
        Self::new(TestKind::Paired)
            .with_operands(names([a, b]))
            .with_alpha(alpha)
    }

    /// One-sample t-test of `column` against `mean`.
    #[must_use]
    pub fn one_sample(column: &str, mean: f64, alpha: f64) -> Self {
        Self::new(TestKind::OneSample)
            .with_operands(names([column]))
            .with_hypothesized_mean(mean)
            .with_alpha(alpha)
    }

    /// One-way ANOVA of `response` across the groups of `group`.
    #[must_use]
    pub fn one_way_anova(response: &str, group: &str, alpha: f64) -> Self {
        Self::new(TestKind::OneWayAnova)
            .with_operands(names([response]))
            .with_grouping_columns(names([group]))
            .with_alpha(alpha)
    }

    /// Two-way ANOVA of `response` testing the `a:b` interaction.
    #[must_use]
    pub fn two_way_anova(response: &str, a: &str, b: &str, alpha: f64) -> Self {
        Self::new(TestKind::TwoWayAnova)
            .with_operands(names([response]))
            .with_grouping_columns(names([a, b]))
            .with_alpha(alpha)
    }

    /// Chi-square test of independence between `a` and `b`.
    #[must_use]
    pub fn chi_square(a: &str, b: &str, alpha: f64) -> Self {
        Self::new(TestKind::ChiSquare)
            .with_operands(names([a, b]))
            .with_alpha(alpha)
    }
}

/// Size and mean of one ANOVA group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    /// Group level
    pub level: Level,
    /// Observations in the group
    pub count: usize,
    /// Group mean
    pub mean: f64,
}

/// Test-specific supplemental output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TestDetails {
    /// Any of the three t-tests
    TTest {
        /// Degrees of freedom (fractional for Welch)
        df: f64,
        /// Observations per sample (one entry for paired and one-sample)
        sample_sizes: Vec<usize>,
    },
    /// One-way ANOVA
    OneWayAnova {
        /// Between-group degrees of freedom
        df_between: usize,
        /// Within-group degrees of freedom
        df_within: usize,
        /// Groups in first-encountered order
        groups: Vec<GroupSummary>,
    },
    /// Two-way ANOVA
    TwoWayAnova {
        /// Full sequential ANOVA table
        table: AnovaTable,
    },
    /// Chi-square test of independence
    ChiSquare {
        /// Degrees of freedom
        df: usize,
        /// Whether the Yates correction was applied
        corrected: bool,
        /// Observed counts
        table: ContingencyTable,
        /// Expected counts under independence
        expected: Vec<Vec<f64>>,
    },
}

/// Outcome of one test invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    /// Test that was run
    pub kind: TestKind,
    /// Test statistic (t, F or chi-square)
    pub statistic: f64,
    /// p-value in [0, 1]
    pub p_value: f64,
    /// Significance level used
    pub alpha: f64,
    /// `Reject` iff `p_value < alpha`
    pub decision: Decision,
    /// Plain-language verdict
    pub narrative: String,
    /// Observations used after missing-value exclusion
    pub n_observations: usize,
    /// Test-specific output
    pub details: TestDetails,
}

/// Statistic, p-value and details produced by one dispatch branch.
struct Computed {
    statistic: f64,
    p_value: f64,
    n_observations: usize,
    details: TestDetails,
}

/// Runs `spec` against `dataset` with the default [`EngineConfig`].
///
/// # Errors
///
/// Returns a validation error (see [`HypotestError`]) if the spec does not
/// fit the dataset, or [`HypotestError::Computation`] if the statistic is
/// numerically undefined.
pub fn run_test(dataset: &Dataset, spec: &TestSpec) -> Result<TestResult> {
    run_test_with(dataset, spec, &EngineConfig::default())
}

/// Runs `spec` against `dataset` using the variants selected by `config`.
///
/// # Errors
///
/// Same as [`run_test`].
#[instrument(skip_all, fields(kind = %spec.kind))]
pub fn run_test_with(dataset: &Dataset, spec: &TestSpec, config: &EngineConfig) -> Result<TestResult> {
    let contract = catalog::describe(spec.kind);
    validate(dataset, spec, contract)?;
    debug!(
        operands = ?spec.operands,
        groupings = ?spec.grouping_columns,
        alpha = spec.alpha,
        "spec validated"
    );

    let computed = match spec.kind {
        TestKind::TwoSample => two_sample(dataset, spec, config)?,
        TestKind::Paired => paired(dataset, spec)?,
        TestKind::OneSample => one_sample(dataset, spec, config)?,
        TestKind::OneWayAnova => one_way_anova(dataset, spec)?,
        TestKind::TwoWayAnova => two_way_anova(dataset, spec)?,
        TestKind::ChiSquare => chi_square(dataset, spec, config)?,
    };

    let decision = Decision::from_p_value(computed.p_value, spec.alpha);
    let mu = (spec.kind == TestKind::OneSample).then(|| hypothesized_mean(spec, config));
    let narrative = contract.template.render(&NarrativeContext {
        operands: &spec.operands,
        groupings: &spec.grouping_columns,
        hypothesized_mean: mu,
        statistic: computed.statistic,
        p_value: computed.p_value,
        alpha: spec.alpha,
        decision,
    });
    debug!(
        statistic = computed.statistic,
        p_value = computed.p_value,
        %decision,
        "test complete"
    );

    Ok(TestResult {
        kind: spec.kind,
        statistic: computed.statistic,
        p_value: computed.p_value,
        alpha: spec.alpha,
        decision,
        narrative,
        n_observations: computed.n_observations,
        details: computed.details,
    })
}

fn hypothesized_mean(spec: &TestSpec, config: &EngineConfig) -> f64 {
    spec.hypothesized_mean.unwrap_or(config.default_hypothesized_mean)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(dataset: &Dataset, spec: &TestSpec, contract: &TestContract) -> Result<()> {
    if !(spec.alpha > 0.0 && spec.alpha < 1.0) {
        return Err(HypotestError::InvalidSignificanceLevel { alpha: spec.alpha });
    }

    for name in spec.operands.iter().chain(&spec.grouping_columns) {
        dataset.column(name)?;
    }

    validate_arity(spec, contract)?;

    for name in &spec.operands {
        let column = dataset.column(name)?;
        if !contract.operand_type.accepts(column.column_type()) {
            return Err(HypotestError::InvalidColumnType {
                column: name.clone(),
                expected: contract.operand_type.to_string(),
                actual: column.column_type().to_string(),
            });
        }
    }

    validate_groupings(dataset, spec)
}

fn validate_arity(spec: &TestSpec, contract: &TestContract) -> Result<()> {
    let test = spec.kind.display_name().to_string();
    let n_operands = spec.operands.len();
    if n_operands < contract.min_operands || n_operands > contract.max_operands {
        let expected = if contract.min_operands == contract.max_operands {
            contract.min_operands.to_string()
        } else {
            format!("{}-{}", contract.min_operands, contract.max_operands)
        };
        return Err(HypotestError::ArityMismatch {
            test,
            role: "operand columns".to_string(),
            expected,
            actual: n_operands,
        });
    }

    if spec.grouping_columns.len() != contract.grouping_arity {
        return Err(HypotestError::ArityMismatch {
            test,
            role: "grouping columns".to_string(),
            expected: contract.grouping_arity.to_string(),
            actual: spec.grouping_columns.len(),
        });
    }

    if spec.hypothesized_mean.is_some() && !contract.requires_hypothesized_value {
        return Err(HypotestError::ArityMismatch {
            test,
            role: "hypothesized mean".to_string(),
            expected: "0".to_string(),
            actual: 1,
        });
    }

    Ok(())
}

fn validate_groupings(dataset: &Dataset, spec: &TestSpec) -> Result<()> {
    for name in &spec.grouping_columns {
        let n_levels = dataset.column(name)?.distinct_levels().len();
        if n_levels < 2 {
            return Err(HypotestError::InsufficientGroups {
                column: name.clone(),
                reason: format!("found {n_levels} distinct level(s), need at least 2"),
            });
        }
    }

    if let [a, b] = spec.grouping_columns.as_slice() {
        let col_a = dataset.column(a)?;
        let col_b = dataset.column(b)?;
        let pairs: Vec<(Level, Level)> = (0..dataset.n_rows())
            .filter_map(|row| Some((col_a.level(row)?, col_b.level(row)?)))
            .collect();
        let cells = ContingencyTable::from_pairs(pairs);
        for (i, row) in cells.counts().iter().enumerate() {
            if let Some(j) = row.iter().position(|&n| n == 0) {
                return Err(HypotestError::InsufficientGroups {
                    column: format!("{a}:{b}"),
                    reason: format!(
                        "level combination ({}, {}) has no observations",
                        cells.row_levels()[i],
                        cells.col_levels()[j]
                    ),
                });
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Missing-value exclusion
// ---------------------------------------------------------------------------

fn numeric_values(column: &Column) -> Vec<f64> {
    (0..column.len())
        .filter_map(|row| column.numeric_value(row))
        .collect()
}

fn require_sample(values: &[f64], name: &str) -> Result<()> {
    if values.len() < 2 {
        return Err(HypotestError::insufficient_data(
            format!("sample '{name}' after excluding missing values"),
            2,
            values.len(),
        ));
    }
    Ok(())
}

fn report_exclusion(n_rows: usize, kept: usize) {
    if kept < n_rows {
        trace!(excluded = n_rows - kept, kept, "rows with missing values excluded");
    }
}

// ---------------------------------------------------------------------------
// Branches
// ---------------------------------------------------------------------------

fn two_sample(dataset: &Dataset, spec: &TestSpec, config: &EngineConfig) -> Result<Computed> {
    let (a, b) = (&spec.operands[0], &spec.operands[1]);
    let s1 = numeric_values(dataset.column(a)?);
    let s2 = numeric_values(dataset.column(b)?);
    require_sample(&s1, a)?;
    require_sample(&s2, b)?;
    trace!(n1 = s1.len(), n2 = s2.len(), equal_var = config.equal_var, "two-sample t-test");

    let res = ttest_ind(&s1, &s2, config.equal_var)?;
    Ok(Computed {
        statistic: res.statistic,
        p_value: res.pvalue,
        n_observations: s1.len() + s2.len(),
        details: TestDetails::TTest {
            df: res.df,
            sample_sizes: vec![s1.len(), s2.len()],
        },
    })
}

fn paired(dataset: &Dataset, spec: &TestSpec) -> Result<Computed> {
    let (a, b) = (&spec.operands[0], &spec.operands[1]);
    let col_a = dataset.column(a)?;
    let col_b = dataset.column(b)?;
    let (s1, s2): (Vec<f64>, Vec<f64>) = (0..dataset.n_rows())
        .filter_map(|row| Some((col_a.numeric_value(row)?, col_b.numeric_value(row)?)))
        .unzip();
    report_exclusion(dataset.n_rows(), s1.len());

    if s1.len() < 2 {
        return Err(HypotestError::insufficient_data(
            format!("complete pairs of '{a}' and '{b}'"),
            2,
            s1.len(),
        ));
    }

    let res = ttest_rel(&s1, &s2)?;
    Ok(Computed {
        statistic: res.statistic,
        p_value: res.pvalue,
        n_observations: s1.len(),
        details: TestDetails::TTest {
            df: res.df,
            sample_sizes: vec![s1.len()],
        },
    })
}

fn one_sample(dataset: &Dataset, spec: &TestSpec, config: &EngineConfig) -> Result<Computed> {
    let name = &spec.operands[0];
    let sample = numeric_values(dataset.column(name)?);
    report_exclusion(dataset.n_rows(), sample.len());
    require_sample(&sample, name)?;

    let mu = hypothesized_mean(spec, config);
    trace!(n = sample.len(), mu, "one-sample t-test");
    let res = ttest_1samp(&sample, mu)?;
    Ok(Computed {
        statistic: res.statistic,
        p_value: res.pvalue,
        n_observations: sample.len(),
        details: TestDetails::TTest {
            df: res.df,
            sample_sizes: vec![sample.len()],
        },
    })
}

fn one_way_anova(dataset: &Dataset, spec: &TestSpec) -> Result<Computed> {
    let response = dataset.column(&spec.operands[0])?;
    let group_name = &spec.grouping_columns[0];
    let group_col = dataset.column(group_name)?;

    let levels = group_col.distinct_levels();
    let mut groups: Vec<Vec<f64>> = vec![Vec::new(); levels.len()];
    for row in 0..dataset.n_rows() {
        let (Some(value), Some(level)) = (response.numeric_value(row), group_col.level(row)) else {
            continue;
        };
        if let Some(idx) = levels.iter().position(|l| *l == level) {
            groups[idx].push(value);
        }
    }
    let n_used: usize = groups.iter().map(Vec::len).sum();
    report_exclusion(dataset.n_rows(), n_used);

    if let Some(idx) = groups.iter().position(Vec::is_empty) {
        return Err(HypotestError::insufficient_data(
            format!(
                "group '{}' of '{group_name}' after excluding missing values",
                levels[idx]
            ),
            1,
            0,
        ));
    }
    trace!(n_groups = groups.len(), n_used, "one-way ANOVA");

    let res = f_oneway(&groups)?;
    let summaries = levels
        .into_iter()
        .zip(&groups)
        .map(|(level, g)| GroupSummary {
            level,
            count: g.len(),
            mean: g.iter().sum::<f64>() / g.len() as f64,
        })
        .collect();

    Ok(Computed {
        statistic: res.statistic,
        p_value: res.pvalue,
        n_observations: n_used,
        details: TestDetails::OneWayAnova {
            df_between: res.df_between,
            df_within: res.df_within,
            groups: summaries,
        },
    })
}

fn two_way_anova(dataset: &Dataset, spec: &TestSpec) -> Result<Computed> {
    let response_name = &spec.operands[0];
    let (a, b) = (&spec.grouping_columns[0], &spec.grouping_columns[1]);
    let response = dataset.column(response_name)?;
    let col_a = dataset.column(a)?;
    let col_b = dataset.column(b)?;

    let mut y = Vec::new();
    let mut levels_a = Vec::new();
    let mut levels_b = Vec::new();
    let mut cells_known = Vec::new();
    for row in 0..dataset.n_rows() {
        let (Some(la), Some(lb)) = (col_a.level(row), col_b.level(row)) else {
            continue;
        };
        if let Some(value) = response.numeric_value(row) {
            y.push(value);
            levels_a.push(la.clone());
            levels_b.push(lb.clone());
        }
        cells_known.push((la, lb));
    }
    report_exclusion(dataset.n_rows(), y.len());

    let design = ContingencyTable::from_pairs(cells_known);
    let used = ContingencyTable::from_pairs(levels_a.iter().cloned().zip(levels_b.iter().cloned()));
    for la in design.row_levels() {
        for lb in design.col_levels() {
            if cell_count(&used, la, lb) == 0 {
                return Err(HypotestError::insufficient_data(
                    format!("level combination ({la}, {lb}) after excluding missing '{response_name}'"),
                    1,
                    0,
                ));
            }
        }
    }

    let model = ModelSpec::two_way(response_name.clone(), a.clone(), b.clone());
    let table = fit_factorial(&model, &y, &levels_a, &levels_b)?;
    let interaction = table
        .row(&Term::interaction(a.clone(), b.clone()))
        .ok_or_else(|| HypotestError::computation("ANOVA table has no interaction row"))?;
    let (statistic, p_value) = match (interaction.f_statistic, interaction.p_value) {
        (Some(f), Some(p)) => (f, p),
        _ => {
            return Err(HypotestError::computation(
                "interaction row has no F-statistic",
            ))
        }
    };
    trace!(n = y.len(), statistic, "two-way ANOVA interaction");

    Ok(Computed {
        statistic,
        p_value,
        n_observations: y.len(),
        details: TestDetails::TwoWayAnova { table },
    })
}

fn cell_count(table: &ContingencyTable, row: &Level, col: &Level) -> usize {
    let i = table.row_levels().iter().position(|l| l == row);
    let j = table.col_levels().iter().position(|l| l == col);
    match (i, j) {
        (Some(i), Some(j)) => table.counts()[i][j],
        _ => 0,
    }
}

fn chi_square(dataset: &Dataset, spec: &TestSpec, config: &EngineConfig) -> Result<Computed> {
    let (a, b) = (&spec.operands[0], &spec.operands[1]);
    let col_a = dataset.column(a)?;
    let col_b = dataset.column(b)?;
    let pairs: Vec<(Level, Level)> = (0..dataset.n_rows())
        .filter_map(|row| Some((col_a.level(row)?, col_b.level(row)?)))
        .collect();
    report_exclusion(dataset.n_rows(), pairs.len());

    if pairs.is_empty() {
        return Err(HypotestError::insufficient_data(
            format!("complete pairs of '{a}' and '{b}'"),
            1,
            0,
        ));
    }

    let table = ContingencyTable::from_pairs(pairs);
    let (n_rows, n_cols) = table.shape();
    for (name, n_levels) in [(a, n_rows), (b, n_cols)] {
        if n_levels < 2 {
            return Err(HypotestError::InsufficientGroups {
                column: name.clone(),
                reason: format!("found {n_levels} distinct level(s), need at least 2"),
            });
        }
    }

    let res = chi2_contingency(&table, config.yates_correction)?;
    trace!(df = res.df, corrected = res.corrected, "chi-square test");
    Ok(Computed {
        statistic: res.statistic,
        p_value: res.pvalue,
        n_observations: table.total(),
        details: TestDetails::ChiSquare {
            df: res.df,
            corrected: res.corrected,
            table,
            expected: res.expected,
        },
    })
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
