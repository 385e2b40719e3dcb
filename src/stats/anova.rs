//! Factorial analysis of variance via least squares.
//!
//! A two-factor design is described by a [`ModelSpec`] rather than a textual
//! formula, so column names never need quoting. Factors are treatment coded
//! (first-seen level as baseline) and fitted with
//! [`LinearRegression`](crate::linear_model::LinearRegression); the
//! [`AnovaTable`] holds sequential (type I) sums of squares in the order
//! first factor, second factor, interaction.
//!
//! # Example
//!
//! ```
//! use hypotest::data::Level;
//! use hypotest::stats::anova::{fit_factorial, ModelSpec, Term};
//!
//! let t = |s: &str| Level::Text(s.to_string());
//! let a = vec![t("lo"), t("lo"), t("lo"), t("lo"), t("hi"), t("hi"), t("hi"), t("hi")];
//! let b = vec![t("x"), t("x"), t("y"), t("y"), t("x"), t("x"), t("y"), t("y")];
//! let y = [1.0, 2.0, 5.0, 6.0, 3.0, 4.0, 13.0, 15.0];
//!
//! let spec = ModelSpec::two_way("yield", "dose", "strain");
//! let table = fit_factorial(&spec, &y, &a, &b).expect("balanced design");
//! let row = table.row(&Term::interaction("dose", "strain")).expect("interaction fitted");
//! assert!((row.f_statistic.unwrap_or_default() - 24.142857142857142).abs() < 1e-6);
//! ```

use super::distribution::f_upper_tail_pvalue;
use crate::data::Level;
use crate::error::{HypotestError, Result};
use crate::linear_model::LinearRegression;
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured description of a two-factor linear model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Response column
    pub response: String,
    /// The two categorical main effects, in fitting order
    pub main_effects: [String; 2],
    /// Whether the interaction of the two main effects is fitted
    pub interaction: bool,
}

impl ModelSpec {
    /// Full factorial model: both main effects plus their interaction.
    pub fn two_way(
        response: impl Into<String>,
        factor_a: impl Into<String>,
        factor_b: impl Into<String>,
    ) -> Self {
        Self {
            response: response.into(),
            main_effects: [factor_a.into(), factor_b.into()],
            interaction: true,
        }
    }

    /// Drops the interaction term.
    #[must_use]
    pub fn additive(mut self) -> Self {
        self.interaction = false;
        self
    }
}

/// A row label of the ANOVA table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    /// Main effect of one factor
    Main(String),
    /// Interaction of two factors
    Interaction(String, String),
    /// Residual (error) row
    Residual,
}

impl Term {
    /// Interaction term of two factors.
    pub fn interaction(a: impl Into<String>, b: impl Into<String>) -> Self {
        Term::Interaction(a.into(), b.into())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Main(name) => write!(f, "{name}"),
            Term::Interaction(a, b) => write!(f, "{a}:{b}"),
            Term::Residual => write!(f, "Residual"),
        }
    }
}

/// One row of an ANOVA table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnovaRow {
    /// Term this row decomposes
    pub term: Term,
    /// Degrees of freedom
    pub df: usize,
    /// Sum of squares
    pub sum_sq: f64,
    /// Mean square (`sum_sq / df`)
    pub mean_sq: f64,
    /// F-statistic (absent on the residual row)
    pub f_statistic: Option<f64>,
    /// p-value (absent on the residual row)
    pub p_value: Option<f64>,
}

/// Analysis-of-variance decomposition of a fitted model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnovaTable {
    rows: Vec<AnovaRow>,
}

impl AnovaTable {
    /// All rows, effects first and residual last.
    #[must_use]
    pub fn rows(&self) -> &[AnovaRow] {
        &self.rows
    }

    /// Looks a row up by its term.
    #[must_use]
    pub fn row(&self, term: &Term) -> Option<&AnovaRow> {
        self.rows.iter().find(|r| r.term == *term)
    }

    /// Looks a row up by its display name (`"a"`, `"a:b"`, `"Residual"`).
    #[must_use]
    pub fn row_by_name(&self, name: &str) -> Option<&AnovaRow> {
        self.rows.iter().find(|r| r.term.to_string() == name)
    }

    /// The residual row.
    #[must_use]
    pub fn residual(&self) -> Option<&AnovaRow> {
        self.row(&Term::Residual)
    }
}

/// A treatment-coded categorical factor.
#[derive(Debug, Clone)]
struct Factor {
    n_levels: usize,
    codes: Vec<usize>,
}

impl Factor {
    fn new(observations: &[Level]) -> Self {
        let mut levels: Vec<&Level> = Vec::new();
        let codes = observations
            .iter()
            .map(|obs| {
                let found = levels.iter().position(|l| *l == obs);
                found.unwrap_or_else(|| {
                    levels.push(obs);
                    levels.len() - 1
                })
            })
            .collect();
        Self {
            n_levels: levels.len(),
            codes,
        }
    }

    /// Indicator columns for levels 1.. (level 0 is the baseline).
    fn dummies(&self, row: usize) -> impl Iterator<Item = f64> + '_ {
        let code = self.codes[row];
        (1..self.n_levels).map(move |l| if code == l { 1.0 } else { 0.0 })
    }
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    a: bool,
    b: bool,
    ab: bool,
}

fn design_matrix(a: &Factor, b: &Factor, cols: Columns) -> Result<Matrix> {
    let rows: Vec<Vec<f64>> = (0..a.codes.len())
        .map(|i| {
            let mut row = Vec::new();
            if cols.a {
                row.extend(a.dummies(i));
            }
            if cols.b {
                row.extend(b.dummies(i));
            }
            if cols.ab {
                let bd: Vec<f64> = b.dummies(i).collect();
                for da in a.dummies(i) {
                    row.extend(bd.iter().map(|db| da * db));
                }
            }
            row
        })
        .collect();

    if rows.first().map_or(true, Vec::is_empty) {
        return Ok(Matrix::zeros(rows.len(), 0));
    }
    Ok(Matrix::from_rows(&rows)?)
}

fn residual_sum_of_squares(x: &Matrix, y: &[f64]) -> Result<f64> {
    let mut model = LinearRegression::new();
    model.fit(x, y)?;
    Ok(model.residual_sum_of_squares(x, y)?)
}

fn effect_row(term: Term, sum_sq: f64, df: usize, ms_resid: f64, df_resid: usize) -> Result<AnovaRow> {
    let mean_sq = sum_sq / df as f64;
    let f = mean_sq / ms_resid;
    if !f.is_finite() {
        return Err(HypotestError::computation(format!(
            "F-statistic for '{term}' is undefined (zero residual variance)"
        )));
    }
    let p = f_upper_tail_pvalue(f, df as f64, df_resid as f64)?;
    Ok(AnovaRow {
        term,
        df,
        sum_sq,
        mean_sq,
        f_statistic: Some(f),
        p_value: Some(p),
    })
}

/// Fits a two-factor model and returns its ANOVA table.
///
/// `response`, `factor_a` and `factor_b` are row-aligned observations with
/// no missing values.
///
/// # Errors
///
/// Returns an error if the inputs are ragged, a factor has fewer than 2
/// levels, the design is rank deficient (an empty level combination when
/// the interaction is fitted), no residual degrees of freedom remain, or
/// the residual variance is zero.
pub fn fit_factorial(
    spec: &ModelSpec,
    response: &[f64],
    factor_a: &[Level],
    factor_b: &[Level],
) -> Result<AnovaTable> {
    let n = response.len();
    if factor_a.len() != n || factor_b.len() != n {
        return Err(HypotestError::computation(format!(
            "factorial design is ragged: {n} responses, {} and {} factor values",
            factor_a.len(),
            factor_b.len()
        )));
    }

    let a = Factor::new(factor_a);
    let b = Factor::new(factor_b);
    for (name, factor) in spec.main_effects.iter().zip([&a, &b]) {
        if factor.n_levels < 2 {
            return Err(HypotestError::InsufficientGroups {
                column: name.clone(),
                reason: format!("found {} level(s), need at least 2", factor.n_levels),
            });
        }
    }

    let df_a = a.n_levels - 1;
    let df_b = b.n_levels - 1;
    let df_ab = if spec.interaction { df_a * df_b } else { 0 };
    let n_params = 1 + df_a + df_b + df_ab;
    if n <= n_params {
        return Err(HypotestError::insufficient_data(
            "residual degrees of freedom in factorial model",
            n_params + 1,
            n,
        ));
    }
    let df_resid = n - n_params;

    let mean = response.iter().sum::<f64>() / n as f64;
    let rss_null = response.iter().map(|y| (y - mean).powi(2)).sum::<f64>();

    let only_a = Columns { a: true, b: false, ab: false };
    let additive = Columns { a: true, b: true, ab: false };
    let full = Columns { a: true, b: true, ab: true };

    let rss_a = residual_sum_of_squares(&design_matrix(&a, &b, only_a)?, response)?;
    let rss_additive = residual_sum_of_squares(&design_matrix(&a, &b, additive)?, response)?;
    let rss_full = if spec.interaction {
        residual_sum_of_squares(&design_matrix(&a, &b, full)?, response)?
    } else {
        rss_additive
    };

    let ms_resid = rss_full / df_resid as f64;
    let [name_a, name_b] = &spec.main_effects;

    let mut rows = vec![
        effect_row(
            Term::Main(name_a.clone()),
            (rss_null - rss_a).max(0.0),
            df_a,
            ms_resid,
            df_resid,
        )?,
        effect_row(
            Term::Main(name_b.clone()),
            (rss_a - rss_additive).max(0.0),
            df_b,
            ms_resid,
            df_resid,
        )?,
    ];
    if spec.interaction {
        rows.push(effect_row(
            Term::interaction(name_a.clone(), name_b.clone()),
            (rss_additive - rss_full).max(0.0),
            df_ab,
            ms_resid,
            df_resid,
        )?);
    }
    rows.push(AnovaRow {
        term: Term::Residual,
        df: df_resid,
        sum_sq: rss_full,
        mean_sq: ms_resid,
        f_statistic: None,
        p_value: None,
    });

    Ok(AnovaTable { rows })
}

#[cfg(test)]
#[path = "anova_tests.rs"]
mod tests;
