//! Contingency tables and Pearson's chi-square test of independence.

use super::distribution::chi_square_upper_tail_pvalue;
use crate::data::Level;
use crate::error::{HypotestError, Result};
use serde::Serialize;

/// Cross-tabulation of joint occurrences of two categorical variables.
///
/// Row and column levels keep the order in which they were first seen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContingencyTable {
    row_levels: Vec<Level>,
    col_levels: Vec<Level>,
    counts: Vec<Vec<usize>>,
}

impl ContingencyTable {
    /// Builds a table from paired observations.
    ///
    /// # Examples
    ///
    /// ```
    /// use hypotest::data::Level;
    /// use hypotest::stats::ContingencyTable;
    ///
    /// let t = |s: &str| Level::Text(s.to_string());
    /// let table = ContingencyTable::from_pairs(vec![
    ///     (t("yes"), t("a")),
    ///     (t("no"), t("b")),
    ///     (t("yes"), t("b")),
    /// ]);
    /// assert_eq!(table.shape(), (2, 2));
    /// assert_eq!(table.total(), 3);
    /// ```
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Level, Level)>) -> Self {
        let mut table = Self {
            row_levels: Vec::new(),
            col_levels: Vec::new(),
            counts: Vec::new(),
        };

        for (r, c) in pairs {
            let i = table.row_index_or_insert(r);
            let j = table.col_index_or_insert(c);
            table.counts[i][j] += 1;
        }

        table
    }

    fn row_index_or_insert(&mut self, level: Level) -> usize {
        if let Some(i) = self.row_levels.iter().position(|l| *l == level) {
            return i;
        }
        self.row_levels.push(level);
        self.counts.push(vec![0; self.col_levels.len()]);
        self.row_levels.len() - 1
    }

    fn col_index_or_insert(&mut self, level: Level) -> usize {
        if let Some(j) = self.col_levels.iter().position(|l| *l == level) {
            return j;
        }
        self.col_levels.push(level);
        for row in &mut self.counts {
            row.push(0);
        }
        self.col_levels.len() - 1
    }

    /// Returns (rows, cols).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.row_levels.len(), self.col_levels.len())
    }

    /// Row levels in first-seen order.
    #[must_use]
    pub fn row_levels(&self) -> &[Level] {
        &self.row_levels
    }

    /// Column levels in first-seen order.
    #[must_use]
    pub fn col_levels(&self) -> &[Level] {
        &self.col_levels
    }

    /// Observed counts, row-major.
    #[must_use]
    pub fn counts(&self) -> &[Vec<usize>] {
        &self.counts
    }

    /// Total number of observations.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Row marginals.
    #[must_use]
    pub fn row_totals(&self) -> Vec<usize> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    /// Column marginals.
    #[must_use]
    pub fn col_totals(&self) -> Vec<usize> {
        (0..self.col_levels.len())
            .map(|j| self.counts.iter().map(|row| row[j]).sum())
            .collect()
    }

    /// Returns the table with rows and columns swapped.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let counts = (0..self.col_levels.len())
            .map(|j| self.counts.iter().map(|row| row[j]).collect())
            .collect();
        Self {
            row_levels: self.col_levels.clone(),
            col_levels: self.row_levels.clone(),
            counts,
        }
    }

    /// Expected frequencies under independence: `row_i * col_j / total`.
    #[must_use]
    pub fn expected_frequencies(&self) -> Vec<Vec<f64>> {
        let total = self.total() as f64;
        let col_totals = self.col_totals();
        self.row_totals()
            .into_iter()
            .map(|r| {
                col_totals
                    .iter()
                    .map(|&c| r as f64 * c as f64 / total)
                    .collect()
            })
            .collect()
    }
}

/// Result of a chi-square test of independence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChiSquareResult {
    /// Chi-square statistic
    pub statistic: f64,

    /// p-value
    pub pvalue: f64,

    /// Degrees of freedom, (rows - 1) * (cols - 1)
    pub df: usize,

    /// Whether the Yates continuity correction was applied
    pub corrected: bool,

    /// Expected frequencies under independence
    pub expected: Vec<Vec<f64>>,
}

/// Pearson's chi-square test of independence on a contingency table.
///
/// With `correction` set and exactly one degree of freedom, each
/// `|observed - expected|` is reduced by `min(0.5, |observed - expected|)`
/// (Yates' continuity correction).
///
/// # Errors
///
/// Returns [`HypotestError::InsufficientData`] for an empty table and
/// [`HypotestError::InsufficientGroups`] when either margin has fewer than
/// two levels.
pub fn chi2_contingency(table: &ContingencyTable, correction: bool) -> Result<ChiSquareResult> {
    if table.total() == 0 {
        return Err(HypotestError::insufficient_data(
            "contingency table observations",
            1,
            0,
        ));
    }

    let (n_rows, n_cols) = table.shape();
    if n_rows < 2 || n_cols < 2 {
        return Err(HypotestError::InsufficientGroups {
            column: "contingency table".to_string(),
            reason: format!("shape {n_rows}x{n_cols}, need at least 2x2"),
        });
    }

    let df = (n_rows - 1) * (n_cols - 1);
    let corrected = correction && df == 1;
    let expected = table.expected_frequencies();

    let statistic = table
        .counts()
        .iter()
        .zip(expected.iter())
        .flat_map(|(obs_row, exp_row)| obs_row.iter().zip(exp_row.iter()))
        .map(|(&obs, &exp)| {
            let diff = (obs as f64 - exp).abs();
            let diff = if corrected { diff - diff.min(0.5) } else { diff };
            diff * diff / exp
        })
        .sum::<f64>();

    let pvalue = chi_square_upper_tail_pvalue(statistic, df as f64)?;

    Ok(ChiSquareResult {
        statistic,
        pvalue,
        df,
        corrected,
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Level {
        Level::Text(s.to_string())
    }

    fn table_from_counts(counts: &[&[usize]]) -> ContingencyTable {
        let mut pairs = Vec::new();
        for (i, row) in counts.iter().enumerate() {
            for (j, &n) in row.iter().enumerate() {
                for _ in 0..n {
                    pairs.push((Level::Number(i as f64), Level::Number(j as f64)));
                }
            }
        }
        ContingencyTable::from_pairs(pairs)
    }

    #[test]
    fn test_from_pairs_first_seen_order() {
        let table = ContingencyTable::from_pairs(vec![
            (text("m"), text("yes")),
            (text("f"), text("no")),
            (text("m"), text("no")),
            (text("m"), text("yes")),
        ]);
        assert_eq!(table.row_levels(), &[text("m"), text("f")]);
        assert_eq!(table.col_levels(), &[text("yes"), text("no")]);
        assert_eq!(table.counts(), &[vec![2, 1], vec![0, 1]]);
        assert_eq!(table.row_totals(), vec![3, 1]);
        assert_eq!(table.col_totals(), vec![2, 2]);
    }

    #[test]
    fn test_transpose_swaps_margins() {
        let table = table_from_counts(&[&[3, 1, 1], &[1, 2, 4]]);
        let t = table.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.row_totals(), table.col_totals());
        assert_eq!(t.col_totals(), table.row_totals());
    }

    #[test]
    fn test_expected_frequencies() {
        let table = table_from_counts(&[&[3, 1], &[1, 3]]);
        let expected = table.expected_frequencies();
        for row in &expected {
            for &e in row {
                assert!((e - 2.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_yates_correction_on_2x2() {
        let table = table_from_counts(&[&[3, 1], &[1, 3]]);
        let r = chi2_contingency(&table, true).expect("valid table");
        assert!(r.corrected);
        assert_eq!(r.df, 1);
        assert!((r.statistic - 0.5).abs() < 1e-12);
        assert!((r.pvalue - 0.479_500_122_186_953_46).abs() < 1e-9);

        let uncorrected = chi2_contingency(&table, false).expect("valid table");
        assert!(!uncorrected.corrected);
        assert!((uncorrected.statistic - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_correction_above_one_df() {
        let table = table_from_counts(&[&[3, 1, 1], &[1, 2, 4]]);
        let r = chi2_contingency(&table, true).expect("valid table");
        assert!(!r.corrected);
        assert_eq!(r.df, 2);
        assert!((r.statistic - 2.88).abs() < 1e-12);
        assert!((r.pvalue - 0.236_927_758_682_121_76).abs() < 1e-9);
    }

    #[test]
    fn test_single_level_margin_rejected() {
        let table = table_from_counts(&[&[3, 2]]);
        let err = chi2_contingency(&table, true).unwrap_err();
        assert!(matches!(err, HypotestError::InsufficientGroups { .. }));
    }

    #[test]
    fn test_empty_table_rejected() {
        let table = ContingencyTable::from_pairs(Vec::new());
        let err = chi2_contingency(&table, true).unwrap_err();
        assert!(matches!(err, HypotestError::InsufficientData { .. }));
    }
}
