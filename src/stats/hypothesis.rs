//! Statistical Hypothesis Testing
//!
//! Classical tests on plain numeric samples. Each function takes already
//! cleaned data (no missing values) and returns the statistic with its
//! p-value; column handling lives in [`crate::dispatch`].
//!
//! # Tests
//!
//! - **t-tests**: Compare means (one-sample, two-sample, paired)
//! - **ANOVA**: Compare multiple group means (F-test)
//!
//! # Example
//!
//! ```
//! use hypotest::stats::hypothesis::ttest_ind;
//!
//! let group1 = [2.3, 2.5, 2.7, 2.9, 3.1];
//! let group2 = [3.2, 3.4, 3.6, 3.8, 4.0];
//!
//! let result = ttest_ind(&group1, &group2, false).expect("valid t-test inputs");
//! assert!(result.pvalue < 0.01);
//! ```

use super::distribution::{f_upper_tail_pvalue, t_two_tailed_pvalue};
use crate::error::{HypotestError, Result};
use serde::Serialize;

/// Result of a t-test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TTestResult {
    /// t-statistic
    pub statistic: f64,

    /// p-value (two-tailed)
    pub pvalue: f64,

    /// Degrees of freedom (fractional for Welch's test)
    pub df: f64,
}

/// Result of an ANOVA F-test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnovaResult {
    /// F-statistic
    pub statistic: f64,

    /// p-value
    pub pvalue: f64,

    /// Between-groups degrees of freedom
    pub df_between: usize,

    /// Within-groups degrees of freedom
    pub df_within: usize,
}

fn mean(sample: &[f64]) -> f64 {
    sample.iter().sum::<f64>() / sample.len() as f64
}

/// Unbiased sample variance (n - 1 denominator).
fn sample_variance(sample: &[f64], mean: f64) -> f64 {
    sample.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (sample.len() - 1) as f64
}

fn finite_statistic(t: f64, what: &str) -> Result<f64> {
    if t.is_finite() {
        Ok(t)
    } else {
        Err(HypotestError::computation(format!(
            "{what} is undefined (zero variance)"
        )))
    }
}

/// One-sample t-test: Tests if sample mean differs from population mean.
///
/// H₀: μ = `population_mean`
/// H₁: μ ≠ `population_mean`
///
/// # Errors
///
/// Returns [`HypotestError::InsufficientData`] for fewer than 2 values and
/// [`HypotestError::Computation`] when the sample has zero variance.
pub fn ttest_1samp(sample: &[f64], population_mean: f64) -> Result<TTestResult> {
    let n = sample.len();
    if n < 2 {
        return Err(HypotestError::insufficient_data("t-test sample", 2, n));
    }

    let sample_mean = mean(sample);
    let std = sample_variance(sample, sample_mean).sqrt();

    // t = (x̄ - μ₀) / (s / √n)
    let se = std / (n as f64).sqrt();
    let t_stat = finite_statistic((sample_mean - population_mean) / se, "t-statistic")?;

    let df = (n - 1) as f64;
    let pvalue = t_two_tailed_pvalue(t_stat, df)?;

    Ok(TTestResult {
        statistic: t_stat,
        pvalue,
        df,
    })
}

/// Independent two-sample t-test: Tests if two independent samples have different means.
///
/// H₀: μ₁ = μ₂
/// H₁: μ₁ ≠ μ₂
///
/// # Arguments
///
/// * `sample1` - First sample
/// * `sample2` - Second sample
/// * `equal_var` - Assume equal variances (pooled t-test) or not (Welch's t-test)
///
/// # Errors
///
/// Returns [`HypotestError::InsufficientData`] if either sample has fewer than
/// 2 values and [`HypotestError::Computation`] when both variances are zero.
pub fn ttest_ind(sample1: &[f64], sample2: &[f64], equal_var: bool) -> Result<TTestResult> {
    let n1 = sample1.len();
    let n2 = sample2.len();

    if n1 < 2 {
        return Err(HypotestError::insufficient_data("first sample", 2, n1));
    }
    if n2 < 2 {
        return Err(HypotestError::insufficient_data("second sample", 2, n2));
    }

    let mean1 = mean(sample1);
    let mean2 = mean(sample2);
    let var1 = sample_variance(sample1, mean1);
    let var2 = sample_variance(sample2, mean2);
    let (n1f, n2f) = (n1 as f64, n2 as f64);

    let (t_stat, df) = if equal_var {
        // Student's pooled t-test
        let pooled_var = ((n1f - 1.0) * var1 + (n2f - 1.0) * var2) / (n1f + n2f - 2.0);
        let se = (pooled_var * (1.0 / n1f + 1.0 / n2f)).sqrt();
        ((mean1 - mean2) / se, n1f + n2f - 2.0)
    } else {
        // Welch's t-test
        let v1 = var1 / n1f;
        let v2 = var2 / n2f;
        let t = (mean1 - mean2) / (v1 + v2).sqrt();

        // Welch-Satterthwaite degrees of freedom
        let df = (v1 + v2).powi(2) / (v1.powi(2) / (n1f - 1.0) + v2.powi(2) / (n2f - 1.0));
        (t, df)
    };

    let t_stat = finite_statistic(t_stat, "t-statistic")?;
    let pvalue = t_two_tailed_pvalue(t_stat, df)?;

    Ok(TTestResult {
        statistic: t_stat,
        pvalue,
        df,
    })
}

/// Paired t-test: Tests if paired samples have different means.
///
/// H₀: `μ_diff` = 0
/// H₁: `μ_diff` ≠ 0
///
/// # Errors
///
/// Unequal lengths are rejected with [`HypotestError::InsufficientData`];
/// the longer sample is never truncated.
pub fn ttest_rel(sample1: &[f64], sample2: &[f64]) -> Result<TTestResult> {
    if sample1.len() != sample2.len() {
        return Err(HypotestError::insufficient_data(
            format!(
                "paired samples must have equal length ({} vs {})",
                sample1.len(),
                sample2.len()
            ),
            sample1.len(),
            sample2.len(),
        ));
    }

    let diffs: Vec<f64> = sample1
        .iter()
        .zip(sample2.iter())
        .map(|(&x1, &x2)| x1 - x2)
        .collect();

    ttest_1samp(&diffs, 0.0)
}

/// One-way ANOVA: Tests if multiple groups have the same mean.
///
/// H₀: μ₁ = μ₂ = ... = μₖ
/// H₁: At least one mean is different
///
/// Every group participates; there is no cap on the number of groups.
///
/// # Errors
///
/// Returns an error for fewer than 2 groups, an empty group, no
/// within-group degrees of freedom, or zero within-group variance.
pub fn f_oneway(groups: &[Vec<f64>]) -> Result<AnovaResult> {
    let k = groups.len();
    if k < 2 {
        return Err(HypotestError::insufficient_data("ANOVA groups", 2, k));
    }

    if let Some((i, _)) = groups.iter().enumerate().find(|(_, g)| g.is_empty()) {
        return Err(HypotestError::insufficient_data(
            format!("ANOVA group {i}"),
            1,
            0,
        ));
    }

    let group_means: Vec<f64> = groups.iter().map(|g| mean(g)).collect();

    let n_total: usize = groups.iter().map(Vec::len).sum();
    let grand_mean = groups.iter().flatten().sum::<f64>() / n_total as f64;

    // SSB = Σ n_i * (ȳ_i - ȳ)²
    let ss_between = groups
        .iter()
        .zip(group_means.iter())
        .map(|(group, &m)| group.len() as f64 * (m - grand_mean).powi(2))
        .sum::<f64>();

    // SSW = Σ Σ (y_ij - ȳ_i)²
    let ss_within = groups
        .iter()
        .zip(group_means.iter())
        .map(|(group, &m)| group.iter().map(|&val| (val - m).powi(2)).sum::<f64>())
        .sum::<f64>();

    let df_between = k - 1;
    let df_within = n_total - k;

    if df_within == 0 {
        return Err(HypotestError::insufficient_data(
            "observations for within-group variance",
            k + 1,
            n_total,
        ));
    }

    let ms_between = ss_between / df_between as f64;
    let ms_within = ss_within / df_within as f64;

    let f_stat = finite_statistic(ms_between / ms_within, "F-statistic")?;
    let pvalue = f_upper_tail_pvalue(f_stat, df_between as f64, df_within as f64)?;

    Ok(AnovaResult {
        statistic: f_stat,
        pvalue,
        df_between,
        df_within,
    })
}

#[cfg(test)]
#[path = "tests_hypothesis_contract.rs"]
mod tests_hypothesis_contract;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welch_reference_values() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 3.0, 4.0, 5.0, 16.0];
        let r = ttest_ind(&a, &b, false).expect("valid samples");
        assert!((r.statistic - -1.133_893_419_027_681_7).abs() < 1e-12);
        assert!((r.df - 4.611_764_705_882_352_9).abs() < 1e-12);
        assert!((r.pvalue - 0.312_317_945_344_214_51).abs() < 1e-8);
    }

    #[test]
    fn test_pooled_reference_values() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 3.0, 4.0, 5.0, 16.0];
        let r = ttest_ind(&a, &b, true).expect("valid samples");
        assert!((r.statistic - -1.133_893_419_027_681_7).abs() < 1e-12);
        assert!((r.df - 8.0).abs() < f64::EPSILON);
        assert!((r.pvalue - 0.289_672_213_730_873_88).abs() < 1e-8);
    }

    #[test]
    fn test_one_sample_reference_values() {
        let sample = [2.1, 2.5, 3.0, 3.4, 2.8, 3.1];
        let r = ttest_1samp(&sample, 2.5).expect("valid sample");
        assert!((r.statistic - 1.678_068_126_300_437_3).abs() < 1e-9);
        assert!((r.pvalue - 0.154_174_947_912_197_49).abs() < 1e-8);
    }

    #[test]
    fn test_paired_reference_values() {
        let before = [10.0, 12.0, 9.0, 14.0, 11.0, 13.0];
        let after = [9.5, 11.0, 9.2, 12.5, 10.1, 12.2];
        let r = ttest_rel(&before, &after).expect("equal lengths");
        assert!((r.statistic - 3.232_478_369_404_619_3).abs() < 1e-9);
        assert!((r.pvalue - 0.023_141_941_946_864_431).abs() < 1e-8);
        assert!((r.df - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_paired_unequal_lengths_not_truncated() {
        let err = ttest_rel(&[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, HypotestError::InsufficientData { .. }));
        assert!(err.to_string().contains("3 vs 2"));
    }

    #[test]
    fn test_f_oneway_uses_all_groups() {
        let groups = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![100.0]];
        let r = f_oneway(&groups).expect("valid groups");
        assert_eq!(r.df_between, 2);
        assert_eq!(r.df_within, 2);
        assert!((r.statistic - 7609.0).abs() < 1e-6);
        assert!((r.pvalue - 1.314_060_446_780_551_9e-4).abs() < 1e-10);
    }

    #[test]
    fn test_f_oneway_reference_values() {
        let groups = vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
            vec![7.0, 8.0, 9.0],
        ];
        let r = f_oneway(&groups).expect("valid groups");
        assert!((r.statistic - 27.0).abs() < 1e-9);
        assert!((r.pvalue - 0.001).abs() < 1e-9);
    }

    #[test]
    fn test_zero_variance_is_computation_error() {
        let err = ttest_1samp(&[3.0, 3.0, 3.0], 1.0).unwrap_err();
        assert!(matches!(err, HypotestError::Computation(_)));

        let err = f_oneway(&[vec![1.0, 1.0], vec![2.0, 2.0]]).unwrap_err();
        assert!(matches!(err, HypotestError::Computation(_)));
    }

    #[test]
    fn test_too_few_observations() {
        assert!(matches!(
            ttest_1samp(&[1.0], 0.0),
            Err(HypotestError::InsufficientData { .. })
        ));
        assert!(matches!(
            ttest_ind(&[1.0, 2.0], &[3.0], false),
            Err(HypotestError::InsufficientData { .. })
        ));
        assert!(matches!(
            f_oneway(&[vec![1.0], vec![2.0]]),
            Err(HypotestError::InsufficientData { .. })
        ));
        assert!(matches!(
            f_oneway(&[vec![1.0, 2.0]]),
            Err(HypotestError::InsufficientData { .. })
        ));
    }
}
