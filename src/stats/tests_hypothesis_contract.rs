// =========================================================================
// Hypothesis testing contract
//
// References:
//   - Student (1908) "The Probable Error of a Mean"
//   - Welch (1947) "The generalization of 'Student's' problem when several
//     different population variances are involved"
//   - Fisher (1925) "Statistical Methods for Research Workers"
// =========================================================================

use super::*;

/// One-sample t-test p-value is in [0, 1]
#[test]
fn contract_ttest_pvalue_bounded() {
    let sample = vec![2.0, 2.5, 3.0, 3.5, 4.0];
    let result = ttest_1samp(&sample, 3.0).expect("valid input");

    assert!(
        (0.0..=1.0).contains(&result.pvalue),
        "p-value={} outside [0,1]",
        result.pvalue
    );
}

/// Two-sample t-test detects a significant difference
#[test]
fn contract_ttest_ind_detects_difference() {
    let group1 = vec![1.0, 1.1, 1.2, 0.9, 1.0, 1.1, 0.95, 1.05];
    let group2 = vec![5.0, 5.1, 5.2, 4.9, 5.0, 5.1, 4.95, 5.05];
    let result = ttest_ind(&group1, &group2, false).expect("valid input");

    assert!(
        result.pvalue < 0.05,
        "p-value={} >= 0.05 for clearly different groups",
        result.pvalue
    );
}

/// Swapping samples negates t and keeps p
#[test]
fn contract_ttest_ind_antisymmetric() {
    let a = vec![10.0, 12.0, 11.5, 13.0, 9.5];
    let b = vec![8.0, 9.0, 8.5, 10.5];
    let ab = ttest_ind(&a, &b, false).expect("valid input");
    let ba = ttest_ind(&b, &a, false).expect("valid input");

    assert!((ab.statistic + ba.statistic).abs() < 1e-12);
    assert!((ab.pvalue - ba.pvalue).abs() < 1e-12);
}

/// Welch degrees of freedom lie between min(n1, n2) - 1 and n1 + n2 - 2
#[test]
fn contract_welch_df_bounds() {
    let a = vec![1.0, 4.0, 2.0, 8.0, 5.0, 7.0];
    let b = vec![3.0, 3.1, 2.9];
    let result = ttest_ind(&a, &b, false).expect("valid input");

    assert!(result.df >= 2.0 - 1e-12, "df={} below min(n)-1", result.df);
    assert!(result.df <= 7.0 + 1e-12, "df={} above n1+n2-2", result.df);
}

/// ANOVA on two groups agrees with the pooled t-test: F = t²
#[test]
fn contract_anova_two_groups_matches_pooled_t() {
    let a = vec![4.1, 5.2, 6.3, 5.0];
    let b = vec![6.9, 7.4, 8.8, 7.7, 8.1];
    let t = ttest_ind(&a, &b, true).expect("valid input");
    let f = f_oneway(&[a, b]).expect("valid input");

    assert!((f.statistic - t.statistic.powi(2)).abs() < 1e-9);
    assert!((f.pvalue - t.pvalue).abs() < 1e-9);
}
