//! Property-based tests using proptest.
//!
//! These tests verify invariants of the dispatch engine across generated
//! datasets: bounded p-values, the decision rule, determinism and symmetry.

use hypotest::prelude::*;
use proptest::prelude::*;

// Strategy for a numeric sample with enough spread to avoid zero variance
fn sample_strategy(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(-100.0f64..100.0, len).prop_filter("non-constant sample", |v| {
        v.iter().any(|&x| (x - v[0]).abs() > 1e-3)
    })
}

// Strategy for paired categorical observations over small alphabets
fn category_pairs_strategy() -> impl Strategy<Value = Vec<(u8, u8)>> {
    proptest::collection::vec((0u8..3, 0u8..3), 8..40)
}

fn labels(codes: &[u8], prefix: &str) -> Column {
    Column::categorical(
        prefix,
        codes.iter().map(|c| Some(format!("{prefix}{c}"))).collect(),
    )
}

fn two_column(a: &[f64], b: &[f64]) -> Dataset {
    let n = a.len().max(b.len());
    let pad = |v: &[f64]| -> Vec<Option<f64>> {
        (0..n).map(|i| v.get(i).copied()).collect()
    };
    Dataset::new(vec![
        Column::numeric("a", pad(a)),
        Column::numeric("b", pad(b)),
    ])
    .expect("padded columns are row-aligned")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn two_sample_p_value_is_bounded(a in sample_strategy(3..20), b in sample_strategy(3..20)) {
        let ds = two_column(&a, &b);
        let result = run_test(&ds, &TestSpec::two_sample("a", "b", 0.05))
            .expect("non-constant samples are valid");
        prop_assert!((0.0..=1.0).contains(&result.p_value));
        prop_assert!(result.statistic.is_finite());
    }

    #[test]
    fn decision_follows_p_value(a in sample_strategy(3..20), b in sample_strategy(3..20), alpha in 0.001f64..0.999) {
        let ds = two_column(&a, &b);
        let result = run_test(&ds, &TestSpec::two_sample("a", "b", alpha))
            .expect("non-constant samples are valid");
        prop_assert_eq!(result.decision == Decision::Reject, result.p_value < alpha);
    }

    #[test]
    fn two_sample_is_antisymmetric(a in sample_strategy(3..20), b in sample_strategy(3..20)) {
        let ds = two_column(&a, &b);
        let ab = run_test(&ds, &TestSpec::two_sample("a", "b", 0.05)).expect("valid");
        let ba = run_test(&ds, &TestSpec::two_sample("b", "a", 0.05)).expect("valid");
        prop_assert!((ab.statistic + ba.statistic).abs() < 1e-9);
        prop_assert!((ab.p_value - ba.p_value).abs() < 1e-9);
    }

    #[test]
    fn runs_are_deterministic(a in sample_strategy(3..20), b in sample_strategy(3..20)) {
        let ds = two_column(&a, &b);
        let spec = TestSpec::two_sample("a", "b", 0.05);
        let first = run_test(&ds, &spec).expect("valid");
        let second = run_test(&ds, &spec).expect("valid");
        prop_assert_eq!(first.statistic.to_bits(), second.statistic.to_bits());
        prop_assert_eq!(first.p_value.to_bits(), second.p_value.to_bits());
    }

    #[test]
    fn chi_square_is_symmetric(pairs in category_pairs_strategy()) {
        let (xs, ys): (Vec<u8>, Vec<u8>) = pairs.into_iter().unzip();
        let ds = Dataset::new(vec![labels(&xs, "x"), labels(&ys, "y")])
            .expect("row-aligned labels");

        let xy = run_test(&ds, &TestSpec::chi_square("x", "y", 0.05));
        let yx = run_test(&ds, &TestSpec::chi_square("y", "x", 0.05));
        match (xy, yx) {
            (Ok(xy), Ok(yx)) => {
                prop_assert!((xy.statistic - yx.statistic).abs() < 1e-9);
                prop_assert!((xy.p_value - yx.p_value).abs() < 1e-9);
                prop_assert!((0.0..=1.0).contains(&xy.p_value));
            }
            (Err(_), Err(_)) => {}
            (xy, yx) => prop_assert!(false, "asymmetric outcome: {:?} vs {:?}", xy, yx),
        }
    }

    #[test]
    fn one_way_anova_p_value_is_bounded(values in sample_strategy(9..30)) {
        let groups: Vec<&str> = (0..values.len())
            .map(|i| ["g0", "g1", "g2"][i % 3])
            .collect();
        let ds = Dataset::new(vec![
            Column::from_f64("v", &values),
            Column::from_strs("g", &groups),
        ])
        .expect("row-aligned columns");

        if let Ok(result) = run_test(&ds, &TestSpec::one_way_anova("v", "g", 0.05)) {
            prop_assert!((0.0..=1.0).contains(&result.p_value));
            prop_assert!(result.statistic >= 0.0);
            prop_assert_eq!(result.n_observations, values.len());
        }
    }

    #[test]
    fn paired_never_truncates(a in sample_strategy(4..15), extra in 1usize..5) {
        let mut b: Vec<f64> = a.iter().map(|x| x * 0.5 + 1.0).collect();
        b.extend(std::iter::repeat(7.0).take(extra));
        let ds = two_column(&a, &b);
        // rows beyond `a` are missing in column a and excluded pairwise
        if let Ok(result) = run_test(&ds, &TestSpec::paired("a", "b", 0.05)) {
            prop_assert_eq!(result.n_observations, a.len());
        }
    }
}
