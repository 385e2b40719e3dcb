//! Tail probabilities of the reference distributions.
//!
//! Thin wrappers over `statrs` that map construction failures (invalid
//! degrees of freedom) into [`HypotestError::Computation`] and clamp the
//! result into [0, 1].

use crate::error::{HypotestError, Result};
use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, StudentsT};

/// Two-tailed p-value `P(|T| >= |t|)` for Student's t with `df` degrees of freedom.
///
/// # Errors
///
/// Returns an error if `t` is not finite or `df` is not positive.
pub fn t_two_tailed_pvalue(t: f64, df: f64) -> Result<f64> {
    if !t.is_finite() {
        return Err(HypotestError::computation(format!(
            "t-statistic is not finite ({t})"
        )));
    }
    let dist = StudentsT::new(0.0, 1.0, df).map_err(|e| {
        HypotestError::computation(format!("invalid t distribution (df = {df}): {e}"))
    })?;
    Ok((2.0 * dist.sf(t.abs())).clamp(0.0, 1.0))
}

/// Upper-tail p-value `P(F >= f)` for the F distribution with `(df1, df2)`.
///
/// # Errors
///
/// Returns an error if `f` is not finite or either df is not positive.
pub fn f_upper_tail_pvalue(f: f64, df1: f64, df2: f64) -> Result<f64> {
    if !f.is_finite() {
        return Err(HypotestError::computation(format!(
            "F-statistic is not finite ({f})"
        )));
    }
    let dist = FisherSnedecor::new(df1, df2).map_err(|e| {
        HypotestError::computation(format!(
            "invalid F distribution (df1 = {df1}, df2 = {df2}): {e}"
        ))
    })?;
    Ok(dist.sf(f.max(0.0)).clamp(0.0, 1.0))
}

/// Upper-tail p-value `P(X² >= chi2)` for the chi-square distribution.
///
/// # Errors
///
/// Returns an error if `chi2` is not finite or `df` is not positive.
pub fn chi_square_upper_tail_pvalue(chi2: f64, df: f64) -> Result<f64> {
    if !chi2.is_finite() {
        return Err(HypotestError::computation(format!(
            "chi-square statistic is not finite ({chi2})"
        )));
    }
    let dist = ChiSquared::new(df).map_err(|e| {
        HypotestError::computation(format!("invalid chi-square distribution (df = {df}): {e}"))
    })?;
    Ok(dist.sf(chi2.max(0.0)).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_t_pvalue_at_zero_is_one() {
        let p = t_two_tailed_pvalue(0.0, 7.0).expect("valid df");
        assert!((p - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_t_pvalue_is_symmetric() {
        let lo = t_two_tailed_pvalue(-2.1, 9.0).expect("valid df");
        let hi = t_two_tailed_pvalue(2.1, 9.0).expect("valid df");
        assert_eq!(lo, hi);
    }

    #[test]
    fn test_t_pvalue_reference() {
        // t = 3.2324783694046193, df = 5
        let p = t_two_tailed_pvalue(3.232_478_369_404_619_3, 5.0).expect("valid df");
        assert!((p - 0.023_141_941_946_864_431).abs() < 1e-9);
    }

    #[test]
    fn test_f_pvalue_reference() {
        // F = 27 with (2, 6) df has an upper tail of exactly 1/1000.
        let p = f_upper_tail_pvalue(27.0, 2.0, 6.0).expect("valid df");
        assert!((p - 0.001).abs() < 1e-9);
    }

    #[test]
    fn test_chi_square_pvalue_reference() {
        // df = 2 gives sf(x) = exp(-x/2)
        let p = chi_square_upper_tail_pvalue(2.88, 2.0).expect("valid df");
        assert!((p - (-1.44_f64).exp()).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_statistic_is_computation_error() {
        assert!(matches!(
            t_two_tailed_pvalue(f64::NAN, 3.0),
            Err(HypotestError::Computation(_))
        ));
        assert!(matches!(
            f_upper_tail_pvalue(f64::INFINITY, 1.0, 2.0),
            Err(HypotestError::Computation(_))
        ));
    }

    #[test]
    fn test_invalid_df_is_computation_error() {
        assert!(t_two_tailed_pvalue(1.0, 0.0).is_err());
        assert!(chi_square_upper_tail_pvalue(1.0, 0.0).is_err());
    }
}
