//! Linear models for regression.
//!
//! Ordinary Least Squares is the fitting backend for the factorial ANOVA
//! decomposition in [`crate::stats::anova`].

use crate::primitives::Matrix;

/// Ordinary Least Squares (OLS) linear regression.
///
/// Fits a linear model by minimizing the residual sum of squares between
/// observed targets and predicted targets:
///
/// ```text
/// y = X β + ε
/// ```
///
/// # Solver
///
/// Uses normal equations: `β = (X^T X)^-1 X^T y` via Cholesky decomposition.
///
/// # Examples
///
/// ```
/// use hypotest::linear_model::LinearRegression;
/// use hypotest::primitives::Matrix;
///
/// // y = 2x + 1
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).expect("4x1");
/// let y = [3.0, 5.0, 7.0, 9.0];
///
/// let mut model = LinearRegression::new();
/// model.fit(&x, &y).expect("well-posed system");
/// assert!((model.intercept() - 1.0).abs() < 1e-9);
/// ```
///
/// # Performance
///
/// - Time complexity: O(n²p + p³) where n = samples, p = features
/// - Space complexity: O(np)
#[derive(Debug, Clone)]
pub struct LinearRegression {
    /// Coefficients for features (excluding intercept).
    coefficients: Option<Vec<f64>>,
    /// Intercept (bias) term.
    intercept: f64,
    /// Whether to fit an intercept.
    fit_intercept: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Creates a new `LinearRegression` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: 0.0,
            fit_intercept: true,
        }
    }

    /// Sets whether to fit an intercept term.
    #[must_use]
    pub fn with_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Returns the coefficients (excluding intercept), if fitted.
    #[must_use]
    pub fn coefficients(&self) -> Option<&[f64]> {
        self.coefficients.as_deref()
    }

    /// Returns the intercept term.
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    /// Number of estimated parameters, intercept included.
    #[must_use]
    pub fn n_parameters(&self) -> usize {
        self.coefficients.as_ref().map_or(0, Vec::len) + usize::from(self.fit_intercept)
    }

    /// Adds an intercept column of ones to the design matrix.
    fn add_intercept_column(x: &Matrix) -> Matrix {
        let (n_rows, n_cols) = x.shape();
        let mut design = Matrix::zeros(n_rows, n_cols + 1);

        for i in 0..n_rows {
            design.set(i, 0, 1.0);
            for j in 0..n_cols {
                design.set(i, j + 1, x.get(i, j));
            }
        }

        design
    }

    /// Fits the model using normal equations.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Input dimensions don't match
    /// - Not enough samples for the number of features (underdetermined system)
    /// - The design is rank deficient (`X^T X` not positive definite)
    pub fn fit(&mut self, x: &Matrix, y: &[f64]) -> Result<(), &'static str> {
        let (n_samples, n_features) = x.shape();

        if n_samples != y.len() {
            return Err("Number of samples must match target length");
        }

        if n_samples == 0 {
            return Err("Cannot fit with zero samples");
        }

        let required_samples = n_features + usize::from(self.fit_intercept);
        if n_samples < required_samples {
            return Err("Insufficient samples: need at least as many samples as parameters");
        }

        let x_design = if self.fit_intercept {
            Self::add_intercept_column(x)
        } else {
            x.clone()
        };

        let xt = x_design.transpose();
        let xtx = xt.matmul(&x_design)?;
        let xty = xt.matvec(y)?;
        let beta = xtx.cholesky_solve(&xty)?;

        if self.fit_intercept {
            self.intercept = beta[0];
            self.coefficients = Some(beta[1..].to_vec());
        } else {
            self.intercept = 0.0;
            self.coefficients = Some(beta);
        }

        Ok(())
    }

    /// Predicts target values for input data.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or the feature count differs.
    pub fn predict(&self, x: &Matrix) -> Result<Vec<f64>, &'static str> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or("Model not fitted. Call fit() first.")?;

        let predictions = x.matvec(coefficients)?;
        Ok(predictions.into_iter().map(|p| p + self.intercept).collect())
    }

    /// Residual sum of squares `Σ (y - ŷ)²` of the fitted model on `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or dimensions differ.
    pub fn residual_sum_of_squares(&self, x: &Matrix, y: &[f64]) -> Result<f64, &'static str> {
        let predictions = self.predict(x)?;
        if predictions.len() != y.len() {
            return Err("Number of samples must match target length");
        }
        Ok(predictions
            .iter()
            .zip(y)
            .map(|(p, t)| (t - p).powi(2))
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let model = LinearRegression::new();
        assert!(!model.is_fitted());
        assert!(model.fit_intercept);
        assert_eq!(model.n_parameters(), 1);
    }

    #[test]
    fn test_simple_regression() {
        // y = 2x + 1
        let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let y = [3.0, 5.0, 7.0, 9.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        assert!(model.is_fitted());
        let coef = model.coefficients().unwrap();
        assert!((coef[0] - 2.0).abs() < 1e-9);
        assert!((model.intercept() - 1.0).abs() < 1e-9);
        assert_eq!(model.n_parameters(), 2);

        let predictions = model.predict(&x).unwrap();
        for (p, t) in predictions.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-9);
        }
        assert!(model.residual_sum_of_squares(&x, &y).unwrap() < 1e-12);
    }

    #[test]
    fn test_multivariate_regression() {
        // y = 1 + 2*x1 + 3*x2
        let x = Matrix::from_vec(4, 2, vec![1.0, 1.0, 2.0, 1.0, 1.0, 2.0, 2.0, 2.0]).unwrap();
        let y = [6.0, 8.0, 9.0, 11.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let coef = model.coefficients().unwrap();
        assert!((coef[0] - 2.0).abs() < 1e-9);
        assert!((coef[1] - 3.0).abs() < 1e-9);
        assert!((model.intercept() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_intercept() {
        // y = 2x
        let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let y = [2.0, 4.0, 6.0, 8.0];

        let mut model = LinearRegression::new().with_intercept(false);
        model.fit(&x, &y).unwrap();

        assert!((model.coefficients().unwrap()[0] - 2.0).abs() < 1e-9);
        assert!(model.intercept().abs() < 1e-12);
    }

    #[test]
    fn test_intercept_only_rss_is_total_sum_of_squares() {
        let x = Matrix::zeros(4, 0);
        let y = [1.0, 2.0, 3.0, 6.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        assert!((model.intercept() - 3.0).abs() < 1e-12);
        let rss = model.residual_sum_of_squares(&x, &y).unwrap();
        assert!((rss - 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_rank_deficient_design_error() {
        // Second column duplicates the first.
        let x = Matrix::from_vec(4, 2, vec![1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0]).unwrap();
        let y = [1.0, 2.0, 3.0, 4.0];

        let mut model = LinearRegression::new();
        assert!(model.fit(&x, &y).is_err());
    }

    #[test]
    fn test_dimension_mismatch_error() {
        let x = Matrix::from_vec(3, 2, vec![1.0; 6]).unwrap();
        let mut model = LinearRegression::new();
        assert!(model.fit(&x, &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_empty_data_error() {
        let x = Matrix::from_vec(0, 2, vec![]).unwrap();
        let mut model = LinearRegression::new();
        assert!(model.fit(&x, &[]).is_err());
    }

    #[test]
    fn test_predict_unfitted_error() {
        let model = LinearRegression::new();
        let x = Matrix::zeros(2, 1);
        assert_eq!(model.predict(&x), Err("Model not fitted. Call fit() first."));
    }

    #[test]
    fn test_underdetermined_error() {
        let x = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let mut model = LinearRegression::new();
        assert!(model.fit(&x, &[1.0, 2.0]).is_err());
    }
}
