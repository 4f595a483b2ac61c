use crate::error::{Error, Result};
use crate::linalg;
use crate::{Matrix, Vector};
use ndarray::Axis;

/// Ordinary least squares, solved in closed form through the normal equations.
#[derive(Clone, Debug)]
pub struct LinearRegression {
    pub coefficients: Option<Vector>,
    pub intercept: Option<f64>,
    fit_intercept: bool,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            fit_intercept: true,
        }
    }

    pub fn with_intercept(fit_intercept: bool) -> Self {
        Self {
            coefficients: None,
            intercept: None,
            fit_intercept,
        }
    }

    pub fn fit(&mut self, x: &Matrix, y: &Vector) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(Error::DimensionMismatch {
                expected: x.nrows(),
                actual: y.len(),
            });
        }
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(Error::invalid(
                "x",
                "must have at least one sample and one feature",
            ));
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(Error::Numerical(
                "training data contains non-finite values".to_string(),
            ));
        }

        let (coeffs, intercept) = if self.fit_intercept {
            self.fit_with_intercept(x, y)?
        } else {
            (self.solve_normal_equation(x, y)?, 0.0)
        };

        log::debug!(
            "fitted OLS on {}x{}: intercept={:.4}, coefficients={:?}",
            x.nrows(),
            x.ncols(),
            intercept,
            coeffs.as_slice()
        );

        self.coefficients = Some(coeffs);
        self.intercept = Some(intercept);
        Ok(())
    }

    pub fn predict(&self, x: &Matrix) -> Result<Vector> {
        let coeffs = self.coefficients.as_ref().ok_or(Error::NotFitted)?;
        let intercept = self.intercept.unwrap_or(0.0);

        if x.ncols() != coeffs.len() {
            return Err(Error::DimensionMismatch {
                expected: coeffs.len(),
                actual: x.ncols(),
            });
        }

        Ok(x.dot(coeffs) + intercept)
    }

    pub fn score(&self, x: &Matrix, y: &Vector) -> Result<Option<f64>> {
        let y_pred = self.predict(x)?;
        crate::metrics::r2_score(y, &y_pred)
    }

    /// Absolute coefficient values, the ranking used by recursive feature elimination.
    pub fn feature_importances(&self) -> Result<Vector> {
        let coeffs = self.coefficients.as_ref().ok_or(Error::NotFitted)?;
        Ok(coeffs.mapv(f64::abs))
    }

    fn fit_with_intercept(&self, x: &Matrix, y: &Vector) -> Result<(Vector, f64)> {
        let n = y.len() as f64;
        let y_mean = y.sum() / n;
        let x_means = x.sum_axis(Axis(0)) / n;

        let x_centered = x - &x_means;
        let y_centered = y - y_mean;

        let coeffs = self.solve_normal_equation(&x_centered, &y_centered)?;
        let intercept = y_mean - coeffs.dot(&x_means);

        Ok((coeffs, intercept))
    }

    fn solve_normal_equation(&self, x: &Matrix, y: &Vector) -> Result<Vector> {
        let xt = x.t();
        linalg::solve(&xt.dot(x), &xt.dot(y)).map_err(|e| match e {
            Error::StatisticalDegeneracy(_) => Error::StatisticalDegeneracy(
                "features are collinear or constant; least squares has no unique solution"
                    .to_string(),
            ),
            other => other,
        })
    }
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_linear_regression_simple() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let predictions = model.predict(&x).unwrap();

        for (pred, actual) in predictions.iter().zip(y.iter()) {
            assert!((pred - actual).abs() < 1e-10);
        }
    }

    #[test]
    fn test_linear_regression_without_intercept() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];

        let mut model = LinearRegression::with_intercept(false);
        model.fit(&x, &y).unwrap();

        let coeffs = model.coefficients.as_ref().unwrap();
        assert!((coeffs[0] - 2.0).abs() < 1e-10);
        assert_eq!(model.intercept.unwrap(), 0.0);
    }

    #[test]
    fn test_linear_regression_multivariate_exact() {
        // y = 1 + 2*x1 - 3*x2
        let x = array![[1.0, 2.0], [2.0, 1.0], [3.0, 5.0], [4.0, 3.0], [0.5, 0.0]];
        let y = x.column(0).mapv(|v| 2.0 * v) - x.column(1).mapv(|v| 3.0 * v) + 1.0;

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let coeffs = model.coefficients.as_ref().unwrap();
        assert!((coeffs[0] - 2.0).abs() < 1e-9);
        assert!((coeffs[1] + 3.0).abs() < 1e-9);
        assert!((model.intercept.unwrap() - 1.0).abs() < 1e-9);
        assert!((model.score(&x, &y).unwrap().unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_feature_importances_are_absolute() {
        let x = array![[1.0, 2.0], [2.0, 1.0], [3.0, 5.0], [4.0, 3.0]];
        let y = x.column(0).mapv(|v| -4.0 * v) + x.column(1);

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let importances = model.feature_importances().unwrap();
        assert!((importances[0] - 4.0).abs() < 1e-9);
        assert!((importances[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_collinear_features() {
        let x = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]];
        let y = array![1.0, 2.0, 3.0];

        let mut model = LinearRegression::new();
        assert!(matches!(
            model.fit(&x, &y),
            Err(Error::StatisticalDegeneracy(_))
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let x = array![[1.0], [f64::INFINITY]];
        let y = array![1.0, 2.0];

        let mut model = LinearRegression::new();
        assert!(matches!(model.fit(&x, &y), Err(Error::Numerical(_))));
    }

    #[test]
    fn test_predict_without_fit() {
        let x = array![[1.0], [2.0]];
        let model = LinearRegression::new();

        assert_eq!(model.predict(&x).unwrap_err(), Error::NotFitted);
    }

    #[test]
    fn test_dimension_mismatch() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 2.0, 3.0];

        let mut model = LinearRegression::new();
        assert!(model.fit(&x, &y).is_err());
    }
}
