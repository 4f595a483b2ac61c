use crate::error::{Error, Result};
use crate::linalg;
use crate::{Matrix, Vector};
use ndarray::s;

/// AR(p) model `v_t = c + φ₁·v_{t−1} + … + φ_p·v_{t−p} + ε_t`, fitted by
/// least squares on the lagged design matrix.
#[derive(Clone, Debug)]
pub struct AutoRegressive {
    pub coefficients: Option<Vector>,
    pub intercept: Option<f64>,
    /// Residual variance of the in-sample fit
    pub sigma2: Option<f64>,
    lags: usize,
    series: Vec<f64>,
}

impl AutoRegressive {
    /// # Panics
    ///
    /// Panics if `lags` is 0.
    pub fn new(lags: usize) -> Self {
        if lags == 0 {
            panic!("lags must be > 0, got {}", lags);
        }

        Self {
            coefficients: None,
            intercept: None,
            sigma2: None,
            lags,
            series: Vec::new(),
        }
    }

    /// A model with known parameters; `coefficients[i]` multiplies `v_{t−1−i}`.
    pub fn from_coefficients(intercept: f64, coefficients: &[f64]) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(Error::invalid("coefficients", "an AR model needs at least one lag"));
        }
        let mut model = Self::new(coefficients.len());
        model.coefficients = Some(Vector::from(coefficients.to_vec()));
        model.intercept = Some(intercept);
        Ok(model)
    }

    pub fn lags(&self) -> usize {
        self.lags
    }

    pub fn fit(&mut self, series: &Vector) -> Result<()> {
        let p = self.lags;
        let n = series.len();
        if n <= 2 * p + 1 {
            return Err(Error::invalid(
                "series",
                format!("AR({}) needs more than {} observations, got {}", p, 2 * p + 1, n),
            ));
        }
        if series.iter().any(|v| !v.is_finite()) {
            return Err(Error::Numerical("series contains non-finite values".to_string()));
        }

        let (design, target) = lagged_design(series, p);
        let (beta, _) = linalg::least_squares(&design, &target).map_err(|e| match e {
            Error::StatisticalDegeneracy(_) => Error::StatisticalDegeneracy(
                "lagged design is singular; the series may be constant".to_string(),
            ),
            other => other,
        })?;

        let residuals = &target - &design.dot(&beta);
        let dof = (target.len() - design.ncols()).max(1) as f64;
        let sigma2 = residuals.mapv(|r| r * r).sum() / dof;

        let coefficients = beta.slice(s![1..]).to_owned();
        log::debug!(
            "fitted AR({}) on {} observations: intercept={:.4}, coefficients={:?}, sigma2={:.4}",
            p,
            n,
            beta[0],
            coefficients.to_vec(),
            sigma2
        );

        self.intercept = Some(beta[0]);
        self.coefficients = Some(coefficients);
        self.sigma2 = Some(sigma2);
        self.series = series.to_vec();
        Ok(())
    }

    /// One-step-ahead in-sample predictions for `t = p..n`.
    pub fn fitted_values(&self) -> Result<Vector> {
        let (intercept, coeffs) = self.parameters()?;
        let p = self.lags;
        if self.series.len() <= p {
            return Err(Error::NotFitted);
        }

        let fitted = (p..self.series.len())
            .map(|t| predict_next(intercept, coeffs, &self.series[..t]))
            .collect::<Vec<_>>();
        Ok(Vector::from(fitted))
    }

    /// Forecasts `steps` values past the end of the training series.
    pub fn forecast(&self, steps: usize) -> Result<Vector> {
        if self.series.is_empty() {
            return Err(Error::NotFitted);
        }
        self.forecast_from(&self.series, steps)
    }

    /// Forecasts `steps` values past the end of `history`, feeding each
    /// prediction back as the most recent lag for the next step.
    pub fn forecast_from(&self, history: &[f64], steps: usize) -> Result<Vector> {
        let (intercept, coeffs) = self.parameters()?;
        if steps == 0 {
            return Err(Error::invalid("steps", "forecast horizon must be positive"));
        }
        if history.len() < self.lags {
            return Err(Error::DimensionMismatch {
                expected: self.lags,
                actual: history.len(),
            });
        }

        let mut window = history[history.len() - self.lags..].to_vec();
        let mut out = Vec::with_capacity(steps);
        for _ in 0..steps {
            let next = predict_next(intercept, coeffs, &window);
            out.push(next);
            window.remove(0);
            window.push(next);
        }
        Ok(Vector::from(out))
    }

    fn parameters(&self) -> Result<(f64, &Vector)> {
        let coeffs = self.coefficients.as_ref().ok_or(Error::NotFitted)?;
        Ok((self.intercept.unwrap_or(0.0), coeffs))
    }
}

/// `c + Σ φ_i · v_{end−1−i}`: the most recent value pairs with the first coefficient.
fn predict_next(intercept: f64, coeffs: &Vector, history: &[f64]) -> f64 {
    coeffs
        .iter()
        .zip(history.iter().rev())
        .fold(intercept, |acc, (phi, v)| acc + phi * v)
}

/// Rows `[1, v_{t−1}, …, v_{t−p}]` with target `v_t`, for `t = p..n`.
fn lagged_design(series: &Vector, p: usize) -> (Matrix, Vector) {
    let rows = series.len() - p;
    let design = Matrix::from_shape_fn((rows, p + 1), |(r, c)| {
        if c == 0 { 1.0 } else { series[r + p - c] }
    });
    let target = series.slice(s![p..]).to_owned();
    (design, target)
}
