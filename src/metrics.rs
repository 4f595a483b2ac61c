use crate::Vector;
use crate::error::{Error, Result};
use serde::Serialize;

fn check_lengths(y_true: &Vector, y_pred: &Vector) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(Error::DimensionMismatch {
            expected: y_true.len(),
            actual: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Err(Error::invalid("y_true", "must contain at least one value"));
    }
    Ok(())
}

pub fn mean_squared_error(y_true: &Vector, y_pred: &Vector) -> Result<f64> {
    check_lengths(y_true, y_pred)?;

    let diff = y_true - y_pred;
    Ok(diff.mapv(|x| x * x).sum() / diff.len() as f64)
}

pub fn mean_absolute_error(y_true: &Vector, y_pred: &Vector) -> Result<f64> {
    check_lengths(y_true, y_pred)?;

    let diff = y_true - y_pred;
    Ok(diff.mapv(f64::abs).sum() / diff.len() as f64)
}

/// Coefficient of determination `1 − SS_res/SS_tot`.
///
/// Returns `None` when the targets have zero variance, where R² is undefined.
pub fn r2_score(y_true: &Vector, y_pred: &Vector) -> Result<Option<f64>> {
    check_lengths(y_true, y_pred)?;

    let y_mean = y_true.sum() / y_true.len() as f64;
    let ss_res = (y_true - y_pred).mapv(|x| x * x).sum();
    let ss_tot = y_true.mapv(|x| (x - y_mean) * (x - y_mean)).sum();

    if ss_tot == 0.0 {
        return Ok(None);
    }

    Ok(Some(1.0 - ss_res / ss_tot))
}

/// Sample autocorrelation for lags `0..=max_lag` (lag 0 is 1).
pub fn autocorrelation(series: &Vector, max_lag: usize) -> Result<Vector> {
    let n = series.len();
    if n < 2 {
        return Err(Error::invalid("series", "needs at least two observations"));
    }

    let mean = series.sum() / n as f64;
    let centered = series - mean;
    let denom = centered.dot(&centered);
    if denom == 0.0 {
        return Err(Error::StatisticalDegeneracy(
            "autocorrelation of a constant series is undefined".to_string(),
        ));
    }

    let max_lag = max_lag.min(n - 1);
    let acf = (0..=max_lag)
        .map(|k| {
            let num: f64 = (k..n).map(|t| centered[t] * centered[t - k]).sum();
            num / denom
        })
        .collect::<Vec<_>>();
    Ok(Vector::from(acf))
}

/// R², MSE and MAE of one set of predictions.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegressionMetrics {
    /// `None` when the targets have zero variance
    pub r2: Option<f64>,
    pub mse: f64,
    pub mae: f64,
}

impl RegressionMetrics {
    pub fn compute(y_true: &Vector, y_pred: &Vector) -> Result<Self> {
        let metrics = Self {
            r2: r2_score(y_true, y_pred)?,
            mse: mean_squared_error(y_true, y_pred)?,
            mae: mean_absolute_error(y_true, y_pred)?,
        };
        if !metrics.mse.is_finite() || !metrics.mae.is_finite() {
            return Err(Error::Numerical("predictions contain non-finite values".to_string()));
        }
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_mean_squared_error() {
        let y_true = array![1.0, 2.0, 3.0];
        let y_pred = array![1.0, 2.0, 3.0];

        let mse = mean_squared_error(&y_true, &y_pred).unwrap();
        assert!((mse - 0.0).abs() < 1e-10);

        let mse = mean_squared_error(&y_true, &array![2.0, 2.0, 1.0]).unwrap();
        assert!((mse - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_mean_absolute_error() {
        let y_true = array![1.0, 2.0, 3.0, 4.0];
        let y_pred = array![2.0, 2.0, 1.0, 4.0];

        let mae = mean_absolute_error(&y_true, &y_pred).unwrap();
        assert!((mae - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_r2_score() {
        let y_true = array![1.0, 2.0, 3.0, 4.0];
        let y_pred = array![1.0, 2.0, 3.0, 4.0];

        let r2 = r2_score(&y_true, &y_pred).unwrap().unwrap();
        assert_eq!(r2, 1.0);
    }

    #[test]
    fn test_r2_can_be_negative() {
        let y_true = array![1.0, 2.0, 3.0];
        let y_pred = array![3.0, 2.0, 1.0];

        let r2 = r2_score(&y_true, &y_pred).unwrap().unwrap();
        assert!((r2 + 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_r2_undefined_for_constant_target() {
        let y_true = array![2.0, 2.0, 2.0];
        let y_pred = array![1.0, 2.0, 3.0];

        assert_eq!(r2_score(&y_true, &y_pred).unwrap(), None);
    }

    #[test]
    fn test_length_checks() {
        assert!(mean_squared_error(&array![1.0], &array![1.0, 2.0]).is_err());
        let empty = Vector::zeros(0);
        assert!(mean_absolute_error(&empty, &empty).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_mse_zero_iff_mae_zero() {
        let y = array![0.5, -1.0, 4.0];
        let m = RegressionMetrics::compute(&y, &y).unwrap();
        assert_eq!(m.mse, 0.0);
        assert_eq!(m.mae, 0.0);

        let m = RegressionMetrics::compute(&y, &array![0.5, -1.0, 4.1]).unwrap();
        assert!(m.mse > 0.0 && m.mae > 0.0);
    }

    #[test]
    fn test_autocorrelation() {
        let series = array![1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let acf = autocorrelation(&series, 2).unwrap();

        assert_eq!(acf[0], 1.0);
        assert!((acf[1] + 5.0 / 6.0).abs() < 1e-12);
        assert!((acf[2] - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_autocorrelation_constant_series() {
        assert!(autocorrelation(&array![3.0, 3.0, 3.0], 1).is_err());
    }
}
