//! Augmented Dickey-Fuller unit-root test.
//!
//! The test regresses the differenced series on a constant, the lagged level
//! and `p` lagged differences:
//!
//! ```text
//! Δy_t = α + γ·y_{t−1} + δ₁·Δy_{t−1} + … + δ_p·Δy_{t−p} + ε_t
//! ```
//!
//! The statistic is the t-ratio of `γ`. Its null distribution is non-standard,
//! so the p-value comes from MacKinnon's (1994) approximate response surface
//! and the critical values from MacKinnon (2010), both for the
//! constant-only regression with a single series.

use crate::error::{Error, Result};
use crate::linalg;
use crate::{Matrix, Vector};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

/// Significance level below which the series is labelled stationary.
pub const SIGNIFICANCE: f64 = 0.05;

// MacKinnon (1994), regression "c", N = 1
const TAU_MAX: f64 = 2.74;
const TAU_MIN: f64 = -18.83;
const TAU_STAR: f64 = -1.61;
const TAU_SMALL_P: [f64; 3] = [2.1659, 1.4412, 3.8269e-2];
const TAU_LARGE_P: [f64; 4] = [1.7339, 9.3202e-1, -1.2745e-1, -1.0368e-2];

// MacKinnon (2010) response surface, regression "c", N = 1: b0 + b1/T + b2/T² + b3/T³
const CRIT_1PCT: [f64; 4] = [-3.43035, -6.5393, -16.786, -79.433];
const CRIT_5PCT: [f64; 4] = [-2.86154, -2.8903, -4.234, -40.040];
const CRIT_10PCT: [f64; 4] = [-2.56677, -1.5384, -2.809, 0.0];

/// How the number of lagged differences is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Autolag {
    /// Minimise the Akaike information criterion over `0..=max_lag`
    Aic,
    /// Use `max_lag` directly
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdfOptions {
    /// Upper bound on lagged differences; `⌈12·(n/100)^¼⌉` when absent
    pub max_lag: Option<usize>,
    pub autolag: Autolag,
}

impl Default for AdfOptions {
    fn default() -> Self {
        Self {
            max_lag: None,
            autolag: Autolag::Aic,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CriticalValues {
    pub one_pct: f64,
    pub five_pct: f64,
    pub ten_pct: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AdfResult {
    pub statistic: f64,
    pub p_value: f64,
    /// Lagged differences in the final regression
    pub used_lag: usize,
    /// Observations in the final regression
    pub nobs: usize,
    pub critical_values: CriticalValues,
    /// Best AIC when the lag was selected automatically
    pub ic_best: Option<f64>,
    pub is_stationary: bool,
}

impl AdfResult {
    pub fn conclusion(&self) -> &'static str {
        if self.is_stationary {
            "likely stationary"
        } else {
            "may not be stationary"
        }
    }
}

/// Runs the Augmented Dickey-Fuller test with a constant term.
pub fn adfuller(series: &Vector, options: AdfOptions) -> Result<AdfResult> {
    let n = series.len();
    if series.iter().any(|v| !v.is_finite()) {
        return Err(Error::Numerical("series contains non-finite values".to_string()));
    }

    // one trend term (the constant)
    let lag_cap = (n / 2).checked_sub(2).ok_or_else(|| {
        Error::StatisticalDegeneracy(format!(
            "sample size {} is too short for the ADF regression",
            n
        ))
    })?;

    let max_lag = match options.max_lag {
        Some(lag) if lag > lag_cap => {
            return Err(Error::invalid(
                "max_lag",
                format!("must be at most {} for {} observations, got {}", lag_cap, n, lag),
            ));
        }
        Some(lag) => lag,
        None => {
            let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
            schwert.min(lag_cap)
        }
    };

    let diff = Vector::from_iter((1..n).map(|t| series[t] - series[t - 1]));

    let (used_lag, ic_best) = match options.autolag {
        Autolag::None => (max_lag, None),
        Autolag::Aic => {
            let (design, target) = adf_design(series, &diff, max_lag, max_lag);
            let mut best: Option<(usize, f64)> = None;
            for lag in 0..=max_lag {
                let cols = 2 + lag;
                let fit = ols(&design.slice(ndarray::s![.., ..cols]).to_owned(), &target)?;
                let aic = fit.aic();
                if best.is_none_or(|(_, b)| aic < b) {
                    best = Some((lag, aic));
                }
            }
            let (lag, aic) = best.ok_or_else(|| {
                Error::StatisticalDegeneracy("no lag could be evaluated".to_string())
            })?;
            (lag, Some(aic))
        }
    };

    let (design, target) = adf_design(series, &diff, used_lag, used_lag);
    let nobs = target.len();
    let fit = ols(&design, &target)?;
    let statistic = fit.t_value(1)?;
    let p_value = mackinnon_p_value(statistic)?;
    let critical_values = mackinnon_critical_values(nobs);

    log::debug!(
        "ADF: statistic={:.4}, p={:.4}, lag={}, nobs={}",
        statistic,
        p_value,
        used_lag,
        nobs
    );

    Ok(AdfResult {
        statistic,
        p_value,
        used_lag,
        nobs,
        critical_values,
        ic_best,
        is_stationary: p_value <= SIGNIFICANCE,
    })
}

/// MacKinnon (1994) approximate p-value for the constant-only ADF statistic.
pub fn mackinnon_p_value(statistic: f64) -> Result<f64> {
    if statistic > TAU_MAX {
        return Ok(1.0);
    }
    if statistic < TAU_MIN {
        return Ok(0.0);
    }

    let z = if statistic <= TAU_STAR {
        polyval(&TAU_SMALL_P, statistic)
    } else {
        polyval(&TAU_LARGE_P, statistic)
    };

    let normal = Normal::new(0.0, 1.0).map_err(|e| Error::Numerical(e.to_string()))?;
    Ok(normal.cdf(z))
}

/// MacKinnon (2010) critical values at 1 %, 5 % and 10 % for `nobs` observations.
pub fn mackinnon_critical_values(nobs: usize) -> CriticalValues {
    let inv = 1.0 / nobs as f64;
    CriticalValues {
        one_pct: polyval(&CRIT_1PCT, inv),
        five_pct: polyval(&CRIT_5PCT, inv),
        ten_pct: polyval(&CRIT_10PCT, inv),
    }
}

/// `c[0] + c[1]·x + c[2]·x² + …`
fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Design `[1, y_{t−1}, Δy_{t−1}, …, Δy_{t−lags}]` and target `Δy_t`, with the
/// first `trim` differences dropped so designs for different lags share a sample.
fn adf_design(series: &Vector, diff: &Vector, lags: usize, trim: usize) -> (Matrix, Vector) {
    let rows = diff.len() - trim;
    let design = Matrix::from_shape_fn((rows, 2 + lags), |(r, c)| {
        let i = r + trim;
        match c {
            0 => 1.0,
            1 => series[i],
            k => diff[i - (k - 1)],
        }
    });
    let target = diff.slice(ndarray::s![trim..]).to_owned();
    (design, target)
}

struct OlsFit {
    beta: Vector,
    xtx_inv: Matrix,
    ssr: f64,
    nobs: usize,
}

impl OlsFit {
    fn aic(&self) -> f64 {
        let n = self.nobs as f64;
        let k = self.beta.len() as f64;
        let llf = -n / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (self.ssr / n).ln() + 1.0);
        -2.0 * llf + 2.0 * k
    }

    fn t_value(&self, idx: usize) -> Result<f64> {
        let dof = self.nobs.saturating_sub(self.beta.len());
        if dof == 0 {
            return Err(Error::StatisticalDegeneracy(
                "no residual degrees of freedom in the ADF regression".to_string(),
            ));
        }
        let sigma2 = self.ssr / dof as f64;
        let se = (sigma2 * self.xtx_inv[(idx, idx)]).sqrt();
        if !(se.is_finite() && se > 0.0) {
            return Err(Error::StatisticalDegeneracy(
                "ADF regression fits exactly; the statistic is undefined".to_string(),
            ));
        }
        Ok(self.beta[idx] / se)
    }
}

fn ols(x: &Matrix, y: &Vector) -> Result<OlsFit> {
    let (beta, xtx_inv) = linalg::least_squares(x, y).map_err(|e| match e {
        Error::StatisticalDegeneracy(_) => Error::StatisticalDegeneracy(
            "ADF regression is singular; the series may be constant".to_string(),
        ),
        other => other,
    })?;
    let residuals = y - &x.dot(&beta);
    let ssr = residuals.dot(&residuals);
    Ok(OlsFit {
        beta,
        xtx_inv,
        ssr,
        nobs: y.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray_rand::rand_distr::StandardNormal;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn white_noise(n: usize, seed: u64) -> Vector {
        let mut rng = StdRng::seed_from_u64(seed);
        Vector::from_iter((0..n).map(|_| rng.sample::<f64, _>(StandardNormal)))
    }

    fn random_walk(n: usize, seed: u64) -> Vector {
        let mut level = 0.0;
        let steps = white_noise(n, seed);
        Vector::from_iter(steps.iter().map(|e| {
            level += e;
            level
        }))
    }

    #[test]
    fn test_p_value_reference_points() {
        // 5 % critical value maps to roughly 5 %
        assert!((mackinnon_p_value(-2.86).unwrap() - 0.05).abs() < 0.005);
        // both branches agree near the switch point
        let below = mackinnon_p_value(TAU_STAR - 1e-9).unwrap();
        let above = mackinnon_p_value(TAU_STAR + 1e-9).unwrap();
        assert!((below - above).abs() < 0.01);
        assert_eq!(mackinnon_p_value(-25.0).unwrap(), 0.0);
        assert_eq!(mackinnon_p_value(3.0).unwrap(), 1.0);
    }

    #[test]
    fn test_p_value_monotone() {
        let mut previous = 0.0;
        for i in 0..200 {
            let tau = -18.0 + i as f64 * 0.1;
            let p = mackinnon_p_value(tau).unwrap();
            assert!((0.0..=1.0).contains(&p));
            assert!(p >= previous - 1e-12);
            previous = p;
        }
    }

    #[test]
    fn test_critical_values_ordered() {
        let cv = mackinnon_critical_values(500);
        assert!(cv.one_pct < cv.five_pct && cv.five_pct < cv.ten_pct);
        assert!((cv.five_pct - (-2.8672)).abs() < 1e-3);
    }

    #[test]
    fn test_white_noise_is_stationary() {
        let result = adfuller(&white_noise(500, 3), AdfOptions::default()).unwrap();
        assert!(result.p_value <= SIGNIFICANCE);
        assert!(result.is_stationary);
        assert_eq!(result.conclusion(), "likely stationary");
    }

    #[test]
    fn test_random_walk_is_not_stationary() {
        let rejected = (0..20)
            .filter(|&seed| {
                let result = adfuller(&random_walk(500, seed), AdfOptions::default()).unwrap();
                result.p_value > SIGNIFICANCE
            })
            .count();
        assert!(rejected >= 14, "only {} of 20 random walks looked non-stationary", rejected);
    }

    #[test]
    fn test_fixed_lag() {
        let options = AdfOptions {
            max_lag: Some(3),
            autolag: Autolag::None,
        };
        let result = adfuller(&white_noise(200, 8), options).unwrap();
        assert_eq!(result.used_lag, 3);
        assert_eq!(result.nobs, 199 - 3);
        assert_eq!(result.ic_best, None);
    }

    #[test]
    fn test_autolag_within_bounds() {
        let result = adfuller(&white_noise(100, 4), AdfOptions::default()).unwrap();
        assert!(result.used_lag <= 12);
        assert!(result.ic_best.is_some());
    }

    #[test]
    fn test_too_short_and_constant() {
        assert!(matches!(
            adfuller(&Vector::from(vec![1.0, 2.0, 0.5]), AdfOptions::default()),
            Err(Error::StatisticalDegeneracy(_))
        ));
        assert!(matches!(
            adfuller(&Vector::from_elem(50, 1.0), AdfOptions::default()),
            Err(Error::StatisticalDegeneracy(_))
        ));
    }

    #[test]
    fn test_max_lag_too_large() {
        let options = AdfOptions {
            max_lag: Some(40),
            autolag: Autolag::Aic,
        };
        assert!(adfuller(&white_noise(50, 1), options).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_statistic_is_scale_free() {
        let series = white_noise(300, 4);
        let unit = adfuller(&series, AdfOptions::default()).unwrap();
        let micro = adfuller(&(&series * 1e-6), AdfOptions::default()).unwrap();

        assert_eq!(micro.used_lag, unit.used_lag);
        assert!((micro.statistic - unit.statistic).abs() < 1e-6);
    }
}
