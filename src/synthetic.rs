//! Synthetic data generators.
//!
//! Features are i.i.d. `U[0, 10)`; targets are a known linear (or
//! autoregressive) function of them plus zero-mean Gaussian noise scaled by
//! `noise_scale`. All randomness comes from the caller's `Rng`, so a seeded
//! generator reproduces the same data.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::params::{
    AR_COEFFICIENTS, FEATURE_UPPER, MAX_SAMPLE_COUNT, MultipleParams, SimpleParams,
    TRUE_INTERCEPT, TimeSeriesParams, validate_count, validate_noise,
};
use crate::{Matrix, Vector};
use ndarray::Array;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::{StandardNormal, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded generator when a seed is given, otherwise one seeded from the OS.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// True coefficients of the multi-feature model: `2, 4, 6, ...`.
pub fn true_coefficients(feature_count: usize) -> Vector {
    Vector::from_iter((1..=feature_count).map(|j| 2.0 * j as f64))
}

/// `x ~ U[0,10)`, `y = a·x + 5 + noise·N(0,1)`.
pub fn simple_linear<R: Rng + ?Sized>(params: &SimpleParams, rng: &mut R) -> Result<Dataset> {
    let n = validate_count("sample_count", params.sample_count, 1, MAX_SAMPLE_COUNT)?;
    validate_noise(params.noise_scale)?;

    let x = uniform_features(n, 1, rng);
    let noise = gaussian(n, params.noise_scale, rng);
    let y = x.column(0).mapv(|v| params.true_slope * v + TRUE_INTERCEPT) + noise;

    Dataset::new(x, y)
}

/// `X ~ U[0,10)^(n×p)`, `y = X·[2,4,…] + 5 + noise·N(0,1)`.
///
/// Returns the dataset together with the true coefficients.
pub fn multiple_linear<R: Rng + ?Sized>(
    params: &MultipleParams,
    rng: &mut R,
) -> Result<(Dataset, Vector)> {
    let n = validate_count("sample_count", params.sample_count, 1, MAX_SAMPLE_COUNT)?;
    validate_noise(params.noise_scale)?;
    let p = validate_count("feature_count", params.feature_count, 1, usize::MAX)?;

    let coefficients = true_coefficients(p);
    let x = uniform_features(n, p, rng);
    let noise = gaussian(n, params.noise_scale, rng);
    let y = x.dot(&coefficients) + TRUE_INTERCEPT + noise;

    Ok((Dataset::new(x, y)?, coefficients))
}

/// AR(2) recursion `v_t = 0.6·v_{t−1} − 0.3·v_{t−2} + noise·N(0,1)` started
/// from two zero seeds, which are dropped from the returned series.
pub fn autoregressive<R: Rng + ?Sized>(params: &TimeSeriesParams, rng: &mut R) -> Result<Vector> {
    let n = validate_count("sample_count", params.sample_count, 1, MAX_SAMPLE_COUNT)?;
    validate_noise(params.noise_scale)?;

    let [phi1, phi2] = AR_COEFFICIENTS;
    let mut values = Vec::with_capacity(n + 2);
    values.extend([0.0, 0.0]);
    for t in 2..n + 2 {
        let eps: f64 = rng.sample(StandardNormal);
        values.push(phi1 * values[t - 1] + phi2 * values[t - 2] + params.noise_scale * eps);
    }

    Ok(Vector::from(values.split_off(2)))
}

fn uniform_features<R: Rng + ?Sized>(n: usize, p: usize, rng: &mut R) -> Matrix {
    Array::random_using((n, p), Uniform::new(0.0, FEATURE_UPPER), rng)
}

fn gaussian<R: Rng + ?Sized>(n: usize, scale: f64, rng: &mut R) -> Vector {
    let z: Vector = Array::random_using(n, StandardNormal, rng);
    z * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_simple_linear_shape_and_range() {
        let params = SimpleParams {
            sample_count: 40,
            ..SimpleParams::default()
        };
        let data = simple_linear(&params, &mut rng_from_seed(Some(1))).unwrap();

        assert_eq!(data.n_samples(), 40);
        assert_eq!(data.n_features(), 1);
        assert!(data.features.iter().all(|&x| (0.0..10.0).contains(&x)));
    }

    #[test]
    fn test_simple_linear_noise_free_is_exact() {
        let params = SimpleParams {
            true_slope: -1.5,
            noise_scale: 0.0,
            sample_count: 20,
            seed: None,
        };
        let data = simple_linear(&params, &mut rng_from_seed(Some(3))).unwrap();

        for (x, y) in data.features.column(0).iter().zip(data.labels.iter()) {
            assert!((y - (-1.5 * x + 5.0)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_same_seed_same_data() {
        let params = MultipleParams::default();
        let (a, _) = multiple_linear(&params, &mut rng_from_seed(Some(42))).unwrap();
        let (b, _) = multiple_linear(&params, &mut rng_from_seed(Some(42))).unwrap();
        assert_eq!(a.features, b.features);
        assert_eq!(a.labels, b.labels);

        let ts = TimeSeriesParams::default();
        let s1 = autoregressive(&ts, &mut rng_from_seed(Some(9))).unwrap();
        let s2 = autoregressive(&ts, &mut rng_from_seed(Some(9))).unwrap();
        assert_eq!(s1, s2);
    }

    #[test]
    fn test_multiple_linear_true_coefficients() {
        let params = MultipleParams {
            feature_count: 4,
            noise_scale: 0.0,
            sample_count: 10,
            ..MultipleParams::default()
        };
        let (data, coefs) = multiple_linear(&params, &mut rng_from_seed(Some(5))).unwrap();

        assert_eq!(coefs.to_vec(), vec![2.0, 4.0, 6.0, 8.0]);
        let expected = data.features.dot(&coefs) + 5.0;
        for (y, e) in data.labels.iter().zip(expected.iter()) {
            assert!((y - e).abs() < 1e-12);
        }
    }

    #[test]
    fn test_autoregressive_drops_seeds() {
        let params = TimeSeriesParams {
            sample_count: 30,
            ..TimeSeriesParams::default()
        };
        let series = autoregressive(&params, &mut rng_from_seed(Some(11))).unwrap();
        assert_eq!(series.len(), 30);

        // zero noise keeps the recursion at its zero seeds
        let quiet = TimeSeriesParams {
            noise_scale: 0.0,
            ..params
        };
        let series = autoregressive(&quiet, &mut rng_from_seed(Some(11))).unwrap();
        assert!(series.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let mut rng = rng_from_seed(Some(0));
        let params = SimpleParams {
            sample_count: 0,
            ..SimpleParams::default()
        };
        assert!(matches!(
            simple_linear(&params, &mut rng),
            Err(Error::InvalidParameter { .. })
        ));

        let params = TimeSeriesParams {
            noise_scale: -1.0,
            ..TimeSeriesParams::default()
        };
        assert!(autoregressive(&params, &mut rng).is_err());
    }
}
