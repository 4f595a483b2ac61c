//! Generation parameters for the three demos.
//!
//! Each struct is immutable for the duration of one run and, together with its
//! `seed`, fully determines the data the run sees. The same structs back the
//! HTTP query strings (via `serde`) and the command-line flags (via `clap`).

use crate::error::{Error, Result};
use clap::Args;
use serde::{Deserialize, Deserializer, Serialize};

/// Intercept of every generating model.
pub const TRUE_INTERCEPT: f64 = 5.0;

/// Features are drawn from `U[0, FEATURE_UPPER)`.
pub const FEATURE_UPPER: f64 = 10.0;

/// Coefficients of the AR(2) recursion that generates the time series.
pub const AR_COEFFICIENTS: [f64; 2] = [0.6, -0.3];

/// Upper bound on generated points, so a single request stays cheap.
pub const MAX_SAMPLE_COUNT: usize = 100_000;

const MAX_FEATURE_COUNT: usize = 50;
const MAX_LAG_COUNT: usize = 50;
const MAX_FORECAST_HORIZON: usize = 1_000;

/// Parameters of the single-feature demo: `y = a·x + 5 + noise`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Args)]
#[serde(default)]
pub struct SimpleParams {
    /// True slope `a` of the generating line
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    pub true_slope: f64,

    /// Standard deviation of the Gaussian noise
    #[arg(long, default_value_t = 1.0)]
    pub noise_scale: f64,

    /// Number of generated points
    #[arg(long, default_value_t = 100)]
    pub sample_count: i64,

    /// Seed for the random source (random when omitted)
    #[arg(long)]
    #[serde(deserialize_with = "empty_as_none")]
    pub seed: Option<u64>,
}

/// Parameters of the multi-feature demo with optional recursive feature elimination.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Args)]
#[serde(default)]
pub struct MultipleParams {
    /// Standard deviation of the Gaussian noise
    #[arg(long, default_value_t = 1.0)]
    pub noise_scale: f64,

    /// Number of generated points
    #[arg(long, default_value_t = 200)]
    pub sample_count: i64,

    /// Number of features; true coefficients are 2, 4, 6, ...
    #[arg(long, default_value_t = 5)]
    pub feature_count: i64,

    /// Fit only the features retained by recursive feature elimination
    #[arg(long)]
    #[serde(deserialize_with = "checkbox")]
    pub use_feature_selection: bool,

    /// How many features RFE keeps
    #[arg(long, default_value_t = 3)]
    pub features_to_keep: i64,

    /// Seed for the random source (random when omitted)
    #[arg(long)]
    #[serde(deserialize_with = "empty_as_none")]
    pub seed: Option<u64>,
}

/// Parameters of the autoregressive time-series demo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Args)]
#[serde(default)]
pub struct TimeSeriesParams {
    /// Standard deviation of the Gaussian innovations
    #[arg(long, default_value_t = 1.0)]
    pub noise_scale: f64,

    /// Length of the generated series
    #[arg(long, default_value_t = 500)]
    pub sample_count: i64,

    /// Order p of the fitted AR(p) model
    #[arg(long, default_value_t = 2)]
    pub ar_lag_count: i64,

    /// Number of steps forecast past the end of the series
    #[arg(long, default_value_t = 20)]
    pub forecast_horizon: i64,

    /// Seed for the random source (random when omitted)
    #[arg(long)]
    #[serde(deserialize_with = "empty_as_none")]
    pub seed: Option<u64>,
}

impl Default for SimpleParams {
    fn default() -> Self {
        Self {
            true_slope: 2.0,
            noise_scale: 1.0,
            sample_count: 100,
            seed: None,
        }
    }
}

impl Default for MultipleParams {
    fn default() -> Self {
        Self {
            noise_scale: 1.0,
            sample_count: 200,
            feature_count: 5,
            use_feature_selection: false,
            features_to_keep: 3,
            seed: None,
        }
    }
}

impl Default for TimeSeriesParams {
    fn default() -> Self {
        Self {
            noise_scale: 1.0,
            sample_count: 500,
            ar_lag_count: 2,
            forecast_horizon: 20,
            seed: None,
        }
    }
}

pub type SimpleKey = (u64, u64, i64, Option<u64>);
pub type MultipleKey = (u64, i64, i64, bool, i64, Option<u64>);
pub type TimeSeriesKey = (u64, i64, i64, i64, Option<u64>);

impl SimpleParams {
    pub fn validate(&self) -> Result<()> {
        validate_count("sample_count", self.sample_count, 1, MAX_SAMPLE_COUNT)?;
        validate_noise(self.noise_scale)?;
        if !self.true_slope.is_finite() {
            return Err(Error::invalid("true_slope", "must be a finite number"));
        }
        Ok(())
    }

    pub fn cache_key(&self) -> SimpleKey {
        (
            self.true_slope.to_bits(),
            self.noise_scale.to_bits(),
            self.sample_count,
            self.seed,
        )
    }
}

impl MultipleParams {
    pub fn validate(&self) -> Result<()> {
        validate_count("sample_count", self.sample_count, 1, MAX_SAMPLE_COUNT)?;
        validate_noise(self.noise_scale)?;
        let features = validate_count("feature_count", self.feature_count, 1, MAX_FEATURE_COUNT)?;
        if self.use_feature_selection {
            validate_count("features_to_keep", self.features_to_keep, 1, features)?;
        }
        Ok(())
    }

    pub fn cache_key(&self) -> MultipleKey {
        (
            self.noise_scale.to_bits(),
            self.sample_count,
            self.feature_count,
            self.use_feature_selection,
            self.features_to_keep,
            self.seed,
        )
    }
}

impl TimeSeriesParams {
    pub fn validate(&self) -> Result<()> {
        let n = validate_count("sample_count", self.sample_count, 1, MAX_SAMPLE_COUNT)?;
        validate_noise(self.noise_scale)?;
        let lags = validate_count("ar_lag_count", self.ar_lag_count, 1, MAX_LAG_COUNT)?;
        validate_count("forecast_horizon", self.forecast_horizon, 1, MAX_FORECAST_HORIZON)?;

        // the lagged design needs more rows than columns (intercept + p lags)
        if n <= 2 * lags + 1 {
            return Err(Error::invalid(
                "sample_count",
                format!("must exceed {} for an AR({}) fit, got {}", 2 * lags + 1, lags, n),
            ));
        }
        Ok(())
    }

    pub fn cache_key(&self) -> TimeSeriesKey {
        (
            self.noise_scale.to_bits(),
            self.sample_count,
            self.ar_lag_count,
            self.forecast_horizon,
            self.seed,
        )
    }
}

/// Validates an integer parameter against `[min, max]` and returns it as `usize`.
pub(crate) fn validate_count(name: &str, value: i64, min: usize, max: usize) -> Result<usize> {
    match usize::try_from(value) {
        Ok(count) if (min..=max).contains(&count) => Ok(count),
        _ => Err(Error::invalid(
            name,
            format!("must be between {} and {}, got {}", min, max, value),
        )),
    }
}

pub(crate) fn validate_noise(noise_scale: f64) -> Result<()> {
    if !noise_scale.is_finite() || noise_scale < 0.0 {
        return Err(Error::invalid(
            "noise_scale",
            format!("must be a finite non-negative number, got {}", noise_scale),
        ));
    }
    Ok(())
}

/// HTML checkboxes submit `on` when ticked and nothing at all otherwise.
fn checkbox<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => Ok(b),
        Raw::Text(s) => match s.to_ascii_lowercase().as_str() {
            "on" | "true" | "1" | "yes" => Ok(true),
            "off" | "false" | "0" | "no" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected a checkbox value, got '{}'",
                other
            ))),
        },
    }
}

/// An empty form field means "not provided".
fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid seed '{}': {}", s, e))),
    }
}
