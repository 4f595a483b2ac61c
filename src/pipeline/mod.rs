//! Generate → fit → evaluate, one pure function per demo.
//!
//! Each `run_*` function takes validated parameters and returns a report
//! holding everything the page needs to draw its chart and metric table.
//! Nothing is shared between runs except what [`ReportCache`] hands out.

mod cache;

pub use cache::{ReportCache, Weighted};

use crate::error::Result;
use crate::feature_selection::Rfe;
use crate::linear_model::{AutoRegressive, LinearRegression};
use crate::metrics::{RegressionMetrics, autocorrelation};
use crate::params::{
    AR_COEFFICIENTS, FEATURE_UPPER, MultipleKey, MultipleParams, SimpleKey, SimpleParams,
    TRUE_INTERCEPT, TimeSeriesKey, TimeSeriesParams,
};
use crate::stationarity::{AdfOptions, AdfResult, adfuller};
use crate::synthetic;
use crate::Vector;
use ndarray::s;
use serde::Serialize;
use std::sync::Arc;

/// Lags shown in the time-series autocorrelation table.
pub const ACF_LAGS: usize = 20;

#[derive(Clone, Debug, Serialize)]
pub struct SimpleReport {
    pub params: SimpleParams,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub learned_slope: f64,
    pub learned_intercept: f64,
    pub true_intercept: f64,
    pub metrics: RegressionMetrics,
    /// Endpoints of the generating line over `[0, 10]`
    pub true_line: [(f64, f64); 2],
    /// Endpoints of the fitted line over `[0, 10]`
    pub fitted_line: [(f64, f64); 2],
}

#[derive(Clone, Debug, Serialize)]
pub struct MultipleReport {
    pub params: MultipleParams,
    /// Indices of the features the final model uses
    pub selected: Vec<usize>,
    /// RFE ranking over all features, when selection ran
    pub ranking: Option<Vec<usize>>,
    pub learned_coefficients: Vec<f64>,
    /// Generating coefficients of the selected features
    pub true_coefficients: Vec<f64>,
    pub learned_intercept: f64,
    pub metrics: RegressionMetrics,
    pub actual: Vec<f64>,
    pub predicted: Vec<f64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct TimeSeriesReport {
    pub params: TimeSeriesParams,
    pub series: Vec<f64>,
    /// In-sample one-step predictions; `fitted[i]` predicts `series[i + lags]`
    pub fitted: Vec<f64>,
    pub forecast: Vec<f64>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub true_coefficients: Vec<f64>,
    pub metrics: RegressionMetrics,
    pub adf: AdfResult,
    pub acf: Vec<f64>,
}

impl TimeSeriesReport {
    pub fn lags(&self) -> usize {
        self.series.len() - self.fitted.len()
    }
}

impl Weighted for SimpleReport {
    fn weight(&self) -> usize {
        self.x.len() + self.y.len()
    }
}

impl Weighted for MultipleReport {
    fn weight(&self) -> usize {
        self.actual.len() + self.predicted.len()
    }
}

impl Weighted for TimeSeriesReport {
    fn weight(&self) -> usize {
        self.series.len() + self.fitted.len() + self.forecast.len() + self.acf.len()
    }
}

/// Fills in a random seed when none was given, so the run can be reproduced.
pub fn resolve_seed(seed: &mut Option<u64>) -> u64 {
    *seed.get_or_insert_with(rand::random)
}

pub fn run_simple(params: &SimpleParams) -> Result<SimpleReport> {
    params.validate()?;
    let mut rng = synthetic::rng_from_seed(params.seed);

    let data = synthetic::simple_linear(params, &mut rng)?;

    let mut model = LinearRegression::new();
    model.fit(&data.features, &data.labels)?;
    let predicted = model.predict(&data.features)?;
    let metrics = RegressionMetrics::compute(&data.labels, &predicted)?;

    let learned_slope = model.coefficients.as_ref().map_or(0.0, |c| c[0]);
    let learned_intercept = model.intercept.unwrap_or(0.0);

    let line = |slope: f64, intercept: f64| {
        [
            (0.0, intercept),
            (FEATURE_UPPER, slope * FEATURE_UPPER + intercept),
        ]
    };

    log::info!(
        "simple: n={}, slope={:.4} (true {}), intercept={:.4}",
        data.n_samples(),
        learned_slope,
        params.true_slope,
        learned_intercept
    );

    Ok(SimpleReport {
        params: params.clone(),
        x: data.features.column(0).to_vec(),
        y: data.labels.to_vec(),
        learned_slope,
        learned_intercept,
        true_intercept: TRUE_INTERCEPT,
        metrics,
        true_line: line(params.true_slope, TRUE_INTERCEPT),
        fitted_line: line(learned_slope, learned_intercept),
    })
}

pub fn run_multiple(params: &MultipleParams) -> Result<MultipleReport> {
    params.validate()?;
    let mut rng = synthetic::rng_from_seed(params.seed);

    let (data, true_coefficients) = synthetic::multiple_linear(params, &mut rng)?;

    let (model, selected, ranking, predicted) = if params.use_feature_selection {
        let mut rfe = Rfe::new(params.features_to_keep as usize);
        rfe.fit(&data.features, &data.labels)?;
        let predicted = rfe.predict(&data.features)?;
        (
            rfe.estimator()?.clone(),
            rfe.selected()?,
            Some(rfe.ranking()?.to_vec()),
            predicted,
        )
    } else {
        let mut model = LinearRegression::new();
        model.fit(&data.features, &data.labels)?;
        let predicted = model.predict(&data.features)?;
        (model, (0..data.n_features()).collect(), None, predicted)
    };

    let metrics = RegressionMetrics::compute(&data.labels, &predicted)?;
    let learned_coefficients = model
        .coefficients
        .as_ref()
        .map(|c| c.to_vec())
        .unwrap_or_default();

    log::info!(
        "multiple: n={}, selected={:?}, r2={:?}",
        data.n_samples(),
        selected,
        metrics.r2
    );

    Ok(MultipleReport {
        params: params.clone(),
        true_coefficients: selected.iter().map(|&j| true_coefficients[j]).collect(),
        selected,
        ranking,
        learned_coefficients,
        learned_intercept: model.intercept.unwrap_or(0.0),
        metrics,
        actual: data.labels.to_vec(),
        predicted: predicted.to_vec(),
    })
}

pub fn run_timeseries(params: &TimeSeriesParams) -> Result<TimeSeriesReport> {
    params.validate()?;
    let mut rng = synthetic::rng_from_seed(params.seed);

    let series = synthetic::autoregressive(params, &mut rng)?;
    let lags = params.ar_lag_count as usize;

    let mut model = AutoRegressive::new(lags);
    model.fit(&series)?;
    let fitted = model.fitted_values()?;
    let forecast = model.forecast(params.forecast_horizon as usize)?;

    let observed: Vector = series.slice(s![lags..]).to_owned();
    let metrics = RegressionMetrics::compute(&observed, &fitted)?;
    let adf = adfuller(&series, AdfOptions::default())?;
    let acf = autocorrelation(&series, ACF_LAGS)?;

    log::info!(
        "timeseries: n={}, AR({}), adf={:.4} (p={:.4}, {})",
        series.len(),
        lags,
        adf.statistic,
        adf.p_value,
        adf.conclusion()
    );

    Ok(TimeSeriesReport {
        params: params.clone(),
        series: series.to_vec(),
        fitted: fitted.to_vec(),
        forecast: forecast.to_vec(),
        coefficients: model.coefficients.as_ref().map(|c| c.to_vec()).unwrap_or_default(),
        intercept: model.intercept.unwrap_or(0.0),
        true_coefficients: AR_COEFFICIENTS.to_vec(),
        metrics,
        adf,
        acf: acf.to_vec(),
    })
}

/// One cache per demo, shared by every request of a server.
///
/// Only runs with an explicit seed are cached. A run without one draws a fresh
/// seed, so its key would never be requested again; it is computed directly
/// and its report carries the drawn seed.
#[derive(Default)]
pub struct ReportCaches {
    simple_reports: ReportCache<SimpleKey, SimpleReport>,
    multiple_reports: ReportCache<MultipleKey, MultipleReport>,
    timeseries_reports: ReportCache<TimeSeriesKey, TimeSeriesReport>,
}

impl ReportCaches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn simple(&self, params: &SimpleParams) -> Result<Arc<SimpleReport>> {
        params.validate()?;
        if params.seed.is_none() {
            let mut params = params.clone();
            resolve_seed(&mut params.seed);
            return run_simple(&params).map(Arc::new);
        }
        self.simple_reports
            .get_or_try_insert_with(params.cache_key(), || run_simple(params))
    }

    pub fn multiple(&self, params: &MultipleParams) -> Result<Arc<MultipleReport>> {
        params.validate()?;
        if params.seed.is_none() {
            let mut params = params.clone();
            resolve_seed(&mut params.seed);
            return run_multiple(&params).map(Arc::new);
        }
        self.multiple_reports
            .get_or_try_insert_with(params.cache_key(), || run_multiple(params))
    }

    pub fn timeseries(&self, params: &TimeSeriesParams) -> Result<Arc<TimeSeriesReport>> {
        params.validate()?;
        if params.seed.is_none() {
            let mut params = params.clone();
            resolve_seed(&mut params.seed);
            return run_timeseries(&params).map(Arc::new);
        }
        self.timeseries_reports
            .get_or_try_insert_with(params.cache_key(), || run_timeseries(params))
    }

    /// Number of cached reports across the three demos.
    pub fn len(&self) -> usize {
        self.simple_reports.len() + self.multiple_reports.len() + self.timeseries_reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
