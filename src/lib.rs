//! # crispml
//!
//! Synthetic-data regression demos framed around the CRISP-DM process:
//! simple linear regression, multiple linear regression with recursive
//! feature elimination, and an autoregressive time series with an
//! Augmented Dickey-Fuller stationarity check.
//!
//! Every demo is a pure function from its parameters to a render-ready
//! report; see [`pipeline`].
//!
//! ```rust
//! use crispml::pipeline::run_simple;
//! use crispml::params::SimpleParams;
//!
//! let params = SimpleParams { noise_scale: 0.0, sample_count: 50, seed: Some(7), ..Default::default() };
//! let report = run_simple(&params).unwrap();
//! assert!((report.learned_slope - 2.0).abs() < 1e-8);
//! assert!((report.learned_intercept - 5.0).abs() < 1e-8);
//! ```

pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

pub mod dataset;
pub mod error;
pub mod feature_selection;
pub mod linalg;
pub mod linear_model;
pub mod metrics;
pub mod params;
pub mod pipeline;
pub mod render;
pub mod server;
pub mod stationarity;
pub mod synthetic;

pub use dataset::Dataset;
pub use error::{Error, Result};
pub use feature_selection::Rfe;
pub use linear_model::{AutoRegressive, LinearRegression};
pub use metrics::RegressionMetrics;
pub use stationarity::{AdfOptions, AdfResult, Autolag, adfuller};

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;
