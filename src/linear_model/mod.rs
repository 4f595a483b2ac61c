//! Linear models fitted by ordinary least squares.
//!
//! This module provides:
//! - `LinearRegression`: OLS regression on a feature matrix
//! - `AutoRegressive`: AR(p) time-series model fitted on lagged values
//!
//! # Examples
//!
//! ## Linear Regression
//! ```rust
//! use crispml::LinearRegression;
//! use ndarray::array;
//!
//! let x = array![[1.0], [2.0], [3.0]];
//! let y = array![2.0, 4.0, 6.0];
//!
//! let mut model = LinearRegression::new();
//! model.fit(&x, &y).unwrap();
//! let predictions = model.predict(&x).unwrap();
//! ```
//!
//! ## Autoregression
//! ```rust
//! use crispml::AutoRegressive;
//!
//! let model = AutoRegressive::from_coefficients(0.0, &[0.6, -0.3]).unwrap();
//! let next = model.forecast_from(&[1.0, 2.0], 1).unwrap();
//! assert_eq!(next[0], 0.6 * 2.0 - 0.3 * 1.0);
//! ```

mod autoregressive;
mod linear_regression;

pub use autoregressive::AutoRegressive;
pub use linear_regression::LinearRegression;
