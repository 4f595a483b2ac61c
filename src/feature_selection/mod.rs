//! Feature selection.
//!
//! - `Rfe`: recursive feature elimination ranked by absolute OLS coefficients
//!
//! # Examples
//!
//! ```rust
//! use crispml::{Matrix, Rfe, Vector};
//!
//! let x = Matrix::from_shape_fn((20, 3), |(i, j)| ((i * (j + 2) + 3 * j) % 7) as f64 + 0.2 * i as f64);
//! let y = x.dot(&Vector::from(vec![4.0, 0.0, -1.0])) + 2.0;
//!
//! let mut rfe = Rfe::new(2);
//! rfe.fit(&x, &y).unwrap();
//! assert_eq!(rfe.selected().unwrap(), vec![0, 2]);
//! ```

mod rfe;

pub use rfe::Rfe;
