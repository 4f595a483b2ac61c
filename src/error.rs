//! Error types shared by the models, the demos and the web front end.

use thiserror::Error;

/// Errors produced while validating parameters, fitting models or rendering.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A user-facing parameter is out of range. The request is short-circuited.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The data cannot support the requested statistic (singular design, too few points).
    #[error("Statistical degeneracy: {0}")]
    StatisticalDegeneracy(String),

    /// Non-finite input or a numerical routine that could not complete.
    #[error("Numerical error: {0}")]
    Numerical(String),

    /// Array shapes that should agree do not.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// `predict`/`forecast` called before `fit`.
    #[error("Model not fitted. Call fit() first.")]
    NotFitted,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the error came from user input rather than from the numerics.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Error::InvalidParameter { .. })
    }
}
