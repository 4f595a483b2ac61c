use crate::error::{Error, Result};
use crate::linear_model::LinearRegression;
use crate::{Matrix, Vector};
use ndarray::Axis;

/// Recursive feature elimination over ordinary least squares.
///
/// Repeatedly fits on the surviving features and drops the one with the
/// smallest absolute coefficient until `n_features_to_select` remain.
#[derive(Clone, Debug)]
pub struct Rfe {
    n_features_to_select: usize,
    support: Option<Vec<bool>>,
    ranking: Option<Vec<usize>>,
    estimator: Option<LinearRegression>,
}

impl Rfe {
    pub fn new(n_features_to_select: usize) -> Self {
        Self {
            n_features_to_select,
            support: None,
            ranking: None,
            estimator: None,
        }
    }

    pub fn fit(&mut self, x: &Matrix, y: &Vector) -> Result<()> {
        let n_features = x.ncols();
        let k = self.n_features_to_select;
        if k == 0 || k > n_features {
            return Err(Error::invalid(
                "features_to_keep",
                format!("must be between 1 and {}, got {}", n_features, k),
            ));
        }

        let mut active: Vec<usize> = (0..n_features).collect();
        let mut ranking = vec![1; n_features];

        while active.len() > k {
            let mut model = LinearRegression::new();
            model.fit(&x.select(Axis(1), &active), y)?;
            let importances = model.feature_importances()?;

            // ties go to the later feature
            let mut weakest = 0;
            for (pos, &imp) in importances.iter().enumerate() {
                if imp <= importances[weakest] {
                    weakest = pos;
                }
            }

            let dropped = active.remove(weakest);
            ranking[dropped] = active.len() - k + 2;
            log::debug!(
                "RFE dropped feature {} (|coef|={:.4}), {} remain",
                dropped,
                importances[weakest],
                active.len()
            );
        }

        let mut estimator = LinearRegression::new();
        estimator.fit(&x.select(Axis(1), &active), y)?;

        let mut support = vec![false; n_features];
        for &idx in &active {
            support[idx] = true;
        }

        self.support = Some(support);
        self.ranking = Some(ranking);
        self.estimator = Some(estimator);
        Ok(())
    }

    /// Mask of retained features.
    pub fn support(&self) -> Result<&[bool]> {
        self.support.as_deref().ok_or(Error::NotFitted)
    }

    /// 1 for retained features; features eliminated earlier get larger ranks.
    pub fn ranking(&self) -> Result<&[usize]> {
        self.ranking.as_deref().ok_or(Error::NotFitted)
    }

    /// Indices of retained features, ascending.
    pub fn selected(&self) -> Result<Vec<usize>> {
        Ok(self
            .support()?
            .iter()
            .enumerate()
            .filter_map(|(i, &keep)| keep.then_some(i))
            .collect())
    }

    /// The model refitted on the retained features only.
    pub fn estimator(&self) -> Result<&LinearRegression> {
        self.estimator.as_ref().ok_or(Error::NotFitted)
    }

    pub fn transform(&self, x: &Matrix) -> Result<Matrix> {
        let support = self.support()?;
        if x.ncols() != support.len() {
            return Err(Error::DimensionMismatch {
                expected: support.len(),
                actual: x.ncols(),
            });
        }
        Ok(x.select(Axis(1), &self.selected()?))
    }

    pub fn predict(&self, x: &Matrix) -> Result<Vector> {
        let reduced = self.transform(x)?;
        self.estimator()?.predict(&reduced)
    }
}
