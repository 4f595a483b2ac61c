use crate::error::{Error, Result};
use crate::{Matrix, Vector};
use ndarray::{Axis, s};

#[derive(Clone, Debug)]
pub struct Dataset {
    pub features: Matrix,
    pub labels: Vector,
}

impl Dataset {
    pub fn new(features: Matrix, labels: Vector) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(Error::DimensionMismatch {
                expected: features.nrows(),
                actual: labels.len(),
            });
        }

        Ok(Self { features, labels })
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Keeps only the given feature columns, in the order given.
    pub fn select_columns(&self, columns: &[usize]) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::invalid("features", "selected feature set is empty"));
        }
        if let Some(&bad) = columns.iter().find(|&&c| c >= self.n_features()) {
            return Err(Error::invalid(
                "features",
                format!("column {} out of range for {} features", bad, self.n_features()),
            ));
        }

        let features = self.features.select(Axis(1), columns);
        Dataset::new(features, self.labels.clone())
    }

    /// Splits off the trailing `test_size` fraction as the test set.
    pub fn train_test_split(&self, test_size: f64) -> Result<(Self, Self)> {
        if test_size <= 0.0 || test_size >= 1.0 {
            return Err(Error::invalid("test_size", "must be between 0 and 1"));
        }

        let n_samples = self.n_samples();
        let n_test = (n_samples as f64 * test_size).round() as usize;
        let n_train = n_samples - n_test;

        let train_features = self.features.slice(s![..n_train, ..]).to_owned();
        let train_labels = self.labels.slice(s![..n_train]).to_owned();

        let test_features = self.features.slice(s![n_train.., ..]).to_owned();
        let test_labels = self.labels.slice(s![n_train..]).to_owned();

        let train_dataset = Dataset::new(train_features, train_labels)?;
        let test_dataset = Dataset::new(test_features, test_labels)?;

        Ok((train_dataset, test_dataset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_dataset_creation() {
        let features = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let targets = array![1.0, 2.0, 3.0];

        let dataset = Dataset::new(features, targets).unwrap();
        assert_eq!(dataset.n_samples(), 3);
        assert_eq!(dataset.n_features(), 2);
    }

    #[test]
    fn test_dataset_length_mismatch() {
        let features = array![[1.0], [2.0]];
        let targets = array![1.0, 2.0, 3.0];

        assert_eq!(
            Dataset::new(features, targets).unwrap_err(),
            Error::DimensionMismatch { expected: 2, actual: 3 }
        );
    }

    #[test]
    fn test_train_test_split() {
        let features = Matrix::zeros((100, 5));
        let targets = Vector::zeros(100);
        let dataset = Dataset::new(features, targets).unwrap();

        let (train, test) = dataset.train_test_split(0.2).unwrap();
        assert_eq!(train.n_samples(), 80);
        assert_eq!(test.n_samples(), 20);
    }

    #[test]
    fn test_train_test_split_is_disjoint() {
        let features = Matrix::from_shape_fn((10, 1), |(i, _)| i as f64);
        let targets = Vector::from_iter((0..10).map(|i| i as f64));
        let dataset = Dataset::new(features, targets).unwrap();

        let (train, test) = dataset.train_test_split(0.3).unwrap();
        assert_eq!(train.labels.to_vec(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(test.labels.to_vec(), vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_select_columns() {
        let features = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let dataset = Dataset::new(features, array![0.0, 1.0]).unwrap();

        let projected = dataset.select_columns(&[0, 2]).unwrap();
        assert_eq!(projected.features, array![[1.0, 3.0], [4.0, 6.0]]);
        assert_eq!(projected.labels, dataset.labels);
    }

    #[test]
    fn test_select_columns_rejects_empty_and_out_of_range() {
        let dataset = Dataset::new(array![[1.0, 2.0]], array![0.0]).unwrap();

        assert!(dataset.select_columns(&[]).unwrap_err().is_invalid_parameter());
        assert!(dataset.select_columns(&[2]).unwrap_err().is_invalid_parameter());
    }
}
