//! Small dense solvers used by the least-squares fits.

use crate::error::{Error, Result};
use crate::{Matrix, Vector};
use ndarray::{Axis, s};

const PIVOT_TOLERANCE: f64 = 1e-10;

/// Solves `A·x = b` by Gaussian elimination with partial pivoting.
pub fn solve(a: &Matrix, b: &Vector) -> Result<Vector> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(Error::DimensionMismatch {
            expected: n,
            actual: a.ncols(),
        });
    }
    if b.len() != n {
        return Err(Error::DimensionMismatch {
            expected: n,
            actual: b.len(),
        });
    }

    let rhs = b.view().insert_axis(Axis(1)).to_owned();
    let x = eliminate(a, &rhs)?;
    Ok(x.column(0).to_owned())
}

/// Inverse of a square matrix, by elimination against the identity.
pub fn invert(a: &Matrix) -> Result<Matrix> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(Error::DimensionMismatch {
            expected: n,
            actual: a.ncols(),
        });
    }
    eliminate(a, &Matrix::eye(n))
}

/// Ordinary least squares through the normal equations `XᵀX·β = Xᵀy`.
///
/// Returns `β` and `(XᵀX)⁻¹`, the latter needed for coefficient standard errors.
pub fn least_squares(x: &Matrix, y: &Vector) -> Result<(Vector, Matrix)> {
    if x.nrows() != y.len() {
        return Err(Error::DimensionMismatch {
            expected: x.nrows(),
            actual: y.len(),
        });
    }
    if x.nrows() < x.ncols() {
        return Err(Error::StatisticalDegeneracy(format!(
            "{} observations cannot identify {} coefficients",
            x.nrows(),
            x.ncols()
        )));
    }

    let xt = x.t();
    let xtx_inv = invert(&xt.dot(x))?;
    let beta = xtx_inv.dot(&xt.dot(y));
    Ok((beta, xtx_inv))
}

/// Reduces `[A | B]` to `[I | A⁻¹B]`.
///
/// The system is first equilibrated as `(DAD)·y = DB`, `x = D·y`, with
/// `D = diag(1/√|aᵢᵢ|)`. For a normal-equations matrix `XᵀX` this turns it into
/// the matrix of column cosines, so the singularity check does not depend on
/// the units of the columns. Without a full nonzero diagonal `D` is the identity.
fn eliminate(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let n = a.nrows();
    let m = b.ncols();

    if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
        return Err(Error::Numerical("system contains non-finite values".to_string()));
    }

    let d = equilibration(a);
    let mut aug = Matrix::zeros((n, n + m));
    for i in 0..n {
        for j in 0..n {
            aug[(i, j)] = d[i] * a[(i, j)] * d[j];
        }
        for j in 0..m {
            aug[(i, n + j)] = d[i] * b[(i, j)];
        }
    }

    let scale = aug
        .slice(s![.., ..n])
        .iter()
        .fold(0.0f64, |acc, v| acc.max(v.abs()))
        .max(1.0);

    for i in 0..n {
        let mut max_row = i;
        for k in (i + 1)..n {
            if aug[(k, i)].abs() > aug[(max_row, i)].abs() {
                max_row = k;
            }
        }

        if aug[(max_row, i)].abs() < PIVOT_TOLERANCE * scale {
            return Err(Error::StatisticalDegeneracy(
                "Matrix is singular or nearly singular".to_string(),
            ));
        }

        if max_row != i {
            for j in 0..n + m {
                aug.swap((i, j), (max_row, j));
            }
        }

        let pivot = aug[(i, i)];
        for j in i..n + m {
            aug[(i, j)] /= pivot;
        }

        for k in 0..n {
            if k == i {
                continue;
            }
            let factor = aug[(k, i)];
            if factor != 0.0 {
                for j in i..n + m {
                    aug[(k, j)] -= factor * aug[(i, j)];
                }
            }
        }
    }

    let mut out = Matrix::zeros((n, m));
    for i in 0..n {
        for j in 0..m {
            out[(i, j)] = d[i] * aug[(i, n + j)];
        }
    }
    Ok(out)
}

fn equilibration(a: &Matrix) -> Vector {
    let diag = a.diag();
    if diag.iter().all(|&v| v != 0.0) {
        diag.mapv(|v| 1.0 / v.abs().sqrt())
    } else {
        Vector::ones(a.nrows())
    }
}
