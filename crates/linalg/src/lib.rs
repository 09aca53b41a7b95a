#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::float_cmp)]
//! # Dense Linear Algebra
//!
//! Runtime-dimension vectors and matrices over `f64`, backed by `nalgebra`,
//! plus the two solves reward-weighted policy search needs:
//!
//! -   [`invert`] runs an LU factorisation with partial pivoting and refuses
//!     pivots at or below a tolerance relative to the largest entry.
//! -   [`pseudo_invert`] computes the Moore-Penrose inverse from an SVD and
//!     drops singular values at or below a tolerance relative to the largest.
//!
//! ```rust
//! use linalg::{invert, Matrix, Vector};
//!
//! let x = Vector::from_vec(vec![1.0, 2.0]);
//! let w = &x * x.transpose() + Matrix::identity(2, 2);
//! let inv = invert(&w, 1e-12)?;
//! let back = &inv * (&w * &x);
//! assert!((back[1] - 2.0).abs() < 1e-9);
//! # Ok::<(), linalg::LinalgError>(())
//! ```

use thiserror::Error;

pub type Vector = nalgebra::DVector<f64>;
pub type Matrix = nalgebra::DMatrix<f64>;

const MAX_SVD_ITERATIONS: usize = 1000;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    #[error("matrix is singular: no usable pivot in column {column}")]
    Singular { column: usize },
    #[error("matrix is not square: {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("result contains non-finite entries")]
    NonFinite,
    #[error("singular value decomposition did not converge")]
    NoConvergence,
}

/// Whether every entry is finite.
#[must_use]
pub fn all_finite<'a>(values: impl IntoIterator<Item = &'a f64>) -> bool {
    values.into_iter().all(|v| v.is_finite())
}

fn check_square(m: &Matrix) -> Result<(), LinalgError> {
    if m.is_square() {
        Ok(())
    } else {
        Err(LinalgError::NotSquare { rows: m.nrows(), cols: m.ncols() })
    }
}

/// Inverts `m` through its LU factorisation.
///
/// A pivot is rejected when its magnitude is at or below
/// `tolerance * max|m_ij|`, so the check is independent of scale. A zero
/// matrix is singular.
///
/// # Errors
/// [`LinalgError::Singular`] naming the first column without a usable pivot,
/// [`LinalgError::NotSquare`] for a rectangular input and
/// [`LinalgError::NonFinite`] if the inverse overflowed.
pub fn invert(m: &Matrix, tolerance: f64) -> Result<Matrix, LinalgError> {
    check_square(m)?;
    let threshold = tolerance * m.amax();
    let lu = m.clone().lu();
    let u = lu.u();
    for column in 0..u.nrows() {
        let pivot = u[(column, column)];
        if pivot == 0.0 || pivot.abs() <= threshold || !pivot.is_finite() {
            return Err(LinalgError::Singular { column });
        }
    }
    let inverse = lu.try_inverse().ok_or(LinalgError::NonFinite)?;
    if !all_finite(inverse.iter()) {
        return Err(LinalgError::NonFinite);
    }
    Ok(inverse)
}

/// Moore-Penrose pseudo-inverse of `m`.
///
/// Singular values at or below `tolerance * σ_max` are treated as zero.
/// Returns the inverse together with the number of dropped directions. The
/// pseudo-inverse of a zero matrix is the zero matrix.
///
/// # Errors
/// [`LinalgError::NotSquare`] for a rectangular input and
/// [`LinalgError::NoConvergence`] if the SVD does not converge.
pub fn pseudo_invert(m: &Matrix, tolerance: f64) -> Result<(Matrix, usize), LinalgError> {
    check_square(m)?;
    let svd = m
        .clone()
        .try_svd(true, true, f64::EPSILON, MAX_SVD_ITERATIONS)
        .ok_or(LinalgError::NoConvergence)?;
    let cutoff = tolerance * svd.singular_values.max();
    let dropped = svd.singular_values.iter().filter(|&&s| s <= cutoff).count();
    let inverse = svd.pseudo_inverse(cutoff).map_err(|_| LinalgError::NoConvergence)?;
    Ok((inverse, dropped))
}
