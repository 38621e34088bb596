//! Dense matrices of exact rationals.
//!
//! Row-major `Vec<Vec<_>>`. Every entry is a reduced `BigRational`, so nothing here can overflow
//! or lose precision.

use anyhow::{bail, ensure, Result};
use num::{BigRational, One, Zero};
use tracing::trace;

pub type Matrix = Vec<Vec<BigRational>>;

pub fn zeros(rows: usize, cols: usize) -> Matrix {
    vec![vec![BigRational::zero(); cols]; rows]
}

pub fn identity(n: usize) -> Matrix {
    let mut m = zeros(n, n);
    for (i, row) in m.iter_mut().enumerate() {
        row[i] = BigRational::one();
    }
    m
}

fn dims(m: &Matrix) -> (usize, usize) {
    (m.len(), m.first().map_or(0, Vec::len))
}

/// Element-wise `a - b`.
pub fn subtract(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    ensure!(
        dims(a) == dims(b),
        "cannot subtract a {:?} matrix from a {:?} matrix",
        dims(b),
        dims(a)
    );
    Ok(a.iter()
        .zip(b)
        .map(|(ra, rb)| ra.iter().zip(rb).map(|(x, y)| x - y).collect())
        .collect())
}

pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let (rows, inner) = dims(a);
    let (b_rows, cols) = dims(b);
    ensure!(
        inner == b_rows,
        "cannot multiply a {rows}x{inner} matrix by a {b_rows}x{cols} matrix"
    );

    let mut out = zeros(rows, cols);
    for (i, row) in a.iter().enumerate() {
        for (k, x) in row.iter().enumerate() {
            if x.is_zero() {
                continue;
            }
            for (j, y) in b[k].iter().enumerate() {
                out[i][j] += x * y;
            }
        }
    }
    Ok(out)
}

/// Inverts a square matrix by Gauss-Jordan elimination on `[m | I]`.
///
/// Pivots are taken straight off the diagonal in index order; there is no row exchange. That is
/// enough for `I - B` of an absorbing chain (a nonsingular M-matrix, so every leading principal
/// minor is positive) but a zero pivot on any other input is reported as an error.
pub fn invert(m: &Matrix) -> Result<Matrix> {
    let n = m.len();
    ensure!(
        m.iter().all(|row| row.len() == n),
        "cannot invert a non-square matrix"
    );

    let mut left = m.clone();
    let mut right = identity(n);

    for focus in 0..n {
        let pivot = left[focus][focus].clone();
        if pivot.is_zero() {
            bail!("zero pivot at diagonal position {focus}");
        }
        trace!(focus, %pivot, "eliminating column");

        let scale = pivot.recip();
        for x in left[focus].iter_mut().chain(right[focus].iter_mut()) {
            *x *= &scale;
        }

        let focus_left = left[focus].clone();
        let focus_right = right[focus].clone();
        for row in 0..n {
            if row == focus {
                continue;
            }
            let factor = left[row][focus].clone();
            if factor.is_zero() {
                continue;
            }
            for (x, f) in left[row].iter_mut().zip(&focus_left) {
                *x -= &factor * f;
            }
            for (x, f) in right[row].iter_mut().zip(&focus_right) {
                *x -= &factor * f;
            }
        }
    }

    Ok(right)
}
