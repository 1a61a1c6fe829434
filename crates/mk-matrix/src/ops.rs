//! Elementwise arithmetic over matrix views.
//!
//! These are the only operations that synthesize new matrices during the
//! recursive multiply: every result is a freshly allocated, densely packed
//! owning matrix that does not alias either input.

use crate::dtype::Element;
use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;
use crate::view::MatrixView;

fn zip_with<T: Element>(
    a: MatrixView<'_, T>,
    b: MatrixView<'_, T>,
    f: impl Fn(T, T) -> T,
) -> Result<Matrix<T>> {
    if a.shape() != b.shape() {
        return Err(MatrixError::ShapeMismatch {
            expected: a.shape(),
            got: b.shape(),
        });
    }

    let mut out = Matrix::zeros(a.rows(), a.cols());
    let cols = a.cols().max(1);
    for ((dst, ra), rb) in out
        .as_mut_slice()
        .chunks_mut(cols)
        .zip(a.rows_iter())
        .zip(b.rows_iter())
    {
        for ((d, &x), &y) in dst.iter_mut().zip(ra).zip(rb) {
            *d = f(x, y);
        }
    }
    Ok(out)
}

/// Elementwise sum `a + b`.
///
/// # Errors
/// Returns `ShapeMismatch` if the operands differ in shape.
pub fn add<T: Element>(a: MatrixView<'_, T>, b: MatrixView<'_, T>) -> Result<Matrix<T>> {
    zip_with(a, b, |x, y| x + y)
}

/// Elementwise difference `a - b`.
///
/// # Errors
/// Returns `ShapeMismatch` if the operands differ in shape.
pub fn subtract<T: Element>(a: MatrixView<'_, T>, b: MatrixView<'_, T>) -> Result<Matrix<T>> {
    zip_with(a, b, |x, y| x - y)
}
