//! Reference strategies: the plain triple loop and its transposed-access
//! variant. Every other strategy is tested against these.

use mk_matrix::{Element, MatrixView, MatrixViewMut, Result};

use crate::check::{matmul_shapes, matmul_transposed_shapes};

/// `sum_k a_row[k] * b[k][j]`, accumulated in `k` order.
#[inline]
pub(crate) fn dot_column<T: Element>(a_row: &[T], b: &MatrixView<'_, T>, j: usize) -> T {
    let mut sum = T::zero();
    for (k, &x) in a_row.iter().enumerate() {
        sum += x * b.get(k, j);
    }
    sum
}

/// `sum_k a_row[k] * bt_row[k]`, accumulated in `k` order.
#[inline]
pub(crate) fn dot_row<T: Element>(a_row: &[T], bt_row: &[T]) -> T {
    let mut sum = T::zero();
    for (&x, &y) in a_row.iter().zip(bt_row) {
        sum += x * y;
    }
    sum
}

/// Naive matrix multiplication: C = A @ B.
///
/// Loops i-outer, j-middle, k-inner. B is walked down a column in the inner
/// loop, which is the cache-unfriendly baseline the other strategies beat.
///
/// # Errors
/// Returns `MatmulMismatch` unless A is m x k, B is k x n and C is m x n.
pub fn matmul_naive<T: Element>(
    a: MatrixView<'_, T>,
    b: MatrixView<'_, T>,
    mut c: MatrixViewMut<'_, T>,
) -> Result<()> {
    matmul_shapes(&a, &b, c.shape())?;
    log::debug!(
        "naive matmul: [{}x{}] @ [{}x{}] ({})",
        a.rows(),
        a.cols(),
        b.rows(),
        b.cols(),
        T::DTYPE
    );

    for (i, row) in c.rows_mut().enumerate() {
        let a_row = a.row(i);
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = dot_column(a_row, &b, j);
        }
    }
    Ok(())
}

/// Matrix multiplication with a pre-transposed second operand: C = A @ Bt^T.
///
/// `bt` is n x k, i.e. B already transposed by the caller (see
/// [`mk_matrix::Matrix::transpose`]), so both operands are read row-wise in
/// the inner loop.
///
/// # Errors
/// Returns `MatmulMismatch` unless A is m x k, Bt is n x k and C is m x n.
pub fn matmul_transposed<T: Element>(
    a: MatrixView<'_, T>,
    bt: MatrixView<'_, T>,
    mut c: MatrixViewMut<'_, T>,
) -> Result<()> {
    matmul_transposed_shapes(&a, &bt, c.shape())?;
    log::debug!(
        "transposed matmul: [{}x{}] @ [{}x{}]^T ({})",
        a.rows(),
        a.cols(),
        bt.rows(),
        bt.cols(),
        T::DTYPE
    );

    for (i, row) in c.rows_mut().enumerate() {
        let a_row = a.row(i);
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = dot_row(a_row, bt.row(j));
        }
    }
    Ok(())
}
