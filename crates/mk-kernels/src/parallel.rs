//! Data-parallel naive multiply.

use mk_matrix::{Element, MatrixView, MatrixViewMut, Result};
use rayon::prelude::*;

use crate::check::matmul_shapes;
use crate::reference::dot_column;

/// Write `f(i, j)` into every cell of `c`, with rows and then cells spread
/// across the current rayon pool.
///
/// Each cell is a distinct `&mut T` handed to exactly one task, so no two
/// workers ever write the same location and no locking is needed.
pub(crate) fn par_fill<T, F>(c: &mut MatrixViewMut<'_, T>, f: F)
where
    T: Element,
    F: Fn(usize, usize) -> T + Sync + Send,
{
    let rows: Vec<&mut [T]> = c.rows_mut().collect();
    rows.into_par_iter().enumerate().for_each(|(i, row)| {
        row.par_iter_mut()
            .enumerate()
            .for_each(|(j, cell)| *cell = f(i, j));
    });
}

/// Naive multiply with the `(i, j)` loops distributed over the current pool.
///
/// Each cell is accumulated exactly as [`crate::matmul_naive`] does, so the
/// result is bit-identical to it for any number of workers.
///
/// # Errors
/// Returns `MatmulMismatch` unless A is m x k, B is k x n and C is m x n.
pub fn matmul_parallel<T: Element>(
    a: MatrixView<'_, T>,
    b: MatrixView<'_, T>,
    mut c: MatrixViewMut<'_, T>,
) -> Result<()> {
    matmul_shapes(&a, &b, c.shape())?;
    log::debug!(
        "parallel matmul: [{}x{}] @ [{}x{}] ({}) on {} threads",
        a.rows(),
        a.cols(),
        b.rows(),
        b.cols(),
        T::DTYPE,
        rayon::current_num_threads()
    );

    par_fill(&mut c, |i, j| dot_column(a.row(i), &b, j));
    Ok(())
}
