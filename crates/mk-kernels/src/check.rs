use mk_matrix::{Element, MatrixError, MatrixView, Result};

/// Checks `A (m x k) * B (k x n) -> C (m x n)`.
pub(crate) fn matmul_shapes<T: Element>(
    a: &MatrixView<'_, T>,
    b: &MatrixView<'_, T>,
    c: (usize, usize),
) -> Result<()> {
    if a.rows() != c.0 || a.cols() != b.rows() || b.cols() != c.1 {
        return Err(MatrixError::MatmulMismatch {
            a: a.shape(),
            b: b.shape(),
            c,
        });
    }
    Ok(())
}

/// Checks `A (m x k) * Bt (n x k)^T -> C (m x n)` for strategies that take
/// the second operand already transposed.
pub(crate) fn matmul_transposed_shapes<T: Element>(
    a: &MatrixView<'_, T>,
    bt: &MatrixView<'_, T>,
    c: (usize, usize),
) -> Result<()> {
    if a.rows() != c.0 || a.cols() != bt.cols() || bt.rows() != c.1 {
        return Err(MatrixError::MatmulMismatch {
            a: a.shape(),
            b: bt.shape(),
            c,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mk_matrix::Matrix;

    #[test]
    fn test_matmul_shapes() {
        let a = Matrix::<i32>::zeros(2, 3);
        let b = Matrix::<i32>::zeros(3, 4);
        assert!(matmul_shapes(&a.view(), &b.view(), (2, 4)).is_ok());
        assert!(matmul_shapes(&a.view(), &b.view(), (2, 3)).is_err());
        assert!(matmul_shapes(&b.view(), &a.view(), (3, 3)).is_err());
    }

    #[test]
    fn test_matmul_transposed_shapes() {
        let a = Matrix::<i32>::zeros(2, 3);
        let bt = Matrix::<i32>::zeros(4, 3);
        assert!(matmul_transposed_shapes(&a.view(), &bt.view(), (2, 4)).is_ok());
        let err = matmul_transposed_shapes(&a.view(), &bt.view(), (4, 2)).unwrap_err();
        assert_eq!(
            err,
            MatrixError::MatmulMismatch {
                a: (2, 3),
                b: (4, 3),
                c: (4, 2)
            }
        );
    }
}
