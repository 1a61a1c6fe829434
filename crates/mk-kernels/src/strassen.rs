//! Strassen's divide-and-conquer multiply for square power-of-two matrices.
//!
//! Each level splits both operands into quadrant views, builds ten
//! auxiliary sums with [`mk_matrix::add`] / [`mk_matrix::subtract`], and
//! computes seven half-size products instead of eight:
//!
//! ```text
//! M1 = A11 (B12 - B22)          C11 = M5 + M4 - M2 + M6
//! M2 = (A11 + A12) B22          C12 = M1 + M2
//! M3 = (A21 + A22) B11          C21 = M3 + M4
//! M4 = A22 (B21 - B11)          C22 = M1 + M5 - M3 - M7
//! M5 = (A11 + A22)(B11 + B22)
//! M6 = (A12 - A22)(B21 + B22)
//! M7 = (A11 - A21)(B11 + B12)
//! ```
//!
//! The seven products are independent and run as parallel tasks, each into
//! its own temporary, and all of them finish before the merge reads them.
//! The recursion bottoms out in a closed-form 2x2 step.

use mk_matrix::{
    add, subtract, Element, Matrix, MatrixError, MatrixView, MatrixViewMut, Result,
};
use rayon::prelude::*;

use crate::check::matmul_shapes;
use crate::parallel::par_fill;

/// Closed-form 2x2 Strassen step with seven scalar products.
fn base_2x2<T: Element>(
    a: &MatrixView<'_, T>,
    b: &MatrixView<'_, T>,
    c: &mut MatrixViewMut<'_, T>,
) {
    let (a00, a01, a10, a11) = (a.get(0, 0), a.get(0, 1), a.get(1, 0), a.get(1, 1));
    let (b00, b01, b10, b11) = (b.get(0, 0), b.get(0, 1), b.get(1, 0), b.get(1, 1));

    let p1 = (b01 - b11) * a00;
    let p2 = (a00 + a01) * b11;
    let p3 = (a10 + a11) * b00;
    let p4 = (b10 - b00) * a11;
    let p5 = (a00 + a11) * (b00 + b11);
    let p6 = (a01 - a11) * (b10 + b11);
    let p7 = (a00 - a10) * (b00 + b01);

    c.set(0, 0, p5 + p4 - p2 + p6);
    c.set(0, 1, p1 + p2);
    c.set(1, 0, p3 + p4);
    c.set(1, 1, p1 + p5 - p3 - p7);
}

fn recurse<T: Element>(
    a: MatrixView<'_, T>,
    b: MatrixView<'_, T>,
    mut c: MatrixViewMut<'_, T>,
) -> Result<()> {
    let n = a.rows();
    match n {
        1 => {
            c.set(0, 0, a.get(0, 0) * b.get(0, 0));
            return Ok(());
        }
        2 => {
            base_2x2(&a, &b, &mut c);
            return Ok(());
        }
        _ => {}
    }

    let h = n / 2;
    log::trace!("strassen: {n}x{n} -> 7 products of {h}x{h}");

    let [a11, a12, a21, a22] = a.quadrants()?;
    let [b11, b12, b21, b22] = b.quadrants()?;

    let p1 = subtract(b12, b22)?;
    let p2 = add(a11, a12)?;
    let p3 = add(a21, a22)?;
    let p4 = subtract(b21, b11)?;
    let p51 = add(a11, a22)?;
    let p52 = add(b11, b22)?;
    let p61 = subtract(a12, a22)?;
    let p62 = add(b21, b22)?;
    let p71 = subtract(a11, a21)?;
    let p72 = add(b11, b12)?;

    let factors = [
        (a11, p1.view()),
        (p2.view(), b22),
        (p3.view(), b11),
        (a22, p4.view()),
        (p51.view(), p52.view()),
        (p61.view(), p62.view()),
        (p71.view(), p72.view()),
    ];
    // Join barrier: every product is finished once `collect` returns.
    let m: Vec<Matrix<T>> = factors
        .par_iter()
        .map(|&(x, y)| -> Result<Matrix<T>> {
            let mut out = Matrix::zeros(h, h);
            recurse(x, y, out.view_mut())?;
            Ok(out)
        })
        .collect::<Result<Vec<_>>>()?;

    let (m1, m2, m3, m4, m5, m6, m7) = (&m[0], &m[1], &m[2], &m[3], &m[4], &m[5], &m[6]);
    par_fill(&mut c.submatrix_mut(0, 0, h, h)?, |i, j| {
        m5.get(i, j) + m4.get(i, j) - m2.get(i, j) + m6.get(i, j)
    });
    par_fill(&mut c.submatrix_mut(0, h, h, h)?, |i, j| {
        m1.get(i, j) + m2.get(i, j)
    });
    par_fill(&mut c.submatrix_mut(h, 0, h, h)?, |i, j| {
        m3.get(i, j) + m4.get(i, j)
    });
    par_fill(&mut c.submatrix_mut(h, h, h, h)?, |i, j| {
        m1.get(i, j) + m5.get(i, j) - m3.get(i, j) - m7.get(i, j)
    });
    Ok(())
}

/// Strassen multiply: C = A @ B for n x n operands, n a power of two.
///
/// Works on views, so A and B may be windows of larger matrices and C may
/// be a window into a larger output. Temporaries are allocated per level
/// and dropped when that level returns.
///
/// # Errors
/// - `MatmulMismatch` unless A is m x k, B is k x n and C is m x n
/// - `InvalidDimension` unless A and B are square with a power-of-two side
pub fn matmul_strassen<T: Element>(
    a: MatrixView<'_, T>,
    b: MatrixView<'_, T>,
    c: MatrixViewMut<'_, T>,
) -> Result<()> {
    matmul_shapes(&a, &b, c.shape())?;
    if a.rows() != a.cols() || b.rows() != b.cols() || !a.rows().is_power_of_two() {
        let (rows, cols) = if a.rows() != a.cols() {
            a.shape()
        } else {
            b.shape()
        };
        return Err(MatrixError::InvalidDimension {
            rows,
            cols,
            reason: "strassen requires square operands with a power-of-two side",
        });
    }

    log::debug!(
        "strassen matmul: {n}x{n} ({}) on {} threads",
        T::DTYPE,
        rayon::current_num_threads(),
        n = a.rows()
    );
    recurse(a, b, c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::WorkerPool;
    use crate::reference::matmul_naive;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_i32(n: usize, seed: u64) -> Matrix<i32> {
        let mut rng = StdRng::seed_from_u64(seed);
        Matrix::from_fn(n, n, |_, _| rng.gen_range(-20..20))
    }

    fn random_f64(n: usize, seed: u64) -> Matrix<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        Matrix::from_fn(n, n, |_, _| rng.gen_range(-1.0..1.0))
    }

    #[test]
    fn test_base_case() {
        let a = Matrix::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap();
        let b = Matrix::from_vec(2, 2, vec![5, 6, 7, 8]).unwrap();
        let mut c = Matrix::zeros(2, 2);
        matmul_strassen(a.view(), b.view(), c.view_mut()).unwrap();
        assert_eq!(c.as_slice(), &[19, 22, 43, 50]);
    }

    #[test]
    fn test_one_by_one() {
        let a = Matrix::from_vec(1, 1, vec![3.0f32]).unwrap();
        let b = Matrix::from_vec(1, 1, vec![-2.0f32]).unwrap();
        let mut c = Matrix::zeros(1, 1);
        matmul_strassen(a.view(), b.view(), c.view_mut()).unwrap();
        assert_eq!(c.get(0, 0), -6.0);
    }

    #[test]
    fn test_identity_returns_rhs() {
        let a = Matrix::<i32>::identity(4);
        let b = Matrix::from_fn(4, 4, |i, j| (i * 7 + j * 3) as i32 - 9);
        let mut c = Matrix::zeros(4, 4);
        matmul_strassen(a.view(), b.view(), c.view_mut()).unwrap();
        assert_eq!(c, b);
    }

    #[test]
    fn test_matches_naive_integers() {
        for (n, seed) in [(2, 1), (4, 2), (8, 3), (16, 4), (64, 5)] {
            let a = random_i32(n, seed);
            let b = random_i32(n, seed + 100);
            let mut expected = Matrix::zeros(n, n);
            matmul_naive(a.view(), b.view(), expected.view_mut()).unwrap();
            let mut c = Matrix::zeros(n, n);
            matmul_strassen(a.view(), b.view(), c.view_mut()).unwrap();
            assert_eq!(c, expected, "n = {n}");
        }
    }

    #[test]
    fn test_matches_naive_floats() {
        for n in [2, 4, 8, 16, 64] {
            let a = random_f64(n, n as u64);
            let b = random_f64(n, n as u64 + 1);
            let mut expected = Matrix::zeros(n, n);
            matmul_naive(a.view(), b.view(), expected.view_mut()).unwrap();
            let mut c = Matrix::zeros(n, n);
            matmul_strassen(a.view(), b.view(), c.view_mut()).unwrap();
            for (x, y) in c.as_slice().iter().zip(expected.as_slice()) {
                assert_relative_eq!(*x, *y, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_windows_in_and_out() {
        let big_a = random_i32(8, 9);
        let big_b = random_i32(8, 10);
        let a = big_a.submatrix(4, 0, 4, 4).unwrap();
        let b = big_b.submatrix(2, 3, 4, 4).unwrap();

        let mut expected = Matrix::zeros(4, 4);
        matmul_naive(a, b, expected.view_mut()).unwrap();

        let mut out = Matrix::from_fn(8, 8, |_, _| 1234);
        matmul_strassen(a, b, out.submatrix_mut(2, 2, 4, 4).unwrap()).unwrap();
        assert_eq!(out.submatrix(2, 2, 4, 4).unwrap().to_owned(), expected);
        assert_eq!(out.get(0, 0), 1234);
        assert_eq!(out.get(6, 6), 1234);
        assert_eq!(out.get(2, 6), 1234);
    }

    #[test]
    fn test_deterministic_across_pool_sizes() {
        let a = random_f64(32, 21);
        let b = random_f64(32, 22);
        let mut first: Option<Matrix<f64>> = None;
        for threads in [1, 2, 8] {
            let pool = WorkerPool::new(threads).unwrap();
            let mut c = Matrix::zeros(32, 32);
            pool.install(|| matmul_strassen(a.view(), b.view(), c.view_mut()))
                .unwrap();
            match &first {
                None => first = Some(c),
                Some(prev) => assert_eq!(&c, prev, "threads = {threads}"),
            }
        }
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        let a = Matrix::<i32>::zeros(6, 6);
        let mut c = Matrix::<i32>::zeros(6, 6);
        assert!(matches!(
            matmul_strassen(a.view(), a.view(), c.view_mut()),
            Err(MatrixError::InvalidDimension { rows: 6, cols: 6, .. })
        ));
        let z = Matrix::<i32>::zeros(0, 0);
        let mut cz = Matrix::<i32>::zeros(0, 0);
        assert!(matches!(
            matmul_strassen(z.view(), z.view(), cz.view_mut()),
            Err(MatrixError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_rejects_non_square() {
        let a = Matrix::<f32>::zeros(2, 4);
        let b = Matrix::<f32>::zeros(4, 2);
        let mut c = Matrix::<f32>::zeros(2, 2);
        assert!(matches!(
            matmul_strassen(a.view(), b.view(), c.view_mut()),
            Err(MatrixError::InvalidDimension { rows: 2, cols: 4, .. })
        ));
    }

    #[test]
    fn test_shape_mismatch_checked_first() {
        let a = Matrix::<f32>::zeros(4, 4);
        let b = Matrix::<f32>::zeros(2, 2);
        let mut c = Matrix::<f32>::zeros(4, 4);
        assert!(matches!(
            matmul_strassen(a.view(), b.view(), c.view_mut()),
            Err(MatrixError::MatmulMismatch { .. })
        ));
    }
}
