use crate::dtype::{DType, Element};
use crate::error::{MatrixError, Result};
use crate::storage::{AlignedBuffer, Alignment};
use crate::view::{MatrixView, MatrixViewMut};

/// A dense, row-major matrix that owns its storage.
///
/// The stride of an owning matrix always equals its column count. Windows
/// into it are taken with [`Matrix::submatrix`] and
/// [`Matrix::submatrix_mut`], which borrow the storage instead of copying it.
#[derive(Debug, Clone)]
pub struct Matrix<T: Element> {
    storage: AlignedBuffer<T>,
    rows: usize,
    cols: usize,
}

impl<T: Element> Matrix<T> {
    /// Create a zero-filled matrix with natural alignment.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::zeros_aligned(rows, cols, Alignment::Natural)
    }

    /// Create a zero-filled matrix whose buffer starts on `alignment`.
    ///
    /// # Panics
    /// Panics if `rows * cols` overflows `usize`.
    pub fn zeros_aligned(rows: usize, cols: usize, alignment: Alignment) -> Self {
        let len = match rows.checked_mul(cols) {
            Some(len) => len,
            None => panic!("capacity overflow allocating {rows}x{cols} elements of {}", T::DTYPE),
        };
        Matrix {
            storage: AlignedBuffer::zeroed(len, alignment),
            rows,
            cols,
        }
    }

    /// Create a matrix from row-major data.
    ///
    /// # Errors
    /// Returns `LengthMismatch` if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        Self::from_vec_aligned(rows, cols, data, Alignment::Natural)
    }

    /// Create a matrix from row-major data, copied into a buffer aligned to
    /// `alignment`.
    pub fn from_vec_aligned(
        rows: usize,
        cols: usize,
        data: Vec<T>,
        alignment: Alignment,
    ) -> Result<Self> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(MatrixError::LengthMismatch {
                expected: rows.saturating_mul(cols),
                got: data.len(),
            });
        }
        Ok(Matrix {
            storage: AlignedBuffer::from_slice(&data, alignment),
            rows,
            cols,
        })
    }

    /// Create a matrix whose element `(i, j)` is `f(i, j)`.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut m = Self::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                m.set(i, j, f(i, j));
            }
        }
        m
    }

    /// The `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| if i == j { T::one() } else { T::zero() })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Equal to `cols()` for an owning matrix.
    #[inline]
    pub fn stride(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    pub fn alignment(&self) -> Alignment {
        self.storage.alignment()
    }

    /// Returns true if the buffer starts on a `bytes` boundary.
    pub fn is_aligned_to(&self, bytes: usize) -> bool {
        self.view().is_aligned_to(bytes)
    }

    pub fn as_slice(&self) -> &[T] {
        self.storage.as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.storage.as_mut_slice()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.as_slice().to_vec()
    }

    /// Read element `(row, col)`; bounds are checked in debug builds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        debug_assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of range for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        self.as_slice()[row * self.cols + col]
    }

    /// Write element `(row, col)`; bounds are checked in debug builds.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        debug_assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of range for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        let cols = self.cols;
        self.as_mut_slice()[row * cols + col] = value;
    }

    pub fn try_get(&self, row: usize, col: usize) -> Result<T> {
        self.view().try_get(row, col)
    }

    pub fn try_set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.view_mut().try_set(row, col, value)
    }

    /// Shared view over the whole matrix.
    pub fn view(&self) -> MatrixView<'_, T> {
        MatrixView::new(self.storage.as_slice(), self.rows, self.cols, self.cols)
    }

    /// Mutable view over the whole matrix.
    pub fn view_mut(&mut self) -> MatrixViewMut<'_, T> {
        let (rows, cols) = (self.rows, self.cols);
        MatrixViewMut::new(self.storage.as_mut_slice(), rows, cols, cols)
    }

    /// Borrow a `rows x cols` window starting at `(row_offset, col_offset)`.
    ///
    /// # Errors
    /// Returns `OutOfBounds` if the window exceeds this matrix.
    pub fn submatrix(
        &self,
        row_offset: usize,
        col_offset: usize,
        rows: usize,
        cols: usize,
    ) -> Result<MatrixView<'_, T>> {
        self.view().submatrix(row_offset, col_offset, rows, cols)
    }

    /// Mutably borrow a window; writes land in this matrix.
    pub fn submatrix_mut(
        &mut self,
        row_offset: usize,
        col_offset: usize,
        rows: usize,
        cols: usize,
    ) -> Result<MatrixViewMut<'_, T>> {
        self.view_mut()
            .into_submatrix_mut(row_offset, col_offset, rows, cols)
    }

    /// See [`MatrixView::quadrants`].
    pub fn quadrants(&self) -> Result<[MatrixView<'_, T>; 4]> {
        self.view().quadrants()
    }

    /// Transposed copy with the same alignment as `self`.
    pub fn transpose(&self) -> Matrix<T> {
        self.view().transpose_aligned(self.alignment())
    }
}

impl<T: Element> PartialEq for Matrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.as_slice() == other.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_matrix() {
        let m = Matrix::from_vec(2, 3, vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.stride(), 3);
        assert_eq!(m.dtype(), DType::F32);
        assert_eq!(m.get(1, 0), 4.0);
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_from_vec_len_mismatch() {
        let err = Matrix::from_vec(2, 2, vec![1i32, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            MatrixError::LengthMismatch {
                expected: 4,
                got: 3
            }
        );
        assert_eq!(
            err.to_string(),
            "data length mismatch: expected 4 elements, got 3"
        );
        assert!(matches!(
            Matrix::from_vec(usize::MAX, 2, vec![0i32; 2]),
            Err(MatrixError::LengthMismatch { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn test_zeros_dimension_overflow_panics() {
        let _ = Matrix::<f32>::zeros(usize::MAX, 2);
    }

    #[test]
    fn test_zeros() {
        let z = Matrix::<f64>::zeros(2, 3);
        assert_eq!(z.as_slice(), &[0.0; 6]);
        let zi = Matrix::<i32>::zeros(3, 1);
        assert_eq!(zi.to_vec(), vec![0, 0, 0]);
    }

    #[test]
    fn test_zeros_aligned() {
        let m = Matrix::<f32>::zeros_aligned(3, 5, Alignment::Simd8);
        assert!(m.is_aligned_to(32));
        assert_eq!(m.alignment(), Alignment::Simd8);
        let m = Matrix::from_vec_aligned(1, 4, vec![1.0f32; 4], Alignment::Simd4).unwrap();
        assert!(m.is_aligned_to(16));
    }

    #[test]
    fn test_identity() {
        let id = Matrix::<i32>::identity(3);
        assert_eq!(id.as_slice(), &[1, 0, 0, 0, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_transpose() {
        let m = Matrix::from_vec(2, 3, vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let t = m.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_relative_eq!(t.get(0, 1), 4.0);
        assert_relative_eq!(t.get(2, 0), 3.0);
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn test_transpose_keeps_alignment() {
        let m = Matrix::<f32>::zeros_aligned(4, 8, Alignment::Simd8);
        assert!(m.transpose().is_aligned_to(32));
    }

    #[test]
    fn test_set_and_try_set() {
        let mut m = Matrix::<i32>::zeros(2, 2);
        m.set(1, 1, 5);
        assert_eq!(m.get(1, 1), 5);
        assert!(m.try_set(0, 1, 3).is_ok());
        assert!(matches!(
            m.try_set(2, 0, 1),
            Err(MatrixError::IndexOutOfRange { .. })
        ));
        assert!(m.try_get(0, 2).is_err());
        assert_eq!(m.to_vec(), vec![0, 3, 0, 5]);
    }

    #[test]
    fn test_clone_is_independent() {
        let a = Matrix::<i32>::identity(2);
        let mut b = a.clone();
        b.set(0, 0, 9);
        assert_eq!(a.get(0, 0), 1);
        assert_eq!(b.get(0, 0), 9);
    }
}
