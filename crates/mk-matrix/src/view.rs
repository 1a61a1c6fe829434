use std::fmt;

use crate::dtype::Element;
use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;
use crate::storage::Alignment;

/// Number of buffer elements a `rows x cols` window with `stride` touches,
/// measured from its first element.
pub(crate) fn extent(rows: usize, cols: usize, stride: usize) -> usize {
    if rows == 0 || cols == 0 {
        0
    } else {
        (rows - 1) * stride + cols
    }
}

/// Validates a window request against a parent of `rows x cols` and returns
/// the window's starting offset into the parent's slice.
fn window(
    parent_rows: usize,
    parent_cols: usize,
    stride: usize,
    row_offset: usize,
    col_offset: usize,
    rows: usize,
    cols: usize,
) -> Result<(usize, usize)> {
    let fits = row_offset
        .checked_add(rows)
        .is_some_and(|end| end <= parent_rows)
        && col_offset
            .checked_add(cols)
            .is_some_and(|end| end <= parent_cols);
    if !fits {
        return Err(MatrixError::OutOfBounds {
            row_offset,
            col_offset,
            rows,
            cols,
            parent_rows,
            parent_cols,
        });
    }
    let len = extent(rows, cols, stride);
    let start = if len == 0 {
        0
    } else {
        row_offset * stride + col_offset
    };
    Ok((start, len))
}

/// Side lengths of the four quadrants of a `rows x cols` window.
fn quadrant_side(rows: usize, cols: usize) -> Result<(usize, usize)> {
    if rows % 2 != 0 || cols % 2 != 0 {
        return Err(MatrixError::InvalidDimension {
            rows,
            cols,
            reason: "quadrant split needs even row and column counts",
        });
    }
    Ok((rows / 2, cols / 2))
}

/// Shared, non-owning window into a matrix buffer.
///
/// Element `(row, col)` lives at `row * stride + col` of the borrowed slice,
/// which starts at the window's first element. A view never allocates and
/// cannot outlive the matrix it was taken from.
pub struct MatrixView<'a, T: Element> {
    data: &'a [T],
    rows: usize,
    cols: usize,
    stride: usize,
}

impl<T: Element> Copy for MatrixView<'_, T> {}

impl<T: Element> Clone for MatrixView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T: Element> MatrixView<'a, T> {
    /// Wrap a row-major slice with an explicit stride.
    ///
    /// # Errors
    /// Returns `InvalidDimension` if `stride < cols`, and `OutOfBounds` if
    /// the window does not fit in `data`.
    pub fn from_slice(data: &'a [T], rows: usize, cols: usize, stride: usize) -> Result<Self> {
        if stride < cols {
            return Err(MatrixError::InvalidDimension {
                rows,
                cols,
                reason: "stride is smaller than the column count",
            });
        }
        let len = extent(rows, cols, stride);
        if len > data.len() {
            return Err(MatrixError::OutOfBounds {
                row_offset: 0,
                col_offset: 0,
                rows,
                cols,
                parent_rows: data.len() / stride.max(1),
                parent_cols: stride,
            });
        }
        Ok(Self::new(&data[..len], rows, cols, stride))
    }

    pub(crate) fn new(data: &'a [T], rows: usize, cols: usize, stride: usize) -> Self {
        debug_assert!(stride >= cols);
        debug_assert_eq!(data.len(), extent(rows, cols, stride));
        MatrixView {
            data,
            rows,
            cols,
            stride,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Elements between the starts of consecutive rows.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// The borrowed window, from its first element to its last.
    ///
    /// Contains elements of the parent outside the window when
    /// `stride > cols`.
    #[inline]
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns true if the window starts on a `bytes` boundary.
    pub fn is_aligned_to(&self, bytes: usize) -> bool {
        self.data.as_ptr() as usize % bytes == 0
    }

    /// Read element `(row, col)`.
    ///
    /// The window bounds are only checked in debug builds; use
    /// [`MatrixView::try_get`] for an always-checked read.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        debug_assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of range for {}x{} view",
            row,
            col,
            self.rows,
            self.cols
        );
        self.data[row * self.stride + col]
    }

    /// Read element `(row, col)`, failing with `IndexOutOfRange` outside the window.
    pub fn try_get(&self, row: usize, col: usize) -> Result<T> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.data[row * self.stride + col])
    }

    /// Row `i` as a contiguous slice of `cols` elements.
    #[inline]
    pub fn row(&self, i: usize) -> &'a [T] {
        if self.cols == 0 {
            // A zero-width window borrows an empty slice.
            return &self.data[..0];
        }
        let start = i * self.stride;
        &self.data[start..start + self.cols]
    }

    /// Iterate over the rows of this view.
    pub fn rows_iter(&self) -> impl Iterator<Item = &'a [T]> + 'a {
        let view = *self;
        (0..view.rows).map(move |i| view.row(i))
    }

    /// Take a window of this view, relative to its top-left corner.
    ///
    /// # Errors
    /// Returns `OutOfBounds` if the window exceeds this view.
    pub fn submatrix(
        &self,
        row_offset: usize,
        col_offset: usize,
        rows: usize,
        cols: usize,
    ) -> Result<MatrixView<'a, T>> {
        let (start, len) = window(
            self.rows,
            self.cols,
            self.stride,
            row_offset,
            col_offset,
            rows,
            cols,
        )?;
        Ok(MatrixView::new(
            &self.data[start..start + len],
            rows,
            cols,
            self.stride,
        ))
    }

    /// Split into `[top-left, top-right, bottom-left, bottom-right]`.
    ///
    /// # Errors
    /// Returns `InvalidDimension` unless both dimensions are even.
    pub fn quadrants(&self) -> Result<[MatrixView<'a, T>; 4]> {
        let (h, w) = quadrant_side(self.rows, self.cols)?;
        Ok([
            self.submatrix(0, 0, h, w)?,
            self.submatrix(0, w, h, w)?,
            self.submatrix(h, 0, h, w)?,
            self.submatrix(h, w, h, w)?,
        ])
    }

    /// Copy into a new, densely packed owning matrix.
    pub fn to_owned(&self) -> Matrix<T> {
        self.to_owned_aligned(Alignment::Natural)
    }

    /// Copy into a new owning matrix allocated with `alignment`.
    pub fn to_owned_aligned(&self, alignment: Alignment) -> Matrix<T> {
        let mut out = Matrix::zeros_aligned(self.rows, self.cols, alignment);
        for (dst, src) in out.as_mut_slice().chunks_mut(self.cols.max(1)).zip(self.rows_iter()) {
            dst.copy_from_slice(src);
        }
        out
    }

    /// Transposed copy, allocated with `alignment`.
    pub fn transpose_aligned(&self, alignment: Alignment) -> Matrix<T> {
        let mut out = Matrix::zeros_aligned(self.cols, self.rows, alignment);
        for i in 0..self.rows {
            for (j, &v) in self.row(i).iter().enumerate() {
                out.set(j, i, v);
            }
        }
        out
    }

    /// Transposed copy with natural alignment.
    pub fn transpose(&self) -> Matrix<T> {
        self.transpose_aligned(Alignment::Natural)
    }

    /// Reinterpret as an `f32` view, if `T` is `f32`.
    pub fn as_f32(&self) -> Option<MatrixView<'a, f32>> {
        T::as_f32_slice(self.data).map(|data| MatrixView {
            data,
            rows: self.rows,
            cols: self.cols,
            stride: self.stride,
        })
    }
}

impl<T: Element> fmt::Debug for MatrixView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatrixView")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("stride", &self.stride)
            .field("data", &self.rows_iter().collect::<Vec<_>>())
            .finish()
    }
}

/// Exclusive, non-owning window into a matrix buffer.
///
/// Writes go straight to the parent's storage. Disjoint windows can be
/// taken one after another through [`MatrixViewMut::submatrix_mut`], and
/// rows can be handed out as disjoint slices through
/// [`MatrixViewMut::rows_mut`].
pub struct MatrixViewMut<'a, T: Element> {
    data: &'a mut [T],
    rows: usize,
    cols: usize,
    stride: usize,
}

impl<'a, T: Element> MatrixViewMut<'a, T> {
    /// Wrap a mutable row-major slice with an explicit stride.
    ///
    /// # Errors
    /// Same conditions as [`MatrixView::from_slice`].
    pub fn from_slice(
        data: &'a mut [T],
        rows: usize,
        cols: usize,
        stride: usize,
    ) -> Result<Self> {
        if stride < cols {
            return Err(MatrixError::InvalidDimension {
                rows,
                cols,
                reason: "stride is smaller than the column count",
            });
        }
        let len = extent(rows, cols, stride);
        if len > data.len() {
            return Err(MatrixError::OutOfBounds {
                row_offset: 0,
                col_offset: 0,
                rows,
                cols,
                parent_rows: data.len() / stride.max(1),
                parent_cols: stride,
            });
        }
        Ok(Self::new(&mut data[..len], rows, cols, stride))
    }

    pub(crate) fn new(data: &'a mut [T], rows: usize, cols: usize, stride: usize) -> Self {
        debug_assert!(stride >= cols);
        debug_assert_eq!(data.len(), extent(rows, cols, stride));
        MatrixViewMut {
            data,
            rows,
            cols,
            stride,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Shared view of the same window.
    pub fn view(&self) -> MatrixView<'_, T> {
        MatrixView::new(&*self.data, self.rows, self.cols, self.stride)
    }

    /// Shorter-lived mutable view of the same window.
    pub fn reborrow(&mut self) -> MatrixViewMut<'_, T> {
        MatrixViewMut::new(&mut *self.data, self.rows, self.cols, self.stride)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        debug_assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of range for {}x{} view",
            row,
            col,
            self.rows,
            self.cols
        );
        self.data[row * self.stride + col]
    }

    /// Write element `(row, col)`; window bounds are checked in debug builds only.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        debug_assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of range for {}x{} view",
            row,
            col,
            self.rows,
            self.cols
        );
        self.data[row * self.stride + col] = value;
    }

    pub fn try_get(&self, row: usize, col: usize) -> Result<T> {
        self.view().try_get(row, col)
    }

    /// Write element `(row, col)`, failing with `IndexOutOfRange` outside the window.
    pub fn try_set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        self.data[row * self.stride + col] = value;
        Ok(())
    }

    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        if self.cols == 0 {
            return &mut self.data[..0];
        }
        let start = i * self.stride;
        &mut self.data[start..start + self.cols]
    }

    /// Iterate over the rows as disjoint mutable slices of `cols` elements.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [T]> + '_ {
        let cols = self.cols;
        self.data
            .chunks_mut(self.stride.max(1))
            .take(self.rows)
            .map(move |row| &mut row[..cols])
    }

    /// Mutable window relative to this view's top-left corner.
    ///
    /// # Errors
    /// Returns `OutOfBounds` if the window exceeds this view.
    pub fn submatrix_mut(
        &mut self,
        row_offset: usize,
        col_offset: usize,
        rows: usize,
        cols: usize,
    ) -> Result<MatrixViewMut<'_, T>> {
        let (start, len) = window(
            self.rows,
            self.cols,
            self.stride,
            row_offset,
            col_offset,
            rows,
            cols,
        )?;
        Ok(MatrixViewMut::new(
            &mut self.data[start..start + len],
            rows,
            cols,
            self.stride,
        ))
    }

    /// Like [`MatrixViewMut::submatrix_mut`], but keeps the parent's lifetime.
    pub fn into_submatrix_mut(
        self,
        row_offset: usize,
        col_offset: usize,
        rows: usize,
        cols: usize,
    ) -> Result<MatrixViewMut<'a, T>> {
        let (parent_rows, parent_cols, stride) = (self.rows, self.cols, self.stride);
        let data = self.data;
        let (start, len) = window(
            parent_rows,
            parent_cols,
            stride,
            row_offset,
            col_offset,
            rows,
            cols,
        )?;
        Ok(MatrixViewMut::new(
            &mut data[start..start + len],
            rows,
            cols,
            stride,
        ))
    }

    /// Overwrite every element with the matching element of `src`.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the shapes differ.
    pub fn copy_from(&mut self, src: MatrixView<'_, T>) -> Result<()> {
        if src.shape() != self.shape() {
            return Err(MatrixError::ShapeMismatch {
                expected: self.shape(),
                got: src.shape(),
            });
        }
        for (dst, row) in self.rows_mut().zip(src.rows_iter()) {
            dst.copy_from_slice(row);
        }
        Ok(())
    }

    /// Set every element of the window to `value`.
    pub fn fill(&mut self, value: T) {
        for row in self.rows_mut() {
            row.fill(value);
        }
    }

    /// Reinterpret as an `f32` view, if `T` is `f32`.
    pub fn into_f32(self) -> Option<MatrixViewMut<'a, f32>> {
        let (rows, cols, stride) = (self.rows, self.cols, self.stride);
        T::as_f32_slice_mut(self.data).map(|data| MatrixViewMut {
            data,
            rows,
            cols,
            stride,
        })
    }
}

impl<T: Element> fmt::Debug for MatrixViewMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.view(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting(rows: usize, cols: usize) -> Matrix<i32> {
        Matrix::from_fn(rows, cols, |i, j| (i * cols + j) as i32)
    }

    #[test]
    fn test_submatrix_reads_parent() {
        let m = counting(4, 4);
        let v = m.submatrix(1, 2, 2, 2).unwrap();
        assert_eq!(v.shape(), (2, 2));
        assert_eq!(v.stride(), 4);
        assert_eq!(v.get(0, 0), 6);
        assert_eq!(v.get(0, 1), 7);
        assert_eq!(v.get(1, 0), 10);
        assert_eq!(v.get(1, 1), 11);
    }

    #[test]
    fn test_write_through_view_is_visible_in_parent() {
        let mut m = counting(4, 4);
        {
            let mut v = m.submatrix_mut(2, 1, 2, 3).unwrap();
            v.set(1, 2, -1);
            v.set(0, 0, -2);
        }
        assert_eq!(m.get(3, 3), -1);
        assert_eq!(m.get(2, 1), -2);
    }

    #[test]
    fn test_parent_write_is_visible_in_view() {
        let mut m = counting(4, 4);
        m.set(3, 2, 99);
        let v = m.submatrix(2, 2, 2, 2).unwrap();
        assert_eq!(v.get(1, 0), 99);
    }

    #[test]
    fn test_nested_submatrix() {
        let m = counting(8, 8);
        let outer = m.submatrix(2, 2, 4, 4).unwrap();
        let inner = outer.submatrix(1, 1, 2, 2).unwrap();
        assert_eq!(inner.get(0, 0), m.get(3, 3));
        assert_eq!(inner.get(1, 1), m.get(4, 4));
        assert_eq!(inner.stride(), 8);
    }

    #[test]
    fn test_submatrix_out_of_bounds() {
        let m = counting(4, 4);
        let err = m.submatrix(3, 0, 2, 2).unwrap_err();
        assert!(matches!(err, MatrixError::OutOfBounds { .. }));
        assert!(matches!(
            m.submatrix(0, 2, 1, 3),
            Err(MatrixError::OutOfBounds { .. })
        ));
        assert!(matches!(
            m.submatrix(usize::MAX, 0, 2, 1),
            Err(MatrixError::OutOfBounds { .. })
        ));
        let v = m.submatrix(1, 1, 2, 2).unwrap();
        assert!(matches!(
            v.submatrix(1, 1, 2, 1),
            Err(MatrixError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_empty_window_at_edge() {
        let m = counting(2, 2);
        let v = m.submatrix(2, 0, 0, 2).unwrap();
        assert_eq!(v.shape(), (0, 2));
        assert_eq!(v.rows_iter().count(), 0);
    }

    #[test]
    fn test_zero_width_window_rows() {
        let mut m = counting(3, 4);
        let v = m.submatrix(0, 1, 3, 0).unwrap();
        assert_eq!(v.shape(), (3, 0));
        for i in 0..3 {
            assert!(v.row(i).is_empty());
        }
        assert_eq!(v.rows_iter().count(), 3);
        assert_eq!(v.to_owned().shape(), (3, 0));

        let mut w = m.submatrix_mut(1, 2, 2, 0).unwrap();
        assert!(w.row_mut(1).is_empty());
    }

    #[test]
    fn test_quadrants() {
        let m = counting(4, 4);
        let [tl, tr, bl, br] = m.quadrants().unwrap();
        assert_eq!(tl.get(0, 0), 0);
        assert_eq!(tr.get(0, 0), 2);
        assert_eq!(bl.get(0, 0), 8);
        assert_eq!(br.get(1, 1), 15);
        assert!(counting(3, 4).quadrants().is_err());
    }

    #[test]
    fn test_try_get_set() {
        let mut m = counting(2, 3);
        assert_eq!(m.view().try_get(1, 2).unwrap(), 5);
        assert!(matches!(
            m.view().try_get(2, 0),
            Err(MatrixError::IndexOutOfRange { row: 2, col: 0, .. })
        ));
        let mut v = m.submatrix_mut(0, 1, 2, 2).unwrap();
        assert!(v.try_set(1, 1, 7).is_ok());
        assert!(matches!(
            v.try_set(0, 2, 7),
            Err(MatrixError::IndexOutOfRange { .. })
        ));
        assert_eq!(m.get(1, 2), 7);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn test_get_outside_window_panics_in_debug() {
        let m = counting(4, 4);
        let v = m.submatrix(0, 0, 2, 2).unwrap();
        // Still inside the parent's buffer, so only the debug check catches it.
        let _ = v.get(0, 2);
    }

    #[test]
    fn test_rows_mut_are_disjoint_windows() {
        let mut m = counting(4, 4);
        let mut v = m.submatrix_mut(1, 1, 2, 2).unwrap();
        for row in v.rows_mut() {
            assert_eq!(row.len(), 2);
            row.fill(0);
        }
        assert_eq!(
            m.as_slice(),
            &[0, 1, 2, 3, 4, 0, 0, 7, 8, 0, 0, 11, 12, 13, 14, 15]
        );
    }

    #[test]
    fn test_copy_from_and_to_owned() {
        let src = counting(4, 4);
        let mut dst = Matrix::<i32>::zeros(4, 4);
        let window = src.submatrix(2, 2, 2, 2).unwrap();
        dst.submatrix_mut(0, 0, 2, 2)
            .unwrap()
            .copy_from(window)
            .unwrap();
        assert_eq!(dst.get(1, 1), 15);
        let owned = window.to_owned();
        assert_eq!(owned.stride(), 2);
        assert_eq!(owned.as_slice(), &[10, 11, 14, 15]);

        let err = dst.view_mut().copy_from(window).unwrap_err();
        assert!(matches!(err, MatrixError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_transpose_of_window() {
        let m = counting(3, 4);
        let t = m.submatrix(0, 1, 3, 2).unwrap().transpose();
        assert_eq!(t.shape(), (2, 3));
        assert_eq!(t.as_slice(), &[1, 5, 9, 2, 6, 10]);
    }

    #[test]
    fn test_from_slice_with_stride() {
        let data = [1.0f32, 2.0, 0.0, 3.0, 4.0];
        let v = MatrixView::from_slice(&data, 2, 2, 3).unwrap();
        assert_eq!(v.get(1, 1), 4.0);
        assert!(MatrixView::from_slice(&data, 2, 4, 3).is_err());
        assert!(MatrixView::from_slice(&data, 3, 2, 3).is_err());
    }

    #[test]
    fn test_as_f32() {
        let m = Matrix::from_vec(1, 2, vec![1.0f32, 2.0]).unwrap();
        assert!(m.view().as_f32().is_some());
        let d = Matrix::from_vec(1, 2, vec![1.0f64, 2.0]).unwrap();
        assert!(d.view().as_f32().is_none());
    }
}
