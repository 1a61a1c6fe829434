//! Fixed-width single-precision SIMD strategies.
//!
//! Both strategies compute `C = A @ Bt^T` with `Bt` pre-transposed by the
//! caller, so every output cell is a dot product of two contiguous rows.
//! The dot product only covers `A.cols() / width` full chunks: when the
//! column count is not a multiple of the width, the trailing elements are
//! left out of the sum. Callers that need the exact product should pad the
//! inner dimension with zeros or use [`crate::matmul_transposed`].

pub(crate) mod portable;
#[cfg(target_arch = "x86_64")]
pub(crate) mod x86;

use mk_matrix::{Element, MatrixError, MatrixView, MatrixViewMut, Result};

use crate::check::matmul_transposed_shapes;
use crate::parallel::par_fill;

/// Vector width of a SIMD strategy, in f32 lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// 4 lanes, 16-byte alignment (SSE-class).
    X4,
    /// 8 lanes, 32-byte alignment (AVX-class).
    X8,
}

impl Width {
    pub fn lanes(&self) -> usize {
        match self {
            Width::X4 => 4,
            Width::X8 => 8,
        }
    }

    /// Required alignment of every operand row, in bytes.
    pub fn align_bytes(&self) -> usize {
        self.lanes() * std::mem::size_of::<f32>()
    }

    fn op_name(&self) -> &'static str {
        match self {
            Width::X4 => "simd4 matmul",
            Width::X8 => "simd8 matmul",
        }
    }
}

/// Which implementation a SIMD strategy runs on this machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimdPath {
    /// `std::arch` intrinsics with aligned loads.
    Intrinsics,
    /// Lane-array fallback with identical results.
    Portable,
}

/// Pick the implementation for `width` based on runtime CPU detection.
pub fn detect(width: Width) -> SimdPath {
    #[cfg(target_arch = "x86_64")]
    {
        let supported = match width {
            Width::X4 => is_x86_feature_detected!("sse"),
            Width::X8 => is_x86_feature_detected!("avx"),
        };
        if supported {
            return SimdPath::Intrinsics;
        }
    }
    #[cfg(not(target_arch = "x86_64"))]
    let _ = width;
    SimdPath::Portable
}

fn check_alignment(op: &'static str, m: &MatrixView<'_, f32>, width: Width) -> Result<()> {
    let required = width.align_bytes();
    let offset = m.as_slice().as_ptr() as usize % required;
    if offset != 0 {
        return Err(MatrixError::Misaligned {
            op,
            required,
            offset,
        });
    }
    if m.rows() > 1 {
        let row_offset = (m.stride() * std::mem::size_of::<f32>()) % required;
        if row_offset != 0 {
            return Err(MatrixError::Misaligned {
                op,
                required,
                offset: row_offset,
            });
        }
    }
    Ok(())
}

/// Dot product of two rows on an already-validated path.
#[inline]
fn dot(width: Width, path: SimdPath, a: &[f32], b: &[f32]) -> f32 {
    match (width, path) {
        // SAFETY: `detect` saw the CPU feature, the caller checked both rows
        // are aligned to `width.align_bytes()`, and the shape check made
        // both rows the same length.
        #[cfg(target_arch = "x86_64")]
        (Width::X4, SimdPath::Intrinsics) => unsafe { x86::dot_sse(a, b) },
        #[cfg(target_arch = "x86_64")]
        (Width::X8, SimdPath::Intrinsics) => unsafe { x86::dot_avx(a, b) },
        (Width::X4, _) => portable::dot_truncated::<4>(a, b),
        (Width::X8, _) => portable::dot_truncated::<8>(a, b),
    }
}

fn matmul_simd<T: Element>(
    width: Width,
    a: MatrixView<'_, T>,
    bt: MatrixView<'_, T>,
    c: MatrixViewMut<'_, T>,
) -> Result<()> {
    let op = width.op_name();
    let unsupported = MatrixError::UnsupportedDType { op, dtype: T::DTYPE };
    let (Some(a), Some(bt)) = (a.as_f32(), bt.as_f32()) else {
        return Err(unsupported);
    };
    let mut c = c.into_f32().ok_or(unsupported)?;

    matmul_transposed_shapes(&a, &bt, c.shape())?;
    check_alignment(op, &a, width)?;
    check_alignment(op, &bt, width)?;

    let path = detect(width);
    if a.cols() % width.lanes() != 0 {
        log::debug!(
            "{op}: inner dimension {} is not a multiple of {}; last {} columns are ignored",
            a.cols(),
            width.lanes(),
            a.cols() % width.lanes()
        );
    }
    log::debug!(
        "{op}: [{}x{}] @ [{}x{}]^T via {:?} on {} threads",
        a.rows(),
        a.cols(),
        bt.rows(),
        bt.cols(),
        path,
        rayon::current_num_threads()
    );

    par_fill(&mut c, |i, j| dot(width, path, a.row(i), bt.row(j)));
    Ok(())
}

/// 4-wide SIMD multiply: C = A @ Bt^T, f32 only.
///
/// Both `a` and `bt` must have every row start on a 16-byte boundary, e.g.
/// matrices allocated with [`mk_matrix::Alignment::Simd4`] whose column
/// count is a multiple of 4.
///
/// # Errors
/// - `UnsupportedDType` if `T` is not `f32`
/// - `MatmulMismatch` unless A is m x k, Bt is n x k and C is m x n
/// - `Misaligned` if a row of `a` or `bt` is not 16-byte aligned
pub fn matmul_simd4<T: Element>(
    a: MatrixView<'_, T>,
    bt: MatrixView<'_, T>,
    c: MatrixViewMut<'_, T>,
) -> Result<()> {
    matmul_simd(Width::X4, a, bt, c)
}

/// 8-wide SIMD multiply: C = A @ Bt^T, f32 only, rows 32-byte aligned.
///
/// # Errors
/// Same as [`matmul_simd4`], with a 32-byte alignment requirement.
pub fn matmul_simd8<T: Element>(
    a: MatrixView<'_, T>,
    bt: MatrixView<'_, T>,
    c: MatrixViewMut<'_, T>,
) -> Result<()> {
    matmul_simd(Width::X8, a, bt, c)
}
