use std::ffi::c_void;
use std::fmt::Debug;

use mk_matrix::{DType, Element};

use crate::buffer::DeviceMatrix;
use crate::error::Result;

/// One device multiply request: C = A @ B on device memory.
///
/// A is `rows x inner`, B is `inner x cols` and C is `rows x cols`, all
/// dense row-major of [`DeviceGemm::dtype`]. Requests are only built by
/// [`crate::naive_matmul`] and [`crate::shared_matmul`] from validated
/// [`DeviceMatrix`] handles, so the pointers satisfy the handles' contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceGemm {
    a: *const c_void,
    b: *const c_void,
    c: *mut c_void,
    rows: usize,
    inner: usize,
    cols: usize,
    dtype: DType,
}

impl DeviceGemm {
    pub(crate) fn new<T: Element>(
        a: &DeviceMatrix<T>,
        b: &DeviceMatrix<T>,
        c: &mut DeviceMatrix<T>,
    ) -> Self {
        Self {
            a: a.as_ptr().cast(),
            b: b.as_ptr().cast(),
            c: c.as_mut_ptr().cast(),
            rows: a.rows(),
            inner: a.cols(),
            cols: b.cols(),
            dtype: T::DTYPE,
        }
    }

    pub fn a(&self) -> *const c_void {
        self.a
    }

    pub fn b(&self) -> *const c_void {
        self.b
    }

    pub fn c(&self) -> *mut c_void {
        self.c
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn inner(&self) -> usize {
        self.inner
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }
}

/// A device runtime able to multiply matrices resident in its memory.
///
/// `naive` is the one-thread-per-output-cell kernel; `shared` is the tiled
/// kernel that stages blocks of A and B in on-chip shared memory. Both
/// must either fill C completely or return an error.
pub trait DeviceKernel: Send + Sync + Debug {
    /// Returns the name of this kernel set (e.g., "cuda").
    fn name(&self) -> &str;

    /// Returns true if both kernels accept elements of `dtype`.
    fn supports(&self, dtype: DType) -> bool;

    fn naive(&self, gemm: &DeviceGemm) -> Result<()>;

    fn shared(&self, gemm: &DeviceGemm) -> Result<()>;
}
